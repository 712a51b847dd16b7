//! I/O helpers for binarized images and JSON reports.
//!
//! - [`load_run_image`]: read an already-binarized PNG/JPEG into a
//!   [`RunImage`] (dark pixels are foreground).
//! - [`run_image_from_gray`]: same conversion from a raw grayscale buffer.
//! - [`save_run_image`]: write a [`RunImage`] back to a grayscale PNG,
//!   handy when debugging section partitions.
//! - [`write_json_file`]: pretty-print a serializable value to disk.

use crate::error::DetectError;
use crate::runs::{Orientation, RunImage};
use image::GrayImage;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Threshold below which an 8-bit sample counts as foreground (ink).
const FOREGROUND_MAX: u8 = 128;

/// Convert a raw 8-bit grayscale buffer into a horizontal run image.
pub fn run_image_from_gray(data: &[u8], width: u32, height: u32) -> RunImage {
    RunImage::from_fn(Orientation::Horizontal, width, height, |x, y| {
        data[(y * width + x) as usize] < FOREGROUND_MAX
    })
}

/// Load an already-binarized image file as a horizontal run image.
pub fn load_run_image(path: &Path) -> Result<RunImage, DetectError> {
    let img = image::open(path)
        .map_err(|source| DetectError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_luma8();
    Ok(run_image_from_gray(
        img.as_raw(),
        img.width(),
        img.height(),
    ))
}

/// Write a run image as a grayscale PNG, foreground black on white.
pub fn save_run_image(image: &RunImage, path: &Path) -> Result<(), DetectError> {
    let mut out = GrayImage::from_pixel(image.width(), image.height(), image::Luma([255u8]));
    image.for_each_pixel(|x, y| {
        out.put_pixel(x, y, image::Luma([0u8]));
    });
    out.save(path).map_err(|source| DetectError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-print a serializable value to a JSON file.
pub fn write_json_file<T: Serialize>(value: &T, path: &Path) -> Result<(), DetectError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| DetectError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| DetectError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_buffer_round_trip() {
        // 4×2: ink on the main diagonal of each row half.
        let data = vec![0, 255, 255, 10, 255, 20, 30, 255];
        let img = run_image_from_gray(&data, 4, 2);
        assert_eq!(img.weight(), 4);
        assert!(img.contains(0, 0) && img.contains(3, 0));
        assert!(img.contains(1, 1) && img.contains(2, 1));
        assert!(!img.contains(1, 0));
    }
}
