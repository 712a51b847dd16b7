//! Connected-component extraction over a run-length image.
//!
//! A single forward scan walks the scanlines in order; every run receives a
//! label, and a run that overlaps (inclusive range intersection) one or more
//! runs of the previous scanline adopts/merges their labels through an
//! array-backed disjoint-set union. A second pass resolves each label to its
//! root, groups the runs per root, and materializes one compact glyph per
//! group. Cost is linear in the total run count.
//!
//! Vertical input images are handled transparently: grouped pixels are
//! re-compacted into horizontal tables, so extracted glyphs always carry a
//! horizontal run table whatever the source orientation.

use super::Glyph;
use crate::runs::{Orientation, RowAccumulator, Run, RunImage};
use std::collections::HashMap;

/// Index-based disjoint-set union with path compression.
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        Self { parent: Vec::new() }
    }

    fn make(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        // Path compression.
        let mut cur = label;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: u32, b: u32) -> u32 {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // Attach the younger root to the older one so labels stay stable
            // in scan order.
            let (keep, absorb) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[absorb as usize] = keep;
            keep
        } else {
            ra
        }
    }
}

/// Extract the maximal connected components of `image` as glyphs.
///
/// Every foreground pixel of the input ends up in exactly one returned
/// glyph. An empty image yields an empty list.
pub fn extract_glyphs(image: &RunImage) -> Vec<Glyph> {
    if image.is_empty() {
        return Vec::new();
    }

    let mut uf = UnionFind::new();
    // Label of each run, parallel to the scanline sequences.
    let mut labels: Vec<Vec<u32>> = Vec::with_capacity(image.sequence_count() as usize);

    for s in 0..image.sequence_count() {
        let runs = image.runs(s);
        let mut row_labels = Vec::with_capacity(runs.len());
        let prev: Option<(&[Run], &[u32])> = (s > 0).then(|| {
            (
                image.runs(s - 1),
                labels.last().map(|l| l.as_slice()).unwrap_or(&[]),
            )
        });

        // Runs are sorted, so overlap candidates advance monotonically.
        let mut p = 0usize;
        for run in runs {
            let mut label: Option<u32> = None;
            if let Some((prev_runs, prev_labels)) = prev {
                // Skip previous runs entirely left of this one.
                while p < prev_runs.len() && prev_runs[p].stop() < run.start {
                    p += 1;
                }
                let mut q = p;
                while q < prev_runs.len() && prev_runs[q].start <= run.stop() {
                    if prev_runs[q].overlaps(run) {
                        label = Some(match label {
                            None => uf.find(prev_labels[q]),
                            Some(cur) => uf.union(cur, prev_labels[q]),
                        });
                    }
                    q += 1;
                }
            }
            row_labels.push(label.unwrap_or_else(|| uf.make()));
        }
        labels.push(row_labels);
    }

    // Group runs per resolved root, preserving scan order.
    let mut groups: HashMap<u32, RowAccumulator> = HashMap::new();
    let mut order: Vec<u32> = Vec::new();
    for s in 0..image.sequence_count() {
        for (run, &label) in image.runs(s).iter().zip(&labels[s as usize]) {
            let root = uf.find(label);
            let acc = groups.entry(root).or_insert_with(|| {
                order.push(root);
                RowAccumulator::new()
            });
            for c in run.start..=run.stop() {
                match image.orientation() {
                    Orientation::Horizontal => acc.push(c as i32, s as i32),
                    Orientation::Vertical => acc.push(s as i32, c as i32),
                }
            }
        }
    }

    let mut glyphs = Vec::with_capacity(order.len());
    for root in order {
        if let Some((left, top, table)) = groups.remove(&root).and_then(RowAccumulator::into_table)
        {
            glyphs.push(Glyph::new(left, top, table));
        }
    }
    glyphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn image_from_rows(rows: &[&str]) -> RunImage {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let rows: Vec<Vec<u8>> = rows.iter().map(|r| r.bytes().collect()).collect();
        RunImage::from_fn(Orientation::Horizontal, width, height, |x, y| {
            rows[y as usize].get(x as usize).copied() == Some(b'#')
        })
    }

    fn pixel_set(glyphs: &[Glyph]) -> HashSet<(i32, i32)> {
        let mut set = HashSet::new();
        for g in glyphs {
            g.for_each_pixel(|x, y| {
                assert!(set.insert((x, y)), "pixel ({x},{y}) claimed twice");
            });
        }
        set
    }

    #[test]
    fn empty_image_yields_no_glyphs() {
        let img = RunImage::from_fn(Orientation::Horizontal, 8, 8, |_, _| false);
        assert!(extract_glyphs(&img).is_empty());
    }

    #[test]
    fn components_partition_the_foreground() {
        let img = image_from_rows(&[
            "##..##",
            "##..##",
            "......",
            "######",
        ]);
        let glyphs = extract_glyphs(&img);
        assert_eq!(glyphs.len(), 3);
        let pixels = pixel_set(&glyphs);
        assert_eq!(pixels.len() as u32, img.weight());
        for (x, y) in pixels {
            assert!(img.contains(x as u32, y as u32));
        }
    }

    #[test]
    fn touching_columns_connect_across_rows() {
        // The two arms only share column 2 between rows 0 and 1.
        let glyphs = extract_glyphs(&image_from_rows(&[
            "..###",
            "###..",
        ]));
        assert_eq!(glyphs.len(), 1);
        assert_eq!(glyphs[0].weight(), 6);
    }

    #[test]
    fn u_shape_merges_late() {
        // Left and right columns get distinct labels until the bottom bar
        // joins them; the merge chain must still resolve to one glyph.
        let glyphs = extract_glyphs(&image_from_rows(&[
            "#...#",
            "#...#",
            "#####",
        ]));
        assert_eq!(glyphs.len(), 1);
        assert_eq!(glyphs[0].weight(), 9);
        assert_eq!(glyphs[0].bounds().w, 5);
    }

    #[test]
    fn diagonal_pixels_stay_separate() {
        // Runs meeting only diagonally do not intersect by column range.
        let glyphs = extract_glyphs(&image_from_rows(&[
            "#....",
            ".#...",
        ]));
        assert_eq!(glyphs.len(), 2);
    }

    #[test]
    fn vertical_input_is_transposed() {
        let img = RunImage::from_fn(Orientation::Vertical, 6, 6, |x, y| x == y);
        let glyphs = extract_glyphs(&img);
        assert_eq!(glyphs.len(), 6);
        for g in &glyphs {
            assert_eq!(g.table().orientation(), Orientation::Horizontal);
            assert_eq!(g.weight(), 1);
        }
    }
}
