//! Check suites grading ledger candidates.
//!
//! Each candidate stick is measured against the target ordinate of its
//! virtual line: thickness, length, end convexity, straightness and the
//! pitch of both endpoints. Two suites share every check except the
//! minimum-length ramp: long candidates are held to the raised bounds.

use crate::check::{Check, CheckSuite, Failure, Ramp};
use crate::glyph::Glyph;
use crate::ledger::params::LedgerParams;
use crate::ledger::staff::Scale;
use crate::runs::{Orientation, RunImage};
use std::sync::Arc;

pub const TOO_SHORT: Failure = Failure("Hori-TooShort");
pub const TOO_THIN: Failure = Failure("Hori-TooThin");
pub const TOO_THICK: Failure = Failure("Hori-TooThick");
pub const TOO_CONCAVE: Failure = Failure("Hori-TooConcave");
pub const TOO_BENDED: Failure = Failure("Hori-TooBended");
pub const TOO_SHIFTED: Failure = Failure("Hori-TooShifted");

/// Candidate stick plus the ordinate its virtual line predicts.
pub struct StickContext {
    pub stick: Arc<Glyph>,
    pub y_target: f64,
}

/// The short/long suite pair for one staff's interline.
pub struct LedgerSuites {
    short: CheckSuite<StickContext>,
    long: CheckSuite<StickContext>,
    min_wide_px: f64,
}

impl LedgerSuites {
    /// Build both suites for a staff-specific scale. `no_staff` is the
    /// staff-free binary source probed by the convexity check.
    pub fn new(scale: Scale, params: &LedgerParams, no_staff: Arc<RunImage>) -> Self {
        let short = build_suite(
            "ledger",
            scale,
            params,
            params.min_length_low,
            params.min_length_high,
            Arc::clone(&no_staff),
        );
        let long = build_suite(
            "wide-ledger",
            scale,
            params,
            params.min_long_length_low,
            params.min_long_length_high,
            no_staff,
        );
        Self {
            short,
            long,
            min_wide_px: scale.to_pixels_f(params.min_wide_length),
        }
    }

    /// Suite matching a candidate of the given pixel length.
    pub fn for_length(&self, length_px: f64) -> &CheckSuite<StickContext> {
        if length_px >= self.min_wide_px {
            &self.long
        } else {
            &self.short
        }
    }
}

fn build_suite(
    name: &'static str,
    scale: Scale,
    params: &LedgerParams,
    min_length_low: f64,
    min_length_high: f64,
    no_staff: Arc<RunImage>,
) -> CheckSuite<StickContext> {
    let mut suite = CheckSuite::new(name, params.min_suite_grade);

    suite.add(
        0.5,
        Check::new(
            "minThickness",
            0.0,
            params.min_thickness_high,
            Ramp::Increasing,
            true,
            TOO_THIN,
            move |ctx: &StickContext| {
                scale.pixels_to_frac(ctx.stick.mean_thickness(Orientation::Horizontal))
            },
        ),
    );

    suite.add(
        0.0,
        Check::new(
            "maxThickness",
            params.max_thickness_low_lines,
            params.max_thickness_high_lines,
            Ramp::Decreasing,
            false,
            TOO_THICK,
            move |ctx: &StickContext| {
                scale.pixels_to_line_frac(ctx.stick.mean_thickness(Orientation::Horizontal))
            },
        ),
    );

    suite.add(
        4.0,
        Check::new(
            "length",
            min_length_low,
            min_length_high,
            Ramp::Increasing,
            true,
            TOO_SHORT,
            move |ctx: &StickContext| scale.pixels_to_frac(ctx.stick.bounds().w as f64),
        ),
    );

    suite.add(
        2.0,
        Check::new(
            "convexity",
            params.convexity_low,
            2.0,
            Ramp::Increasing,
            true,
            TOO_CONCAVE,
            move |ctx: &StickContext| convex_ends(&ctx.stick, &no_staff),
        ),
    );

    suite.add(
        1.0,
        Check::new(
            "straightness",
            0.0,
            params.max_fit_distance,
            Ramp::Decreasing,
            false,
            TOO_BENDED,
            move |ctx: &StickContext| scale.pixels_to_frac(ctx.stick.mean_distance()),
        ),
    );

    suite.add(
        0.5,
        Check::new(
            "leftPitch",
            0.0,
            params.ledger_margin_y,
            Ramp::Decreasing,
            false,
            TOO_SHIFTED,
            move |ctx: &StickContext| {
                scale.pixels_to_frac((ctx.stick.start_point()[1] - ctx.y_target).abs())
            },
        ),
    );

    suite.add(
        0.5,
        Check::new(
            "rightPitch",
            0.0,
            params.ledger_margin_y,
            Ramp::Decreasing,
            false,
            TOO_SHIFTED,
            move |ctx: &StickContext| {
                scale.pixels_to_frac((ctx.stick.stop_point()[1] - ctx.y_target).abs())
            },
        ),
    );

    suite
}

/// Count stick ends whose corners stand clear of surrounding foreground.
///
/// On each end of the stick bounds the pixels just above and just below
/// must be background for the stick to stand out:
///
/// ```text
///  X                             X
///  +-----------------------------+
///  |                             |
///  +-----------------------------+
///  X                             X
/// ```
fn convex_ends(stick: &Glyph, no_staff: &RunImage) -> f64 {
    let bounds = stick.bounds();
    let probe = |x: i32, y: i32| -> bool {
        x >= 0 && y >= 0 && no_staff.contains(x as u32, y as u32)
    };
    let mut convexities = 0;
    for x in [bounds.x, bounds.right() - 1] {
        let top_fore = probe(x, bounds.y - 1);
        let bottom_fore = probe(x, bounds.bottom());
        if !(top_fore || bottom_fore) {
            convexities += 1;
        }
    }
    convexities as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::SuiteResult;
    use crate::runs::RunImage;

    fn scale() -> Scale {
        Scale {
            interline: 20,
            line_thickness: 3,
        }
    }

    /// A clean bar glyph plus an empty staff-free source around it.
    fn context(width: u32, height: u32, y_target: f64) -> (StickContext, Arc<RunImage>) {
        let stick = Arc::new(Glyph::new(
            50,
            100,
            RunImage::from_fn(Orientation::Horizontal, width, height, |_, _| true),
        ));
        let no_staff = Arc::new(RunImage::from_fn(
            Orientation::Horizontal,
            200,
            200,
            move |x, y| x >= 50 && x < 50 + width && y >= 100 && y < 100 + height,
        ));
        (StickContext { stick, y_target }, no_staff)
    }

    #[test]
    fn well_placed_stick_grades_high() {
        // 2 interlines long, 0.15 interline thick, centered on target.
        let (ctx, no_staff) = context(40, 3, 101.5);
        let suites = LedgerSuites::new(scale(), &LedgerParams::default(), no_staff);
        let suite = suites.for_length(40.0);
        assert_eq!(suite.name(), "wide-ledger");
        match suite.run(&ctx) {
            SuiteResult::Graded(impacts) => {
                assert!(
                    impacts.grade >= suite.min_threshold(),
                    "grade {} under threshold",
                    impacts.grade
                );
                assert_eq!(impacts.entries.len(), 7);
            }
            SuiteResult::Failed(code) => panic!("unexpected failure {code:?}"),
        }
    }

    #[test]
    fn short_stub_fails_the_length_gate() {
        let (ctx, no_staff) = context(8, 3, 101.5);
        let suites = LedgerSuites::new(scale(), &LedgerParams::default(), no_staff);
        match suites.for_length(8.0).run(&ctx) {
            SuiteResult::Failed(code) => assert_eq!(code, TOO_SHORT),
            SuiteResult::Graded(impacts) => panic!("stub accepted with grade {}", impacts.grade),
        }
    }

    #[test]
    fn shifted_stick_loses_pitch_impact() {
        let (good, no_staff) = context(40, 3, 101.5);
        let suites = LedgerSuites::new(scale(), &LedgerParams::default(), no_staff.clone());
        let (shifted, _) = context(40, 3, 106.5);
        let suite = suites.for_length(40.0);
        let g_good = suite.run(&good).grade().unwrap();
        let g_shifted = suite.run(&shifted).grade().unwrap();
        assert!(
            g_good > g_shifted,
            "expected pitch shift to cost grade: {g_good} vs {g_shifted}"
        );
    }
}
