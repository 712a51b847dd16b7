#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod check;
pub mod detector;
pub mod error;
pub mod glyph;
pub mod ledger;
pub mod report;
pub mod runs;
pub mod sig;

// “Expert” modules – still public, but considered unstable internals.
pub mod config;
pub mod io;
pub mod math;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{SheetDetector, SheetInput, SheetOutcome, SystemInput, SystemOutcome};
pub use crate::error::DetectError;
pub use crate::report::{SheetReport, SystemReport};

// Core data types.
pub use crate::glyph::{Glyph, GlyphId, GlyphRegistry};
pub use crate::ledger::{LedgerInter, LedgerParams, Scale, Staff, StaffLine, SystemGeometry};
pub use crate::runs::{Orientation, Run, RunImage};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use glyph_detector::prelude::*;
///
/// # fn main() {
/// let scale = Scale { interline: 20, line_thickness: 3 };
/// let detector = SheetDetector::new(LedgerParams::default());
/// let outcome = detector.detect(SheetInput { scale, systems: vec![] });
/// println!("ledgers={} in {:.1} ms", outcome.report.ledger_count(), outcome.report.latency_ms);
/// # }
/// ```
pub mod prelude {
    pub use crate::detector::{SheetDetector, SheetInput, SystemInput};
    pub use crate::ledger::{LedgerParams, Scale, Staff, StaffLine, SystemGeometry};
    pub use crate::runs::{Orientation, RunImage};
}
