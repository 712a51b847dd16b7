//! Ledger detection: the worked pipeline composing the generic glyph
//! machinery.
//!
//! Per unit, [`candidates`] assembles straight filament candidates from the
//! pre-filtered section image, then [`sweep`] walks each staff's virtual
//! lines outward, grading candidates with the [`suites`] and reducing each
//! line's conflicts in the unit constraint graph.

pub mod candidates;
pub mod params;
pub mod staff;
pub mod suites;
pub mod sweep;

pub use candidates::retrieve_filaments;
pub use params::LedgerParams;
pub use staff::{Scale, Staff, StaffLine, SystemGeometry};
pub use suites::{LedgerSuites, StickContext};
pub use sweep::{LedgerInter, LedgerSweep, LineTrace, StaffTrace};
