//! Serializable outcome of a sheet-level detection run.

use crate::ledger::{LedgerInter, StaffTrace};
use serde::Serialize;

/// Outcome for one detection unit.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemReport {
    pub system: u32,
    /// Surviving ledger interpretations, grade breakdown included.
    pub ledgers: Vec<LedgerInter>,
    /// Per-staff, per-line sweep trace.
    pub staves: Vec<StaffTrace>,
    /// Candidate filaments assembled for the unit.
    pub candidates: usize,
    /// Set when the unit failed structurally; partial results above are
    /// whatever had been committed before the failure.
    pub error: Option<String>,
}

/// Whole-sheet report.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetReport {
    pub systems: Vec<SystemReport>,
    /// Glyphs registered sheet-wide during the run.
    pub registered_glyphs: usize,
    pub latency_ms: f64,
}

impl SheetReport {
    /// Total accepted ledgers across units.
    pub fn ledger_count(&self) -> usize {
        self.systems.iter().map(|s| s.ledgers.len()).sum()
    }
}
