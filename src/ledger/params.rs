//! Tuning constants for the ledger pipeline.
//!
//! Lengths are interline fractions unless noted; thickness gates come in
//! both interline and line-thickness flavors because staff-line thickness
//! is the natural unit for "does this stick look like a line".

use serde::{Deserialize, Serialize};

/// Knobs for candidate assembly and the per-line sweep.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerParams {
    /// High bound for stick thickness, interline fraction.
    pub max_thickness_high: f64,
    /// High bound for stick thickness, line-thickness fraction.
    pub max_thickness_high_lines: f64,
    /// Low bound for stick thickness, line-thickness fraction.
    pub max_thickness_low_lines: f64,
    /// High bound of the minimum-thickness ramp, interline fraction.
    pub min_thickness_high: f64,
    /// Vertical margin around a virtual line's theoretical ordinate.
    pub ledger_margin_y: f64,
    /// Minimum abscissa overlap with the previous-index ledger used as
    /// ordinate reference.
    pub min_abscissa_overlap: f64,
    /// Minimum-length ramp for ordinary ledgers.
    pub min_length_low: f64,
    pub min_length_high: f64,
    /// Minimum-length ramp applied to long candidates.
    pub min_long_length_low: f64,
    pub min_long_length_high: f64,
    /// Length from which a candidate is graded with the long suite.
    pub min_wide_length: f64,
    /// Maximum abscissa gap between neighboring ledgers considered for
    /// exclusion on one virtual line.
    pub max_inter_ledger_dx: f64,
    /// High bound of the straightness ramp (RMS line-fit distance).
    pub max_fit_distance: f64,
    /// Low bound of the convexity check (count of stick ends standing
    /// clear of surrounding foreground).
    pub convexity_low: f64,
    /// Minimum core length for an atomic candidate section.
    pub min_core_length: f64,
    /// Maximum pixel gap bridged when assembling filaments from atoms.
    pub max_filament_gap: f64,
    /// Upper width guard for an assembled filament.
    pub max_filament_length: f64,
    /// Suite acceptance threshold.
    pub min_suite_grade: f64,
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            max_thickness_high: 0.4,
            max_thickness_high_lines: 3.25,
            max_thickness_low_lines: 1.0,
            min_thickness_high: 0.25,
            ledger_margin_y: 0.35,
            min_abscissa_overlap: 0.75,
            min_length_low: 1.0,
            min_length_high: 1.5,
            min_long_length_low: 1.4,
            min_long_length_high: 2.0,
            min_wide_length: 1.5,
            max_inter_ledger_dx: 2.5,
            max_fit_distance: 0.3,
            convexity_low: -0.5,
            min_core_length: 1.0,
            max_filament_gap: 0.25,
            max_filament_length: 20.0,
            min_suite_grade: 0.4,
        }
    }
}
