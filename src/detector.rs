//! Sheet-level driver running ledger detection unit by unit.
//!
//! Units (systems) are independent and fan out on a rayon thread pool; the
//! sweep inside one unit stays strictly sequential because every virtual
//! line depends on the previous one's outcome. Each unit boundary catches
//! structural errors, logs them, and keeps whatever the unit had already
//! committed; a degraded unit never aborts the sheet.

use crate::error::DetectError;
use crate::glyph::GlyphRegistry;
use crate::ledger::{
    retrieve_filaments, LedgerInter, LedgerParams, LedgerSweep, Scale, StaffTrace, SystemGeometry,
};
use crate::report::{SheetReport, SystemReport};
use crate::runs::RunImage;
use crate::sig::InterId;
use log::{debug, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// One detection unit's inputs, exclusive to the unit.
///
/// `sections` holds the pre-filtered horizontal sections partitioned for
/// this unit upstream; `no_staff` is the staff-free binary source the
/// convexity check probes. Sections geometrically shared between adjacent
/// units must arrive as per-unit copies.
pub struct SystemInput {
    pub geometry: SystemGeometry,
    pub sections: RunImage,
    pub no_staff: RunImage,
}

/// Whole-sheet input.
pub struct SheetInput {
    pub scale: Scale,
    pub systems: Vec<SystemInput>,
}

/// Results of one unit: updated geometry (staff ledger maps filled in),
/// surviving interpretations by id, and the sweep trace.
pub struct SystemOutcome {
    pub system: u32,
    pub geometry: SystemGeometry,
    pub inters: BTreeMap<InterId, LedgerInter>,
    pub traces: Vec<StaffTrace>,
    pub candidates: usize,
    pub error: Option<DetectError>,
}

impl SystemOutcome {
    /// Accepted ledgers of one staff at one virtual line index.
    pub fn ledgers_at(&self, staff_id: u32, index: i32) -> Vec<&LedgerInter> {
        self.geometry
            .staves
            .iter()
            .find(|s| s.id == staff_id)
            .and_then(|s| s.ledgers_at(index))
            .map(|ids| ids.iter().filter_map(|id| self.inters.get(id)).collect())
            .unwrap_or_default()
    }
}

/// Sheet outcome: per-unit results plus the serializable report.
pub struct SheetOutcome {
    pub systems: Vec<SystemOutcome>,
    pub report: SheetReport,
}

/// Ledger detector over a whole sheet.
pub struct SheetDetector {
    params: LedgerParams,
    registry: GlyphRegistry,
}

impl SheetDetector {
    pub fn new(params: LedgerParams) -> Self {
        Self {
            params,
            registry: GlyphRegistry::new(),
        }
    }

    /// Sheet-wide glyph registry populated by the run.
    pub fn registry(&self) -> &GlyphRegistry {
        &self.registry
    }

    /// Run detection over every unit of the sheet.
    pub fn detect(&self, input: SheetInput) -> SheetOutcome {
        let start = Instant::now();
        let scale = input.scale;

        let systems: Vec<SystemOutcome> = input
            .systems
            .into_par_iter()
            .map(|unit| self.process_system(scale, unit))
            .collect();

        let report = SheetReport {
            systems: systems
                .iter()
                .map(|outcome| SystemReport {
                    system: outcome.system,
                    ledgers: outcome.inters.values().cloned().collect(),
                    staves: outcome.traces.clone(),
                    candidates: outcome.candidates,
                    error: outcome.error.as_ref().map(|e| e.to_string()),
                })
                .collect(),
            registered_glyphs: self.registry.len(),
            latency_ms: start.elapsed().as_secs_f64() * 1000.0,
        };

        SheetOutcome { systems, report }
    }

    /// Unit boundary: structural failures degrade to an empty outcome
    /// instead of propagating.
    fn process_system(&self, scale: Scale, unit: SystemInput) -> SystemOutcome {
        let system = unit.geometry.id;
        match self.sweep_system(scale, unit) {
            Ok(outcome) => outcome,
            Err((geometry, error)) => {
                warn!("system #{system}: ledger retrieval failed: {error}");
                SystemOutcome {
                    system,
                    geometry,
                    inters: BTreeMap::new(),
                    traces: Vec::new(),
                    candidates: 0,
                    error: Some(error),
                }
            }
        }
    }

    fn sweep_system(
        &self,
        scale: Scale,
        unit: SystemInput,
    ) -> Result<SystemOutcome, (SystemGeometry, DetectError)> {
        let SystemInput {
            mut geometry,
            sections,
            no_staff,
        } = unit;
        let system = geometry.id;

        if scale.interline == 0 {
            return Err((geometry, DetectError::BadScale));
        }
        if let Some(staff) = geometry.staves.iter().find(|s| s.lines.is_empty()) {
            let staff = staff.id;
            return Err((geometry, DetectError::EmptyStaff { staff }));
        }

        let candidates = retrieve_filaments(&sections, scale, &self.params, &geometry.beams);
        debug!(
            "system #{system}: {} filament candidate(s)",
            candidates.len()
        );

        let mut sweep = LedgerSweep::new(scale, &self.params, &self.registry, Arc::new(no_staff));
        let traces = sweep.build_ledgers(&mut geometry.staves, &candidates);

        let inters: BTreeMap<InterId, LedgerInter> = sweep
            .inters()
            .map(|(id, inter)| (id, inter.clone()))
            .collect();

        Ok(SystemOutcome {
            system,
            geometry,
            inters,
            traces,
            candidates: candidates.len(),
            error: None,
        })
    }
}
