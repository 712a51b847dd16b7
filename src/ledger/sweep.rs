//! Staff-by-staff, line-by-line ledger retrieval.
//!
//! Each virtual line of ledgers is processed in turn, moving away from the
//! reference staff, above then below:
//!
//! 1. Acceptable candidates on the current virtual line become
//!    [`LedgerInter`] instances with their intrinsic grade.
//! 2. Exclusions are inserted for abscissa overlaps.
//! 3. The line's population is reduced on grades; survivors land in the
//!    staff map and serve as ordinate references for the next line out.
//!
//! A direction stops at the first virtual line yielding no accepted
//! ledger: an interpretation at index i+1 only ever exists on top of one
//! at index i. Reduction stays local to one line; a later line's decisions
//! can invalidate an earlier acceptance indirectly and the earlier line is
//! not re-checked.

use crate::check::{SuiteImpacts, SuiteResult};
use crate::glyph::{Glyph, GlyphId, GlyphRegistry};
use crate::ledger::params::LedgerParams;
use crate::ledger::staff::{Scale, Staff, StaffLine};
use crate::ledger::suites::{LedgerSuites, StickContext};
use crate::math::{y_at_x, Bounds};
use crate::sig::{ConstraintGraph, ExclusionCause, InterId, Interpretation};
use crate::runs::RunImage;
use log::debug;
use serde::Serialize;
use std::sync::Arc;

/// An accepted-or-candidate ledger interpretation.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerInter {
    pub glyph: GlyphId,
    pub bounds: Bounds,
    /// Signed virtual line index relative to the staff.
    pub index: i32,
    pub grade: f64,
    pub impacts: SuiteImpacts,
    /// Fitted-line endpoints, left then right.
    pub line: [[f64; 2]; 2],
}

impl LedgerInter {
    /// Ordinate of the ledger's center line at `x`, extrapolating beyond
    /// the span.
    pub fn y_at(&self, x: f64) -> f64 {
        y_at_x(self.line[0], self.line[1], x)
    }
}

impl Interpretation for LedgerInter {
    fn grade(&self) -> f64 {
        self.grade
    }
}

/// Per-line trace for the sweep report.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTrace {
    pub index: i32,
    /// Candidates whose middle fell in the line's rough region.
    pub tried: usize,
    /// Candidates that survived the suite.
    pub graded: usize,
    /// Ledgers kept after exclusion reduction.
    pub accepted: usize,
}

/// Per-staff trace for the sweep report.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffTrace {
    pub staff: u32,
    pub lines: Vec<LineTrace>,
}

/// Ledger retrieval for one detection unit.
pub struct LedgerSweep<'a> {
    scale: Scale,
    params: &'a LedgerParams,
    registry: &'a GlyphRegistry,
    no_staff: Arc<RunImage>,
    sig: ConstraintGraph<LedgerInter>,
}

impl<'a> LedgerSweep<'a> {
    pub fn new(
        scale: Scale,
        params: &'a LedgerParams,
        registry: &'a GlyphRegistry,
        no_staff: Arc<RunImage>,
    ) -> Self {
        Self {
            scale,
            params,
            registry,
            no_staff,
            sig: ConstraintGraph::new(),
        }
    }

    /// Sweep every staff of the unit against the candidate filaments.
    /// Accepted ledgers are recorded in each staff's index map; the
    /// constraint graph keeps the surviving interpretations.
    pub fn build_ledgers(
        &mut self,
        staves: &mut [Staff],
        candidates: &[Arc<Glyph>],
    ) -> Vec<StaffTrace> {
        let mut traces = Vec::with_capacity(staves.len());
        for staff in staves {
            debug!("sweeping staff#{}", staff.id);
            let mut lines = Vec::new();

            // Above the staff: -1, -2, ...
            let min_index = staff.min_index.unwrap_or(i32::MIN);
            let mut index = -1;
            while index >= min_index {
                let trace = self.lookup_line(staff, index, candidates);
                let accepted = trace.accepted;
                lines.push(trace);
                if accepted == 0 {
                    break;
                }
                index -= 1;
            }

            // Below the staff: +1, +2, ...
            let max_index = staff.max_index.unwrap_or(i32::MAX);
            let mut index = 1;
            while index <= max_index {
                let trace = self.lookup_line(staff, index, candidates);
                let accepted = trace.accepted;
                lines.push(trace);
                if accepted == 0 {
                    break;
                }
                index += 1;
            }

            traces.push(StaffTrace {
                staff: staff.id,
                lines,
            });
        }
        traces
    }

    /// Surviving interpretations with their ids.
    pub fn inters(&self) -> impl Iterator<Item = (InterId, &LedgerInter)> {
        self.sig.inters()
    }

    pub fn sig(&self) -> &ConstraintGraph<LedgerInter> {
        &self.sig
    }

    /// Look for ledgers on one virtual line of `staff`.
    ///
    /// The region of interest is deliberately rough; the pitch checks
    /// against the target ordinate weed out the distant candidates.
    fn lookup_line(&mut self, staff: &mut Staff, index: i32, candidates: &[Arc<Glyph>]) -> LineTrace {
        let staff_scale = self.scale.with_interline(staff.interline);
        let interline = staff.interline as i32;
        let y_margin = staff_scale.to_pixels(self.params.ledger_margin_y);
        let suites = LedgerSuites::new(staff_scale, self.params, Arc::clone(&self.no_staff));

        // Rough region: the boundary staff line's box shifted to the
        // virtual line, enlarged vertically.
        let staff_line = boundary_line(staff, index);
        let mut region = staff_line.bounds();
        region.y += index * interline;
        region = region.grown(0, 2 * y_margin);

        let mut tried = 0usize;
        let mut accepted: Vec<(InterId, Bounds)> = Vec::new();

        for stick in candidates {
            let middle = stick.middle_point();
            if !region.contains_point(middle) {
                continue;
            }
            tried += 1;

            // A reference ordinate is required: the staff line for the
            // first line out, an accepted ledger one step closer beyond.
            let Some(y_ref) = self.y_reference(staff, index, stick) else {
                debug!("staff#{} index {} orphan candidate", staff.id, index);
                continue;
            };
            let y_target = y_ref + index.signum() as f64 * interline as f64;

            let length = stick.bounds().w as f64;
            let suite = suites.for_length(length);
            let context = StickContext {
                stick: Arc::clone(stick),
                y_target,
            };
            match suite.run(&context) {
                SuiteResult::Failed(code) => {
                    debug!("staff#{} index {} rejected: {:?}", staff.id, index, code);
                }
                SuiteResult::Graded(impacts) if impacts.grade >= suite.min_threshold() => {
                    let (glyph_id, canonical) = self.registry.register_arc(Arc::clone(stick));
                    let inter = LedgerInter {
                        glyph: glyph_id,
                        bounds: canonical.bounds(),
                        index,
                        grade: impacts.grade,
                        line: [canonical.start_point(), canonical.stop_point()],
                        impacts,
                    };
                    let bounds = inter.bounds;
                    let id = self.sig.add(inter);
                    accepted.push((id, bounds));
                }
                SuiteResult::Graded(_) => {}
            }
        }

        let graded = accepted.len();
        let kept = self.reduce_line(staff, index, accepted);
        LineTrace {
            index,
            tried,
            graded,
            accepted: kept,
        }
    }

    /// Reference ordinate for a candidate: staff boundary line for
    /// |index| = 1, otherwise the accepted ledger one step closer whose
    /// span overlaps the candidate enough. `None` means orphan.
    fn y_reference(&self, staff: &Staff, index: i32, stick: &Glyph) -> Option<f64> {
        let prev_index = if index < 0 { index + 1 } else { index - 1 };
        let x_mid = stick.middle_point()[0];

        if prev_index == 0 {
            return Some(boundary_line(staff, index).y_at(x_mid));
        }

        let min_overlap = self.scale.to_pixels(self.params.min_abscissa_overlap);
        let stick_box = stick.bounds();
        for &id in staff.ledgers_at(prev_index)? {
            let Some(prev) = self.sig.get(id) else {
                continue;
            };
            if Bounds::x_overlap(&stick_box, &prev.bounds) > min_overlap {
                // Middle may fall outside the reference span; the fitted
                // line extrapolates either way.
                return Some(prev.y_at(x_mid));
            }
        }
        None
    }

    /// Insert exclusions for abscissa overlaps within one line's accepted
    /// population, reduce on grades, and record the survivors in the staff
    /// map. Returns the surviving count.
    fn reduce_line(
        &mut self,
        staff: &mut Staff,
        index: i32,
        mut accepted: Vec<(InterId, Bounds)>,
    ) -> usize {
        if accepted.is_empty() {
            return 0;
        }
        accepted.sort_by_key(|(_, bounds)| bounds.x);

        let mut exclusions = Vec::new();
        for i in 0..accepted.len() {
            let (id, bounds) = accepted[i];
            for &(other_id, other_bounds) in &accepted[i + 1..] {
                if Bounds::x_overlap(&bounds, &other_bounds) > 0 {
                    exclusions.push(self.sig.insert_exclusion(
                        id,
                        other_id,
                        ExclusionCause::Overlap,
                    ));
                } else {
                    break; // sorted by abscissa, no later overlap possible
                }
            }
        }

        if !exclusions.is_empty() {
            let deleted = self.sig.reduce_exclusions(exclusions);
            debug!(
                "staff#{} index {} reduced {} ledger(s)",
                staff.id,
                index,
                deleted.len()
            );
            accepted.retain(|(id, _)| !deleted.contains(id));
        }

        for &(id, _) in &accepted {
            staff.add_ledger(index, id);
        }
        accepted.len()
    }
}

/// The staff line a virtual line index hangs from: first line above,
/// last line below.
fn boundary_line(staff: &Staff, index: i32) -> &StaffLine {
    if index < 0 {
        staff.first_line()
    } else {
        staff.last_line()
    }
}
