//! Per-unit constraint graph of candidate interpretations.
//!
//! Vertices are graded interpretations, edges are mutual-exclusion
//! relations with a cause. Reduction repeatedly selects the exclusion whose
//! stronger endpoint is strongest among all remaining exclusions, deletes
//! the weaker endpoint, and iterates until no exclusion is left with both
//! endpoints alive.

use serde::Serialize;

/// Identifier of an interpretation within one constraint graph.
pub type InterId = u32;

/// Why two interpretations cannot coexist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ExclusionCause {
    /// Their horizontal extents overlap.
    Overlap,
    /// They claim the same glyph.
    SharedGlyph,
}

/// Mutual-exclusion edge between two interpretations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    pub source: InterId,
    pub target: InterId,
    pub cause: ExclusionCause,
}

/// Anything the graph can grade and reduce.
pub trait Interpretation {
    /// Intrinsic quality in [0, 1].
    fn grade(&self) -> f64;
}

/// Graph of candidate interpretations with exclusion edges.
pub struct ConstraintGraph<I> {
    slots: Vec<Option<I>>,
    exclusions: Vec<Exclusion>,
}

impl<I: Interpretation> ConstraintGraph<I> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            exclusions: Vec::new(),
        }
    }

    /// Insert an interpretation, returning its id.
    pub fn add(&mut self, inter: I) -> InterId {
        let id = self.slots.len() as InterId;
        self.slots.push(Some(inter));
        id
    }

    pub fn get(&self, id: InterId) -> Option<&I> {
        self.slots.get(id as usize).and_then(Option::as_ref)
    }

    pub fn contains(&self, id: InterId) -> bool {
        self.get(id).is_some()
    }

    /// Live interpretations with their ids.
    pub fn inters(&self) -> impl Iterator<Item = (InterId, &I)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|inter| (id as InterId, inter)))
    }

    /// Record a mutual exclusion between two live interpretations.
    pub fn insert_exclusion(
        &mut self,
        source: InterId,
        target: InterId,
        cause: ExclusionCause,
    ) -> Exclusion {
        debug_assert!(self.contains(source) && self.contains(target));
        let exclusion = Exclusion {
            source,
            target,
            cause,
        };
        self.exclusions.push(exclusion);
        exclusion
    }

    pub fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }

    fn grade_of(&self, id: InterId) -> f64 {
        self.get(id).map(|inter| inter.grade()).unwrap_or(0.0)
    }

    /// Reduce the provided exclusions by deleting the weaker endpoint of
    /// the strongest conflict first, cascading until none of them has both
    /// endpoints alive. Returns the deleted ids.
    pub fn reduce_exclusions(&mut self, mut pending: Vec<Exclusion>) -> Vec<InterId> {
        let mut removed = Vec::new();

        loop {
            // Pick the exclusion whose stronger endpoint dominates.
            let mut best: Option<(usize, f64)> = None;
            let mut i = 0;
            while i < pending.len() {
                let ex = pending[i];
                if !self.contains(ex.source) || !self.contains(ex.target) {
                    pending.swap_remove(i);
                    continue;
                }
                let top = self.grade_of(ex.source).max(self.grade_of(ex.target));
                if best.map_or(true, |(_, grade)| top > grade) {
                    best = Some((i, top));
                }
                i += 1;
            }

            let Some((index, _)) = best else {
                break;
            };
            let ex = pending.swap_remove(index);
            let weaker = if self.grade_of(ex.source) < self.grade_of(ex.target) {
                ex.source
            } else {
                ex.target
            };
            self.slots[weaker as usize] = None;
            removed.push(weaker);
        }

        // Forget globally recorded exclusions that lost an endpoint.
        self.exclusions
            .retain(|ex| !removed.contains(&ex.source) && !removed.contains(&ex.target));

        removed
    }
}

impl<I: Interpretation> Default for ConstraintGraph<I> {
    fn default() -> Self {
        Self::new()
    }
}
