//! Enumeration of connected multi-part symbol compounds.
//!
//! Starting from each atomic part (heaviest first, so the likeliest true
//! symbol is evaluated early), the enumerator grows connected subsets
//! depth-first over the caller's neighborhood relation. Weight and size
//! guards are monotonic under growth, which makes the immediate rejection
//! in step one prune whole subtrees; the `seen` set grows copy-on-grow so
//! sibling branches never re-enumerate the same subset. The oracle may
//! still see overlapping subsets across different seeds; deduplication
//! and best-grade selection are its responsibility, not the enumerator's.

use super::Glyph;
use crate::math::Bounds;
use std::sync::Arc;

/// Detector-specific view of the part population driving the enumeration.
pub trait CompoundOracle {
    /// Atomic parts to enumerate from.
    fn parts(&self) -> Vec<Arc<Glyph>>;

    /// Parts reachable from `part` in one hop.
    fn neighbors(&self, part: &Arc<Glyph>) -> Vec<Arc<Glyph>>;

    /// Monotonic upper weight guard: once true, stays true under growth.
    fn too_heavy(&self, weight: u32) -> bool;

    /// Monotonic upper size guard: once true, stays true under growth.
    fn too_large(&self, bounds: &Bounds) -> bool;

    /// Lower weight guard gating evaluation only.
    fn too_light(&self, weight: u32) -> bool;

    /// Lower size guard gating evaluation only.
    fn too_small(&self, bounds: &Bounds) -> bool;

    /// Judge a merged compound built from `parts`.
    fn evaluate(&mut self, compound: &Glyph, parts: &[Arc<Glyph>]);
}

#[inline]
fn holds(set: &[Arc<Glyph>], glyph: &Arc<Glyph>) -> bool {
    set.iter().any(|g| Arc::ptr_eq(g, glyph))
}

fn subset_bounds(parts: &[Arc<Glyph>]) -> Bounds {
    let mut iter = parts.iter();
    let first = iter.next().expect("subset is never empty").bounds();
    iter.fold(first, |acc, g| acc.union(&g.bounds()))
}

/// Enumerate connected sub-compounds of the oracle's part population and
/// submit each acceptable one to [`CompoundOracle::evaluate`].
pub fn enumerate_compounds<O: CompoundOracle>(oracle: &mut O) {
    let mut seeds = oracle.parts();
    // Heaviest first: the likeliest true symbol is evaluated early.
    seeds.sort_by(|a, b| b.weight().cmp(&a.weight()));

    for seed in seeds {
        let parts = vec![Arc::clone(&seed)];
        let seen = parts.clone();
        grow(oracle, parts, seen);
    }
}

fn grow<O: CompoundOracle>(oracle: &mut O, parts: Vec<Arc<Glyph>>, seen: Vec<Arc<Glyph>>) {
    let weight: u32 = parts.iter().map(|g| g.weight()).sum();
    let bounds = subset_bounds(&parts);

    // Both guards are monotonic under growth: no superset can recover.
    if oracle.too_heavy(weight) || oracle.too_large(&bounds) {
        return;
    }

    if !oracle.too_light(weight) && !oracle.too_small(&bounds) {
        if let Some(compound) = Glyph::merge(&parts) {
            oracle.evaluate(&compound, &parts);
        }
    }

    // Outliers: one-hop neighborhood of the subset, minus the subset and
    // everything already explored on this seed.
    let mut outliers: Vec<Arc<Glyph>> = Vec::new();
    for part in &parts {
        for neighbor in oracle.neighbors(part) {
            if !holds(&parts, &neighbor) && !holds(&seen, &neighbor) && !holds(&outliers, &neighbor)
            {
                outliers.push(neighbor);
            }
        }
    }
    if outliers.is_empty() {
        return;
    }

    let mut grown_seen = seen;
    for outlier in outliers {
        grown_seen.push(Arc::clone(&outlier));

        let mut larger = parts.clone();
        larger.push(outlier);
        if !oracle.too_large(&subset_bounds(&larger)) {
            grow(oracle, larger, grown_seen.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::links::{build_links, ProximityGraph};
    use crate::runs::{Orientation, RunImage};
    use std::collections::HashSet;

    fn rect(left: i32, top: i32, w: u32, h: u32) -> Arc<Glyph> {
        Arc::new(Glyph::new(
            left,
            top,
            RunImage::from_fn(Orientation::Horizontal, w, h, |_, _| true),
        ))
    }

    /// Oracle over a proximity graph recording every evaluated subset.
    struct Recorder<'a> {
        graph: &'a ProximityGraph,
        max_width: u32,
        evaluated: Vec<Vec<usize>>,
    }

    impl<'a> Recorder<'a> {
        fn index_of(&self, glyph: &Arc<Glyph>) -> usize {
            self.graph
                .vertices()
                .iter()
                .position(|g| Arc::ptr_eq(g, glyph))
                .expect("glyph belongs to the graph")
        }
    }

    impl CompoundOracle for Recorder<'_> {
        fn parts(&self) -> Vec<Arc<Glyph>> {
            self.graph.vertices().to_vec()
        }

        fn neighbors(&self, part: &Arc<Glyph>) -> Vec<Arc<Glyph>> {
            self.graph
                .neighbors(self.index_of(part))
                .iter()
                .map(|(j, _)| Arc::clone(self.graph.vertex(*j)))
                .collect()
        }

        fn too_heavy(&self, _weight: u32) -> bool {
            false
        }

        fn too_large(&self, bounds: &Bounds) -> bool {
            bounds.w > self.max_width
        }

        fn too_light(&self, _weight: u32) -> bool {
            false
        }

        fn too_small(&self, _bounds: &Bounds) -> bool {
            false
        }

        fn evaluate(&mut self, _compound: &Glyph, parts: &[Arc<Glyph>]) {
            let mut indices: Vec<usize> = parts.iter().map(|p| self.index_of(p)).collect();
            indices.sort_unstable();
            self.evaluated.push(indices);
        }
    }

    /// Brute-force count of connected subsets of a path graph a-b-c-d,
    /// counted once per seed containing them (the enumerator visits each
    /// connected subset once per member seed closure).
    fn expected_path4_evaluations() -> usize {
        // Connected subsets of a path of 4: 4 singletons, 3 pairs, 2
        // triples, 1 quadruple = 10; each is enumerated exactly once per
        // seed, and a subset is reachable from exactly one enumeration per
        // seed element => sum over subsets of |subset|.
        4 * 1 + 3 * 2 + 2 * 3 + 1 * 4
    }

    #[test]
    fn permissive_guards_enumerate_every_connected_subset() {
        // Chain of four glyphs, consecutive gaps of 2 pixels.
        let glyphs: Vec<_> = (0..4).map(|i| rect(i * 6, 0, 4, 2)).collect();
        let graph = build_links(&glyphs, 3.5);
        assert_eq!(graph.edge_count(), 3, "expected a path graph");

        let mut oracle = Recorder {
            graph: &graph,
            max_width: u32::MAX,
            evaluated: Vec::new(),
        };
        enumerate_compounds(&mut oracle);

        assert_eq!(oracle.evaluated.len(), expected_path4_evaluations());

        // Per seed, each connected subset shows up exactly once.
        let unique: HashSet<Vec<usize>> = oracle.evaluated.iter().cloned().collect();
        assert_eq!(unique.len(), 10, "distinct connected subsets of a path of 4");
    }

    #[test]
    fn too_large_prunes_every_superset() {
        let glyphs: Vec<_> = (0..4).map(|i| rect(i * 6, 0, 4, 2)).collect();
        let graph = build_links(&glyphs, 3.5);

        // Limit to two parts' worth of width: 4+2+4 = 10.
        let mut oracle = Recorder {
            graph: &graph,
            max_width: 10,
            evaluated: Vec::new(),
        };
        enumerate_compounds(&mut oracle);

        for subset in &oracle.evaluated {
            assert!(subset.len() <= 2, "oversized subset evaluated: {subset:?}");
        }
    }
}
