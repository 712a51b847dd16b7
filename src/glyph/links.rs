//! Proximity graph over a glyph population.
//!
//! Links every pair of glyphs whose true minimum pixel distance stays
//! within a gap threshold. The builder sweeps glyphs sorted by abscissa and
//! prunes with fattened bounding boxes before paying for a precise chamfer
//! measurement; pruning only affects cost, never the edge set.

use super::{DistanceField, Glyph};
use serde::Serialize;
use std::sync::Arc;

/// Edge datum: measured minimum pixel distance between two glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GlyphLink {
    pub distance: f64,
}

/// Undirected simple graph of glyphs linked by proximity.
pub struct ProximityGraph {
    vertices: Vec<Arc<Glyph>>,
    adjacency: Vec<Vec<(usize, GlyphLink)>>,
    edge_count: usize,
}

impl ProximityGraph {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn vertices(&self) -> &[Arc<Glyph>] {
        &self.vertices
    }

    pub fn vertex(&self, i: usize) -> &Arc<Glyph> {
        &self.vertices[i]
    }

    /// Neighbors of vertex `i` with their link data.
    pub fn neighbors(&self, i: usize) -> &[(usize, GlyphLink)] {
        &self.adjacency[i]
    }

    /// Link between vertices `i` and `j`, if any.
    pub fn link(&self, i: usize, j: usize) -> Option<GlyphLink> {
        self.adjacency[i]
            .iter()
            .find(|(n, _)| *n == j)
            .map(|(_, link)| *link)
    }

    fn add_edge(&mut self, i: usize, j: usize, link: GlyphLink) {
        self.adjacency[i].push((j, link));
        self.adjacency[j].push((i, link));
        self.edge_count += 1;
    }
}

/// Build the proximity graph of `glyphs` for the given maximum gap.
///
/// Vertices come out sorted by left abscissa. For each glyph the box is
/// fattened by `ceil(max_gap)`; later glyphs are scanned while their boxes
/// can still intersect, and the scan stops as soon as a candidate's left
/// edge passes the fattened right edge. One [`DistanceField`] per left
/// glyph serves all its right-hand candidates.
pub fn build_links(glyphs: &[Arc<Glyph>], max_gap: f64) -> ProximityGraph {
    let gap_int = max_gap.ceil() as i32;
    let mut vertices: Vec<Arc<Glyph>> = glyphs.to_vec();
    vertices.sort_by_key(|g| g.left());

    let mut graph = ProximityGraph {
        adjacency: vec![Vec::new(); vertices.len()],
        vertices,
        edge_count: 0,
    };

    for i in 0..graph.vertices.len() {
        let glyph = Arc::clone(&graph.vertices[i]);
        let fat_box = glyph.bounds().grown(gap_int, gap_int);
        let x_break = fat_box.right();
        let mut field: Option<DistanceField> = None;

        for j in (i + 1)..graph.vertices.len() {
            let other = Arc::clone(&graph.vertices[j]);
            let other_box = other.bounds();
            if other_box.x > x_break {
                break; // sorted by abscissa, nothing further can intersect
            }
            if !fat_box.intersects(&other_box) {
                continue;
            }
            let field = field.get_or_insert_with(|| DistanceField::around(&glyph, fat_box));
            let distance = field.distance_to(&other);
            if distance <= max_gap && *glyph != *other {
                graph.add_edge(i, j, GlyphLink { distance });
            }
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::{Orientation, RunImage};

    fn rect(left: i32, top: i32, w: u32, h: u32) -> Arc<Glyph> {
        Arc::new(Glyph::new(
            left,
            top,
            RunImage::from_fn(Orientation::Horizontal, w, h, |_, _| true),
        ))
    }

    #[test]
    fn links_respect_the_gap_threshold() {
        // Nearest-pixel separations: a-b 3, b-c 6, a-c 12.
        let a = rect(0, 0, 4, 2);
        let b = rect(6, 0, 4, 2);
        let c = rect(15, 0, 4, 2);
        let graph = build_links(&[a, b, c], 3.5);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 1);
        let link = graph.link(0, 1).expect("a and b should be linked");
        assert!((link.distance - 3.0).abs() < 0.5, "distance {}", link.distance);
        assert!(graph.link(1, 2).is_none());
        assert!(graph.link(0, 2).is_none());
    }

    #[test]
    fn vertical_neighbors_link_too() {
        let a = rect(0, 0, 6, 2);
        let b = rect(0, 4, 6, 2);
        let graph = build_links(&[a, b], 3.5);
        assert_eq!(graph.edge_count(), 1);
        let link = graph.link(0, 1).unwrap();
        assert!((link.distance - 3.0).abs() < 0.5);
    }

    #[test]
    fn distant_population_stays_unlinked() {
        let glyphs: Vec<_> = (0..4).map(|i| rect(i * 50, 0, 3, 3)).collect();
        let graph = build_links(&glyphs, 4.0);
        assert_eq!(graph.edge_count(), 0);
    }
}
