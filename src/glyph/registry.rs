//! Sheet-wide glyph arena with stable ids and physical deduplication.

use super::Glyph;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Stable identifier assigned at registration, never reused.
pub type GlyphId = u32;

#[derive(Default)]
struct Inner {
    arena: Vec<Arc<Glyph>>,
    dedup: HashMap<Arc<Glyph>, GlyphId>,
}

/// Registry deduplicating physically identical glyphs.
///
/// Two glyphs with the same origin and pixel content canonicalize to a
/// single instance with a single id; registration is atomic, so concurrent
/// detectors registering the same physical glyph agree on one winner.
/// Retention is by reference counting: the arena keeps every registered
/// glyph alive for the registry's own lifetime (one registry per sheet).
#[derive(Default)]
pub struct GlyphRegistry {
    inner: RwLock<Inner>,
}

impl GlyphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a glyph, deduplicating against previously registered ones.
    /// Returns the canonical instance and its id.
    pub fn register(&self, glyph: Glyph) -> (GlyphId, Arc<Glyph>) {
        self.register_arc(Arc::new(glyph))
    }

    /// Same as [`register`](Self::register) for an already shared glyph.
    pub fn register_arc(&self, glyph: Arc<Glyph>) -> (GlyphId, Arc<Glyph>) {
        let mut inner = self.inner.write().expect("glyph registry poisoned");
        if let Some(&id) = inner.dedup.get(&glyph) {
            return (id, Arc::clone(&inner.arena[id as usize]));
        }
        let id = inner.arena.len() as GlyphId;
        inner.arena.push(Arc::clone(&glyph));
        inner.dedup.insert(glyph, id);
        (id, Arc::clone(&inner.arena[id as usize]))
    }

    pub fn get(&self, id: GlyphId) -> Option<Arc<Glyph>> {
        let inner = self.inner.read().expect("glyph registry poisoned");
        inner.arena.get(id as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("glyph registry poisoned").arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::{Orientation, RunImage};

    fn dot(x: i32, y: i32) -> Glyph {
        Glyph::new(
            x,
            y,
            RunImage::from_fn(Orientation::Horizontal, 1, 1, |_, _| true),
        )
    }

    #[test]
    fn identical_glyphs_share_one_id() {
        let reg = GlyphRegistry::new();
        let (id_a, a) = reg.register(dot(3, 4));
        let (id_b, b) = reg.register(dot(3, 4));
        assert_eq!(id_a, id_b);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn distinct_glyphs_get_distinct_ids() {
        let reg = GlyphRegistry::new();
        let (id_a, _) = reg.register(dot(0, 0));
        let (id_b, _) = reg.register(dot(0, 1));
        assert_ne!(id_a, id_b);
        assert_eq!(reg.get(id_b).unwrap().top(), 1);
    }

    #[test]
    fn concurrent_registration_has_one_winner() {
        let reg = Arc::new(GlyphRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let reg = Arc::clone(&reg);
            handles.push(std::thread::spawn(move || reg.register(dot(7, 7)).0));
        }
        let ids: Vec<GlyphId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(reg.len(), 1);
    }
}
