//! Skip redraws of frames that did not change.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::types::DrawList;

#[derive(Debug, Clone)]
pub struct RenderThrottle {
    min_static_interval_ms: u64,
    last_render_ms: u64,
    last_fingerprint: u64,
    has_rendered: bool,
    skipped: u64,
}

impl RenderThrottle {
    pub fn new(min_static_interval_ms: u64) -> Self {
        Self {
            min_static_interval_ms,
            last_render_ms: 0,
            last_fingerprint: 0,
            has_rendered: false,
            skipped: 0,
        }
    }

    /// Decide whether to render a new frame.
    ///
    /// - When `is_static=false`: always render (no throttling).
    /// - When `is_static=true`: render immediately on fingerprint change, otherwise at most
    ///   once per `min_static_interval_ms`.
    pub fn should_render(&mut self, now_ms: u64, fingerprint: u64, is_static: bool) -> bool {
        let render = !self.has_rendered
            || !is_static
            || fingerprint != self.last_fingerprint
            || now_ms.saturating_sub(self.last_render_ms) >= self.min_static_interval_ms;

        if render {
            self.has_rendered = true;
            self.last_render_ms = now_ms;
            self.last_fingerprint = fingerprint;
        } else {
            self.skipped += 1;
        }
        render
    }

    /// Force the next call to render.
    pub fn invalidate(&mut self) {
        self.has_rendered = false;
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

/// Hash of everything a frame would draw.
pub fn fingerprint(list: &DrawList) -> u64 {
    let mut hasher = DefaultHasher::new();
    list.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Shade;

    #[test]
    fn fingerprint_tracks_draw_list_contents() {
        let mut a = DrawList::new();
        a.text(0, 0, "SCORE", Shade::Darkest);
        let mut b = a.clone();
        assert_eq!(fingerprint(&a), fingerprint(&b));
        b.set_opacity(128);
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn invalidate_forces_render() {
        let mut t = RenderThrottle::new(1000);
        assert!(t.should_render(0, 7, true));
        assert!(!t.should_render(1, 7, true));
        assert_eq!(t.skipped(), 1);
        t.invalidate();
        assert!(t.should_render(2, 7, true));
    }
}
