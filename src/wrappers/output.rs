//! Typed handle for a bound `wl_output` object (spec.md §3 `Output`).
//!
//! Outputs are not in `protocol::REQUIRED_GLOBALS` because, unlike the
//! window-management/xkb/layer-shell singletons, they come and go at
//! runtime as monitors are hot-plugged: the manager binds one on every
//! `wl_registry.global` advertising `wl_output` and drops it again on
//! `global_remove`.

use crate::geometry::Rect;

/// Local, accumulated state of a bound output, built up across its
/// `geometry`/`scale`/`name`/`done` event burst (spec.md §4.1 core
/// Wayland bootstrap pattern, applied per-output here).
#[derive(Debug, Clone)]
pub struct OutputHandle {
    pub object_id: u32,
    pub name: String,
    pub logical_rect: Rect,
    pub scale: i32,
}

impl OutputHandle {
    pub fn new(object_id: u32) -> Self {
        Self {
            object_id,
            name: String::new(),
            logical_rect: Rect::default(),
            scale: 1,
        }
    }

    pub fn apply_geometry(&mut self, x: i32, y: i32) {
        self.logical_rect.x = x;
        self.logical_rect.y = y;
    }

    pub fn apply_mode(&mut self, width: i32, height: i32) {
        self.logical_rect.width = width;
        self.logical_rect.height = height;
    }

    pub fn apply_scale(&mut self, scale: i32) {
        self.scale = scale;
    }

    pub fn apply_name(&mut self, name: String) {
        self.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_geometry_then_mode() {
        let mut output = OutputHandle::new(5);
        output.apply_geometry(0, 0);
        output.apply_mode(1920, 1080);
        output.apply_scale(2);
        output.apply_name("eDP-1".to_string());
        assert_eq!(output.logical_rect, Rect::new(0, 0, 1920, 1080));
        assert_eq!(output.scale, 2);
        assert_eq!(output.name, "eDP-1");
    }
}
