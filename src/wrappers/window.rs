//! Typed handle for a `zriver_window_v1` object (spec.md §4.4, §3 `Window`).

use crate::connection::Connection;
use crate::geometry::{Border, Rect};
use crate::protocol::river_window;
use crate::wire::{Arg, Message};

fn border_tag(border: Border) -> u32 {
    match border {
        Border::None => 0,
        Border::Normal => 1,
        Border::Focused => 2,
        Border::Urgent => 3,
    }
}

/// A handle bound to a live window object id. Marshals outgoing requests
/// through the connection; inbound events are decoded elsewhere and fed to
/// `crate::manager::core::WindowManager`, which owns the actual `Window`
/// model state (spec.md §3 ownership summary).
pub struct WindowHandle {
    pub object_id: u32,
}

impl WindowHandle {
    pub fn new(object_id: u32) -> Self {
        Self { object_id }
    }

    pub fn set_geometry(&self, conn: &mut Connection, rect: Rect, border: Border) {
        conn.send(&Message::new(
            self.object_id,
            river_window::request::SET_GEOMETRY,
            vec![
                Arg::Int(rect.x),
                Arg::Int(rect.y),
                Arg::Int(rect.width),
                Arg::Int(rect.height),
                Arg::Uint(border_tag(border)),
            ],
        ));
    }

    pub fn set_fullscreen(&self, conn: &mut Connection, fullscreen: bool) {
        conn.send(&Message::new(
            self.object_id,
            river_window::request::SET_FULLSCREEN,
            vec![Arg::Uint(fullscreen as u32)],
        ));
    }

    /// Sends the close request and removes the local entry immediately;
    /// the subsequent `closed` event is idempotent (spec.md §4.4).
    pub fn close(&self, conn: &mut Connection) {
        conn.send(&Message::new(self.object_id, river_window::request::CLOSE, vec![]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_tags_are_distinct() {
        let tags: Vec<u32> = [Border::None, Border::Normal, Border::Focused, Border::Urgent]
            .iter()
            .map(|b| border_tag(*b))
            .collect();
        let mut sorted = tags.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), tags.len());
    }
}
