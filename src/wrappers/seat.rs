//! Typed handle for a `wl_seat` and its keyboard/pointer dependents
//! (spec.md §3 `Seat`, §4.6).

use crate::connection::Connection;
use crate::protocol::{river_xkb_bindings, wl_seat};
use crate::wire::{Arg, Message};

pub struct SeatHandle {
    pub object_id: u32,
    pub keyboard_id: Option<u32>,
    pub pointer_id: Option<u32>,
    /// The seat's bound `zriver_xkb_bindings_v1` object, used to register
    /// key bindings once at seat creation (spec.md §4.6).
    pub xkb_bindings_id: u32,
    /// Weak reference into the manager's window set (spec.md §3 `Seat`):
    /// a lookup key, never ownership.
    pub focused_window_id: Option<u32>,
}

impl SeatHandle {
    pub fn new(object_id: u32, xkb_bindings_id: u32) -> Self {
        Self {
            object_id,
            keyboard_id: None,
            pointer_id: None,
            xkb_bindings_id,
            focused_window_id: None,
        }
    }

    pub fn needs_keyboard(&self, capabilities: u32) -> bool {
        capabilities & wl_seat::CAPABILITY_KEYBOARD != 0 && self.keyboard_id.is_none()
    }

    pub fn needs_pointer(&self, capabilities: u32) -> bool {
        capabilities & wl_seat::CAPABILITY_POINTER != 0 && self.pointer_id.is_none()
    }

    pub fn request_keyboard(&mut self, conn: &mut Connection, new_id: u32) {
        conn.send(&Message::new(self.object_id, wl_seat::request::GET_KEYBOARD, vec![Arg::NewId(new_id)]));
        self.keyboard_id = Some(new_id);
    }

    pub fn request_pointer(&mut self, conn: &mut Connection, new_id: u32) {
        conn.send(&Message::new(self.object_id, wl_seat::request::GET_POINTER, vec![Arg::NewId(new_id)]));
        self.pointer_id = Some(new_id);
    }

    /// Registers a binding, replacing any existing one for the same
    /// (modifier mask, keysym) pair (spec.md §4.6: "at most one binding
    /// ... re-registration replaces").
    pub fn add_binding(&self, conn: &mut Connection, mod_mask: u32, keysym: u32, action_tag: u32) {
        conn.send(&Message::new(
            self.xkb_bindings_id,
            river_xkb_bindings::request::ADD_BINDING,
            vec![Arg::Uint(mod_mask), Arg::Uint(keysym), Arg::Uint(action_tag)],
        ));
    }

    pub fn clear_bindings(&self, conn: &mut Connection) {
        conn.send(&Message::new(
            self.xkb_bindings_id,
            river_xkb_bindings::request::CLEAR_BINDINGS,
            vec![],
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_keyboard_until_one_is_bound() {
        let mut seat = SeatHandle::new(5, 6);
        assert!(seat.needs_keyboard(wl_seat::CAPABILITY_KEYBOARD));
        seat.keyboard_id = Some(42);
        assert!(!seat.needs_keyboard(wl_seat::CAPABILITY_KEYBOARD));
    }

    #[test]
    fn pointer_capability_bit_is_independent() {
        let seat = SeatHandle::new(5, 6);
        assert!(!seat.needs_pointer(wl_seat::CAPABILITY_KEYBOARD));
        assert!(seat.needs_pointer(wl_seat::CAPABILITY_POINTER));
    }
}
