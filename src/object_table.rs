//! Object Table & Registry (spec.md §4.3): maps live object ids to their
//! interface identity, allocates client-side ids, and drives the core
//! Wayland bootstrap (get_registry / bind / sync).

use std::collections::HashMap;

use crate::protocol::{self, wl_callback, wl_display, wl_registry, Interface};
use crate::wire::{Arg, ArgKind, Message};

/// id 1 is always the display (spec.md §3 `Object` lifecycle).
pub const DISPLAY_ID: u32 = 1;
const FIRST_CLIENT_ID: u32 = 2;

#[derive(Debug, Clone)]
pub struct GlobalEntry {
    pub name: u32,
    pub interface: String,
    pub version: u32,
}

struct ObjectEntry {
    interface: &'static Interface,
}

/// Tracks every live object id and the registry's advertised globals.
pub struct ObjectTable {
    entries: HashMap<u32, ObjectEntry>,
    next_id: u32,
    freed_ids: Vec<u32>,
    globals: Vec<GlobalEntry>,
    registry_id: Option<u32>,
    sync_done: bool,
    bound: HashMap<&'static str, u32>,
}

impl Default for ObjectTable {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(DISPLAY_ID, ObjectEntry { interface: &wl_display::INTERFACE });
        ObjectTable {
            entries,
            next_id: FIRST_CLIENT_ID,
            freed_ids: Vec::new(),
            globals: Vec::new(),
            registry_id: None,
            sync_done: false,
            bound: HashMap::new(),
        }
    }
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next client-side id. Ids are monotonic from 2; a
    /// freed id is only handed out again on the allocation that follows
    /// the server's `delete_id` confirming it (spec.md §3, testable
    /// property 3) — not reused immediately within the same batch of
    /// frees, but first in line on the next call after that.
    pub fn allocate_id(&mut self) -> u32 {
        if let Some(id) = self.freed_ids.pop() {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn register(&mut self, id: u32, interface: &'static Interface) {
        self.entries.insert(id, ObjectEntry { interface });
    }

    pub fn interface_of(&self, id: u32) -> Option<&'static Interface> {
        self.entries.get(&id).map(|e| e.interface)
    }

    /// Removes the local entry immediately; the id itself is not reused
    /// until `free_id` is called in response to the server's `delete_id`.
    pub fn destroy(&mut self, id: u32) {
        self.entries.remove(&id);
    }

    pub fn free_id(&mut self, id: u32) {
        self.freed_ids.push(id);
    }

    pub fn resolve_schema(&self, object_id: u32, opcode: u16) -> Option<&'static [ArgKind]> {
        self.interface_of(object_id).and_then(|i| i.event_args(opcode))
    }

    /// Builds `display.get_registry` plus a `display.sync` callback used
    /// as the round-trip barrier for the initial global burst.
    pub fn bootstrap_messages(&mut self) -> (Message, u32, Message, u32) {
        let registry_id = self.allocate_id();
        self.register(registry_id, &wl_registry::INTERFACE);
        self.registry_id = Some(registry_id);
        let get_registry = Message::new(
            DISPLAY_ID,
            wl_display::request::GET_REGISTRY,
            vec![Arg::NewId(registry_id)],
        );

        let callback_id = self.allocate_id();
        self.register(callback_id, &wl_callback::INTERFACE);
        let sync = Message::new(DISPLAY_ID, wl_display::request::SYNC, vec![Arg::NewId(callback_id)]);

        (get_registry, registry_id, sync, callback_id)
    }

    pub fn handle_registry_event(&mut self, message: &Message) {
        match message.opcode {
            x if x == wl_registry::event::GLOBAL => {
                let name = message.args[0].as_uint().unwrap_or(0);
                let interface = message.args[1].as_str().unwrap_or("").to_string();
                let version = message.args[2].as_uint().unwrap_or(0);
                self.globals.push(GlobalEntry { name, interface, version });
            }
            x if x == wl_registry::event::GLOBAL_REMOVE => {
                let name = message.args[0].as_uint().unwrap_or(0);
                self.globals.retain(|g| g.name != name);
            }
            _ => {}
        }
    }

    pub fn note_sync_done(&mut self, callback_id: u32, message: &Message) {
        if message.object_id == callback_id && message.opcode == wl_callback::event::DONE {
            self.sync_done = true;
        }
    }

    pub fn sync_done(&self) -> bool {
        self.sync_done
    }

    pub fn globals(&self) -> &[GlobalEntry] {
        &self.globals
    }

    /// Binds every interface in `crate::protocol::REQUIRED_GLOBALS`,
    /// negotiating `min(server_version, client_max_version)`. Returns the
    /// name of the first missing interface, if any (spec.md §4.3, §7
    /// `MissingGlobal`).
    pub fn bind_required_globals(&mut self) -> Result<HashMap<&'static str, (u32, u32)>, String> {
        let mut bound_ids = HashMap::new();
        for &required in protocol::REQUIRED_GLOBALS {
            let Some(global) = self.globals.iter().find(|g| g.interface == required) else {
                return Err(required.to_string());
            };
            let interface = interface_by_name(required).expect("known required interface");
            let version = global.version.min(interface.max_version);
            let object_id = self.allocate_id();
            self.register(object_id, interface);
            self.bound.insert(required, object_id);
            bound_ids.insert(required, (object_id, version));
        }
        Ok(bound_ids)
    }

    pub fn registry_id(&self) -> Option<u32> {
        self.registry_id
    }
}

fn interface_by_name(name: &str) -> Option<&'static Interface> {
    use crate::protocol::*;
    Some(match name {
        "wl_compositor" => &wl_compositor::INTERFACE,
        "wl_shm" => &wl_shm::INTERFACE,
        "wl_seat" => &wl_seat::INTERFACE,
        "zriver_window_management_v1" => &river_window_management::INTERFACE,
        "zriver_xkb_bindings_v1" => &river_xkb_bindings::INTERFACE,
        "zriver_layer_shell_v1" => &river_layer_shell::INTERFACE,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freed_id_is_reused_on_next_allocation() {
        let mut table = ObjectTable::new();
        assert_eq!(table.allocate_id(), 2);
        let third = table.allocate_id();
        assert_eq!(third, 3);
        assert_eq!(table.allocate_id(), 4);

        table.free_id(third);
        // The freed id comes back on the allocation that follows its
        // free event, ahead of the monotonic counter.
        assert_eq!(table.allocate_id(), 3);
        assert_eq!(table.allocate_id(), 5);
    }

    #[test]
    fn ids_allocate_monotonically_from_two() {
        let mut table = ObjectTable::new();
        assert_eq!(table.allocate_id(), 2);
        assert_eq!(table.allocate_id(), 3);
        assert_eq!(table.allocate_id(), 4);
    }

    #[test]
    fn scenario_b_registry_bootstrap() {
        let mut table = ObjectTable::new();
        let (_, registry_id, _, _) = table.bootstrap_messages();

        let global = |name, interface: &str, version| Message::new(
            registry_id,
            wl_registry::event::GLOBAL,
            vec![Arg::Uint(name), Arg::String(Some(interface.to_string())), Arg::Uint(version)],
        );
        table.handle_registry_event(&global(1, "wl_compositor", 5));
        table.handle_registry_event(&global(2, "wl_shm", 1));
        table.handle_registry_event(&global(3, "wl_seat", 8));
        table.handle_registry_event(&global(4, "zriver_window_management_v1", 1));

        let err = table.bind_required_globals().unwrap_err();
        assert_eq!(err, "zriver_xkb_bindings_v1");
    }

    #[test]
    fn binds_all_required_globals_when_present() {
        let mut table = ObjectTable::new();
        let (_, registry_id, _, _) = table.bootstrap_messages();
        let names = [
            "wl_compositor",
            "wl_shm",
            "wl_seat",
            "zriver_window_management_v1",
            "zriver_xkb_bindings_v1",
            "zriver_layer_shell_v1",
        ];
        for (i, name) in names.iter().enumerate() {
            table.handle_registry_event(&Message::new(
                registry_id,
                wl_registry::event::GLOBAL,
                vec![Arg::Uint(i as u32), Arg::String(Some(name.to_string())), Arg::Uint(1)],
            ));
        }
        let bound = table.bind_required_globals().unwrap();
        assert_eq!(bound.len(), names.len());
    }

    #[test]
    fn global_remove_drops_the_entry() {
        let mut table = ObjectTable::new();
        let (_, registry_id, _, _) = table.bootstrap_messages();
        table.handle_registry_event(&Message::new(
            registry_id,
            wl_registry::event::GLOBAL,
            vec![Arg::Uint(7), Arg::String(Some("wl_shm".to_string())), Arg::Uint(1)],
        ));
        assert_eq!(table.globals().len(), 1);
        table.handle_registry_event(&Message::new(
            registry_id,
            wl_registry::event::GLOBAL_REMOVE,
            vec![Arg::Uint(7)],
        ));
        assert!(table.globals().is_empty());
    }
}
