//! Entry point (spec.md §4, §5, §6, §7): connects to the compositor,
//! bootstraps the registry, binds the required globals, and runs the
//! event loop until told to quit or the connection drops.

mod bindings;
mod config;
mod connection;
mod error;
mod geometry;
mod layout;
mod manager;
mod object_table;
mod protocol;
mod wire;
mod wrappers;

use std::collections::HashMap;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, error, info};
use nix::sys::signal::{self, SigHandler, Signal};

use bindings::Modifiers;
use config::Config;
use connection::{Connection, Dispatcher};
use error::RiverWmError;
use manager::model::LayoutSet;
use manager::WindowManager;
use object_table::{GlobalEntry, ObjectTable};
use protocol::{
    river_layer_shell, river_layer_surface, river_window, river_window_management, river_xkb_bindings,
    wl_compositor, wl_display, wl_keyboard, wl_output, wl_pointer, wl_registry, wl_seat, wl_surface,
};
use wire::{Arg, ArgKind, Message, WireError};
use wrappers::{DecorationBuffer, OutputHandle, SeatHandle};

/// The tabbed layout's namespace string, handed to the compositor on
/// `get_layer_surface` (spec.md §4.7 "tabbed").
const DECORATION_NAMESPACE: &str = "river-wm-tabbed-decoration";

static SHOULD_RUN: AtomicBool = AtomicBool::new(true);

extern "C" fn on_terminate_signal(_: i32) {
    SHOULD_RUN.store(false, Ordering::SeqCst);
}

/// Installs handlers for INT/TERM/HUP that flip `SHOULD_RUN` (spec.md §5:
/// these signals stop the loop and let the process exit cleanly).
fn install_signal_handlers() {
    let handler = SigHandler::Handler(on_terminate_signal);
    unsafe {
        signal::signal(Signal::SIGINT, handler).expect("failed to install SIGINT handler");
        signal::signal(Signal::SIGTERM, handler).expect("failed to install SIGTERM handler");
        signal::signal(Signal::SIGHUP, handler).expect("failed to install SIGHUP handler");
    }
}

fn fixed_arg(args: &[Arg], index: usize) -> f64 {
    match args.get(index) {
        Some(Arg::Fixed(f)) => f.to_f64(),
        _ => 0.0,
    }
}

fn wire_error_to_fatal(source: WireError) -> RiverWmError {
    let (object_id, opcode) = match &source {
        WireError::ArgumentOverrun { object_id, opcode } => (*object_id, *opcode),
        _ => (0, 0),
    };
    RiverWmError::Protocol { object_id, opcode, source }
}

/// Tracks a `wl_output` whose geometry/mode/scale/name burst hasn't hit
/// `done` yet (spec.md §4.1's bootstrap pattern, applied per-output).
struct PendingOutput {
    handle: OutputHandle,
}

/// The layer-shell surface an output's active decorating layout (currently
/// only `Tabbed`) needs, and the shm buffer painted into it once the
/// compositor has acked a size (spec.md §4.7, §9).
struct OutputDecoration {
    surface_id: u32,
    layer_surface_id: u32,
    size: (i32, i32),
    buffer: Option<DecorationBuffer>,
}

struct App {
    table: ObjectTable,
    manager: WindowManager,
    sync_callback_id: u32,

    pending_outputs: HashMap<u32, PendingOutput>,
    queued_output_binds: Vec<GlobalEntry>,
    /// Registry global name → bound `wl_output` object id, so a later
    /// `global_remove` (which only carries the name) can be resolved back
    /// to the object the manager knows about.
    output_globals: HashMap<u32, u32>,
    /// (seat id, capabilities) pairs observed since the last drain —
    /// `wl_seat.capabilities` needs to send requests, which `dispatch`
    /// cannot do (spec.md §4.2), so this queues the work for the main loop.
    queued_seat_capabilities: Vec<(u32, u32)>,

    seats: HashMap<u32, SeatHandle>,
    keyboard_owner: HashMap<u32, u32>,
    pointer_owner: HashMap<u32, u32>,
    current_mods: HashMap<u32, Modifiers>,
    last_pointer_pos: HashMap<u32, (f64, f64)>,

    xkb_bindings_id: Option<u32>,
    compositor_id: Option<u32>,
    shm_id: Option<u32>,
    layer_shell_id: Option<u32>,

    /// Live decoration surfaces, keyed by the output they decorate.
    decorations: HashMap<u32, OutputDecoration>,
    /// `zriver_layer_surface_v1` object id → the output it belongs to, so a
    /// `configure`/`closed` event (which only carries the layer-surface's
    /// own id) can be resolved back to an output.
    layer_surface_owner: HashMap<u32, u32>,
    /// `configure` events seen since the last drain, each an (output id,
    /// serial, width, height) tuple; acking and buffer allocation needs
    /// `Connection` and new object ids, so `dispatch` only queues them
    /// (spec.md §4.2 dispatch/Connection separation).
    queued_layer_configures: Vec<(u32, u32, i32, i32)>,
    /// Layer surfaces the compositor asked us to close since the last
    /// drain.
    queued_layer_closes: Vec<u32>,

    fatal: Option<RiverWmError>,
}

impl App {
    fn new(config: Config) -> Self {
        let layouts = LayoutSet::new(layout::default_layout_sequence(0.55, config.tab_height));
        let key_bindings = bindings::KeyBindings::with_defaults(config.modifier);
        Self {
            table: ObjectTable::new(),
            manager: WindowManager::new(config, layouts, key_bindings),
            sync_callback_id: 0,
            pending_outputs: HashMap::new(),
            queued_output_binds: Vec::new(),
            output_globals: HashMap::new(),
            queued_seat_capabilities: Vec::new(),
            seats: HashMap::new(),
            keyboard_owner: HashMap::new(),
            pointer_owner: HashMap::new(),
            current_mods: HashMap::new(),
            last_pointer_pos: HashMap::new(),
            xkb_bindings_id: None,
            compositor_id: None,
            shm_id: None,
            layer_shell_id: None,
            decorations: HashMap::new(),
            layer_surface_owner: HashMap::new(),
            queued_layer_configures: Vec::new(),
            queued_layer_closes: Vec::new(),
            fatal: None,
        }
    }

    /// Sends `get_registry` + `sync`, drains the connection until the sync
    /// callback fires, binds every required global, then binds whatever
    /// `wl_output`s were advertised along the way (spec.md §4.1, §4.3).
    fn bootstrap(&mut self, conn: &mut Connection) -> Result<(), RiverWmError> {
        let (get_registry, _registry_id, sync, callback_id) = self.table.bootstrap_messages();
        self.sync_callback_id = callback_id;
        conn.send(&get_registry);
        conn.send(&sync);

        while !self.table.sync_done() {
            let alive = conn.run_once(self, Duration::from_millis(200)).map_err(wire_error_to_fatal)?;
            if let Some(err) = self.fatal.take() {
                return Err(err);
            }
            if !alive {
                return Err(RiverWmError::Transport(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "compositor closed the connection during bootstrap",
                )));
            }
        }

        let registry_id = self.table.registry_id().expect("registry id set by bootstrap_messages");
        let bound = self.table.bind_required_globals().map_err(RiverWmError::MissingGlobal)?;
        for (&interface_name, &(object_id, version)) in &bound {
            let name = self
                .table
                .globals()
                .iter()
                .find(|g| g.interface == interface_name)
                .map(|g| g.name)
                .expect("bound interface was advertised");
            conn.send(&Message::new(
                registry_id,
                wl_registry::request::BIND,
                vec![
                    Arg::Uint(name),
                    Arg::String(Some(interface_name.to_string())),
                    Arg::Uint(version),
                    Arg::NewId(object_id),
                ],
            ));
        }
        self.xkb_bindings_id = bound.get("zriver_xkb_bindings_v1").map(|&(id, _)| id);
        self.compositor_id = bound.get("wl_compositor").map(|&(id, _)| id);
        self.shm_id = bound.get("wl_shm").map(|&(id, _)| id);
        self.layer_shell_id = bound.get("zriver_layer_shell_v1").map(|&(id, _)| id);

        self.drain_pending(conn);
        Ok(())
    }

    fn bind_output(&mut self, conn: &mut Connection, global: &GlobalEntry) {
        let object_id = self.table.allocate_id();
        self.table.register(object_id, &wl_output::INTERFACE);
        let registry_id = self.table.registry_id().unwrap();
        conn.send(&Message::new(
            registry_id,
            wl_registry::request::BIND,
            vec![
                Arg::Uint(global.name),
                Arg::String(Some("wl_output".to_string())),
                Arg::Uint(global.version.min(wl_output::INTERFACE.max_version)),
                Arg::NewId(object_id),
            ],
        ));
        self.pending_outputs.insert(object_id, PendingOutput { handle: OutputHandle::new(object_id) });
        self.output_globals.insert(global.name, object_id);
    }

    /// Binds every `wl_output` global discovered since the last drain, and
    /// acts on every `wl_seat.capabilities` event seen since then. Dispatch
    /// handlers can't touch `Connection` (spec.md §4.2), so this runs from
    /// the main loop body alongside `WindowManager::commit`.
    fn drain_pending(&mut self, conn: &mut Connection) {
        let queued: Vec<GlobalEntry> = self.queued_output_binds.drain(..).collect();
        for global in queued {
            self.bind_output(conn, &global);
        }

        let capabilities: Vec<(u32, u32)> = self.queued_seat_capabilities.drain(..).collect();
        for (seat_id, caps) in capabilities {
            self.handle_seat_capabilities(conn, seat_id, caps);
        }
    }

    /// Reconciles `decorations` with the manager's current decoration
    /// requests: creates a layer-shell surface for an output that newly
    /// needs one, resizes or tears one down as the request changes, acks
    /// queued `configure`s with a fresh shm buffer, and repaints on a
    /// redecoration trigger (spec.md §4.7 "tabbed", §9 "Decoration
    /// rendering").
    fn sync_decorations(&mut self, conn: &mut Connection) {
        let (Some(compositor_id), Some(shm_id), Some(layer_shell_id)) =
            (self.compositor_id, self.shm_id, self.layer_shell_id)
        else {
            return;
        };

        let requests: HashMap<u32, layout::DecorationRequest> = self.manager.decoration_requests().clone();

        let stale: Vec<u32> = self.decorations.keys().copied().filter(|id| !requests.contains_key(id)).collect();
        for output_id in stale {
            self.destroy_decoration(conn, output_id);
        }

        for (&output_id, req) in &requests {
            let existing_size = self.decorations.get(&output_id).map(|d| d.size);
            match existing_size {
                None => self.create_decoration(conn, compositor_id, layer_shell_id, output_id, req.width, req.height),
                Some(size) if size != (req.width, req.height) => {
                    let decoration_ids = self.decorations.get(&output_id).map(|d| (d.layer_surface_id, d.surface_id));
                    let Some((layer_surface_id, surface_id)) = decoration_ids else { continue };
                    conn.send(&Message::new(
                        layer_surface_id,
                        river_layer_surface::request::SET_SIZE,
                        vec![Arg::Uint(req.width as u32), Arg::Uint(req.height as u32)],
                    ));
                    conn.send(&Message::new(surface_id, wl_surface::request::COMMIT, vec![]));
                    self.decorations.get_mut(&output_id).unwrap().size = (req.width, req.height);
                }
                Some(_) => {}
            }
        }

        let configures: Vec<(u32, u32, i32, i32)> = self.queued_layer_configures.drain(..).collect();
        for (output_id, serial, width, height) in configures {
            let Some(decoration) = self.decorations.get(&output_id) else { continue };
            let layer_surface_id = decoration.layer_surface_id;
            let surface_id = decoration.surface_id;
            conn.send(&Message::new(
                layer_surface_id,
                river_layer_surface::request::ACK_CONFIGURE,
                vec![Arg::Uint(serial)],
            ));
            let pool_id = self.table.allocate_id();
            let buffer_id = self.table.allocate_id();
            match DecorationBuffer::allocate(conn, shm_id, pool_id, buffer_id, width, height) {
                Ok(buffer) => {
                    buffer.attach_damage_commit(conn, surface_id);
                    if let Some(decoration) = self.decorations.get_mut(&output_id) {
                        decoration.buffer = Some(buffer);
                    }
                }
                Err(err) => error!("failed to allocate decoration buffer for output {output_id}: {err}"),
            }
        }

        let closed: Vec<u32> = self.queued_layer_closes.drain(..).collect();
        for layer_surface_id in closed {
            if let Some(&output_id) = self.layer_surface_owner.get(&layer_surface_id) {
                self.destroy_decoration(conn, output_id);
            }
        }

        for output_id in self.manager.take_redecorate_outputs() {
            if let Some(decoration) = self.decorations.get(&output_id) {
                if let Some(buffer) = &decoration.buffer {
                    buffer.attach_damage_commit(conn, decoration.surface_id);
                }
            }
        }
    }

    fn create_decoration(
        &mut self,
        conn: &mut Connection,
        compositor_id: u32,
        layer_shell_id: u32,
        output_id: u32,
        width: i32,
        height: i32,
    ) {
        let surface_id = self.table.allocate_id();
        self.table.register(surface_id, &wl_surface::INTERFACE);
        conn.send(&Message::new(compositor_id, wl_compositor::request::CREATE_SURFACE, vec![Arg::NewId(surface_id)]));

        let layer_surface_id = self.table.allocate_id();
        self.table.register(layer_surface_id, &river_layer_surface::INTERFACE);
        conn.send(&Message::new(
            layer_shell_id,
            river_layer_shell::request::GET_LAYER_SURFACE,
            vec![
                Arg::NewId(layer_surface_id),
                Arg::Object(surface_id),
                Arg::Object(output_id),
                Arg::Uint(river_layer_shell::LAYER_TOP),
                Arg::String(Some(DECORATION_NAMESPACE.to_string())),
            ],
        ));
        conn.send(&Message::new(
            layer_surface_id,
            river_layer_surface::request::SET_ANCHOR,
            vec![Arg::Uint(river_layer_surface::ANCHOR_TOP)],
        ));
        conn.send(&Message::new(
            layer_surface_id,
            river_layer_surface::request::SET_SIZE,
            vec![Arg::Uint(width as u32), Arg::Uint(height as u32)],
        ));
        conn.send(&Message::new(surface_id, wl_surface::request::COMMIT, vec![]));

        self.layer_surface_owner.insert(layer_surface_id, output_id);
        self.decorations.insert(
            output_id,
            OutputDecoration { surface_id, layer_surface_id, size: (width, height), buffer: None },
        );
    }

    fn destroy_decoration(&mut self, conn: &mut Connection, output_id: u32) {
        let Some(decoration) = self.decorations.remove(&output_id) else { return };
        if let Some(buffer) = &decoration.buffer {
            buffer.destroy(conn);
        }
        conn.send(&Message::new(decoration.layer_surface_id, river_layer_surface::request::DESTROY, vec![]));
        self.layer_surface_owner.remove(&decoration.layer_surface_id);
        self.table.destroy(decoration.layer_surface_id);
        self.table.destroy(decoration.surface_id);
    }

    /// `zriver_layer_surface_v1.configure`/`closed`: queued from `dispatch`
    /// and drained by `sync_decorations`, which owns `Connection` and the
    /// object ids a buffer allocation needs.
    fn handle_layer_surface_event(&mut self, message: Message) {
        match message.opcode {
            river_layer_surface::event::CONFIGURE => {
                let Some(&output_id) = self.layer_surface_owner.get(&message.object_id) else { return };
                let serial = message.args.first().and_then(Arg::as_uint).unwrap_or(0);
                let width = message.args.get(1).and_then(Arg::as_uint).unwrap_or(0) as i32;
                let height = message.args.get(2).and_then(Arg::as_uint).unwrap_or(0) as i32;
                self.queued_layer_configures.push((output_id, serial, width, height));
            }
            river_layer_surface::event::CLOSED => {
                self.queued_layer_closes.push(message.object_id);
            }
            _ => {}
        }
    }

    fn handle_registry_event(&mut self, message: &Message) {
        let is_new_output = message.opcode == wl_registry::event::GLOBAL
            && message.args.get(1).and_then(Arg::as_str) == Some("wl_output");
        let removed_name = if message.opcode == wl_registry::event::GLOBAL_REMOVE {
            message.args.first().and_then(Arg::as_uint)
        } else {
            None
        };

        self.table.handle_registry_event(message);

        if is_new_output {
            let name = message.args[0].as_uint().unwrap_or(0);
            if let Some(global) = self.table.globals().iter().find(|g| g.name == name).cloned() {
                self.queued_output_binds.push(global);
            }
        }
        if let Some(name) = removed_name {
            if let Some(object_id) = self.output_globals.remove(&name) {
                self.pending_outputs.remove(&object_id);
                self.table.destroy(object_id);
                if self.manager.outputs.iter().any(|o| o.object_id == object_id) {
                    self.manager.output_removed(object_id);
                }
            }
        }
    }

    fn handle_output_event(&mut self, message: Message) {
        match message.opcode {
            wl_output::event::GEOMETRY => {
                if let Some(pending) = self.pending_outputs.get_mut(&message.object_id) {
                    let x = message.args[0].as_int().unwrap_or(0);
                    let y = message.args[1].as_int().unwrap_or(0);
                    pending.handle.apply_geometry(x, y);
                }
            }
            wl_output::event::MODE => {
                if let Some(pending) = self.pending_outputs.get_mut(&message.object_id) {
                    let width = message.args[1].as_int().unwrap_or(0);
                    let height = message.args[2].as_int().unwrap_or(0);
                    pending.handle.apply_mode(width, height);
                }
            }
            wl_output::event::SCALE => {
                if let Some(pending) = self.pending_outputs.get_mut(&message.object_id) {
                    let scale = message.args[0].as_int().unwrap_or(1);
                    pending.handle.apply_scale(scale);
                }
            }
            wl_output::event::NAME => {
                if let Some(pending) = self.pending_outputs.get_mut(&message.object_id) {
                    if let Some(name) = message.args[0].as_str() {
                        pending.handle.apply_name(name.to_string());
                    }
                }
            }
            wl_output::event::DONE => {
                if let Some(pending) = self.pending_outputs.remove(&message.object_id) {
                    self.manager.output_added(message.object_id);
                    if let Some(output) = self.manager.outputs.iter_mut().find(|o| o.object_id == message.object_id) {
                        output.name = pending.handle.name;
                        output.logical_rect = pending.handle.logical_rect;
                        output.scale = pending.handle.scale;
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_seat_event(&mut self, message: &Message) {
        if message.opcode == wl_seat::event::CAPABILITIES {
            let capabilities = message.args.first().and_then(Arg::as_uint).unwrap_or(0);
            self.queued_seat_capabilities.push((message.object_id, capabilities));
        }
    }

    fn handle_window_management_event(&mut self, message: Message) {
        if message.opcode == river_window_management::event::WINDOW_CREATED {
            if let Some(Arg::NewId(window_id)) = message.args.first() {
                self.table.register(*window_id, &river_window::INTERFACE);
                self.manager.window_created(*window_id);
            }
        }
    }

    fn handle_window_event(&mut self, message: Message) {
        match message.opcode {
            river_window::event::MAPPED => self.manager.window_mapped(message.object_id),
            river_window::event::UNMAPPED => self.manager.window_unmapped(message.object_id),
            river_window::event::CLOSED => {
                self.manager.window_closed(message.object_id);
                self.table.destroy(message.object_id);
            }
            river_window::event::TITLE => {
                if let Some(title) = message.args.first().and_then(Arg::as_str) {
                    self.manager.window_title_changed(message.object_id, title.to_string());
                }
            }
            river_window::event::APP_ID => {
                if let Some(app_id) = message.args.first().and_then(Arg::as_str) {
                    self.manager.window_app_id_changed(message.object_id, app_id.to_string());
                }
            }
            river_window::event::URGENT => {
                let urgent = message.args.first().and_then(Arg::as_uint).unwrap_or(0) != 0;
                self.manager.window_urgent_changed(message.object_id, urgent);
            }
            _ => {}
        }
    }

    /// `wl_seat.capabilities`: queued from `dispatch` and drained here with
    /// `Connection` access, requesting keyboard/pointer objects as needed
    /// and, the first time a seat is seen, registering the default key
    /// bindings on it (spec.md §4.6).
    fn handle_seat_capabilities(&mut self, conn: &mut Connection, seat_id: u32, capabilities: u32) {
        let bindings: Vec<(Modifiers, u32)> = self.manager.key_bindings.iter().map(|(key, _)| *key).collect();
        let is_new = !self.seats.contains_key(&seat_id);
        let xkb_bindings_id = self.xkb_bindings_id.unwrap_or(0);
        let seat = self.seats.entry(seat_id).or_insert_with(|| SeatHandle::new(seat_id, xkb_bindings_id));

        if seat.needs_keyboard(capabilities) {
            let keyboard_id = self.table.allocate_id();
            self.table.register(keyboard_id, &wl_keyboard::INTERFACE);
            seat.request_keyboard(conn, keyboard_id);
            self.keyboard_owner.insert(keyboard_id, seat_id);
        }
        if seat.needs_pointer(capabilities) {
            let pointer_id = self.table.allocate_id();
            self.table.register(pointer_id, &wl_pointer::INTERFACE);
            seat.request_pointer(conn, pointer_id);
            self.pointer_owner.insert(pointer_id, seat_id);
        }
        if is_new {
            for (tag, (mods, keysym)) in bindings.into_iter().enumerate() {
                seat.add_binding(conn, mods.bits(), keysym, tag as u32);
            }
        }
    }

    /// `wl_keyboard.modifiers`: tracks the seat's current modifier state
    /// so pointer-button gestures (spec.md §4.6) can be resolved. Raw key
    /// events are otherwise ignored here — binding matches arrive through
    /// the `zriver_xkb_bindings_v1` `pressed` event instead.
    fn handle_keyboard_event(&mut self, message: Message) {
        if message.opcode != wl_keyboard::event::MODIFIERS {
            return;
        }
        let Some(&seat_id) = self.keyboard_owner.get(&message.object_id) else { return };
        let depressed = message.args.get(1).and_then(Arg::as_uint).unwrap_or(0);
        let latched = message.args.get(2).and_then(Arg::as_uint).unwrap_or(0);
        self.current_mods.insert(seat_id, Modifiers::from_bits_truncate(depressed | latched));
    }

    fn handle_pointer_event(&mut self, message: Message) {
        let Some(&seat_id) = self.pointer_owner.get(&message.object_id) else { return };
        match message.opcode {
            wl_pointer::event::BUTTON => {
                let button = message.args.get(2).and_then(Arg::as_uint).unwrap_or(0);
                let state = message.args.get(3).and_then(Arg::as_uint).unwrap_or(0);
                let pressed = state == wl_pointer::BUTTON_STATE_PRESSED;
                let mods = self.current_mods.get(&seat_id).copied().unwrap_or_else(Modifiers::empty);
                self.last_pointer_pos.remove(&seat_id);
                self.manager.handle_pointer_button(seat_id, mods, button, pressed);
            }
            wl_pointer::event::MOTION => {
                let x = fixed_arg(&message.args, 1);
                let y = fixed_arg(&message.args, 2);
                let (dx, dy) = match self.last_pointer_pos.get(&seat_id) {
                    Some(&(px, py)) => (x - px, y - py),
                    None => (0.0, 0.0),
                };
                self.last_pointer_pos.insert(seat_id, (x, y));
                self.manager.handle_pointer_motion(seat_id, dx, dy);
            }
            _ => {}
        }
    }

    /// `zriver_xkb_bindings_v1.pressed`: the compositor already matched a
    /// registered (modifier, keysym) combination and reports it back
    /// verbatim; the client re-resolves the bound action itself rather
    /// than trust an opaque tag round-tripped through the wire.
    fn handle_xkb_event(&mut self, message: Message) {
        if message.opcode == river_xkb_bindings::event::PRESSED {
            let mod_mask = message.args.first().and_then(Arg::as_uint).unwrap_or(0);
            let keysym = message.args.get(1).and_then(Arg::as_uint).unwrap_or(0);
            self.manager.handle_key(Modifiers::from_bits_truncate(mod_mask), keysym, true);
        }
    }

    fn handle_display_event(&mut self, message: Message) {
        match message.opcode {
            wl_display::event::ERROR => {
                let object_id = message.args.first().and_then(Arg::as_uint).unwrap_or(0);
                let code = message.args.get(1).and_then(Arg::as_uint).unwrap_or(0);
                let text = message.args.get(2).and_then(Arg::as_str).unwrap_or("").to_string();
                self.fatal = Some(RiverWmError::Server { object_id, code, message: text });
            }
            wl_display::event::DELETE_ID => {
                if let Some(id) = message.args.first().and_then(Arg::as_uint) {
                    self.table.free_id(id);
                    self.pending_outputs.remove(&id);
                    if self.manager.outputs.iter().any(|o| o.object_id == id) {
                        self.manager.output_removed(id);
                    }
                }
            }
            _ => {}
        }
    }
}

impl Dispatcher for App {
    fn resolve_schema(&self, object_id: u32, opcode: u16) -> Option<&'static [ArgKind]> {
        self.table.resolve_schema(object_id, opcode)
    }

    fn dispatch(&mut self, message: Message) {
        if message.object_id == self.sync_callback_id {
            self.table.note_sync_done(self.sync_callback_id, &message);
            return;
        }
        let Some(interface_name) = self.table.interface_of(message.object_id).map(|i| i.name) else {
            debug!(
                "event for unknown object id {} (opcode {}) ignored: StateError (spec.md §7)",
                message.object_id, message.opcode
            );
            return;
        };
        match interface_name {
            "wl_display" => self.handle_display_event(message),
            "wl_registry" => self.handle_registry_event(&message),
            "wl_output" => self.handle_output_event(message),
            "zriver_window_management_v1" => self.handle_window_management_event(message),
            "zriver_window_v1" => self.handle_window_event(message),
            "wl_keyboard" => self.handle_keyboard_event(message),
            "wl_pointer" => self.handle_pointer_event(message),
            "wl_seat" => self.handle_seat_event(&message),
            "zriver_xkb_bindings_v1" => self.handle_xkb_event(message),
            "zriver_layer_surface_v1" => self.handle_layer_surface_event(message),
            _ => {}
        }
    }
}

fn run(config: Config) -> Result<(), RiverWmError> {
    install_signal_handlers();
    let mut conn = Connection::connect()?;
    let mut app = App::new(config);

    app.bootstrap(&mut conn)?;
    info!("bootstrap complete; entering the event loop");

    loop {
        if !SHOULD_RUN.load(Ordering::SeqCst) || !app.manager.running {
            break;
        }
        let alive = conn.run_once(&mut app, Duration::from_millis(200)).map_err(wire_error_to_fatal)?;
        if let Some(err) = app.fatal.take() {
            return Err(err);
        }
        app.drain_pending(&mut conn);
        app.manager.commit(&mut conn);
        app.sync_decorations(&mut conn);
        if !alive {
            break;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let config = Config::default();

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            match err.exit_code() {
                Some(code) => ExitCode::from(code as u8),
                None => ExitCode::SUCCESS,
            }
        }
    }
}
