//! Window Manager Core (spec.md §4.5): reconciles compositor events with
//! user intent, owns the data model of §3, and emits layout commits.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use crate::bindings::{Action, KeyBindings, Modifiers, PointerGesture};
use crate::config::Config;
use crate::connection::Connection;
use crate::geometry::Border;
use crate::layout;
use crate::wrappers::WindowHandle;

use super::focus::{fix_focus, rotate_focus};
use super::model::{LayoutSet, Output, Window, WORKSPACE_COUNT};

/// A window kept around after its output disappeared with none left to
/// migrate it to (spec.md §4.5 `output_removed`).
struct PendingWindow {
    window: Window,
    workspace_index: usize,
}

pub struct WindowManager {
    pub outputs: Vec<Output>,
    pub focused_output: Option<u32>,
    pub layouts: LayoutSet,
    pub config: Config,
    pub key_bindings: KeyBindings,
    pub running: bool,
    pub exit_code: i32,
    pending_windows: Vec<PendingWindow>,
    dirty_outputs: HashSet<u32>,
    active_pointer_gesture: Option<(u32, PointerGesture, u32)>,
    /// Windows queued to receive a `close` request at the next commit.
    /// Dispatch handlers never touch the `Connection` directly — every
    /// outgoing request funnels through `commit` (spec.md §4.5 "Commit
    /// phase").
    pending_closes: Vec<u32>,
    /// Windows queued to receive a `set_fullscreen` request at the next
    /// commit, paired with the flag's new value (spec.md §4.5
    /// `toggle_fullscreen`: "flip the flag ...; send fullscreen request").
    pending_fullscreen: Vec<(u32, bool)>,
    /// Per-output decoration buffer request, as last computed by
    /// `commit_output` (spec.md §4.7 "tabbed"). `App` reads this after
    /// each commit to create, resize, or tear down the layer-shell
    /// surface a decoration needs — that work requires the object table
    /// App owns, so the manager only ever records *what* is needed.
    decoration_requests: HashMap<u32, layout::DecorationRequest>,
    /// Outputs whose decoration needs repainting because a window's
    /// title/app_id changed under a decorating layout (spec.md §4.5
    /// "trigger a redecoration if the layout requests window
    /// decorations").
    redecorate_outputs: HashSet<u32>,
}

impl WindowManager {
    pub fn new(config: Config, layouts: LayoutSet, key_bindings: KeyBindings) -> Self {
        Self {
            outputs: Vec::new(),
            focused_output: None,
            layouts,
            config,
            key_bindings,
            running: true,
            exit_code: 0,
            pending_windows: Vec::new(),
            dirty_outputs: HashSet::new(),
            active_pointer_gesture: None,
            pending_closes: Vec::new(),
            pending_fullscreen: Vec::new(),
            decoration_requests: HashMap::new(),
            redecorate_outputs: HashSet::new(),
        }
    }

    /// Decoration requests as of the last commit, keyed by output id
    /// (spec.md §4.7 "tabbed"). An output absent from this map currently
    /// needs no decoration surface.
    pub fn decoration_requests(&self) -> &HashMap<u32, layout::DecorationRequest> {
        &self.decoration_requests
    }

    /// Drains the set of outputs whose decoration needs repainting since
    /// the last call (spec.md §4.5 redecoration trigger).
    pub fn take_redecorate_outputs(&mut self) -> HashSet<u32> {
        std::mem::take(&mut self.redecorate_outputs)
    }

    /// Whether `workspace_index`'s configured layout is one that requests
    /// window decorations (currently only `Tabbed`; spec.md §4.5 "if the
    /// layout requests window decorations").
    fn workspace_layout_decorates(&self, output_id: u32, workspace_index: usize) -> bool {
        let Some(output) = self.output(output_id) else { return false };
        let layout_index = output.workspaces[workspace_index - 1].layout_index;
        matches!(self.layouts.current(layout_index), layout::Layout::Tabbed { .. })
    }

    fn mark_dirty(&mut self, output_id: u32) {
        self.dirty_outputs.insert(output_id);
    }

    fn output_mut(&mut self, object_id: u32) -> Option<&mut Output> {
        self.outputs.iter_mut().find(|o| o.object_id == object_id)
    }

    fn output(&self, object_id: u32) -> Option<&Output> {
        self.outputs.iter().find(|o| o.object_id == object_id)
    }

    fn focused_output_id(&self) -> Option<u32> {
        self.focused_output.or_else(|| self.outputs.first().map(|o| o.object_id))
    }

    /// Locates a window anywhere across all outputs (spec.md testable
    /// property 4: a window lives in exactly one (output, workspace)).
    fn locate_window(&self, object_id: u32) -> Option<(u32, usize, usize)> {
        for output in &self.outputs {
            if let Some((ws, idx)) = output.find_window(object_id) {
                return Some((output.object_id, ws, idx));
            }
        }
        None
    }

    // ---- Event ingress (spec.md §4.5) ----------------------------------

    /// `output_added`: initializes nine empty workspaces, active = 1.
    pub fn output_added(&mut self, object_id: u32) {
        let is_first = self.outputs.is_empty();
        self.outputs.push(Output::new(object_id));
        if is_first {
            self.focused_output = Some(object_id);
        }
        self.mark_dirty(object_id);
    }

    /// `output_removed`: migrates windows to the next remaining output's
    /// matching workspace index; holds them pending if none remain.
    pub fn output_removed(&mut self, object_id: u32) {
        let Some(pos) = self.outputs.iter().position(|o| o.object_id == object_id) else {
            warn!("output_removed for unknown output {object_id}");
            return;
        };
        let mut removed = self.outputs.remove(pos);
        let mut migrated_to = None;

        if let Some(target) = self.outputs.first_mut() {
            migrated_to = Some(target.object_id);
            for (i, ws) in removed.workspaces.iter_mut().enumerate() {
                let dest = target.workspace_mut(i + 1);
                dest.windows.append(&mut ws.windows);
            }
        } else {
            for (i, ws) in removed.workspaces.iter_mut().enumerate() {
                for window in ws.windows.drain(..) {
                    self.pending_windows.push(PendingWindow { window, workspace_index: i + 1 });
                }
            }
        }
        if let Some(target_id) = migrated_to {
            self.mark_dirty(target_id);
        }

        if self.focused_output == Some(object_id) {
            self.focused_output = self.outputs.first().map(|o| o.object_id);
        }
        self.decoration_requests.remove(&object_id);
        self.redecorate_outputs.remove(&object_id);
    }

    /// `window_created`: assigned to the focused workspace of the focused
    /// output, appended, unmapped until `window_mapped`.
    pub fn window_created(&mut self, object_id: u32) {
        let Some(output_id) = self.focused_output_id() else {
            self.pending_windows.push(PendingWindow { window: Window::new(object_id), workspace_index: 1 });
            return;
        };
        let Some(output) = self.output_mut(output_id) else { return };
        output.active_workspace_mut().windows.push(Window::new(object_id));
        self.mark_dirty(output_id);
    }

    pub fn window_mapped(&mut self, object_id: u32) {
        let Some((output_id, ws, idx)) = self.locate_window(object_id) else {
            debug!("window_mapped for untracked window {object_id}");
            return;
        };
        let output = self.output_mut(output_id).unwrap();
        let workspace = output.workspace_mut(ws);
        workspace.windows[idx].mapped = true;
        workspace.focused_window_index = Some(idx);
        self.mark_dirty(output_id);
    }

    pub fn window_unmapped(&mut self, object_id: u32) {
        let Some((output_id, ws, idx)) = self.locate_window(object_id) else { return };
        let output = self.output_mut(output_id).unwrap();
        let workspace = output.workspace_mut(ws);
        workspace.windows[idx].mapped = false;
        fix_focus(workspace, idx);
        self.mark_dirty(output_id);
    }

    pub fn window_closed(&mut self, object_id: u32) {
        let Some((output_id, ws, idx)) = self.locate_window(object_id) else { return };
        let output = self.output_mut(output_id).unwrap();
        let workspace = output.workspace_mut(ws);
        workspace.windows.remove(idx);
        workspace.floating_geometry.remove(&object_id);
        fix_focus(workspace, idx);
        self.mark_dirty(output_id);
    }

    pub fn window_title_changed(&mut self, object_id: u32, title: String) {
        if let Some((output_id, ws, idx)) = self.locate_window(object_id) {
            let output = self.output_mut(output_id).unwrap();
            output.workspace_mut(ws).windows[idx].title = title;
            self.mark_dirty(output_id);
            if self.workspace_layout_decorates(output_id, ws) {
                self.redecorate_outputs.insert(output_id);
            }
        }
    }

    pub fn window_app_id_changed(&mut self, object_id: u32, app_id: String) {
        if let Some((output_id, ws, idx)) = self.locate_window(object_id) {
            let output = self.output_mut(output_id).unwrap();
            output.workspace_mut(ws).windows[idx].app_id = app_id;
            self.mark_dirty(output_id);
            if self.workspace_layout_decorates(output_id, ws) {
                self.redecorate_outputs.insert(output_id);
            }
        }
    }

    pub fn window_urgent_changed(&mut self, object_id: u32, urgent: bool) {
        if let Some((output_id, ws, idx)) = self.locate_window(object_id) {
            let output = self.output_mut(output_id).unwrap();
            output.workspace_mut(ws).windows[idx].urgent = urgent;
            self.mark_dirty(output_id);
        }
    }

    /// Seat keyboard key event: looks up the action bound to
    /// (mod mask, keysym) and applies it.
    pub fn handle_key(&mut self, mods: Modifiers, keysym: u32, pressed: bool) {
        if !pressed {
            return;
        }
        if let Some(action) = self.key_bindings.lookup(mods, keysym) {
            self.apply_action(action);
        }
    }

    /// Seat pointer button event: starts or ends a move/resize gesture
    /// for floating windows (spec.md §4.6).
    pub fn handle_pointer_button(&mut self, seat_id: u32, mods: Modifiers, button: u32, pressed: bool) {
        let configured = self.config.modifier.as_modifiers();
        if pressed {
            if let Some(gesture) = crate::bindings::gesture_for_button(mods, configured, button) {
                if let Some(focused) = self.currently_focused_window() {
                    self.active_pointer_gesture = Some((seat_id, gesture, focused));
                }
            }
        } else {
            self.active_pointer_gesture = None;
        }
    }

    /// Pointer motion while a gesture is held: transitions the window to
    /// floating on first motion, then updates its geometry.
    pub fn handle_pointer_motion(&mut self, seat_id: u32, dx: f64, dy: f64) {
        let Some((gesture_seat, gesture, window_id)) = self.active_pointer_gesture else { return };
        if gesture_seat != seat_id {
            return;
        }
        let Some((output_id, ws, idx)) = self.locate_window(window_id) else { return };
        let output = self.output_mut(output_id).unwrap();
        let workspace = output.workspace_mut(ws);
        let window = &mut workspace.windows[idx];
        if !window.floating {
            window.floating = true;
        }
        match gesture {
            PointerGesture::Move => {
                window.geometry.x += dx.round() as i32;
                window.geometry.y += dy.round() as i32;
            }
            PointerGesture::Resize => {
                window.geometry.width = (window.geometry.width + dx.round() as i32).max(1);
                window.geometry.height = (window.geometry.height + dy.round() as i32).max(1);
            }
        }
        workspace.floating_geometry.insert(window_id, window.geometry);
        self.mark_dirty(output_id);
    }

    // ---- User actions (spec.md §4.5) -----------------------------------

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::SpawnTerminal | Action::SpawnLauncher => {
                // Process launching is an external collaborator (spec.md
                // §1); nothing for the core to do beyond logging intent.
                debug!("spawn action requested: {action:?}");
            }
            Action::CloseWindow => self.close_window(),
            Action::Quit => self.quit(),
            Action::FocusNext => self.focus_next(),
            Action::FocusPrev => self.focus_prev(),
            Action::SwapNext => self.swap_next(),
            Action::SwapPrev => self.swap_prev(),
            Action::PromoteMaster => self.promote_to_master(),
            Action::CycleLayoutNext => self.cycle_layout(1),
            Action::CycleLayoutPrev => self.cycle_layout(-1),
            Action::ToggleFullscreen => self.toggle_fullscreen(),
            Action::SwitchWorkspace(n) => self.switch_workspace(n),
            Action::MoveWindowToWorkspace(n) => self.move_window_to_workspace(n),
        }
    }

    fn currently_focused_window(&self) -> Option<u32> {
        let output = self.output(self.focused_output_id()?)?;
        let workspace = output.active_workspace();
        workspace.focused_window_index.map(|i| workspace.windows[i].object_id)
    }

    pub fn focus_next(&mut self) {
        self.rotate_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.rotate_focus(-1);
    }

    fn rotate_focus(&mut self, delta: i32) {
        let Some(output_id) = self.focused_output_id() else { return };
        let output = self.output_mut(output_id).unwrap();
        rotate_focus(output.active_workspace_mut(), delta);
        self.mark_dirty(output_id);
    }

    pub fn swap_next(&mut self) {
        self.swap_with_neighbor(1);
    }

    pub fn swap_prev(&mut self) {
        self.swap_with_neighbor(-1);
    }

    fn swap_with_neighbor(&mut self, delta: i32) {
        let Some(output_id) = self.focused_output_id() else { return };
        let output = self.output_mut(output_id).unwrap();
        let workspace = output.active_workspace_mut();
        let Some(focused) = workspace.focused_window_index else { return };
        let len = workspace.windows.len() as i32;
        if len < 2 {
            return;
        }
        let other = (((focused as i32 + delta) % len) + len) % len;
        workspace.windows.swap(focused, other as usize);
        workspace.focused_window_index = Some(other as usize);
        self.mark_dirty(output_id);
    }

    pub fn promote_to_master(&mut self) {
        let Some(output_id) = self.focused_output_id() else { return };
        let output = self.output_mut(output_id).unwrap();
        let workspace = output.active_workspace_mut();
        let Some(focused) = workspace.focused_window_index else { return };
        if focused == 0 {
            return;
        }
        let window = workspace.windows.remove(focused);
        workspace.windows.insert(0, window);
        workspace.focused_window_index = Some(0);
        self.mark_dirty(output_id);
    }

    pub fn cycle_layout(&mut self, delta: i32) {
        let Some(output_id) = self.focused_output_id() else { return };
        let Some(current_index) = self.output(output_id).map(|o| o.active_workspace().layout_index) else {
            return;
        };
        let next_index = self.layouts.cycle(current_index, delta);
        let output = self.output_mut(output_id).unwrap();
        output.active_workspace_mut().layout_index = next_index;
        self.mark_dirty(output_id);
    }

    /// Flips the focused window's fullscreen flag and queues the
    /// compositor request; layout recomputation already skips fullscreen
    /// windows via `Workspace::layout_candidates` (spec.md §4.5
    /// `toggle_fullscreen`).
    pub fn toggle_fullscreen(&mut self) {
        let Some(output_id) = self.focused_output_id() else { return };
        let output = self.output_mut(output_id).unwrap();
        let workspace = output.active_workspace_mut();
        let Some(focused) = workspace.focused_window_index else { return };
        let window = &mut workspace.windows[focused];
        window.fullscreen = !window.fullscreen;
        self.pending_fullscreen.push((window.object_id, window.fullscreen));
        self.mark_dirty(output_id);
    }

    /// Detaches the focused window from its workspace and appends it to
    /// workspace `n` on the same output, retaining mapped state (spec.md
    /// §4.5, scenario E, testable property 9).
    pub fn move_window_to_workspace(&mut self, n: u8) {
        if !(1..=WORKSPACE_COUNT as u8).contains(&n) {
            return;
        }
        let Some(output_id) = self.focused_output_id() else { return };
        let output = self.output_mut(output_id).unwrap();
        let source_index = output.active_workspace_index;
        let workspace = output.active_workspace_mut();
        let Some(focused) = workspace.focused_window_index else { return };
        let window = workspace.windows.remove(focused);
        workspace.floating_geometry.remove(&window.object_id);
        fix_focus(workspace, focused);

        output.workspace_mut(n as usize).windows.push(window);
        debug_assert_eq!(output.active_workspace_index, source_index);
        self.mark_dirty(output_id);
    }

    /// Sets the active workspace on the focused output and focuses its
    /// last-focused window (spec.md §4.5, §3 `Output.active_workspace_index`).
    pub fn switch_workspace(&mut self, n: u8) {
        if !(1..=WORKSPACE_COUNT as u8).contains(&n) {
            return;
        }
        let Some(output_id) = self.focused_output_id() else { return };
        let output = self.output_mut(output_id).unwrap();
        output.active_workspace_index = n as usize;
        self.mark_dirty(output_id);
    }

    /// Queues a close request for the focused window (spec.md §4.5);
    /// actually sent at the next `commit`.
    pub fn close_window(&mut self) {
        if let Some(window_id) = self.currently_focused_window() {
            self.pending_closes.push(window_id);
        }
    }

    /// Idempotent: a second `quit` while already stopped is a no-op
    /// (spec.md testable property 10).
    pub fn quit(&mut self) {
        self.running = false;
    }

    // ---- Commit phase (spec.md §4.5 "Commit phase") --------------------

    /// Recomputes layouts for every output whose active workspace or
    /// window set changed since the last commit, and emits geometry
    /// requests for every affected window before returning.
    pub fn commit(&mut self, conn: &mut Connection) {
        for window_id in self.pending_closes.drain(..) {
            WindowHandle::new(window_id).close(conn);
        }
        for (window_id, fullscreen) in self.pending_fullscreen.drain(..) {
            WindowHandle::new(window_id).set_fullscreen(conn, fullscreen);
        }
        let dirty: Vec<u32> = self.dirty_outputs.drain().collect();
        for output_id in dirty {
            self.commit_output(conn, output_id);
        }
    }

    fn commit_output(&mut self, conn: &mut Connection, output_id: u32) {
        let outer_gap = self.config.outer_gap;
        let inner_gap = self.config.inner_gap;

        let Some(layout_index) = self.output(output_id).map(|o| o.active_workspace().layout_index) else {
            return;
        };
        let layout = *self.layouts.current(layout_index);

        let Some(output) = self.output_mut(output_id) else { return };
        let area = output.usable_area(outer_gap);
        let workspace = output.active_workspace_mut();

        for window in workspace.windows.iter().filter(|w| w.mapped && w.fullscreen) {
            WindowHandle::new(window.object_id).set_geometry(conn, area, Border::None);
        }

        let candidates = workspace.layout_candidates();
        let focused = workspace
            .focused_window_index
            .and_then(|i| workspace.windows.get(i))
            .map(|w| w.object_id);
        let result = layout::calculate(&candidates, area, &layout, focused, inner_gap, &workspace.floating_geometry);

        if let Some(req) = result.decoration_request {
            self.decoration_requests.insert(output_id, req);
        } else {
            self.decoration_requests.remove(&output_id);
        }

        let urgent_ids: HashSet<u32> = workspace.windows.iter().filter(|w| w.urgent).map(|w| w.object_id).collect();
        for (window_id, mut geometry) in result.geometries {
            if urgent_ids.contains(&window_id) {
                geometry.border = Border::Urgent;
            }
            if let Some(idx) = workspace.find_index(window_id) {
                workspace.windows[idx].geometry = geometry.rect;
            }
            WindowHandle::new(window_id).set_geometry(conn, geometry.rect, geometry.border);
        }

        for window in workspace.windows.iter().filter(|w| w.floating && w.mapped && !w.fullscreen) {
            let rect = workspace.floating_geometry.get(&window.object_id).copied().unwrap_or(window.geometry);
            let border = if urgent_ids.contains(&window.object_id) {
                Border::Urgent
            } else if focused == Some(window.object_id) {
                Border::Focused
            } else {
                Border::Normal
            };
            WindowHandle::new(window.object_id).set_geometry(conn, rect, border);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::DefaultModifier;
    use crate::layout::Layout;

    fn manager() -> WindowManager {
        let layouts = LayoutSet::new(vec![Layout::TileRight { master_count: 1, master_ratio: 0.5 }, Layout::Monocle]);
        WindowManager::new(Config::default(), layouts, KeyBindings::with_defaults(DefaultModifier::Super))
    }

    fn test_connection() -> Connection {
        let (a, _b) = std::os::unix::net::UnixStream::pair().unwrap();
        Connection::from_stream(a)
    }

    #[test]
    fn window_created_assigns_to_focused_workspace() {
        let mut mgr = manager();
        mgr.output_added(1);
        mgr.window_created(10);
        let output = mgr.output(1).unwrap();
        assert_eq!(output.active_workspace().windows.len(), 1);
        assert!(!output.active_workspace().windows[0].mapped);
    }

    #[test]
    fn mapping_a_window_focuses_it() {
        let mut mgr = manager();
        mgr.output_added(1);
        mgr.window_created(10);
        mgr.window_mapped(10);
        let output = mgr.output(1).unwrap();
        assert!(output.active_workspace().windows[0].mapped);
        assert_eq!(output.active_workspace().focused_window_index, Some(0));
    }

    #[test]
    fn scenario_e_move_to_workspace() {
        let mut mgr = manager();
        mgr.output_added(1);
        mgr.window_created(10);
        mgr.window_mapped(10);
        mgr.window_created(11);
        mgr.window_mapped(11);
        // Focus is on window 11 (last mapped); move it to workspace 3.
        mgr.move_window_to_workspace(3);

        let output = mgr.output(1).unwrap();
        assert_eq!(output.active_workspace_index, 1);
        assert!(!output.workspaces[0].windows.iter().any(|w| w.object_id == 11));
        assert!(output.workspaces[2].windows.iter().any(|w| w.object_id == 11 && w.mapped));
        // Focus on workspace 1 falls back to window 10.
        assert_eq!(output.workspaces[0].focused_window_index, Some(0));
    }

    #[test]
    fn quit_is_idempotent() {
        let mut mgr = manager();
        mgr.quit();
        mgr.quit();
        assert!(!mgr.running);
    }

    #[test]
    fn output_removed_migrates_windows_to_remaining_output() {
        let mut mgr = manager();
        mgr.output_added(1);
        mgr.output_added(2);
        mgr.window_created(10);
        mgr.output_removed(1);
        let remaining = mgr.output(2).unwrap();
        assert!(remaining.active_workspace().windows.iter().any(|w| w.object_id == 10));
    }

    #[test]
    fn output_removed_with_none_left_holds_windows_pending() {
        let mut mgr = manager();
        mgr.output_added(1);
        mgr.window_created(10);
        mgr.output_removed(1);
        assert!(mgr.outputs.is_empty());
        assert_eq!(mgr.pending_windows.len(), 1);
    }

    #[test]
    fn cycle_layout_changes_workspace_layout_index() {
        let mut mgr = manager();
        mgr.output_added(1);
        mgr.cycle_layout(1);
        assert_eq!(mgr.output(1).unwrap().active_workspace().layout_index, 1);
        mgr.cycle_layout(1);
        assert_eq!(mgr.output(1).unwrap().active_workspace().layout_index, 0);
    }

    #[test]
    fn toggle_fullscreen_queues_a_set_fullscreen_request() {
        let mut mgr = manager();
        mgr.output_added(1);
        mgr.window_created(10);
        mgr.window_mapped(10);
        mgr.toggle_fullscreen();
        assert_eq!(mgr.pending_fullscreen, vec![(10, true)]);
        mgr.toggle_fullscreen();
        assert_eq!(mgr.pending_fullscreen, vec![(10, true), (10, false)]);
    }

    #[test]
    fn tabbed_layout_populates_decoration_request_on_commit() {
        let mut mgr = WindowManager::new(
            Config::default(),
            LayoutSet::new(vec![Layout::Tabbed { tab_height: 24 }]),
            KeyBindings::with_defaults(DefaultModifier::Super),
        );
        mgr.output_added(1);
        mgr.window_created(10);
        mgr.window_mapped(10);
        let mut conn = test_connection();
        mgr.commit_output(&mut conn, 1);
        assert!(mgr.decoration_requests().contains_key(&1));
    }

    #[test]
    fn non_decorating_layout_has_no_decoration_request() {
        let mut mgr = manager();
        mgr.output_added(1);
        mgr.window_created(10);
        mgr.window_mapped(10);
        let mut conn = test_connection();
        mgr.commit_output(&mut conn, 1);
        assert!(mgr.decoration_requests().is_empty());
    }

    #[test]
    fn title_change_under_tabbed_layout_triggers_redecoration() {
        let mut mgr = WindowManager::new(
            Config::default(),
            LayoutSet::new(vec![Layout::Tabbed { tab_height: 24 }]),
            KeyBindings::with_defaults(DefaultModifier::Super),
        );
        mgr.output_added(1);
        mgr.window_created(10);
        mgr.window_mapped(10);
        mgr.window_title_changed(10, "new title".to_string());
        assert!(mgr.take_redecorate_outputs().contains(&1));
    }

    #[test]
    fn title_change_under_non_decorating_layout_does_not_trigger_redecoration() {
        let mut mgr = manager();
        mgr.output_added(1);
        mgr.window_created(10);
        mgr.window_mapped(10);
        mgr.window_title_changed(10, "new title".to_string());
        assert!(mgr.take_redecorate_outputs().is_empty());
    }
}
