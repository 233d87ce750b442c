//! Data model (spec.md §3): Window, Output, Workspace and their
//! invariants. Owned exclusively by `WindowManager` — outputs own
//! workspaces which own windows; nothing else holds a strong reference.

use crate::geometry::Rect;
use crate::layout::Layout;

pub const WORKSPACE_COUNT: usize = 9;

#[derive(Debug, Clone)]
pub struct Window {
    pub object_id: u32,
    pub title: String,
    pub app_id: String,
    pub mapped: bool,
    pub fullscreen: bool,
    pub urgent: bool,
    pub floating: bool,
    pub geometry: Rect,
}

impl Window {
    pub fn new(object_id: u32) -> Self {
        Self {
            object_id,
            title: String::new(),
            app_id: String::new(),
            mapped: false,
            fullscreen: false,
            urgent: false,
            floating: false,
            geometry: Rect::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub windows: Vec<Window>,
    pub focused_window_index: Option<usize>,
    pub layout_index: usize,
    /// Remembered geometry for floating windows that currently live in
    /// this workspace, keyed by object id (spec.md §4.7 "floating").
    pub floating_geometry: std::collections::HashMap<u32, Rect>,
}

impl Workspace {
    /// Indices, into `windows`, of windows eligible for tiling layout
    /// computation: mapped and not fullscreen (spec.md §4.7).
    pub fn layout_candidates(&self) -> Vec<u32> {
        self.windows
            .iter()
            .filter(|w| w.mapped && !w.fullscreen && !w.floating)
            .map(|w| w.object_id)
            .collect()
    }

    pub fn mapped_indices(&self) -> Vec<usize> {
        self.windows
            .iter()
            .enumerate()
            .filter(|(_, w)| w.mapped)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn find_index(&self, object_id: u32) -> Option<usize> {
        self.windows.iter().position(|w| w.object_id == object_id)
    }

    /// Invariant check (spec.md §3 Workspace invariant / testable
    /// property 5): if a focused index is set, it must point at a
    /// currently mapped window.
    pub fn focus_is_consistent(&self) -> bool {
        match self.focused_window_index {
            None => true,
            Some(i) => self.windows.get(i).is_some_and(|w| w.mapped),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Output {
    pub object_id: u32,
    pub name: String,
    pub logical_rect: Rect,
    pub scale: i32,
    pub active_workspace_index: usize,
    pub workspaces: [Workspace; WORKSPACE_COUNT],
}

impl Output {
    pub fn new(object_id: u32) -> Self {
        Self {
            object_id,
            name: String::new(),
            logical_rect: Rect::default(),
            scale: 1,
            active_workspace_index: 1,
            workspaces: Default::default(),
        }
    }

    pub fn active_workspace(&self) -> &Workspace {
        &self.workspaces[self.active_workspace_index - 1]
    }

    pub fn active_workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspaces[self.active_workspace_index - 1]
    }

    pub fn workspace_mut(&mut self, index: usize) -> &mut Workspace {
        &mut self.workspaces[index - 1]
    }

    /// Usable area for layout: the output's logical rectangle shrunk by
    /// the configured outer gap (spec.md §3 `Area`).
    pub fn usable_area(&self, outer_gap: i32) -> Rect {
        self.logical_rect.inset(outer_gap)
    }

    /// Finds which workspace (1-based index) currently holds `object_id`,
    /// if any (spec.md testable property 4: exactly one location).
    pub fn find_window(&self, object_id: u32) -> Option<(usize, usize)> {
        for (i, ws) in self.workspaces.iter().enumerate() {
            if let Some(j) = ws.find_index(object_id) {
                return Some((i + 1, j));
            }
        }
        None
    }
}

/// The configured layout sequence a workspace's `layout_index` cycles
/// through (spec.md §4.5 `cycle_layout`).
pub struct LayoutSet {
    pub layouts: Vec<Layout>,
}

impl LayoutSet {
    pub fn new(layouts: Vec<Layout>) -> Self {
        assert!(!layouts.is_empty(), "at least one layout must be configured");
        Self { layouts }
    }

    pub fn current(&self, index: usize) -> &Layout {
        &self.layouts[index % self.layouts.len()]
    }

    pub fn cycle(&self, index: usize, delta: i32) -> usize {
        let len = self.layouts.len() as i32;
        (((index as i32 + delta) % len + len) % len) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_output_has_nine_empty_workspaces_and_active_one() {
        let output = Output::new(5);
        assert_eq!(output.workspaces.len(), WORKSPACE_COUNT);
        assert_eq!(output.active_workspace_index, 1);
        assert!(output.active_workspace().windows.is_empty());
    }

    #[test]
    fn find_window_locates_exactly_one_workspace() {
        let mut output = Output::new(5);
        output.workspace_mut(3).windows.push(Window::new(42));
        assert_eq!(output.find_window(42), Some((3, 0)));
        assert_eq!(output.find_window(99), None);
    }

    #[test]
    fn focus_consistency_requires_mapped_window() {
        let mut ws = Workspace::default();
        let mut w = Window::new(1);
        w.mapped = false;
        ws.windows.push(w);
        ws.focused_window_index = Some(0);
        assert!(!ws.focus_is_consistent());

        ws.windows[0].mapped = true;
        assert!(ws.focus_is_consistent());
    }

    #[test]
    fn layout_cycle_wraps_both_directions() {
        let set = LayoutSet::new(vec![Layout::Monocle, Layout::Grid]);
        assert_eq!(set.cycle(0, -1), 1);
        assert_eq!(set.cycle(1, 1), 0);
    }
}
