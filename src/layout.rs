//! Layout Engine (spec.md §4.7): a pure, deterministic function from
//! (window list, area, parameters) to a geometry map. No I/O, no access
//! to manager state beyond what is passed in.

use std::collections::HashMap;

use crate::geometry::{distribute, Area, Border, LayoutGeometry, Rect};

/// Window identity as far as the layout engine is concerned: the window
/// object's id (spec.md §3 `Window.object_id`).
pub type WindowId = u32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    TileRight { master_count: usize, master_ratio: f64 },
    TileBottom { master_count: usize, master_ratio: f64 },
    Monocle,
    Grid,
    CenteredMaster { master_ratio: f64 },
    Floating,
    Tabbed { tab_height: i32 },
}

impl Layout {
    pub fn name(&self) -> &'static str {
        match self {
            Layout::TileRight { .. } => "tile-right",
            Layout::TileBottom { .. } => "tile-bottom",
            Layout::Monocle => "monocle",
            Layout::Grid => "grid",
            Layout::CenteredMaster { .. } => "centered-master",
            Layout::Floating => "floating",
            Layout::Tabbed { .. } => "tabbed",
        }
    }
}

/// The configured, cyclable sequence of layouts (spec.md §4.5
/// `cycle_layout`). Order fixes the indices `cycle_layout(+1/-1)` walks.
pub fn default_layout_sequence(master_ratio: f64, tab_height: i32) -> Vec<Layout> {
    vec![
        Layout::TileRight { master_count: 1, master_ratio: master_ratio },
        Layout::TileBottom { master_count: 1, master_ratio: master_ratio },
        Layout::Monocle,
        Layout::Grid,
        Layout::CenteredMaster { master_ratio },
        Layout::Tabbed { tab_height },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Splits `outer` into `count` cells along `axis`, with `gap` pixels
/// between adjacent cells and none on the outer edges — the outer edges
/// are already the caller's `Area`, which has the *outer* gap baked in.
fn split(outer: Rect, count: usize, gap: i32, axis: Axis) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let total = match axis {
        Axis::Horizontal => outer.width,
        Axis::Vertical => outer.height,
    };
    let usable = (total - gap * (count as i32 - 1).max(0)).max(0);
    let sizes = distribute(usable, count);

    let mut rects = Vec::with_capacity(count);
    let mut cursor = match axis {
        Axis::Horizontal => outer.x,
        Axis::Vertical => outer.y,
    };
    for size in sizes {
        let rect = match axis {
            Axis::Horizontal => Rect::new(cursor, outer.y, size, outer.height),
            Axis::Vertical => Rect::new(outer.x, cursor, outer.width, size),
        };
        rects.push(rect);
        cursor += size + gap;
    }
    rects
}

/// A decoration buffer the tabbed layout needs painted (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationRequest {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Default)]
pub struct LayoutResult {
    pub geometries: HashMap<WindowId, LayoutGeometry>,
    pub decoration_request: Option<DecorationRequest>,
}

/// Computes geometry for every window in `windows` (already filtered to
/// mapped, non-fullscreen, per spec.md §4.7). `focused` marks the window
/// whose border/Z-order should read as focused; the caller is responsible
/// for overlaying `Border::Urgent` afterward for windows with the urgent
/// flag set, since urgency is a `Window` attribute the engine doesn't see.
pub fn calculate(
    windows: &[WindowId],
    area: Area,
    layout: &Layout,
    focused: Option<WindowId>,
    inner_gap: i32,
    remembered_floating: &HashMap<WindowId, Rect>,
) -> LayoutResult {
    if windows.is_empty() {
        return LayoutResult::default();
    }

    match layout {
        Layout::TileRight { master_count, master_ratio } => {
            tile(windows, area, *master_count, *master_ratio, inner_gap, focused, Axis::Vertical)
        }
        Layout::TileBottom { master_count, master_ratio } => {
            tile(windows, area, *master_count, *master_ratio, inner_gap, focused, Axis::Horizontal)
        }
        Layout::Monocle => monocle(windows, area, focused),
        Layout::Grid => grid(windows, area, inner_gap, focused),
        Layout::CenteredMaster { master_ratio } => {
            centered_master(windows, area, *master_ratio, inner_gap, focused)
        }
        Layout::Floating => floating(windows, area, remembered_floating),
        Layout::Tabbed { tab_height } => tabbed(windows, area, *tab_height, focused),
    }
}

fn border_for(window: WindowId, focused: Option<WindowId>) -> Border {
    if focused == Some(window) { Border::Focused } else { Border::Normal }
}

/// Shared implementation for tile-right (`stack_axis = Vertical`, master
/// column on the left) and tile-bottom (`stack_axis = Horizontal`, master
/// row on top) — tile-bottom is tile-right transposed (spec.md §4.7).
fn tile(
    windows: &[WindowId],
    area: Area,
    master_count: usize,
    master_ratio: f64,
    gap: i32,
    focused: Option<WindowId>,
    stack_axis: Axis,
) -> LayoutResult {
    let count = windows.len();
    let n_master = master_count.min(count);
    let mut geometries = HashMap::new();

    if n_master >= count {
        let rects = split(area, count, gap, stack_axis);
        for (w, r) in windows.iter().zip(rects) {
            geometries.insert(*w, LayoutGeometry::new(r, border_for(*w, focused)));
        }
        return LayoutResult { geometries, decoration_request: None };
    }

    let main_extent = match stack_axis {
        Axis::Vertical => area.width,
        Axis::Horizontal => area.height,
    };
    let usable = (main_extent - gap).max(0);
    let master_extent = (usable as f64 * master_ratio).round() as i32;
    let stack_extent = usable - master_extent;

    let (master_rect, stack_rect) = match stack_axis {
        Axis::Vertical => (
            Rect::new(area.x, area.y, master_extent, area.height),
            Rect::new(area.x + master_extent + gap, area.y, stack_extent, area.height),
        ),
        Axis::Horizontal => (
            Rect::new(area.x, area.y, area.width, master_extent),
            Rect::new(area.x, area.y + master_extent + gap, area.width, stack_extent),
        ),
    };

    let master_windows = &windows[..n_master];
    let stack_windows = &windows[n_master..];

    // Windows within a column/row stack along the same axis that
    // separates master from stack: a vertical dividing line (tile-right)
    // leaves each side stacking top-to-bottom; a horizontal one
    // (tile-bottom) leaves each side stacking side-by-side.
    for (w, r) in master_windows.iter().zip(split(master_rect, n_master, gap, stack_axis)) {
        geometries.insert(*w, LayoutGeometry::new(r, border_for(*w, focused)));
    }
    for (w, r) in stack_windows.iter().zip(split(stack_rect, stack_windows.len(), gap, stack_axis)) {
        geometries.insert(*w, LayoutGeometry::new(r, border_for(*w, focused)));
    }

    LayoutResult { geometries, decoration_request: None }
}

fn monocle(windows: &[WindowId], area: Area, focused: Option<WindowId>) -> LayoutResult {
    let mut geometries = HashMap::new();
    for w in windows {
        let mut geom = LayoutGeometry::new(area, border_for(*w, focused));
        geom.visible = focused.map_or(*w == windows[0], |f| *w == f);
        geometries.insert(*w, geom);
    }
    LayoutResult { geometries, decoration_request: None }
}

fn grid(windows: &[WindowId], area: Area, gap: i32, focused: Option<WindowId>) -> LayoutResult {
    let count = windows.len();
    let cols = (count as f64).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);

    let row_rects = split(area, rows, gap, Axis::Vertical);
    let mut geometries = HashMap::new();
    let mut index = 0;
    for row_rect in row_rects {
        let remaining = count - index;
        let items_in_row = remaining.min(cols);
        let cell_rects = split(row_rect, items_in_row, gap, Axis::Horizontal);
        for rect in cell_rects {
            let w = windows[index];
            geometries.insert(w, LayoutGeometry::new(rect, border_for(w, focused)));
            index += 1;
        }
    }

    LayoutResult { geometries, decoration_request: None }
}

fn centered_master(
    windows: &[WindowId],
    area: Area,
    master_ratio: f64,
    gap: i32,
    focused: Option<WindowId>,
) -> LayoutResult {
    let master = windows[0];
    let remaining = &windows[1..];

    if remaining.len() <= 1 {
        return tile(windows, area, 1, master_ratio, gap, focused, Axis::Vertical);
    }

    let mut left = Vec::new();
    let mut right = Vec::new();
    for (i, w) in remaining.iter().enumerate() {
        let one_based = i + 1;
        if one_based % 2 == 1 {
            right.push(*w);
        } else {
            left.push(*w);
        }
    }

    let gutters = (!left.is_empty() as i32) + (!right.is_empty() as i32);
    let usable = (area.width - gap * gutters).max(0);
    let master_width = (usable as f64 * master_ratio).round() as i32;
    let remainder = usable - master_width;
    let (left_width, right_width) = match (!left.is_empty(), !right.is_empty()) {
        (true, true) => (remainder / 2, remainder - remainder / 2),
        (true, false) => (remainder, 0),
        (false, true) => (0, remainder),
        (false, false) => (0, 0),
    };

    let mut geometries = HashMap::new();
    let mut cursor_x = area.x;

    if !left.is_empty() {
        let left_rect = Rect::new(cursor_x, area.y, left_width, area.height);
        for (w, r) in left.iter().zip(split(left_rect, left.len(), gap, Axis::Vertical)) {
            geometries.insert(*w, LayoutGeometry::new(r, border_for(*w, focused)));
        }
        cursor_x += left_width + gap;
    }

    let master_rect = Rect::new(cursor_x, area.y, master_width, area.height);
    geometries.insert(master, LayoutGeometry::new(master_rect, border_for(master, focused)));
    cursor_x += master_width;

    if !right.is_empty() {
        cursor_x += gap;
        let right_rect = Rect::new(cursor_x, area.y, right_width, area.height);
        for (w, r) in right.iter().zip(split(right_rect, right.len(), gap, Axis::Vertical)) {
            geometries.insert(*w, LayoutGeometry::new(r, border_for(*w, focused)));
        }
    }

    LayoutResult { geometries, decoration_request: None }
}

fn floating(
    windows: &[WindowId],
    area: Area,
    remembered: &HashMap<WindowId, Rect>,
) -> LayoutResult {
    let mut geometries = HashMap::new();
    let centered_width = area.width * 2 / 3;
    let centered_height = area.height * 2 / 3;
    let centered_rect = Rect::new(
        area.x + (area.width - centered_width) / 2,
        area.y + (area.height - centered_height) / 2,
        centered_width,
        centered_height,
    );

    for w in windows {
        let rect = remembered.get(w).copied().unwrap_or(centered_rect);
        geometries.insert(*w, LayoutGeometry::new(rect, Border::Normal));
    }
    LayoutResult { geometries, decoration_request: None }
}

fn tabbed(windows: &[WindowId], area: Area, tab_height: i32, focused: Option<WindowId>) -> LayoutResult {
    let body = Rect::new(area.x, area.y + tab_height, area.width, (area.height - tab_height).max(0));
    let mut geometries = HashMap::new();
    for w in windows {
        let mut geom = LayoutGeometry::new(body, border_for(*w, focused));
        geom.visible = focused.map_or(*w == windows[0], |f| *w == f);
        geometries.insert(*w, geom);
    }
    LayoutResult {
        geometries,
        decoration_request: Some(DecorationRequest { width: area.width, height: tab_height }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_overlaps(result: &LayoutResult) -> bool {
        let rects: Vec<Rect> = result.geometries.values().map(|g| g.rect).collect();
        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                if rects[i].overlaps(&rects[j]) {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn scenario_c_tile_right() {
        let windows = vec![1, 2, 3];
        let area = Rect::new(0, 0, 1000, 1000);
        let layout = Layout::TileRight { master_count: 1, master_ratio: 0.5 };
        let result = calculate(&windows, area, &layout, Some(1), 10, &HashMap::new());

        assert_eq!(result.geometries[&1].rect, Rect::new(0, 0, 495, 1000));
        assert_eq!(result.geometries[&2].rect, Rect::new(505, 0, 495, 495));
        assert_eq!(result.geometries[&3].rect, Rect::new(505, 505, 495, 495));
    }

    #[test]
    fn tile_right_column_sums_equal_area() {
        let windows = vec![1, 2, 3, 4];
        let area = Rect::new(0, 0, 1000, 800);
        let layout = Layout::TileRight { master_count: 1, master_ratio: 0.5 };
        let result = calculate(&windows, area, &layout, None, 10, &HashMap::new());

        let master = result.geometries[&1].rect;
        assert_eq!(master.height, 800);
        let stack_heights: i32 = [2u32, 3, 4]
            .iter()
            .map(|w| result.geometries[w].rect.height)
            .sum();
        let gaps = 10 * 2;
        assert_eq!(stack_heights + gaps, 800);
        assert!(no_overlaps(&result));
    }

    #[test]
    fn master_count_exceeding_windows_makes_all_masters() {
        let windows = vec![1, 2];
        let area = Rect::new(0, 0, 1000, 1000);
        let layout = Layout::TileRight { master_count: 5, master_ratio: 0.5 };
        let result = calculate(&windows, area, &layout, None, 0, &HashMap::new());
        assert_eq!(result.geometries.len(), 2);
        assert!(no_overlaps(&result));
    }

    #[test]
    fn empty_window_list_yields_empty_map() {
        let result = calculate(&[], Rect::new(0, 0, 100, 100), &Layout::Grid, None, 4, &HashMap::new());
        assert!(result.geometries.is_empty());
    }

    #[test]
    fn monocle_only_focused_is_visible() {
        let windows = vec![1, 2, 3];
        let result = calculate(
            &windows,
            Rect::new(0, 0, 800, 600),
            &Layout::Monocle,
            Some(2),
            5,
            &HashMap::new(),
        );
        assert!(!result.geometries[&1].visible);
        assert!(result.geometries[&2].visible);
        assert!(!result.geometries[&3].visible);
        for g in result.geometries.values() {
            assert_eq!(g.rect, Rect::new(0, 0, 800, 600));
        }
    }

    #[test]
    fn grid_lays_out_sqrt_columns_with_expanding_last_row() {
        let windows = vec![1, 2, 3, 4, 5];
        let area = Rect::new(0, 0, 900, 600);
        let result = calculate(&windows, area, &Layout::Grid, None, 0, &HashMap::new());
        // ceil(sqrt(5)) = 3 columns, 2 rows (3 + 2).
        assert!(no_overlaps(&result));
        let total_area: i64 = result
            .geometries
            .values()
            .map(|g| (g.rect.width as i64) * (g.rect.height as i64))
            .sum();
        assert_eq!(total_area, 900 * 600);
    }

    #[test]
    fn centered_master_degenerates_with_one_remaining() {
        let windows = vec![1, 2];
        let area = Rect::new(0, 0, 1000, 1000);
        let result = calculate(
            &windows,
            area,
            &Layout::CenteredMaster { master_ratio: 0.5 },
            None,
            10,
            &HashMap::new(),
        );
        assert_eq!(result.geometries.len(), 2);
        assert!(no_overlaps(&result));
    }

    #[test]
    fn centered_master_splits_remaining_alternately() {
        let windows = vec![1, 2, 3, 4, 5];
        let area = Rect::new(0, 0, 1200, 800);
        let result = calculate(
            &windows,
            area,
            &Layout::CenteredMaster { master_ratio: 0.5 },
            None,
            10,
            &HashMap::new(),
        );
        assert_eq!(result.geometries.len(), 5);
        assert!(no_overlaps(&result));
        // master (1) sits strictly between the left and right stacks;
        // remaining windows [2,3,4,5] alternate right,left,right,left
        // (1-based index odd -> right), so 3 and 5 land left of master
        // and 2 and 4 land right of it.
        let master_rect = result.geometries[&1].rect;
        for w in [3u32, 5] {
            assert!(result.geometries[&w].rect.x < master_rect.x);
        }
        for w in [2u32, 4] {
            assert!(result.geometries[&w].rect.x > master_rect.x);
        }
    }

    #[test]
    fn floating_remembers_geometry_and_centers_new_windows() {
        let mut remembered = HashMap::new();
        remembered.insert(1, Rect::new(50, 50, 300, 200));
        let area = Rect::new(0, 0, 900, 600);
        let result = calculate(&[1, 2], area, &Layout::Floating, None, 0, &remembered);
        assert_eq!(result.geometries[&1].rect, Rect::new(50, 50, 300, 200));
        assert_eq!(result.geometries[&2].rect, Rect::new(150, 100, 600, 400));
    }

    #[test]
    fn tabbed_only_focused_visible_and_requests_decoration() {
        let windows = vec![1, 2];
        let area = Rect::new(0, 0, 800, 600);
        let result = calculate(&windows, area, &Layout::Tabbed { tab_height: 24 }, Some(2), 0, &HashMap::new());
        assert_eq!(result.decoration_request, Some(DecorationRequest { width: 800, height: 24 }));
        assert_eq!(result.geometries[&1].rect, Rect::new(0, 24, 800, 576));
        assert!(!result.geometries[&1].visible);
        assert!(result.geometries[&2].visible);
    }

    #[test]
    fn layout_cycle_determinism() {
        let sequence = default_layout_sequence(0.5, 24);
        assert_eq!(sequence.len(), 6);
        let mut index = 0usize;
        for _ in 0..7 {
            index = (index + 1) % sequence.len();
        }
        assert_eq!(index, 1);

        let mut index = 0usize;
        index = (index + sequence.len() - 1) % sequence.len();
        assert_eq!(index, 5);
    }
}
