//! Focus-fixing policy (spec.md §4.5 "an unmapped focused window
//! transfers focus to the next mapped sibling (wrapping), or to nothing
//! if empty"; testable property 8, scenario D).

use super::model::Workspace;

/// Picks the next focus target after the window at `removed_index` left
/// the workspace (closed, unmapped, or moved out). `mapped_indices` must
/// be the workspace's *current* mapped window indices, i.e. after the
/// removal already happened to `windows`.
pub fn next_focus_after_removal(mapped_indices: &[usize], removed_index: usize) -> Option<usize> {
    if mapped_indices.is_empty() {
        return None;
    }
    // Prefer the sibling that was at, or immediately after, the removed
    // position; wrap to the first mapped window if the removed one was
    // last.
    mapped_indices
        .iter()
        .copied()
        .find(|&i| i >= removed_index)
        .or_else(|| mapped_indices.first().copied())
}

/// Recomputes `focused_window_index` for a workspace after its window
/// list changed underneath it (close, unmap, move-out). `hint` is the
/// index the removed/unmapped window used to occupy.
pub fn fix_focus(workspace: &mut Workspace, hint: usize) {
    if workspace.focus_is_consistent() {
        return;
    }
    let mapped = workspace.mapped_indices();
    workspace.focused_window_index = next_focus_after_removal(&mapped, hint);
}

/// Rotates focus within a workspace's mapped window list by `delta`
/// (spec.md §4.5 `focus_next`/`focus_prev`).
pub fn rotate_focus(workspace: &mut Workspace, delta: i32) {
    let mapped = workspace.mapped_indices();
    if mapped.is_empty() {
        workspace.focused_window_index = None;
        return;
    }
    let current_pos = workspace
        .focused_window_index
        .and_then(|i| mapped.iter().position(|&m| m == i))
        .unwrap_or(0);
    let len = mapped.len() as i32;
    let next_pos = (((current_pos as i32 + delta) % len + len) % len) as usize;
    workspace.focused_window_index = Some(mapped[next_pos]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::model::Window;

    fn workspace_with(mapped_flags: &[bool]) -> Workspace {
        let mut ws = Workspace::default();
        for (i, &mapped) in mapped_flags.iter().enumerate() {
            let mut w = Window::new(100 + i as u32);
            w.mapped = mapped;
            ws.windows.push(w);
        }
        ws
    }

    #[test]
    fn scenario_d_focus_fix_after_close() {
        // [A, B, C], focus = B (index 1).
        let mut ws = workspace_with(&[true, true, true]);
        ws.focused_window_index = Some(1);

        // Close B: list -> [A, C], focus should land on C (next sibling).
        ws.windows.remove(1);
        fix_focus(&mut ws, 1);
        assert_eq!(ws.windows[ws.focused_window_index.unwrap()].object_id, 102);

        // Close C (now index 1): list -> [A], focus -> A.
        let closed_index = ws.focused_window_index.unwrap();
        ws.windows.remove(closed_index);
        fix_focus(&mut ws, closed_index);
        assert_eq!(ws.windows[ws.focused_window_index.unwrap()].object_id, 100);

        // Close A: list empty, focus -> None.
        let closed_index = ws.focused_window_index.unwrap();
        ws.windows.remove(closed_index);
        fix_focus(&mut ws, closed_index);
        assert_eq!(ws.focused_window_index, None);
    }

    #[test]
    fn rotate_focus_wraps_around() {
        let mut ws = workspace_with(&[true, true, true]);
        ws.focused_window_index = Some(2);
        rotate_focus(&mut ws, 1);
        assert_eq!(ws.focused_window_index, Some(0));
        rotate_focus(&mut ws, -1);
        assert_eq!(ws.focused_window_index, Some(2));
    }

    #[test]
    fn rotate_focus_skips_unmapped_windows() {
        let mut ws = workspace_with(&[true, false, true]);
        ws.focused_window_index = Some(0);
        rotate_focus(&mut ws, 1);
        assert_eq!(ws.focused_window_index, Some(2));
    }
}
