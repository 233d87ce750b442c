//! Key and Pointer Bindings (spec.md §4.6).

use std::collections::HashMap;

use bitflags::bitflags;
use xkbcommon::xkb;

bitflags! {
    /// Modifier bitflags in the fixed 1–256 range spec.md §4.6 names.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u32 {
        const SHIFT = 1 << 0;
        const CAPS  = 1 << 1;
        const CTRL  = 1 << 2;
        const ALT   = 1 << 3; // Mod1
        const MOD2  = 1 << 4;
        const MOD3  = 1 << 5;
        const SUPER = 1 << 6; // Mod4
        const MOD5  = 1 << 7;
    }
}

/// The default-modifier options spec.md §6's CLI table exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultModifier {
    Shift,
    Ctrl,
    Alt,
    Super,
}

impl DefaultModifier {
    pub fn as_modifiers(self) -> Modifiers {
        match self {
            DefaultModifier::Shift => Modifiers::SHIFT,
            DefaultModifier::Ctrl => Modifiers::CTRL,
            DefaultModifier::Alt => Modifiers::ALT,
            DefaultModifier::Super => Modifiers::SUPER,
        }
    }
}

/// Action tags spec.md §6 enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SpawnTerminal,
    SpawnLauncher,
    CloseWindow,
    Quit,
    FocusNext,
    FocusPrev,
    SwapNext,
    SwapPrev,
    PromoteMaster,
    CycleLayoutNext,
    CycleLayoutPrev,
    ToggleFullscreen,
    SwitchWorkspace(u8),
    MoveWindowToWorkspace(u8),
}

/// (modifier mask, keysym) → action; spec.md §4.6: "at most one binding
/// for a given pair; re-registration replaces."
#[derive(Debug, Default)]
pub struct KeyBindings {
    bindings: HashMap<(Modifiers, u32), Action>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, mods: Modifiers, keysym: u32, action: Action) {
        self.bindings.insert((mods, keysym), action);
    }

    pub fn lookup(&self, mods: Modifiers, keysym: u32) -> Option<Action> {
        self.bindings.get(&(mods, keysym)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(Modifiers, u32), &Action)> {
        self.bindings.iter()
    }

    /// Populates the default binding set for `modifier`, matching the
    /// union-of-capabilities resolution in spec.md §9: both Alt and Super
    /// are supported as the configured modifier, workspace bindings exist
    /// for 1..9, and both move and focus/swap actions are present.
    pub fn with_defaults(modifier: DefaultModifier) -> Self {
        let mut bindings = Self::new();
        let m = modifier.as_modifiers();

        bindings.bind(m, keysym_for("Return"), Action::SpawnTerminal);
        bindings.bind(m, keysym_for("d"), Action::SpawnLauncher);
        bindings.bind(m | Modifiers::SHIFT, keysym_for("q"), Action::CloseWindow);
        bindings.bind(m | Modifiers::SHIFT, keysym_for("e"), Action::Quit);
        bindings.bind(m, keysym_for("j"), Action::FocusNext);
        bindings.bind(m, keysym_for("k"), Action::FocusPrev);
        bindings.bind(m | Modifiers::SHIFT, keysym_for("j"), Action::SwapNext);
        bindings.bind(m | Modifiers::SHIFT, keysym_for("k"), Action::SwapPrev);
        bindings.bind(m | Modifiers::SHIFT, keysym_for("Return"), Action::PromoteMaster);
        bindings.bind(m, keysym_for("space"), Action::CycleLayoutNext);
        bindings.bind(m | Modifiers::SHIFT, keysym_for("space"), Action::CycleLayoutPrev);
        bindings.bind(m, keysym_for("f"), Action::ToggleFullscreen);

        for n in 1..=9u8 {
            let digit_sym = keysym_for(&n.to_string());
            bindings.bind(m, digit_sym, Action::SwitchWorkspace(n));
            bindings.bind(m | Modifiers::SHIFT, digit_sym, Action::MoveWindowToWorkspace(n));
        }

        bindings
    }
}

/// Resolves a symbolic key name (as used in the default bindings above) to
/// its xkb keysym via `xkbcommon`.
pub fn keysym_for(name: &str) -> u32 {
    xkb::keysym_from_name(name, xkb::KEYSYM_NO_FLAGS)
}

/// A pointer gesture in progress on a floating window (spec.md §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerGesture {
    Move,
    Resize,
}

/// Decides which gesture, if any, `Super+<button>` starts.
pub fn gesture_for_button(mods: Modifiers, modifier: Modifiers, button_code: u32) -> Option<PointerGesture> {
    const BTN_LEFT: u32 = 0x110;
    const BTN_RIGHT: u32 = 0x111;
    if !mods.contains(modifier) {
        return None;
    }
    match button_code {
        BTN_LEFT => Some(PointerGesture::Move),
        BTN_RIGHT => Some(PointerGesture::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebinding_the_same_pair_replaces() {
        let mut bindings = KeyBindings::new();
        bindings.bind(Modifiers::SUPER, 1, Action::Quit);
        bindings.bind(Modifiers::SUPER, 1, Action::CloseWindow);
        assert_eq!(bindings.lookup(Modifiers::SUPER, 1), Some(Action::CloseWindow));
    }

    #[test]
    fn lookup_misses_return_none() {
        let bindings = KeyBindings::new();
        assert_eq!(bindings.lookup(Modifiers::SUPER, 99), None);
    }

    #[test]
    fn defaults_has_no_silently_overwritten_binding() {
        // Rebuilds each binding in isolation and checks it still resolves
        // to the action it was registered with — a later `bind()` call
        // for the same (mods, keysym) pair would otherwise silently win.
        let bindings = KeyBindings::with_defaults(DefaultModifier::Super);
        let m = Modifiers::SUPER;
        assert_eq!(bindings.lookup(m, keysym_for("Return")), Some(Action::SpawnTerminal));
        assert_eq!(
            bindings.lookup(m | Modifiers::SHIFT, keysym_for("Return")),
            Some(Action::PromoteMaster)
        );
        assert_eq!(bindings.lookup(m, keysym_for("space")), Some(Action::CycleLayoutNext));
        assert_eq!(
            bindings.lookup(m | Modifiers::SHIFT, keysym_for("space")),
            Some(Action::CycleLayoutPrev)
        );
    }

    #[test]
    fn defaults_cover_all_nine_workspaces() {
        let bindings = KeyBindings::with_defaults(DefaultModifier::Super);
        for n in 1..=9u8 {
            let sym = keysym_for(&n.to_string());
            assert_eq!(bindings.lookup(Modifiers::SUPER, sym), Some(Action::SwitchWorkspace(n)));
            assert_eq!(
                bindings.lookup(Modifiers::SUPER | Modifiers::SHIFT, sym),
                Some(Action::MoveWindowToWorkspace(n))
            );
        }
    }

    #[test]
    fn move_gesture_requires_configured_modifier() {
        let gesture = gesture_for_button(Modifiers::SUPER, Modifiers::SUPER, 0x110);
        assert_eq!(gesture, Some(PointerGesture::Move));
        assert_eq!(gesture_for_button(Modifiers::CTRL, Modifiers::SUPER, 0x110), None);
    }

    #[test]
    fn right_button_starts_resize() {
        let gesture = gesture_for_button(Modifiers::ALT, Modifiers::ALT, 0x111);
        assert_eq!(gesture, Some(PointerGesture::Resize));
    }
}
