//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Shift is also
//! the pan key, so its own press and release resolve to pan start/end.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Mode ──
    ModeSlats,
    ModeCargo,
    ToggleOrientation,

    // ── View ──
    CycleGridStyle,
    PanStart,
    PanEnd,

    // ── Edit ──
    AddLayer,
    DeleteSelected,
    Deselect,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key press. `key` is the `KeyboardEvent.key` value.
    ///
    /// Letter shortcuts only fire without ctrl/meta so browser and OS
    /// bindings keep working.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        _shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        if key == "Shift" {
            return Some(ShortcutAction::PanStart);
        }
        if ctrl || meta {
            return None;
        }

        match key {
            "s" | "S" => Some(ShortcutAction::ModeSlats),
            "c" | "C" => Some(ShortcutAction::ModeCargo),
            "r" | "R" => Some(ShortcutAction::ToggleOrientation),
            "g" | "G" => Some(ShortcutAction::CycleGridStyle),
            "n" | "N" => Some(ShortcutAction::AddLayer),
            "Delete" | "Backspace" => Some(ShortcutAction::DeleteSelected),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }

    /// Resolve a key release. Only Shift has a release binding.
    pub fn resolve_release(key: &str) -> Option<ShortcutAction> {
        match key {
            "Shift" => Some(ShortcutAction::PanEnd),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_mode_keys() {
        assert_eq!(
            ShortcutMap::resolve("s", false, false, false, false),
            Some(ShortcutAction::ModeSlats)
        );
        assert_eq!(
            ShortcutMap::resolve("C", false, true, false, false),
            Some(ShortcutAction::ModeCargo)
        );
        assert_eq!(
            ShortcutMap::resolve("r", false, false, false, false),
            Some(ShortcutAction::ToggleOrientation)
        );
    }

    #[test]
    fn resolve_view_and_edit() {
        assert_eq!(
            ShortcutMap::resolve("g", false, false, false, false),
            Some(ShortcutAction::CycleGridStyle)
        );
        assert_eq!(
            ShortcutMap::resolve("n", false, false, false, false),
            Some(ShortcutAction::AddLayer)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, false, false, false),
            Some(ShortcutAction::DeleteSelected)
        );
        assert_eq!(
            ShortcutMap::resolve("Escape", false, false, false, false),
            Some(ShortcutAction::Deselect)
        );
    }

    #[test]
    fn command_combos_are_left_to_the_browser() {
        assert_eq!(ShortcutMap::resolve("s", true, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("c", false, false, false, true), None);
    }

    #[test]
    fn shift_toggles_pan() {
        assert_eq!(
            ShortcutMap::resolve("Shift", false, true, false, false),
            Some(ShortcutAction::PanStart)
        );
        assert_eq!(
            ShortcutMap::resolve_release("Shift"),
            Some(ShortcutAction::PanEnd)
        );
        assert_eq!(ShortcutMap::resolve_release("s"), None);
    }

    #[test]
    fn resolve_unknown_key() {
        assert_eq!(ShortcutMap::resolve("q", false, false, false, false), None);
    }
}
