use serde::{Deserialize, Serialize};

/// Gallery-level actions that can be bound to keys.
///
/// Serialized by variant name so TOML presets read naturally:
/// ```toml
/// [keybindings.bindings]
/// Back = "Escape"
/// NextPortal = "ArrowRight"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAction {
    /// Leave the focused portal and return to the overview.
    Back,
    /// Focus the portal after the current one (wraps around).
    NextPortal,
    /// Focus the portal before the current one (wraps around).
    PreviousPortal,
}
