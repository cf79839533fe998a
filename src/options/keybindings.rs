use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::input::KeyAction;

/// Key bindings, stored as action → key code name (winit `KeyCode` debug
/// names such as `"Escape"` or `"ArrowLeft"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeybindingOptions {
    /// Key code name bound to each action.
    pub bindings: FxHashMap<KeyAction, String>,
    /// Inverse of `bindings`; rebuilt after deserializing.
    #[serde(skip)]
    by_key: FxHashMap<String, KeyAction>,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let bindings = [
            (KeyAction::Back, "Escape"),
            (KeyAction::NextPortal, "ArrowRight"),
            (KeyAction::PreviousPortal, "ArrowLeft"),
        ]
        .into_iter()
        .map(|(action, key)| (action, key.to_owned()))
        .collect();
        let mut options = Self {
            bindings,
            by_key: FxHashMap::default(),
        };
        options.rebuild_reverse_map();
        options
    }
}

impl KeybindingOptions {
    /// Recompute the key → action index from `bindings`.
    pub fn rebuild_reverse_map(&mut self) {
        self.by_key = self
            .bindings
            .iter()
            .map(|(action, key)| (key.clone(), *action))
            .collect();
    }

    /// Action bound to a key code name, if any.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.by_key.get(key).copied()
    }
}
