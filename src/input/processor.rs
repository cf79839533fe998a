//! Converts raw platform events into gallery commands.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! drag detection, double-click timing) and the key-binding map. It is the
//! only thing that sits between raw window events and
//! [`Gallery::execute`](crate::gallery::Gallery::execute).

use super::event::{InputEvent, MouseButton};
use super::mouse::{ClickResult, InputState};
use crate::gallery::GalleryCommand;
use crate::options::KeybindingOptions;

/// Converts raw window events into [`GalleryCommand`]s.
///
/// # Usage
///
/// ```ignore
/// let hovered = gallery.pick(x, y);
/// if let Some(cmd) = processor.handle_event(event, hovered) {
///     gallery.execute(cmd);
/// }
/// ```
pub struct InputProcessor {
    /// Mouse tracking and double-click state machine.
    state: InputState,
    /// Whether the primary mouse button is currently held.
    mouse_pressed: bool,
    /// Key string → action mapping.
    key_bindings: KeybindingOptions,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_key_bindings(KeybindingOptions::default())
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeybindingOptions) -> Self {
        Self {
            state: InputState::new(),
            mouse_pressed: false,
            key_bindings,
        }
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn mouse_pos(&self) -> (f32, f32) {
        self.state.mouse_pos
    }

    /// Whether the primary mouse button is pressed.
    #[must_use]
    pub fn mouse_pressed(&self) -> bool {
        self.mouse_pressed
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<GalleryCommand> {
        self.key_bindings.lookup(key).map(GalleryCommand::from)
    }

    /// Process a raw input event and return zero or one commands.
    ///
    /// `hovered` is the portal window currently under the cursor.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        hovered: Option<usize>,
    ) -> Option<GalleryCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.state.handle_mouse_position(x, y, self.mouse_pressed);
                Some(GalleryCommand::Hover { portal: hovered })
            }
            InputEvent::CursorLeft => Some(GalleryCommand::Hover { portal: None }),
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed, hovered)
            }
        }
    }

    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
        hovered: Option<usize>,
    ) -> Option<GalleryCommand> {
        if button != MouseButton::Left {
            return None;
        }

        if pressed {
            self.state.handle_mouse_down(hovered);
            self.mouse_pressed = true;
            return None;
        }

        self.mouse_pressed = false;
        match self.state.process_mouse_up(hovered) {
            ClickResult::NoAction | ClickResult::Background => None,
            ClickResult::SingleClick { portal } => {
                Some(GalleryCommand::Click { portal })
            }
            ClickResult::DoubleClick { portal } => {
                Some(GalleryCommand::DoubleClick { portal })
            }
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(p: &mut InputProcessor, hovered: Option<usize>) -> Option<GalleryCommand> {
        let down = InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        };
        let up = InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        };
        assert_eq!(p.handle_event(down, hovered), None);
        p.handle_event(up, hovered)
    }

    #[test]
    fn double_click_produces_command() {
        let mut p = InputProcessor::new();
        assert_eq!(press(&mut p, Some(1)), Some(GalleryCommand::Click { portal: 1 }));
        assert_eq!(
            press(&mut p, Some(1)),
            Some(GalleryCommand::DoubleClick { portal: 1 })
        );
    }

    #[test]
    fn right_button_is_ignored() {
        let mut p = InputProcessor::new();
        let ev = InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: false,
        };
        assert_eq!(p.handle_event(ev, Some(0)), None);
    }

    #[test]
    fn cursor_motion_reports_hover() {
        let mut p = InputProcessor::new();
        let ev = InputEvent::CursorMoved { x: 3.0, y: 4.0 };
        assert_eq!(
            p.handle_event(ev, Some(2)),
            Some(GalleryCommand::Hover { portal: Some(2) })
        );
        assert_eq!(p.mouse_pos(), (3.0, 4.0));
    }

    #[test]
    fn escape_maps_to_back() {
        let p = InputProcessor::new();
        assert_eq!(p.handle_key_press("Escape"), Some(GalleryCommand::Back));
        assert_eq!(p.handle_key_press("KeyQ"), None);
    }
}
