use crate::input::KeyAction;

/// Everything the gallery can be asked to do from outside.
///
/// Produced by [`InputProcessor`](crate::input::InputProcessor) from raw
/// window events, or built directly by an embedding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryCommand {
    /// The pointer moved; `portal` is the window now under it.
    Hover {
        /// Portal index, `None` over empty space.
        portal: Option<usize>,
    },
    /// Single click on a portal window.
    Click {
        /// Portal index.
        portal: usize,
    },
    /// Double click on a portal window.
    DoubleClick {
        /// Portal index.
        portal: usize,
    },
    /// Return to the overview.
    Back,
    /// Focus the next portal, wrapping around.
    NextPortal,
    /// Focus the previous portal, wrapping around.
    PreviousPortal,
    /// Go to an arbitrary path.
    Navigate {
        /// Route path, e.g. `/item/02`.
        path: String,
    },
}

impl From<KeyAction> for GalleryCommand {
    fn from(action: KeyAction) -> Self {
        match action {
            KeyAction::Back => Self::Back,
            KeyAction::NextPortal => Self::NextPortal,
            KeyAction::PreviousPortal => Self::PreviousPortal,
        }
    }
}
