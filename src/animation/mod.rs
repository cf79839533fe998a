//! Playback clocks for the animation clips bundled with loaded models.

mod mixer;

pub use mixer::{AnimationMixer, ClipAction};
