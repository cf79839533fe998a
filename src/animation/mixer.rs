//! Per-model animation mixer.
//!
//! A mixer owns one looping action per clip of the attached model. Every clip
//! starts playing as soon as the model attaches and keeps looping for the
//! lifetime of the portal. Sampling the clip channels is left to the render
//! collaborator; the mixer only keeps the clocks.

use crate::assets::AnimationClip;

/// Playback state of one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipAction {
    /// Clip name.
    pub name: String,
    /// Clip length in seconds.
    pub duration: f32,
    /// Current playback position in `[0, duration)`.
    pub time: f32,
    /// Whether the clip is advancing.
    pub playing: bool,
}

impl ClipAction {
    fn advance(&mut self, dt: f32) {
        if !self.playing || self.duration <= 0.0 {
            return;
        }
        self.time = (self.time + dt).rem_euclid(self.duration);
    }

    /// Playback position as a fraction of the clip length.
    #[must_use]
    pub fn phase(&self) -> f32 {
        if self.duration > 0.0 {
            self.time / self.duration
        } else {
            0.0
        }
    }
}

/// Advances every clip of one model.
#[derive(Debug, Clone, Default)]
pub struct AnimationMixer {
    actions: Vec<ClipAction>,
}

impl AnimationMixer {
    /// Mixer with no clips.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start every clip from the beginning, replacing any previous actions.
    pub fn play_all(&mut self, clips: &[AnimationClip]) {
        self.actions = clips
            .iter()
            .map(|clip| {
                log::debug!("playing clip {:?} ({:.2}s)", clip.name, clip.duration);
                ClipAction {
                    name: clip.name.clone(),
                    duration: clip.duration,
                    time: 0.0,
                    playing: true,
                }
            })
            .collect();
    }

    /// Advance all playing clips by `dt` seconds, looping at the end.
    pub fn update(&mut self, dt: f32) {
        for action in &mut self.actions {
            action.advance(dt);
        }
    }

    /// Current actions, in clip order.
    #[must_use]
    pub fn actions(&self) -> &[ClipAction] {
        &self.actions
    }

    /// Whether any clip is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(name: &str, duration: f32) -> AnimationClip {
        AnimationClip {
            name: name.to_owned(),
            duration,
        }
    }

    #[test]
    fn play_all_starts_every_clip() {
        let mut mixer = AnimationMixer::new();
        mixer.play_all(&[clip("idle", 2.0), clip("wave", 1.0)]);
        assert_eq!(mixer.actions().len(), 2);
        assert!(mixer.actions().iter().all(|a| a.playing && a.time == 0.0));
    }

    #[test]
    fn update_wraps_around() {
        let mut mixer = AnimationMixer::new();
        mixer.play_all(&[clip("loop", 1.0)]);
        mixer.update(0.75);
        mixer.update(0.5);
        let t = mixer.actions()[0].time;
        assert!((t - 0.25).abs() < 1e-5, "time was {t}");
    }

    #[test]
    fn zero_length_clip_stays_put() {
        let mut mixer = AnimationMixer::new();
        mixer.play_all(&[clip("pose", 0.0)]);
        mixer.update(1.0);
        assert_eq!(mixer.actions()[0].time, 0.0);
        assert_eq!(mixer.actions()[0].phase(), 0.0);
    }

    #[test]
    fn empty_mixer_updates_quietly() {
        let mut mixer = AnimationMixer::new();
        mixer.update(0.016);
        assert!(mixer.is_empty());
    }
}
