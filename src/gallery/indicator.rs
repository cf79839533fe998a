//! Loading indicator state.

/// View state of the loading indicator.
///
/// Mirrors the loading gate: visible while any model is still loading, and
/// hidden for good once the gate closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadingIndicator {
    visible: bool,
    settled: usize,
    total: usize,
}

impl LoadingIndicator {
    /// Indicator for a gate with `total` registered loads.
    #[must_use]
    pub fn new(visible: bool, total: usize) -> Self {
        Self {
            visible,
            settled: 0,
            total,
        }
    }

    /// Sync with the gate.
    pub fn update(&mut self, loading: bool, settled: usize) {
        if self.visible && !loading {
            log::debug!("hiding loading indicator");
        }
        self.visible = loading;
        self.settled = settled.min(self.total);
    }

    /// Whether the indicator is shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Fraction of settled loads, `1.0` when nothing is registered.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.settled as f32 / self.total as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_gate() {
        let mut indicator = LoadingIndicator::new(true, 4);
        indicator.update(true, 1);
        assert!(indicator.is_visible());
        assert_eq!(indicator.progress(), 0.25);
        indicator.update(false, 4);
        assert!(!indicator.is_visible());
        assert_eq!(indicator.progress(), 1.0);
    }

    #[test]
    fn empty_gate_is_complete() {
        let indicator = LoadingIndicator::new(false, 0);
        assert!(!indicator.is_visible());
        assert_eq!(indicator.progress(), 1.0);
    }
}
