//! Shared utilities: damping curves, frame timing, and hex colors.

/// Hex-string RGBA colors.
pub mod color;
/// Exponential damping used by every animated value.
pub mod easing;
/// Frame delta and smoothed FPS tracking.
pub mod frame_timing;
