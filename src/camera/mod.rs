//! Camera system for the gallery.
//!
//! The [`rig::CameraRig`] decides where the camera *should* be for the active
//! route; the [`controller::CameraController`] owns where it *is* and damps
//! toward the rig's pose every frame.

/// Damped look-at controller with polar-angle limits and picking rays.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;
/// Route-driven target poses.
pub mod rig;

pub use controller::CameraController;
pub use rig::{CameraPose, CameraRig};
