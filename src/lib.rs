// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Interactive 3D portal gallery built on wgpu.
//!
//! Vitrine shows a row of framed portals, each holding a 3D model behind a
//! stencil-masked window. Double-clicking a portal routes to `/item/<id>`:
//! the camera flies in, the portal's backdrop blends over the screen, and
//! `/` brings the overview back.
//!
//! # Key entry points
//!
//! - [`gallery::Gallery`] - runtime state, one [`tick`](gallery::Gallery::tick)
//!   per frame
//! - [`gallery::GalleryConfig`] - the portals on display, loadable from TOML
//! - [`scene::description::SceneDescription`] - what a frame should look like
//! - [`renderer::GalleryRenderer`] - draws a description with wgpu
//! - [`options::Options`] - runtime configuration (display, camera, rig,
//!   frames, lighting, post-processing, key bindings)
//!
//! # Architecture
//!
//! Model files load on background threads behind a
//! [`assets::LoadingGate`]; the main thread polls it once per tick. The
//! [`navigation::Router`] holds the current route, which every frame and the
//! camera rig read once per tick. Nothing in the core needs a GPU; the
//! renderer consumes the description the core emits.

pub mod animation;
pub mod assets;
pub mod camera;
pub mod error;
pub mod gallery;
pub mod gpu;
pub mod input;
pub mod navigation;
pub mod options;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use error::VitrineError;
pub use gallery::{Gallery, GalleryCommand, GalleryConfig};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
