//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, growable buffers, the
//! depth-stencil target and shared pipeline-state helpers.

/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// Shared wgpu boilerplate for bind group layouts and depth/stencil state.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Depth-stencil render target.
pub mod texture;
