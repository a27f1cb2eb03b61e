//! Collage card layout and rendering.

/// CPU renderer.
pub mod compose;
/// Card geometry.
pub mod layout;
