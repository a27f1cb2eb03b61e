//! Encoded images and title fonts.

/// PNG encode/decode and data URLs.
pub mod decode;
/// Title font loading and text layout.
pub mod fonts;
