//! Shared types: colors, rasters, errors, configuration.

/// Booth configuration.
pub mod config;
/// Colors, geometry and RGBA rasters.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
