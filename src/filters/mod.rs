//! Named visual filters and the pixel operations behind them.

pub(crate) mod blur;
/// Filter expression parsing and per-pixel operations.
pub mod ops;
/// The fixed filter table.
pub mod registry;
/// Radial darkening for the vignette filter.
pub mod vignette;
