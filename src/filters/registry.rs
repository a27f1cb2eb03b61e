use std::collections::BTreeMap;

use crate::filters::ops::{FilterOp, parse_filter_expression};
use crate::filters::vignette::Vignette;
use crate::foundation::core::RgbaFrame;
use crate::foundation::error::{BoothError, BoothResult};

/// Name of the filter that needs a generated gradient mask.
pub const VIGNETTE: &str = "Vignette";

/// The selectable filters, in UI order: `(name, expression)`.
pub const BUILTIN_FILTERS: [(&str, &str); 9] = [
    ("None", "none"),
    ("Sepia", "sepia(1)"),
    ("Grayscale", "grayscale(1)"),
    ("Vintage", "contrast(0.8) saturate(0.8)"),
    ("Cool", "hue-rotate(180deg)"),
    ("Warm", "sepia(0.2) saturate(1.2)"),
    ("High Contrast", "contrast(1.5)"),
    ("Dream", "blur(1px) brightness(1.2)"),
    (VIGNETTE, "none"),
];

/// A named visual effect.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterDescriptor {
    /// Display name.
    pub name: String,
    /// Composable filter expression, e.g. `sepia(0.2) saturate(1.2)`.
    pub css_expression: String,
    /// `true` for the vignette, which is drawn as a gradient rather than a filter function.
    pub is_special_overlay: bool,
    ops: Vec<FilterOp>,
}

impl FilterDescriptor {
    /// Build a descriptor, parsing its expression.
    pub fn new(
        name: impl Into<String>,
        css_expression: impl Into<String>,
        is_special_overlay: bool,
    ) -> BoothResult<Self> {
        let css_expression = css_expression.into();
        let ops = parse_filter_expression(&css_expression)?;
        Ok(Self {
            name: name.into(),
            css_expression,
            is_special_overlay,
            ops,
        })
    }

    /// Parsed filter functions, applied left to right.
    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    /// Apply the filter functions (not the overlay) to a frame.
    pub fn apply_expression(&self, frame: &mut RgbaFrame) -> BoothResult<()> {
        for op in &self.ops {
            op.apply(frame)?;
        }
        Ok(())
    }

    /// Bake the full effect into a still: filter functions, then the capture vignette if this
    /// is the overlay filter.
    pub fn bake(&self, frame: &mut RgbaFrame) -> BoothResult<()> {
        self.apply_expression(frame)?;
        if self.is_special_overlay {
            Vignette::capture().apply(frame);
        }
        Ok(())
    }
}

/// Immutable lookup table from filter name to descriptor.
#[derive(Clone, Debug)]
pub struct FilterRegistry {
    order: Vec<String>,
    by_name: BTreeMap<String, FilterDescriptor>,
}

impl FilterRegistry {
    /// The built-in set of nine filters.
    pub fn builtin() -> BoothResult<Self> {
        let mut order = Vec::with_capacity(BUILTIN_FILTERS.len());
        let mut by_name = BTreeMap::new();
        for (name, expr) in BUILTIN_FILTERS {
            let desc = FilterDescriptor::new(name, expr, name == VIGNETTE)?;
            order.push(name.to_string());
            by_name.insert(name.to_string(), desc);
        }
        Ok(Self { order, by_name })
    }

    /// Look a filter up by its exact display name.
    pub fn resolve(&self, name: &str) -> BoothResult<&FilterDescriptor> {
        self.by_name
            .get(name)
            .ok_or_else(|| BoothError::UnknownFilter(name.to_string()))
    }

    /// Descriptors in UI order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.order.iter().filter_map(|n| self.by_name.get(n))
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Return `true` when no filters are registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/registry.rs"]
mod tests;
