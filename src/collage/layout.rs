use crate::foundation::config::SHOT_COUNTS;
use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8, RoundedRect};
use crate::foundation::error::{BoothError, BoothResult};

/// Largest collage side the rasterizer accepts.
pub const MAX_SIDE: u32 = u16::MAX as u32;

const MAX_SHOTS: u8 = SHOT_COUNTS[SHOT_COUNTS.len() - 1];

/// Collage card geometry and colors.
///
/// Photos are stacked vertically below a title band; the card sits inside a transparent margin
/// that leaves room for its drop shadow.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollageLayout {
    /// Card width.
    pub card_width: u32,
    /// Padding below the last photo.
    pub card_padding: u32,
    /// Photo slot width.
    pub photo_width: u32,
    /// Photo slot height.
    pub photo_height: u32,
    /// Vertical gap between slots.
    pub photo_spacing: u32,
    /// Height of the title band above the first slot.
    pub title_height: u32,
    /// Reserved space under the padding.
    pub footer_height: u32,
    /// Transparent margin around the card on every side.
    pub shadow_margin: u32,
    /// Card corner radius.
    pub card_radius: f64,
    /// Slot corner radius.
    pub photo_radius: f64,
    /// Card fill.
    pub card_fill: Rgba8,
    /// Shadow color.
    pub shadow_color: Rgba8,
    /// Shadow blur radius in pixels.
    pub shadow_blur: f32,
    /// Fill behind each photo.
    pub slot_fill: Rgba8,
    /// Title text color.
    pub title_color: Rgba8,
    /// Title font size in pixels.
    pub title_size: f32,
    /// Extra downward shift of the title center.
    pub title_offset: f64,
}

impl Default for CollageLayout {
    fn default() -> Self {
        Self {
            card_width: 320,
            card_padding: 24,
            photo_width: 272,
            photo_height: 180,
            photo_spacing: 16,
            title_height: 100,
            footer_height: 0,
            shadow_margin: 20,
            card_radius: 16.0,
            photo_radius: 12.0,
            card_fill: Rgba8::WHITE,
            shadow_color: Rgba8::opaque(0x12, 0x12, 0x12),
            shadow_blur: 5.0,
            slot_fill: Rgba8::opaque(0xf3, 0xf4, 0xf6),
            title_color: Rgba8::opaque(0x7e, 0x22, 0xce),
            title_size: 26.0,
            title_offset: 5.0,
        }
    }
}

impl CollageLayout {
    /// Check that the geometry is drawable.
    pub fn validate(&self) -> BoothResult<()> {
        if self.card_width == 0 || self.photo_width == 0 || self.photo_height == 0 {
            return Err(BoothError::validation(
                "collage card and photo sizes must be non-zero",
            ));
        }
        if self.photo_width > self.card_width {
            return Err(BoothError::validation(
                "collage photo_width must not exceed card_width",
            ));
        }
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        if !non_negative(self.card_radius)
            || !non_negative(self.photo_radius)
            || !non_negative(self.title_offset)
            || !non_negative(f64::from(self.shadow_blur))
        {
            return Err(BoothError::validation(
                "collage radii, offsets and blur must be finite and >= 0",
            ));
        }
        if !self.title_size.is_finite() || self.title_size <= 0.0 {
            return Err(BoothError::validation("collage title_size must be > 0"));
        }
        let largest = self.canvas(usize::from(MAX_SHOTS));
        if largest.width > MAX_SIDE || largest.height > MAX_SIDE {
            return Err(BoothError::validation(format!(
                "collage of {MAX_SHOTS} shots would be {}x{}, larger than {MAX_SIDE}px",
                largest.width, largest.height
            )));
        }
        Ok(())
    }

    /// Card height for `shots` photos.
    ///
    /// Spacing is counted between photos only, so an empty collage has no negative gap.
    pub fn card_height(&self, shots: usize) -> u32 {
        let n = u32::try_from(shots).unwrap_or(u32::MAX);
        self.title_height
            .saturating_add(n.saturating_mul(self.photo_height))
            .saturating_add(n.saturating_sub(1).saturating_mul(self.photo_spacing))
            .saturating_add(self.card_padding)
            .saturating_add(self.footer_height)
    }

    /// Full output size: card plus shadow margin on both sides of each axis.
    pub fn canvas(&self, shots: usize) -> Canvas {
        let margins = self.shadow_margin.saturating_mul(2);
        Canvas {
            width: self.card_width.saturating_add(margins),
            height: self.card_height(shots).saturating_add(margins),
        }
    }

    /// Rounded card outline.
    pub fn card_rect(&self, shots: usize) -> RoundedRect {
        let m = f64::from(self.shadow_margin);
        Rect::new(
            m,
            m,
            m + f64::from(self.card_width),
            m + f64::from(self.card_height(shots)),
        )
        .to_rounded_rect(self.card_radius)
    }

    /// Slot rectangle of the photo at `index`, in capture order from the top.
    pub fn slot_rect(&self, index: usize) -> Rect {
        let x = f64::from(self.shadow_margin)
            + f64::from(self.card_width.saturating_sub(self.photo_width)) / 2.0;
        let step = f64::from(self.photo_height) + f64::from(self.photo_spacing);
        let y = f64::from(self.shadow_margin) + f64::from(self.title_height) + index as f64 * step;
        Rect::new(
            x,
            y,
            x + f64::from(self.photo_width),
            y + f64::from(self.photo_height),
        )
    }

    /// Rounded slot outline used as the photo clip.
    pub fn slot_clip(&self, index: usize) -> RoundedRect {
        self.slot_rect(index).to_rounded_rect(self.photo_radius)
    }

    /// Center point of the title text.
    pub fn title_center(&self, shots: usize) -> Point {
        let canvas = self.canvas(shots);
        Point::new(
            f64::from(canvas.width) / 2.0,
            f64::from(self.shadow_margin) + f64::from(self.title_height) / 2.0 + self.title_offset,
        )
    }
}

/// Transform drawing an `img_w x img_h` image so it covers `slot`, centered, keeping its aspect
/// ratio. Overflow is left for the slot clip to cut.
pub fn cover_transform(img_w: u32, img_h: u32, slot: Rect) -> Affine {
    let (iw, ih) = (f64::from(img_w.max(1)), f64::from(img_h.max(1)));
    let scale = (slot.width() / iw).max(slot.height() / ih);
    let draw_w = iw * scale;
    let draw_h = ih * scale;
    let x = slot.x0 + (slot.width() - draw_w) / 2.0;
    let y = slot.y0 + (slot.height() - draw_h) / 2.0;
    Affine::translate((x, y)) * Affine::scale(scale)
}

#[cfg(test)]
#[path = "../../tests/unit/collage/layout.rs"]
mod tests;
