//! CPU collage renderer.
//!
//! Draw order: blurred card shadow, card, photo slots top to bottom (fill, then the photo
//! cover-fitted and clipped to the rounded slot), then the date title.

use std::sync::Arc;

use chrono::NaiveDate;
use kurbo::Shape as _;
use rayon::prelude::*;

use crate::assets::decode::{ImageFrame, encode_png};
use crate::assets::fonts::{TextBrushRgba8, TextLayoutEngine, TitleFont};
use crate::collage::layout::{CollageLayout, cover_transform};
use crate::filters::blur::blur_rgba8_premul;
use crate::foundation::core::{Affine, BezPath, Canvas, Rgba8, RgbaFrame, RoundedRect};
use crate::foundation::error::{BoothError, BoothResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// A rendered collage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collage {
    /// Encoded PNG.
    pub image: ImageFrame,
    /// Title drawn in the header band.
    pub title: String,
}

/// Format a date the way the collage header shows it, e.g. `06-Jul-2025`.
pub fn format_title_date(date: NaiveDate) -> String {
    date.format("%d-%b-%Y").to_string()
}

/// Renders frames into a titled collage card.
pub struct CollageComposer {
    layout: CollageLayout,
    title_face: Option<TitleFace>,
    text: TextLayoutEngine,
}

/// A title font registered for layout, with the glyph source sharing its bytes.
struct TitleFace {
    origin: String,
    family: String,
    data: vello_cpu::peniko::FontData,
}

impl CollageComposer {
    /// Create a composer. `font` of `None` leaves the title band empty.
    pub fn new(layout: CollageLayout, font: Option<TitleFont>) -> BoothResult<Self> {
        layout.validate()?;
        let mut composer = Self {
            layout,
            title_face: None,
            text: TextLayoutEngine::new(),
        };
        composer.set_font(font);
        Ok(composer)
    }

    /// Card geometry in use.
    pub fn layout(&self) -> &CollageLayout {
        &self.layout
    }

    /// Replace the title font. A face that cannot be registered leaves the title blank.
    pub fn set_font(&mut self, font: Option<TitleFont>) {
        self.title_face = font.and_then(|font| match self.text.register_font(&font) {
            Ok(family) => Some(TitleFace {
                data: vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::new(font.bytes.clone()),
                    0,
                ),
                origin: font.origin,
                family,
            }),
            Err(err) => {
                tracing::warn!(%err, origin = %font.origin, "title font rejected");
                None
            }
        });
    }

    /// `true` when a title font is loaded.
    pub fn has_title_font(&self) -> bool {
        self.title_face.is_some()
    }

    /// Compose `frames` in order under a title for `date`.
    ///
    /// Frames that fail to decode are logged and leave their slot showing only its fill.
    #[tracing::instrument(skip(self, frames), fields(frames = frames.len()))]
    pub fn compose(&mut self, frames: &[ImageFrame], date: NaiveDate) -> BoothResult<Collage> {
        let decoded = decode_all(frames);
        let title = format_title_date(date);
        let raster = self
            .render(&decoded, &title)
            .map_err(|e| match e {
                BoothError::Composition(_) => e,
                other => BoothError::composition(other.to_string()),
            })?;
        let image = encode_png(&raster).map_err(|e| BoothError::composition(e.to_string()))?;
        tracing::debug!(width = image.width, height = image.height, "collage composed");
        Ok(Collage { image, title })
    }

    fn render(&mut self, decoded: &[Option<RgbaFrame>], title: &str) -> BoothResult<RgbaFrame> {
        let shots = decoded.len();
        let canvas = self.layout.canvas(shots);
        let (w, h) = pixmap_dims(canvas)?;
        let card = rounded_path(self.layout.card_rect(shots));

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let shadow = self.shadow_pixmap(&card, w, h)?;
        ctx.set_paint(image_paint(shadow));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));

        ctx.set_paint(solid(self.layout.card_fill));
        ctx.fill_path(&card);

        for (index, frame) in decoded.iter().enumerate() {
            let clip = rounded_path(self.layout.slot_clip(index));
            ctx.push_clip_layer(&clip);
            ctx.set_paint(solid(self.layout.slot_fill));
            ctx.fill_path(&clip);
            if let Some(frame) = frame {
                let pixmap = pixmap_from_straight(frame)?;
                let tr = cover_transform(frame.width, frame.height, self.layout.slot_rect(index));
                ctx.set_transform(affine_to_cpu(tr));
                ctx.set_paint(image_paint(pixmap));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(frame.width),
                    f64::from(frame.height),
                ));
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            }
            ctx.pop_layer();
        }

        self.draw_title(&mut ctx, title, shots);

        ctx.flush();
        let mut out = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut out);
        let mut data = out.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        RgbaFrame::new(canvas.width, canvas.height, data)
    }

    fn shadow_pixmap(
        &self,
        card: &vello_cpu::kurbo::BezPath,
        w: u16,
        h: u16,
    ) -> BoothResult<vello_cpu::Pixmap> {
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_paint(solid(self.layout.shadow_color));
        ctx.fill_path(card);
        ctx.flush();
        let mut pm = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pm);

        // Canvas-style shadow blur: sigma is half the blur radius.
        let sigma = self.layout.shadow_blur / 2.0;
        if sigma <= 0.0 {
            return Ok(pm);
        }
        let radius = (sigma * 3.0).ceil() as u32;
        let blurred = blur_rgba8_premul(
            pm.data_as_u8_slice(),
            u32::from(w),
            u32::from(h),
            radius,
            sigma,
        )?;
        pixmap_from_premul_bytes(&blurred, w, h)
    }

    fn draw_title(&mut self, ctx: &mut vello_cpu::RenderContext, title: &str, shots: usize) {
        let Some(face) = &self.title_face else {
            tracing::warn!("no title font, leaving the title band empty");
            return;
        };
        let c = self.layout.title_color;
        let brush = TextBrushRgba8 {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        };
        let layout = match self
            .text
            .layout_line(title, &face.family, self.layout.title_size, brush)
        {
            Ok(layout) => layout,
            Err(err) => {
                tracing::warn!(%err, origin = %face.origin, "title layout failed, leaving it blank");
                return;
            }
        };

        let center = self.layout.title_center(shots);
        let origin = (
            center.x - f64::from(layout.width()) / 2.0,
            center.y - f64::from(layout.height()) / 2.0,
        );

        ctx.set_transform(affine_to_cpu(Affine::translate(origin)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&face.data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

/// Decode every frame in parallel; the collect is the barrier before drawing.
fn decode_all(frames: &[ImageFrame]) -> Vec<Option<RgbaFrame>> {
    frames
        .par_iter()
        .enumerate()
        .map(|(index, frame)| match frame.decode() {
            Ok(raster) if !raster.is_empty() => Some(raster),
            Ok(_) => {
                let err = BoothError::ImageLoadFailed {
                    index,
                    reason: "empty image".to_string(),
                };
                tracing::warn!(%err, "skipping collage slot");
                None
            }
            Err(e) => {
                let err = BoothError::ImageLoadFailed {
                    index,
                    reason: e.to_string(),
                };
                tracing::warn!(%err, "skipping collage slot");
                None
            }
        })
        .collect()
}

fn pixmap_dims(canvas: Canvas) -> BoothResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| BoothError::composition("collage width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| BoothError::composition("collage height exceeds u16"))?;
    Ok((w, h))
}

fn solid(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn image_paint(pixmap: vello_cpu::Pixmap) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
}

fn pixmap_from_straight(frame: &RgbaFrame) -> BoothResult<vello_cpu::Pixmap> {
    let (w, h) = pixmap_dims(frame.canvas())?;
    let mut premul = frame.data.clone();
    premultiply_rgba8_in_place(&mut premul);
    pixmap_from_premul_bytes(&premul, w, h)
}

fn pixmap_from_premul_bytes(bytes: &[u8], w: u16, h: u16) -> BoothResult<vello_cpu::Pixmap> {
    let expected = usize::from(w) * usize::from(h) * 4;
    if bytes.len() != expected {
        return Err(BoothError::composition("pixmap byte length mismatch"));
    }
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn rounded_path(rr: RoundedRect) -> vello_cpu::kurbo::BezPath {
    bezpath_to_cpu(&rr.to_path(0.1))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/collage/compose.rs"]
mod tests;
