use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{BoothError, BoothResult};

/// Families tried, in order, when no decorative font file is available.
const FALLBACK_FAMILIES: [&str; 2] = ["Fleur De Leah", "Brush Script MT"];

/// Font bytes ready for layout and glyph rendering.
#[derive(Clone, Debug)]
pub struct TitleFont {
    /// Where the face came from, for logs.
    pub origin: String,
    /// Raw TTF/OTF/TTC bytes.
    pub bytes: Arc<Vec<u8>>,
}

/// RGBA8 brush color carried through Parley layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Read a font file, reporting failures as [`BoothError::FontLoadFailed`].
pub fn load_font_file(path: &Path) -> BoothResult<TitleFont> {
    let bytes = std::fs::read(path)
        .map_err(|e| BoothError::FontLoadFailed(format!("read '{}': {e}", path.display())))?;
    if bytes.len() < 4 {
        return Err(BoothError::FontLoadFailed(format!(
            "'{}' is too short to be a font",
            path.display()
        )));
    }
    Ok(TitleFont {
        origin: path.display().to_string(),
        bytes: Arc::new(bytes),
    })
}

/// Pick a title font from the installed system faces.
///
/// Named decorative families win, then generic cursive, serif and sans-serif.
pub fn system_fallback_font() -> Option<TitleFont> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    let mut families: Vec<usvg::fontdb::Family<'_>> = FALLBACK_FAMILIES
        .iter()
        .map(|n| usvg::fontdb::Family::Name(*n))
        .collect();
    families.extend([
        usvg::fontdb::Family::Cursive,
        usvg::fontdb::Family::Serif,
        usvg::fontdb::Family::SansSerif,
    ]);

    for family in families {
        let query = usvg::fontdb::Query {
            families: std::slice::from_ref(&family),
            ..Default::default()
        };
        let Some(id) = db.query(&query) else {
            continue;
        };
        let Some(bytes) = db.with_face_data(id, |data, _index| data.to_vec()) else {
            continue;
        };
        let origin = db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| "system".to_string());
        return Some(TitleFont {
            origin,
            bytes: Arc::new(bytes),
        });
    }
    None
}

/// Resolve the title font: the configured file first, then the system fallback.
///
/// Returns `None` only when no usable face exists at all; the collage then omits the title
/// glyphs.
pub fn resolve_title_font(configured: Option<&Path>) -> Option<TitleFont> {
    if let Some(path) = configured {
        match load_font_file(path) {
            Ok(font) => return Some(font),
            Err(err) => tracing::warn!(%err, "title font unavailable, using fallback"),
        }
    }
    let fallback = system_fallback_font();
    match &fallback {
        Some(font) => tracing::debug!(origin = %font.origin, "using system title font"),
        None => tracing::warn!("no system font found; collage title will be blank"),
    }
    fallback
}

/// Stateful helper for building Parley text layouts.
///
/// Fonts are registered once with [`TextLayoutEngine::register_font`]; layouts then refer to
/// them by family name.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registrations: usize,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registrations: 0,
        }
    }

    /// Add `font` to the collection and return its family name. The bytes are shared, not
    /// copied.
    pub(crate) fn register_font(&mut self, font: &TitleFont) -> BoothResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::new(font.bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| BoothError::FontLoadFailed("no font families in font bytes".into()))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| BoothError::FontLoadFailed("registered font family has no name".into()))?
            .to_string();
        self.registrations += 1;
        Ok(family_name)
    }

    /// Number of successful [`TextLayoutEngine::register_font`] calls.
    pub(crate) fn registrations(&self) -> usize {
        self.registrations
    }

    /// Shape a single unwrapped line of text in a registered `family`.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        family: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> BoothResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(BoothError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
