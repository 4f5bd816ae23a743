use crate::foundation::error::{VizError, VizResult};
use std::path::Path;

/// Text brush carried through Parley layouts. Colour is chosen at draw time, so this stays default.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct TextBrush;

/// Font files tried, in order, when no font is configured.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Advance per character, as a fraction of the font size, used when no font is loaded.
const FALLBACK_ADVANCE_EM: f32 = 0.6;
/// Distance from the top of the line to the baseline, as a fraction of the font size, used when
/// no font is loaded.
const FALLBACK_BASELINE_EM: f32 = 0.8;

struct LoadedFont {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Shapes overlay labels with Parley.
///
/// Without a font, labels are measured with fixed fallback metrics and produce no glyphs.
pub struct TextEngine {
    font: Option<LoadedFont>,
    size_px: f32,
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine")
            .field("family", &self.font.as_ref().map(|f| f.family.as_str()))
            .field("size_px", &self.size_px)
            .finish()
    }
}

/// A shaped label and its extent in pixels.
pub struct TextBlock {
    /// Advance width.
    pub width: f64,
    /// Line height.
    pub height: f64,
    /// Distance from the top of the block to the first line's baseline.
    pub baseline: f64,
    pub(crate) shaped: Option<(parley::Layout<TextBrush>, vello_cpu::peniko::FontData)>,
}

impl TextEngine {
    /// Label size in pixels.
    pub const DEFAULT_SIZE_PX: f32 = 14.0;

    /// An engine that measures with fallback metrics and draws nothing.
    pub fn without_font() -> Self {
        Self {
            font: None,
            size_px: Self::DEFAULT_SIZE_PX,
        }
    }

    /// Build an engine from TTF/OTF bytes.
    pub fn from_font_bytes(bytes: Vec<u8>) -> VizResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| VizError::config("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| VizError::config("registered font family has no name"))?
            .to_string();

        let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        Ok(Self {
            font: Some(LoadedFont {
                font_ctx,
                layout_ctx: parley::LayoutContext::new(),
                family,
                data,
            }),
            size_px: Self::DEFAULT_SIZE_PX,
        })
    }

    /// Load a font file.
    pub fn from_path(path: &Path) -> VizResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| VizError::config(format!("read font '{}': {e}", path.display())))?;
        Self::from_font_bytes(bytes)
            .map_err(|e| VizError::config(format!("font '{}': {e}", path.display())))
    }

    /// Use `explicit` when given, otherwise the first usable well-known system font.
    ///
    /// A configured font that cannot be loaded is an error. When nothing is configured and no
    /// system font is found, labels are laid out but not drawn.
    pub fn discover(explicit: Option<&Path>) -> VizResult<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        for candidate in SYSTEM_FONT_CANDIDATES {
            let path = Path::new(candidate);
            if !path.is_file() {
                continue;
            }
            match Self::from_path(path) {
                Ok(engine) => {
                    tracing::debug!(font = %path.display(), "using system font");
                    return Ok(engine);
                }
                Err(e) => tracing::debug!(error = %e, "skipping system font"),
            }
        }
        tracing::warn!("no usable font found; overlay text will not be drawn (set `font_path`)");
        Ok(Self::without_font())
    }

    /// Return `true` when a font is loaded.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Label size in pixels.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Shape `text` on a single line.
    pub fn layout(&mut self, text: &str) -> TextBlock {
        let size_px = self.size_px;
        let Some(font) = self.font.as_mut() else {
            return TextBlock {
                width: f64::from(text.chars().count() as f32 * size_px * FALLBACK_ADVANCE_EM),
                height: f64::from(size_px),
                baseline: f64::from(size_px * FALLBACK_BASELINE_EM),
                shaped: None,
            };
        };

        let mut builder = font
            .layout_ctx
            .ranged_builder(&mut font.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or(size_px * FALLBACK_BASELINE_EM);

        TextBlock {
            width: f64::from(layout.width()),
            height: f64::from(layout.height()),
            baseline: f64::from(baseline),
            shaped: Some((layout, font.data.clone())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/text.rs"]
mod tests;
