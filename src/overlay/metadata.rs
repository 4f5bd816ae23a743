use crate::config::MetadataConfig;
use crate::foundation::core::{FrameIndex, Rgb8};
use crate::overlay::painter::Painter;
use crate::overlay::text::{TextBlock, TextEngine};

/// Horizontal scale bar in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleBar {
    /// Left end.
    pub x_start: i32,
    /// Right end.
    pub x_end: i32,
    /// Row.
    pub y: i32,
}

impl ScaleBar {
    /// Drawn length in pixels.
    pub fn len_px(&self) -> i32 {
        self.x_end - self.x_start
    }
}

/// A label placed by its top-left corner.
pub struct PlacedText {
    /// Label text.
    pub text: String,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Shaped label.
    pub block: TextBlock,
}

/// Resolved metadata geometry for one frame.
#[derive(Default)]
pub struct MetadataLayout {
    /// Elapsed-time label, when a frame interval is configured.
    pub timestamp: Option<PlacedText>,
    /// Scale bar, when a pixel size is configured.
    pub scale_bar: Option<ScaleBar>,
    /// Scale bar label, present together with `scale_bar`.
    pub scale_label: Option<PlacedText>,
}

/// Draws the elapsed-time label and the scale bar.
#[derive(Clone, Debug, PartialEq)]
pub struct MetadataOverlay {
    pixel_size: Option<f64>,
    time_between_frames: Option<f64>,
    color: Rgb8,
    scale_length: f64,
    scale_unit: String,
}

impl MetadataOverlay {
    /// Gap between the timestamp and the right frame edge.
    pub const TIME_OFFSET_X: i32 = 10;
    /// Top edge of the timestamp.
    pub const TIME_OFFSET_Y: i32 = 30;
    /// Gap between the bar's nominal right end and the right frame edge.
    pub const SCALE_OFFSET_X: i32 = 60;
    /// Bar row.
    pub const SCALE_Y: i32 = 20;
    /// Gap between the bar and the baseline of its label.
    pub const SCALE_TEXT_GAP: i32 = 5;
    /// Bar stroke width.
    pub const SCALE_LINE_WIDTH: f64 = 2.0;

    /// Build from configuration. Missing fields disable the matching element.
    pub fn new(cfg: &MetadataConfig) -> Self {
        Self {
            pixel_size: cfg.pixel_size,
            time_between_frames: cfg.time_between_frames,
            color: cfg.color,
            scale_length: cfg.scale_length,
            scale_unit: cfg.scale_unit.clone(),
        }
    }

    /// `true` when neither element is configured.
    pub fn is_empty(&self) -> bool {
        self.pixel_size.is_none() && self.time_between_frames.is_none()
    }

    /// Elapsed whole seconds at `frame`, as shown on screen.
    pub fn timestamp_label(&self, frame: FrameIndex) -> Option<String> {
        let dt = self.time_between_frames?;
        let secs = (frame.0 as f64 * dt).floor();
        Some(format!("{secs} s"))
    }

    /// Label under the bar. It always states the nominal length.
    pub fn scale_label(&self) -> String {
        format!("{} {}", self.scale_length, self.scale_unit)
    }

    /// Bar geometry for a frame `frame_width` pixels wide.
    ///
    /// The bar spans `scale_length / pixel_size` pixels ending `SCALE_OFFSET_X` from the right
    /// edge; a bar shorter than a tenth of the width is extended to exactly that tenth.
    pub fn scale_bar(&self, frame_width: u32) -> Option<ScaleBar> {
        let pixel_size = self.pixel_size?;
        let w = i64::from(frame_width);
        let len_px = (self.scale_length / pixel_size) as i64;
        let x_start = w - len_px - i64::from(Self::SCALE_OFFSET_X);
        let mut x_end = w - i64::from(Self::SCALE_OFFSET_X);
        let min_len = w / 10;
        if (x_end - x_start) * 10 < w {
            x_end = x_start + min_len;
        }
        Some(ScaleBar {
            x_start: clamp_i32(x_start),
            x_end: clamp_i32(x_end),
            y: Self::SCALE_Y,
        })
    }

    /// Resolve all element positions for `frame`.
    pub fn layout(
        &self,
        text: &mut TextEngine,
        frame_width: u32,
        frame: FrameIndex,
    ) -> MetadataLayout {
        let w = f64::from(frame_width);

        let timestamp = self.timestamp_label(frame).map(|label| {
            let block = text.layout(&label);
            PlacedText {
                x: w - block.width - f64::from(Self::TIME_OFFSET_X),
                y: f64::from(Self::TIME_OFFSET_Y),
                text: label,
                block,
            }
        });

        let scale_bar = self.scale_bar(frame_width);
        let scale_label = scale_bar.map(|bar| {
            let label = self.scale_label();
            let block = text.layout(&label);
            let centred = f64::from(bar.x_end) - (block.width / 2.0).floor();
            let x = centred.max(0.0).min(w - block.width);
            let baseline = f64::from(bar.y - Self::SCALE_TEXT_GAP);
            PlacedText {
                x,
                y: baseline - block.baseline,
                text: label,
                block,
            }
        });

        MetadataLayout {
            timestamp,
            scale_bar,
            scale_label,
        }
    }

    /// Draw whichever elements are configured.
    pub fn draw(&self, painter: &mut Painter, text: &mut TextEngine, frame: FrameIndex) {
        if self.is_empty() {
            return;
        }
        let layout = self.layout(text, painter.width(), frame);
        if let Some(t) = &layout.timestamp {
            painter.draw_text(&t.block, t.x, t.y, self.color);
        }
        if let Some(bar) = layout.scale_bar {
            painter.stroke_polyline(
                &[(bar.x_start, bar.y), (bar.x_end, bar.y)],
                self.color,
                Self::SCALE_LINE_WIDTH,
            );
        }
        if let Some(t) = &layout.scale_label {
            painter.draw_text(&t.block, t.x, t.y, self.color);
        }
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/metadata.rs"]
mod tests;
