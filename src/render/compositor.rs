use crate::foundation::core::FrameIndex;
use crate::foundation::error::{VizError, VizResult};
use crate::overlay::mask::MaskCompositor;
use crate::overlay::metadata::MetadataOverlay;
use crate::overlay::painter::Painter;
use crate::overlay::text::TextEngine;
use crate::overlay::tracking::TrackingOverlay;
use crate::render::frame::RgbFrame;
use crate::source::{LabelMask, RawFrame};

/// Per-frame orchestrator.
///
/// Every frame goes through the same fixed stages: RGB normalization, mask blending, tracking
/// overlay, metadata overlay. Vector overlays share one surface and land on the frame in a
/// single composite after the mask, so the mask alpha never touches markers or text.
#[derive(Debug)]
pub struct FrameCompositor {
    mask: MaskCompositor,
    tracking: TrackingOverlay,
    metadata: MetadataOverlay,
    text: TextEngine,
    painter: Option<Painter>,
}

impl FrameCompositor {
    /// Assemble a compositor from its stages.
    pub fn new(
        mask: MaskCompositor,
        tracking: TrackingOverlay,
        metadata: MetadataOverlay,
        text: TextEngine,
    ) -> Self {
        Self {
            mask,
            tracking,
            metadata,
            text,
            painter: None,
        }
    }

    /// Mask stage.
    pub fn mask(&self) -> &MaskCompositor {
        &self.mask
    }

    /// Tracking stage.
    pub fn tracking(&self) -> &TrackingOverlay {
        &self.tracking
    }

    /// Metadata stage.
    pub fn metadata(&self) -> &MetadataOverlay {
        &self.metadata
    }

    /// Composite frame `index` from its raw pixels and label mask.
    pub fn composite(
        &mut self,
        raw: &RawFrame,
        mask: &LabelMask,
        index: FrameIndex,
    ) -> VizResult<RgbFrame> {
        if (raw.width, raw.height) != (mask.width, mask.height) {
            return Err(VizError::shape(format!(
                "frame {} is {}x{} but its mask is {}x{}",
                index.0, raw.width, raw.height, mask.width, mask.height
            )));
        }

        let mut frame = RgbFrame::from_raw(raw);
        self.mask.apply(&mut frame, mask)?;

        let painter = surface_for(&mut self.painter, frame.width, frame.height)?;
        self.tracking.draw(painter, &mut self.text, index);
        self.metadata.draw(painter, &mut self.text, index);
        painter.composite_onto(&mut frame)?;

        Ok(frame)
    }
}

fn surface_for(slot: &mut Option<Painter>, width: u32, height: u32) -> VizResult<&mut Painter> {
    let painter = match slot.take() {
        Some(p) if (p.width(), p.height()) == (width, height) => p,
        _ => Painter::new(width, height)?,
    };
    Ok(slot.insert(painter))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
