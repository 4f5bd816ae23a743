//! Frame and mask sources.
//!
//! Sources hand out one page at a time by index so the pipeline only keeps the current chunk
//! resident.

/// In-memory sources.
pub mod memory;
/// Multi-page TIFF sources.
pub mod tiff_stack;

use crate::foundation::error::{VizError, VizResult};

/// Pixel storage of a decoded source frame, before RGB8 normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawPixels {
    /// 8-bit grayscale, one sample per pixel.
    Gray8(Vec<u8>),
    /// 16-bit grayscale, one sample per pixel.
    Gray16(Vec<u16>),
    /// 8-bit RGB, three interleaved samples per pixel.
    Rgb8(Vec<u8>),
    /// 16-bit RGB, three interleaved samples per pixel.
    Rgb16(Vec<u16>),
}

impl RawPixels {
    fn channels(&self) -> usize {
        match self {
            Self::Gray8(_) | Self::Gray16(_) => 1,
            Self::Rgb8(_) | Self::Rgb16(_) => 3,
        }
    }

    fn sample_len(&self) -> usize {
        match self {
            Self::Gray8(v) | Self::Rgb8(v) => v.len(),
            Self::Gray16(v) | Self::Rgb16(v) => v.len(),
        }
    }
}

/// One decoded frame of the input sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major samples.
    pub pixels: RawPixels,
}

impl RawFrame {
    /// Build a frame, checking the sample count against `width * height * channels`.
    pub fn new(width: u32, height: u32, pixels: RawPixels) -> VizResult<Self> {
        let expected = (width as usize) * (height as usize) * pixels.channels();
        if pixels.sample_len() != expected {
            return Err(VizError::source(format!(
                "frame sample count {} does not match {width}x{height}x{}",
                pixels.sample_len(),
                pixels.channels()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}

/// Integer class-id mask, same spatial shape as its frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelMask {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major class ids.
    pub classes: Vec<u32>,
}

impl LabelMask {
    /// Build a mask, checking `classes.len() == width * height`.
    pub fn new(width: u32, height: u32, classes: Vec<u32>) -> VizResult<Self> {
        if classes.len() != (width as usize) * (height as usize) {
            return Err(VizError::source(format!(
                "mask sample count {} does not match {width}x{height}",
                classes.len()
            )));
        }
        Ok(Self {
            width,
            height,
            classes,
        })
    }

    /// A mask with every pixel set to `class`.
    pub fn filled(width: u32, height: u32, class: u32) -> Self {
        Self {
            width,
            height,
            classes: vec![class; (width as usize) * (height as usize)],
        }
    }
}

/// A sequence of frames addressable by index.
pub trait FrameSource {
    /// Total number of frames.
    fn frame_count(&self) -> usize;
    /// `(width, height)` shared by every frame.
    fn dimensions(&self) -> (u32, u32);
    /// Decode frame `index`.
    fn read_frame(&mut self, index: usize) -> VizResult<RawFrame>;
}

/// A sequence of label masks addressable by index.
pub trait MaskSource {
    /// Total number of masks.
    fn frame_count(&self) -> usize;
    /// `(width, height)` shared by every mask.
    fn dimensions(&self) -> (u32, u32);
    /// Decode mask `index`.
    fn read_mask(&mut self, index: usize) -> VizResult<LabelMask>;
}

/// Frame count and spatial size agreed on by a frame source and its mask source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequenceShape {
    /// Number of frames.
    pub num_frames: u64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// One-time startup check that frames and masks line up.
pub fn check_sequence_shapes(
    frames: &dyn FrameSource,
    masks: &dyn MaskSource,
) -> VizResult<SequenceShape> {
    if frames.frame_count() != masks.frame_count() {
        return Err(VizError::shape(format!(
            "frame source has {} frames but mask source has {}",
            frames.frame_count(),
            masks.frame_count()
        )));
    }
    let (fw, fh) = frames.dimensions();
    let (mw, mh) = masks.dimensions();
    if (fw, fh) != (mw, mh) {
        return Err(VizError::shape(format!(
            "frames are {fw}x{fh} but masks are {mw}x{mh}"
        )));
    }
    Ok(SequenceShape {
        num_frames: frames.frame_count() as u64,
        width: fw,
        height: fh,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/source/mod.rs"]
mod tests;
