use crate::foundation::error::{VizError, VizResult};
use crate::source::{FrameSource, LabelMask, MaskSource, RawFrame};

/// Frames held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryFrames {
    dims: (u32, u32),
    frames: Vec<RawFrame>,
}

impl MemoryFrames {
    /// Wrap `frames`, which must all share one size.
    pub fn new(frames: Vec<RawFrame>) -> VizResult<Self> {
        let dims = frames.first().map(|f| (f.width, f.height)).unwrap_or((0, 0));
        if let Some((i, f)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| (f.width, f.height) != dims)
        {
            return Err(VizError::shape(format!(
                "frame {i} is {}x{}, expected {}x{}",
                f.width, f.height, dims.0, dims.1
            )));
        }
        Ok(Self { dims, frames })
    }
}

impl FrameSource for MemoryFrames {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn dimensions(&self) -> (u32, u32) {
        self.dims
    }

    fn read_frame(&mut self, index: usize) -> VizResult<RawFrame> {
        self.frames
            .get(index)
            .cloned()
            .ok_or_else(|| VizError::source(format!("frame {index} is out of range")))
    }
}

/// Label masks held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryMasks {
    dims: (u32, u32),
    masks: Vec<LabelMask>,
}

impl MemoryMasks {
    /// Wrap `masks`, which must all share one size.
    pub fn new(masks: Vec<LabelMask>) -> VizResult<Self> {
        let dims = masks.first().map(|m| (m.width, m.height)).unwrap_or((0, 0));
        if let Some((i, m)) = masks
            .iter()
            .enumerate()
            .find(|(_, m)| (m.width, m.height) != dims)
        {
            return Err(VizError::shape(format!(
                "mask {i} is {}x{}, expected {}x{}",
                m.width, m.height, dims.0, dims.1
            )));
        }
        Ok(Self { dims, masks })
    }
}

impl MaskSource for MemoryMasks {
    fn frame_count(&self) -> usize {
        self.masks.len()
    }

    fn dimensions(&self) -> (u32, u32) {
        self.dims
    }

    fn read_mask(&mut self, index: usize) -> VizResult<LabelMask> {
        self.masks
            .get(index)
            .cloned()
            .ok_or_else(|| VizError::source(format!("mask {index} is out of range")))
    }
}
