use crate::foundation::core::Rgb8;
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::math::u16_to_u8;
use crate::source::{RawFrame, RawPixels};

/// A composited frame as packed RGB8 pixels.
///
/// Channel order is R, G, B everywhere inside the crate. Sinks that need another order convert
/// at their own boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl RgbFrame {
    /// Wrap RGB8 bytes, checking `data.len() == width * height * 3`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> VizResult<Self> {
        if data.len() != (width as usize) * (height as usize) * 3 {
            return Err(VizError::source(format!(
                "rgb frame byte len {} does not match {width}x{height}x3",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame filled with one colour.
    pub fn filled(width: u32, height: u32, color: Rgb8) -> Self {
        Self {
            width,
            height,
            data: color.to_array().repeat((width as usize) * (height as usize)),
        }
    }

    /// Colour at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        Some(Rgb8::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Convert a decoded source frame to RGB8.
    ///
    /// Grayscale is duplicated into three channels; 16-bit samples are scaled to 8 bits.
    pub fn from_raw(raw: &RawFrame) -> Self {
        let n = (raw.width as usize) * (raw.height as usize);
        let data = match &raw.pixels {
            RawPixels::Rgb8(v) => v.clone(),
            RawPixels::Gray8(v) => {
                let mut out = Vec::with_capacity(n * 3);
                for &g in v {
                    out.extend_from_slice(&[g, g, g]);
                }
                out
            }
            RawPixels::Gray16(v) => {
                let mut out = Vec::with_capacity(n * 3);
                for &g in v {
                    let g = u16_to_u8(g);
                    out.extend_from_slice(&[g, g, g]);
                }
                out
            }
            RawPixels::Rgb16(v) => v.iter().map(|&s| u16_to_u8(s)).collect(),
        };
        Self {
            width: raw.width,
            height: raw.height,
            data,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
