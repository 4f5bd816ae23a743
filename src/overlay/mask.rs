use crate::foundation::core::Rgb8;
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::math::lerp_u8;
use crate::render::frame::RgbFrame;
use crate::source::LabelMask;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Largest class id accepted in a colour map.
pub const MAX_CLASS_ID: u32 = u16::MAX as u32;

/// Mapping from mask class id to overlay colour.
///
/// Classes without an entry, and classes mapped to `(0, 0, 0)`, have no overlay colour.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassColorMap {
    colors: BTreeMap<u32, Rgb8>,
}

impl ClassColorMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `class` to `color`, replacing any previous entry.
    pub fn insert(&mut self, class: u32, color: Rgb8) -> VizResult<()> {
        if class > MAX_CLASS_ID {
            return Err(VizError::config(format!(
                "mask class id {class} exceeds {MAX_CLASS_ID}"
            )));
        }
        self.colors.insert(class, color);
        Ok(())
    }

    /// Overlay colour for `class`, if it has one.
    pub fn get(&self, class: u32) -> Option<Rgb8> {
        self.colors.get(&class).copied().filter(|c| !c.is_zero())
    }

    /// Entries with a non-zero colour, in ascending class order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Rgb8)> + '_ {
        self.colors
            .iter()
            .filter(|(_, c)| !c.is_zero())
            .map(|(&k, &c)| (k, c))
    }

    /// Number of classes that have an overlay colour.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// `true` when no class has an overlay colour.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'de> Deserialize<'de> for ClassColorMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Rgb8>::deserialize(deserializer)?;
        let mut out = Self::new();
        for (key, color) in raw {
            let class: u32 = key.trim().parse().map_err(|_| {
                serde::de::Error::custom(format!("mask class key \"{key}\" is not an integer"))
            })?;
            out.insert(class, color).map_err(serde::de::Error::custom)?;
        }
        Ok(out)
    }
}

#[derive(Clone, Debug)]
struct ClassLut {
    channels: [[u8; 256]; 3],
}

impl ClassLut {
    fn new(color: Rgb8, alpha: f32) -> Self {
        let mut channels = [[0u8; 256]; 3];
        for (table, over) in channels.iter_mut().zip(color.to_array()) {
            for (base, slot) in table.iter_mut().enumerate() {
                *slot = lerp_u8(base as u8, over, alpha);
            }
        }
        Self { channels }
    }
}

/// Alpha-blends class-coloured mask pixels onto an RGB frame.
///
/// Only pixels whose class has a colour are attenuated; every other pixel keeps its value.
/// Blend results are precomputed per coloured class and channel, so the per-pixel work is a table
/// lookup.
#[derive(Clone, Debug)]
pub struct MaskCompositor {
    alpha: f32,
    // Class id -> index into `luts`.
    slots: Vec<Option<u16>>,
    luts: Vec<ClassLut>,
}

impl MaskCompositor {
    /// Build a compositor for `colors` at blend factor `alpha` in `[0, 1]`.
    pub fn new(colors: &ClassColorMap, alpha: f32) -> VizResult<Self> {
        if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
            return Err(VizError::config(format!(
                "mask alpha must be within [0, 1], got {alpha}"
            )));
        }
        let len = colors.iter().map(|(k, _)| k as usize + 1).max().unwrap_or(0);
        let mut slots = vec![None; len];
        let mut luts = Vec::with_capacity(colors.len());
        for (class, color) in colors.iter() {
            let slot = u16::try_from(luts.len())
                .map_err(|_| VizError::config("too many coloured mask classes"))?;
            slots[class as usize] = Some(slot);
            luts.push(ClassLut::new(color, alpha));
        }
        Ok(Self {
            alpha,
            slots,
            luts,
        })
    }

    /// Blend factor in use.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Blend `mask` into `frame` in place.
    pub fn apply(&self, frame: &mut RgbFrame, mask: &LabelMask) -> VizResult<()> {
        if (frame.width, frame.height) != (mask.width, mask.height) {
            return Err(VizError::shape(format!(
                "frame is {}x{} but mask is {}x{}",
                frame.width, frame.height, mask.width, mask.height
            )));
        }
        if self.luts.is_empty() {
            return Ok(());
        }
        for (px, &class) in frame.data.chunks_exact_mut(3).zip(&mask.classes) {
            let Some(&Some(slot)) = self.slots.get(class as usize) else {
                continue;
            };
            let lut = &self.luts[usize::from(slot)];
            for (c, table) in px.iter_mut().zip(&lut.channels) {
                *c = table[*c as usize];
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/mask.rs"]
mod tests;
