//! JSON run configuration.

use crate::foundation::core::Rgb8;
use crate::foundation::error::{VizError, VizResult};
use crate::overlay::mask::ClassColorMap;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Mask blend factor used when `alpha` is absent.
pub const DEFAULT_ALPHA: f32 = 0.3;
/// Progress cadence used when `output_frequency` is absent or zero.
pub const DEFAULT_OUTPUT_FREQUENCY: u64 = 100;
/// Frames per chunk used when `chunk_size` is absent.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Video frame rate used when `output_fps` is absent.
pub const DEFAULT_OUTPUT_FPS: f64 = 10.0;

/// One CSV file of point-in-time cell markers.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CellLabelSpec {
    /// Display name of the set.
    pub name: String,
    /// CSV file, relative to `csv_folder_cell_labels` when that is set.
    pub file: PathBuf,
    /// Marker colour.
    pub color: Rgb8,
}

/// The CSV file of trajectory observations.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TrajectorySpec {
    /// CSV file.
    pub file: PathBuf,
    /// Path colour shared by every identity.
    pub color: Rgb8,
}

/// Scale bar and timestamp settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Physical length per pixel. Absent disables the scale bar.
    pub pixel_size: Option<f64>,
    /// Seconds per frame. Absent disables the timestamp.
    pub time_between_frames: Option<f64>,
    /// Colour of the bar and both labels.
    pub color: Rgb8,
    /// Nominal bar length, in the unit of `pixel_size`.
    pub scale_length: f64,
    /// Unit shown after the bar length.
    pub scale_unit: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            pixel_size: None,
            time_between_frames: None,
            color: Rgb8::WHITE,
            scale_length: 5.0,
            scale_unit: "um".to_string(),
        }
    }
}

/// Full run configuration, as read from the JSON file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct VisualizerConfig {
    /// Multi-page TIFF of input frames.
    pub originals_path: PathBuf,
    /// Multi-page TIFF of label masks.
    pub segmentation_masks_path: PathBuf,
    /// Root of the output tree.
    pub output_dir: PathBuf,
    /// Frame rate of the video chunks.
    #[serde(default = "default_output_fps")]
    pub output_fps: f64,
    /// Write a multi-page TIFF per chunk.
    #[serde(default)]
    pub save_as_tiff: bool,
    /// Write an AVI per chunk.
    #[serde(default = "default_true")]
    pub save_as_avi: bool,
    /// Folder the cell label CSV files live in.
    #[serde(default)]
    pub csv_folder_cell_labels: Option<PathBuf>,
    /// Cell marker sets.
    #[serde(default)]
    pub cell_labels: Vec<CellLabelSpec>,
    /// Trajectory observations.
    #[serde(default)]
    pub cell_trajectories: Option<TrajectorySpec>,
    /// Mask class colours.
    #[serde(default)]
    pub mask_colors: ClassColorMap,
    /// Colour of track-id labels. Absent hides them.
    #[serde(default)]
    pub track_id_color: Option<Rgb8>,
    /// Mask blend factor.
    #[serde(default)]
    pub alpha: Option<f32>,
    /// Progress is reported every this many frames.
    #[serde(default)]
    pub output_frequency: Option<u64>,
    /// Scale bar and timestamp.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Frames per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Font for overlay labels.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

fn default_output_fps() -> f64 {
    DEFAULT_OUTPUT_FPS
}

fn default_true() -> bool {
    true
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl VisualizerConfig {
    /// Parse and validate a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> VizResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| VizError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> VizResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            VizError::config(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> VizResult<()> {
        if let Some(a) = self.alpha
            && (!a.is_finite() || !(0.0..=1.0).contains(&a))
        {
            return Err(VizError::config(format!("alpha must be within [0, 1], got {a}")));
        }
        if self.chunk_size == 0 {
            return Err(VizError::config("chunk_size must be >= 1"));
        }
        if !self.output_fps.is_finite() || self.output_fps <= 0.0 {
            return Err(VizError::config(format!(
                "output_fps must be > 0, got {}",
                self.output_fps
            )));
        }
        if let Some(p) = self.metadata.pixel_size
            && (!p.is_finite() || p <= 0.0)
        {
            return Err(VizError::config(format!(
                "metadata.pixel_size must be > 0, got {p}"
            )));
        }
        if let Some(t) = self.metadata.time_between_frames
            && (!t.is_finite() || t < 0.0)
        {
            return Err(VizError::config(format!(
                "metadata.time_between_frames must be >= 0, got {t}"
            )));
        }
        if !self.metadata.scale_length.is_finite() || self.metadata.scale_length <= 0.0 {
            return Err(VizError::config(format!(
                "metadata.scale_length must be > 0, got {}",
                self.metadata.scale_length
            )));
        }
        Ok(())
    }

    /// Mask blend factor, defaulted.
    pub fn alpha(&self) -> f32 {
        self.alpha.unwrap_or(DEFAULT_ALPHA)
    }

    /// Progress cadence in frames, defaulted.
    pub fn output_frequency(&self) -> u64 {
        match self.output_frequency {
            Some(n) if n > 0 => n,
            _ => DEFAULT_OUTPUT_FREQUENCY,
        }
    }

    /// Resolved CSV path of a cell label set.
    pub fn cell_label_path(&self, spec: &CellLabelSpec) -> PathBuf {
        match &self.csv_folder_cell_labels {
            Some(dir) => dir.join(&spec.file),
            None => spec.file.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/mod.rs"]
mod tests;
