//! cellvis overlays segmentation masks, cell trajectories and scale/time metadata onto long
//! microscopy image sequences and writes the annotated result in fixed-size chunks.
//!
//! The public API is session-oriented:
//!
//! - Load and validate a [`VisualizerConfig`]
//! - Create a [`VisualizerSession`], which opens the sources and builds every overlay up front
//! - Run the whole sequence into TIFF/AVI chunks, or composite single frames
//!
//! Only one chunk of composited frames is resident at a time, whatever the sequence length.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

/// JSON run configuration.
pub mod config;
/// Chunk output sinks.
pub mod encode;
/// Mask, tracking and metadata overlays.
pub mod overlay;
/// Per-frame compositing and the chunked pipeline.
pub mod render;
/// Session-oriented run API.
pub mod session;
/// Frame and mask sources.
pub mod source;
/// CSV ingestion of tracking data.
pub mod tabular;

pub use crate::foundation::core::{FrameIndex, FrameRange, Rgb8};
pub use crate::foundation::error::{VizError, VizResult};

pub use crate::config::{CellLabelSpec, MetadataConfig, TrajectorySpec, VisualizerConfig};
pub use crate::encode::channel::rgb_to_bgr_into;
pub use crate::encode::ffmpeg::{AviChunkSink, is_ffmpeg_on_path};
pub use crate::encode::sink::{
    ChunkArtifact, ChunkBatch, ChunkSink, InMemoryChunkSink, SinkConfig, SinkFanout,
    chunk_file_name,
};
pub use crate::encode::tiff::TiffChunkSink;
pub use crate::overlay::mask::{ClassColorMap, MaskCompositor};
pub use crate::overlay::metadata::MetadataOverlay;
pub use crate::overlay::text::TextEngine;
pub use crate::overlay::tracking::{CellLabelRow, CellLabelSet, TrackingOverlay};
pub use crate::overlay::trajectory::{TrackId, TrackPoint, TrajectoryIndex, TrajectoryRow};
pub use crate::render::compositor::FrameCompositor;
pub use crate::render::frame::RgbFrame;
pub use crate::render::pipeline::{
    ChunkedPipeline, PipelineOpts, Progress, RunStats, chunk_ranges,
};
pub use crate::session::{SessionSummary, VisualizerSession};
pub use crate::source::memory::{MemoryFrames, MemoryMasks};
pub use crate::source::tiff_stack::TiffStack;
pub use crate::source::{
    FrameSource, LabelMask, MaskSource, RawFrame, RawPixels, SequenceShape,
    check_sequence_shapes,
};
