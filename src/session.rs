use crate::config::VisualizerConfig;
use crate::encode::ffmpeg::AviChunkSink;
use crate::encode::sink::{ChunkSink, SinkFanout};
use crate::encode::tiff::TiffChunkSink;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{VizError, VizResult};
use crate::overlay::mask::MaskCompositor;
use crate::overlay::metadata::MetadataOverlay;
use crate::overlay::text::TextEngine;
use crate::overlay::tracking::{CellLabelSet, TrackingOverlay};
use crate::overlay::trajectory::TrajectoryIndex;
use crate::render::compositor::FrameCompositor;
use crate::render::frame::RgbFrame;
use crate::render::pipeline::{ChunkRanges, ChunkedPipeline, PipelineOpts, RunStats, chunk_ranges};
use crate::source::tiff_stack::TiffStack;
use crate::source::{FrameSource, MaskSource, SequenceShape, check_sequence_shapes};
use crate::tabular::{load_cell_label_rows, load_trajectory_rows};
use std::path::{Path, PathBuf};

/// Directory under `output_dir` holding TIFF chunks.
pub const TIFF_DIR: &str = "tiff_format";
/// Directory under `output_dir` holding AVI chunks.
pub const AVI_DIR: &str = "avi_format";

/// What a session loaded, as reported by `cellvis check`.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    /// Agreed sequence shape.
    pub shape: SequenceShape,
    /// Number of chunks the run will produce.
    pub chunks: usize,
    /// Frames per chunk.
    pub chunk_size: usize,
    /// Number of trajectory identities.
    pub trajectories: usize,
    /// Marker set names and row counts.
    pub label_sets: Vec<(String, usize)>,
    /// Number of coloured mask classes.
    pub mask_classes: usize,
    /// Output directories that will receive chunks.
    pub outputs: Vec<PathBuf>,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "sequence: {} frames, {}x{}",
            self.shape.num_frames, self.shape.width, self.shape.height
        )?;
        writeln!(f, "chunks: {} of up to {} frames", self.chunks, self.chunk_size)?;
        writeln!(f, "trajectories: {}", self.trajectories)?;
        for (name, rows) in &self.label_sets {
            writeln!(f, "cell labels '{name}': {rows} rows")?;
        }
        writeln!(f, "mask classes: {}", self.mask_classes)?;
        for dir in &self.outputs {
            writeln!(f, "output: {}", dir.display())?;
        }
        Ok(())
    }
}

/// A configured run: sources opened and shape-checked, overlays built.
pub struct VisualizerSession {
    cfg: VisualizerConfig,
    frames: Box<dyn FrameSource>,
    masks: Box<dyn MaskSource>,
    shape: SequenceShape,
    pipeline: ChunkedPipeline,
}

impl std::fmt::Debug for VisualizerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualizerSession")
            .field("shape", &self.shape)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl VisualizerSession {
    /// Load a configuration file and open everything it names.
    pub fn open(config_path: impl AsRef<Path>) -> VizResult<Self> {
        Self::from_config(VisualizerConfig::from_path(config_path)?)
    }

    /// Open the TIFF stacks named by `cfg` and build the session.
    #[tracing::instrument(skip_all, fields(originals = %cfg.originals_path.display()))]
    pub fn from_config(cfg: VisualizerConfig) -> VizResult<Self> {
        let frames = TiffStack::open(&cfg.originals_path)?;
        let masks = TiffStack::open(&cfg.segmentation_masks_path)?;
        Self::with_sources(cfg, Box::new(frames), Box::new(masks))
    }

    /// Build a session over caller-provided sources.
    pub fn with_sources(
        cfg: VisualizerConfig,
        frames: Box<dyn FrameSource>,
        masks: Box<dyn MaskSource>,
    ) -> VizResult<Self> {
        cfg.validate()?;
        let shape = check_sequence_shapes(&*frames, &*masks)?;
        let compositor = build_compositor(&cfg)?;
        let pipeline = ChunkedPipeline::new(
            compositor,
            PipelineOpts {
                chunk_size: cfg.chunk_size,
                output_frequency: cfg.output_frequency(),
                fps: cfg.output_fps,
            },
        )?;
        tracing::info!(
            frames = shape.num_frames,
            width = shape.width,
            height = shape.height,
            "loaded microscopy video, segmentation masks, cell labels and trajectories"
        );
        Ok(Self {
            cfg,
            frames,
            masks,
            shape,
            pipeline,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &VisualizerConfig {
        &self.cfg
    }

    /// Agreed sequence shape.
    pub fn shape(&self) -> SequenceShape {
        self.shape
    }

    /// Chunk ranges the run will produce.
    pub fn chunk_plan(&self) -> VizResult<ChunkRanges> {
        chunk_ranges(self.shape.num_frames, self.cfg.chunk_size)
    }

    /// Output directories enabled by the configuration.
    pub fn output_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if self.cfg.save_as_tiff {
            dirs.push(self.cfg.output_dir.join(TIFF_DIR));
        }
        if self.cfg.save_as_avi {
            dirs.push(self.cfg.output_dir.join(AVI_DIR));
        }
        dirs
    }

    /// Describe what was loaded.
    pub fn summary(&self) -> VizResult<SessionSummary> {
        let compositor = self.pipeline.compositor();
        Ok(SessionSummary {
            shape: self.shape,
            chunks: self.chunk_plan()?.len(),
            chunk_size: self.cfg.chunk_size,
            trajectories: compositor.tracking().trajectories().len(),
            label_sets: compositor
                .tracking()
                .labels()
                .iter()
                .map(|s| (s.name().to_string(), s.len()))
                .collect(),
            mask_classes: self.cfg.mask_colors.len(),
            outputs: self.output_dirs(),
        })
    }

    /// Sinks for every enabled output format.
    pub fn output_sinks(&self) -> VizResult<SinkFanout> {
        let mut fanout = SinkFanout::new();
        if self.cfg.save_as_tiff {
            fanout.push(Box::new(TiffChunkSink::new(
                self.cfg.output_dir.join(TIFF_DIR),
            )));
        }
        if self.cfg.save_as_avi {
            fanout.push(Box::new(AviChunkSink::new(self.cfg.output_dir.join(AVI_DIR))));
        }
        if fanout.is_empty() {
            return Err(VizError::config(
                "no output format enabled: set save_as_tiff and/or save_as_avi",
            ));
        }
        Ok(fanout)
    }

    /// Run the whole sequence into the configured outputs.
    pub fn run(&mut self) -> VizResult<RunStats> {
        let mut sinks = self.output_sinks()?;
        self.run_with_sink(&mut sinks)
    }

    /// Run the whole sequence into `sink`.
    pub fn run_with_sink(&mut self, sink: &mut dyn ChunkSink) -> VizResult<RunStats> {
        self.pipeline.run(&mut *self.frames, &mut *self.masks, sink)
    }

    /// Composite a single frame.
    pub fn render_frame(&mut self, index: FrameIndex) -> VizResult<RgbFrame> {
        if index.0 >= self.shape.num_frames {
            return Err(VizError::config(format!(
                "frame {} is out of range, the sequence has {} frames",
                index.0, self.shape.num_frames
            )));
        }
        self.pipeline.composite_frame(&mut *self.frames, &mut *self.masks, index)
    }
}

/// Load tabular data and fonts named by `cfg` and assemble the per-frame compositor.
pub fn build_compositor(cfg: &VisualizerConfig) -> VizResult<FrameCompositor> {
    let mask = MaskCompositor::new(&cfg.mask_colors, cfg.alpha())?;

    let trajectories = match &cfg.cell_trajectories {
        Some(spec) => TrajectoryIndex::build(load_trajectory_rows(&spec.file)?, spec.color),
        None => TrajectoryIndex::default(),
    };
    let mut labels = Vec::with_capacity(cfg.cell_labels.len());
    for spec in &cfg.cell_labels {
        let rows = load_cell_label_rows(cfg.cell_label_path(spec))?;
        labels.push(CellLabelSet::new(spec.name.clone(), spec.color, rows));
    }
    tracing::debug!(
        trajectories = trajectories.len(),
        label_sets = labels.len(),
        "tracking data indexed"
    );

    let text = TextEngine::discover(cfg.font_path.as_deref())?;
    Ok(FrameCompositor::new(
        mask,
        TrackingOverlay::new(trajectories, labels, cfg.track_id_color),
        MetadataOverlay::new(&cfg.metadata),
        text,
    ))
}
