use crate::encode::sink::{ChunkArtifact, ChunkBatch, ChunkSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{VizError, VizResult};
use crate::render::compositor::FrameCompositor;
use crate::render::frame::RgbFrame;
use crate::source::{FrameSource, MaskSource, check_sequence_shapes};

/// Iterator over the chunk ranges partitioning `[0, num_frames)`.
///
/// Ranges are ascending, contiguous and at most `chunk_size` frames long; only the last one may
/// be shorter. `num_frames == 0` yields nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkRanges {
    next: u64,
    num_frames: u64,
    chunk_size: u64,
}

impl Iterator for ChunkRanges {
    type Item = FrameRange;

    fn next(&mut self) -> Option<FrameRange> {
        if self.next >= self.num_frames {
            return None;
        }
        let start = self.next;
        let end = start.saturating_add(self.chunk_size).min(self.num_frames);
        self.next = end;
        Some(FrameRange {
            start: FrameIndex(start),
            end: FrameIndex(end),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.num_frames.saturating_sub(self.next).div_ceil(self.chunk_size);
        let left = usize::try_from(left).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}

impl ExactSizeIterator for ChunkRanges {}

/// Split `[0, num_frames)` into chunks of `chunk_size` frames.
pub fn chunk_ranges(num_frames: u64, chunk_size: usize) -> VizResult<ChunkRanges> {
    if chunk_size == 0 {
        return Err(VizError::config("chunk_size must be >= 1"));
    }
    Ok(ChunkRanges {
        next: 0,
        num_frames,
        chunk_size: chunk_size as u64,
    })
}

/// Chunking and progress controls for [`ChunkedPipeline`].
#[derive(Clone, Debug)]
pub struct PipelineOpts {
    /// Frames per chunk. Peak memory is one chunk of composited frames.
    pub chunk_size: usize,
    /// A progress event is emitted for every frame index divisible by this.
    pub output_frequency: u64,
    /// Frame rate handed to sinks.
    pub fps: f64,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            chunk_size: crate::config::DEFAULT_CHUNK_SIZE,
            output_frequency: crate::config::DEFAULT_OUTPUT_FREQUENCY,
            fps: crate::config::DEFAULT_OUTPUT_FPS,
        }
    }
}

/// Progress notification, emitted at the configured frame cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Frame just composited.
    pub frame: FrameIndex,
    /// Total frames in the run.
    pub total: u64,
}

/// Aggregated run counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Frames composited.
    pub frames: u64,
    /// Chunks handed to the sink.
    pub chunks: u64,
    /// Files committed by the sink, in commit order.
    pub artifacts: Vec<ChunkArtifact>,
}

impl RunStats {
    /// Total size of committed files in bytes.
    pub fn bytes_written(&self) -> u64 {
        self.artifacts.iter().map(|a| a.bytes).sum()
    }
}

/// Drives a [`FrameCompositor`] over a whole sequence, one chunk at a time.
///
/// Processing is strictly sequential: frames within a chunk in ascending order, and a chunk is
/// only started after the sink has committed the previous one.
#[derive(Debug)]
pub struct ChunkedPipeline {
    compositor: FrameCompositor,
    opts: PipelineOpts,
}

impl ChunkedPipeline {
    /// Create a pipeline.
    pub fn new(compositor: FrameCompositor, opts: PipelineOpts) -> VizResult<Self> {
        if opts.chunk_size == 0 {
            return Err(VizError::config("chunk_size must be >= 1"));
        }
        if opts.output_frequency == 0 {
            return Err(VizError::config("output_frequency must be >= 1"));
        }
        Ok(Self { compositor, opts })
    }

    /// Options in use.
    pub fn opts(&self) -> &PipelineOpts {
        &self.opts
    }

    /// The per-frame compositor.
    pub fn compositor(&self) -> &FrameCompositor {
        &self.compositor
    }

    /// Composite a single frame.
    pub fn composite_frame(
        &mut self,
        frames: &mut dyn FrameSource,
        masks: &mut dyn MaskSource,
        index: FrameIndex,
    ) -> VizResult<RgbFrame> {
        let i = usize::try_from(index.0)
            .map_err(|_| VizError::source(format!("frame {} is out of range", index.0)))?;
        let raw = frames.read_frame(i)?;
        let mask = masks.read_mask(i)?;
        self.compositor.composite(&raw, &mask, index)
    }

    /// Composite every frame of `range`, in order.
    pub fn composite_chunk(
        &mut self,
        frames: &mut dyn FrameSource,
        masks: &mut dyn MaskSource,
        range: FrameRange,
    ) -> VizResult<Vec<RgbFrame>> {
        self.composite_chunk_with_progress(frames, masks, range, range.end.0, &mut |_| {})
    }

    fn composite_chunk_with_progress(
        &mut self,
        frames: &mut dyn FrameSource,
        masks: &mut dyn MaskSource,
        range: FrameRange,
        total: u64,
        progress: &mut dyn FnMut(Progress),
    ) -> VizResult<Vec<RgbFrame>> {
        let mut out = Vec::with_capacity(range.len_frames().min(4096) as usize);
        for index in range.frames() {
            if index.0.is_multiple_of(self.opts.output_frequency) {
                tracing::info!(frame = index.0, total, "processing frame");
                progress(Progress {
                    frame: index,
                    total,
                });
            }
            out.push(self.composite_frame(frames, masks, index)?);
        }
        Ok(out)
    }

    /// Run the whole sequence through `sink`.
    pub fn run(
        &mut self,
        frames: &mut dyn FrameSource,
        masks: &mut dyn MaskSource,
        sink: &mut dyn ChunkSink,
    ) -> VizResult<RunStats> {
        self.run_with_progress(frames, masks, sink, &mut |_| {})
    }

    /// Run the whole sequence through `sink`, reporting progress to `progress`.
    ///
    /// An empty sequence never starts the sink.
    #[tracing::instrument(skip_all, fields(sink = sink.name(), chunk_size = self.opts.chunk_size))]
    pub fn run_with_progress(
        &mut self,
        frames: &mut dyn FrameSource,
        masks: &mut dyn MaskSource,
        sink: &mut dyn ChunkSink,
        progress: &mut dyn FnMut(Progress),
    ) -> VizResult<RunStats> {
        let shape = check_sequence_shapes(&*frames, &*masks)?;
        let chunks = chunk_ranges(shape.num_frames, self.opts.chunk_size)?;
        tracing::info!(
            frames = shape.num_frames,
            width = shape.width,
            height = shape.height,
            chunks = chunks.len(),
            "starting run"
        );
        if shape.num_frames == 0 {
            return Ok(RunStats::default());
        }

        sink.begin(&SinkConfig {
            width: shape.width,
            height: shape.height,
            fps: self.opts.fps,
        })?;

        let mut stats = RunStats::default();
        for range in chunks {
            tracing::info!(start = range.start.0, end = range.end.0, "processing chunk");
            let batch = ChunkBatch {
                range,
                frames: self.composite_chunk_with_progress(
                    frames,
                    masks,
                    range,
                    shape.num_frames,
                    progress,
                )?,
            };
            let artifacts = sink.write_chunk(&batch)?;
            for a in &artifacts {
                tracing::info!(
                    path = %a.path.display(),
                    size_mb = %format!("{:.2}", a.size_mb()),
                    "saved chunk"
                );
            }
            tracing::debug!(chunk = %range, files = artifacts.len(), "chunk committed");
            stats.frames += range.len_frames();
            stats.chunks += 1;
            stats.artifacts.extend(artifacts);
        }

        sink.end()?;
        tracing::info!(
            frames = stats.frames,
            chunks = stats.chunks,
            bytes = stats.bytes_written(),
            "run complete"
        );
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
