use crate::foundation::core::FrameRange;
use crate::foundation::error::{VizError, VizResult};
use crate::render::frame::RgbFrame;
use std::path::{Path, PathBuf};

/// Configuration provided to a [`ChunkSink`] before the first chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: f64,
}

/// One composited chunk, in ascending frame order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkBatch {
    /// Frame range covered by `frames`.
    pub range: FrameRange,
    /// Composited frames, one per index in `range`.
    pub frames: Vec<RgbFrame>,
}

/// A file committed for one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkArtifact {
    /// Final path of the file.
    pub path: PathBuf,
    /// File size in bytes.
    pub bytes: u64,
}

impl ChunkArtifact {
    /// Describe a committed file by reading its size.
    pub fn from_path(path: PathBuf) -> VizResult<Self> {
        let bytes = std::fs::metadata(&path)
            .map_err(|e| VizError::encode(format!("stat '{}': {e}", path.display())))?
            .len();
        Ok(Self { path, bytes })
    }

    /// File size in megabytes.
    pub fn size_mb(&self) -> f64 {
        self.bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Sink contract for consuming composited chunks.
///
/// Ordering contract: `write_chunk` is called with contiguous ranges in ascending order. A chunk
/// is fully committed, with its file closed, when `write_chunk` returns.
pub trait ChunkSink: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;
    /// Called once before any chunk is written.
    fn begin(&mut self, cfg: &SinkConfig) -> VizResult<()>;
    /// Commit one chunk and report the files it produced.
    fn write_chunk(&mut self, batch: &ChunkBatch) -> VizResult<Vec<ChunkArtifact>>;
    /// Called once after the last chunk.
    fn end(&mut self) -> VizResult<()>;
}

/// Deterministic per-chunk file name, `chunk_<start>_<end>.<ext>`.
pub fn chunk_file_name(range: FrameRange, ext: &str) -> String {
    format!("chunk_{}_{}.{ext}", range.start.0, range.end.0)
}

/// Temporary path a chunk is written to before it is renamed into place.
pub(crate) fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Move a finished `.part` file to its final path.
pub(crate) fn commit_part(part: &Path, path: &Path) -> VizResult<ChunkArtifact> {
    std::fs::rename(part, path).map_err(|e| {
        VizError::encode(format!(
            "rename '{}' to '{}': {e}",
            part.display(),
            path.display()
        ))
    })?;
    ChunkArtifact::from_path(path.to_path_buf())
}

/// Check that every frame in `batch` matches the configured size.
pub(crate) fn check_batch(cfg: &SinkConfig, batch: &ChunkBatch) -> VizResult<()> {
    if batch.frames.len() as u64 != batch.range.len_frames() {
        return Err(VizError::encode(format!(
            "chunk {} holds {} frames",
            batch.range,
            batch.frames.len()
        )));
    }
    if let Some(f) = batch
        .frames
        .iter()
        .find(|f| (f.width, f.height) != (cfg.width, cfg.height))
    {
        return Err(VizError::encode(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            f.width, f.height, cfg.width, cfg.height
        )));
    }
    Ok(())
}

/// Forwards every call to several sinks in order.
#[derive(Default)]
pub struct SinkFanout {
    sinks: Vec<Box<dyn ChunkSink>>,
}

impl SinkFanout {
    /// Create an empty fanout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink.
    pub fn push(&mut self, sink: Box<dyn ChunkSink>) {
        self.sinks.push(sink);
    }

    /// Number of wrapped sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// `true` when no sink is attached.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ChunkSink for SinkFanout {
    fn name(&self) -> &'static str {
        "fanout"
    }

    fn begin(&mut self, cfg: &SinkConfig) -> VizResult<()> {
        for s in &mut self.sinks {
            s.begin(cfg)?;
        }
        Ok(())
    }

    fn write_chunk(&mut self, batch: &ChunkBatch) -> VizResult<Vec<ChunkArtifact>> {
        let mut out = Vec::new();
        for s in &mut self.sinks {
            out.extend(s.write_chunk(batch)?);
        }
        Ok(out)
    }

    fn end(&mut self) -> VizResult<()> {
        for s in &mut self.sinks {
            s.end()?;
        }
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryChunkSink {
    cfg: Option<SinkConfig>,
    /// Chunks in the order they were written.
    pub(crate) chunks: Vec<ChunkBatch>,
    ended: bool,
}

impl InMemoryChunkSink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Borrow the captured chunks.
    pub fn chunks(&self) -> &[ChunkBatch] {
        &self.chunks
    }

    /// `true` once `end` has been called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl ChunkSink for InMemoryChunkSink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn begin(&mut self, cfg: &SinkConfig) -> VizResult<()> {
        self.cfg = Some(cfg.clone());
        self.chunks.clear();
        self.ended = false;
        Ok(())
    }

    fn write_chunk(&mut self, batch: &ChunkBatch) -> VizResult<Vec<ChunkArtifact>> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| VizError::encode("memory sink not started"))?;
        check_batch(cfg, batch)?;
        self.chunks.push(batch.clone());
        Ok(Vec::new())
    }

    fn end(&mut self) -> VizResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
