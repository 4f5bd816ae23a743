use crate::encode::sink::{
    ChunkArtifact, ChunkBatch, ChunkSink, SinkConfig, check_batch, chunk_file_name, commit_part,
    part_path,
};
use crate::foundation::error::{VizError, VizResult};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use tiff::encoder::{TiffEncoder, TiffKind, colortype};

/// Writes each chunk as one multi-page RGB8 TIFF, `<dir>/chunk_<start>_<end>.tiff`.
///
/// Chunks too large for 32-bit offsets are written as BigTIFF.
#[derive(Debug)]
pub struct TiffChunkSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
}

impl TiffChunkSink {
    /// Create a sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ChunkSink for TiffChunkSink {
    fn name(&self) -> &'static str {
        "tiff"
    }

    fn begin(&mut self, cfg: &SinkConfig) -> VizResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(VizError::encode("tiff sink width/height must be non-zero"));
        }
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            VizError::encode(format!(
                "create output directory '{}': {e}",
                self.dir.display()
            ))
        })?;
        self.cfg = Some(cfg.clone());
        Ok(())
    }

    fn write_chunk(&mut self, batch: &ChunkBatch) -> VizResult<Vec<ChunkArtifact>> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| VizError::encode("tiff sink not started"))?;
        check_batch(cfg, batch)?;

        let path = self.dir.join(chunk_file_name(batch.range, "tiff"));
        let part = part_path(&path);
        let big = needs_bigtiff(batch.frames.len(), cfg.width, cfg.height);
        if big {
            tracing::debug!(chunk = %batch.range, "writing chunk as BigTIFF");
        }
        if let Err(e) = write_pages(&part, batch, big) {
            let _ = std::fs::remove_file(&part);
            return Err(e);
        }
        let artifact = commit_part(&part, &path)?;
        Ok(vec![artifact])
    }

    fn end(&mut self) -> VizResult<()> {
        self.cfg = None;
        Ok(())
    }
}

/// Room left for tags and strip tables on top of the pixel payload.
const PAGE_OVERHEAD_BYTES: u64 = 4096;

/// `true` when `pages` RGB8 pages of `width` x `height` may not fit classic TIFF's 32-bit offsets.
fn needs_bigtiff(pages: usize, width: u32, height: u32) -> bool {
    let page = u64::from(width) * u64::from(height) * 3 + PAGE_OVERHEAD_BYTES;
    (pages as u64).saturating_mul(page) > u64::from(u32::MAX)
}

fn write_pages(part: &Path, batch: &ChunkBatch, big: bool) -> VizResult<()> {
    let enc_err = |e: tiff::TiffError| VizError::encode(format!("tiff '{}': {e}", part.display()));
    let f = File::create(part)
        .map_err(|e| VizError::encode(format!("create '{}': {e}", part.display())))?;
    let mut w = BufWriter::new(f);
    if big {
        let mut enc = TiffEncoder::new_big(&mut w).map_err(enc_err)?;
        encode_frames(&mut enc, batch).map_err(enc_err)?;
    } else {
        let mut enc = TiffEncoder::new(&mut w).map_err(enc_err)?;
        encode_frames(&mut enc, batch).map_err(enc_err)?;
    }
    w.flush()
        .map_err(|e| VizError::encode(format!("flush '{}': {e}", part.display())))?;
    Ok(())
}

fn encode_frames<W: Write + Seek, K: TiffKind>(
    enc: &mut TiffEncoder<W, K>,
    batch: &ChunkBatch,
) -> tiff::TiffResult<()> {
    for frame in &batch.frames {
        enc.write_image::<colortype::RGB8>(frame.width, frame.height, &frame.data)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/tiff.rs"]
mod tests;
