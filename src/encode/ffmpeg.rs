use crate::encode::channel::rgb_to_bgr_into;
use crate::encode::sink::{
    ChunkArtifact, ChunkBatch, ChunkSink, SinkConfig, check_batch, chunk_file_name, commit_part,
    part_path,
};
use crate::foundation::error::{VizError, VizResult};
use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Writes each chunk as one MJPEG AVI, `<dir>/chunk_<start>_<end>.avi`.
///
/// Every chunk spawns the system `ffmpeg`, streams raw BGR24 frames to its stdin and waits for
/// it to exit before the file is renamed into place.
#[derive(Debug)]
pub struct AviChunkSink {
    dir: PathBuf,
    quality: u8,
    cfg: Option<SinkConfig>,
    scratch: Vec<u8>,
}

impl AviChunkSink {
    /// MJPEG `-q:v` used when none is given.
    pub const DEFAULT_QUALITY: u8 = 2;

    /// Create a sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quality: Self::DEFAULT_QUALITY,
            cfg: None,
            scratch: Vec::new(),
        }
    }

    /// Set the MJPEG quantizer, 2 (best) to 31.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(2, 31);
        self
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn encode(&mut self, cfg: &SinkConfig, batch: &ChunkBatch, part: &Path) -> VizResult<()> {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "bgr24",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "mjpeg",
            "-q:v",
            &self.quality.to_string(),
            "-f",
            "avi",
        ]);
        cmd.arg(part);

        let mut child = cmd.spawn().map_err(|e| {
            VizError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| VizError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| VizError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok::<_, std::io::Error>(stderr_bytes)
        });

        let mut write_result = Ok(());
        for frame in &batch.frames {
            rgb_to_bgr_into(&mut self.scratch, &frame.data)?;
            if let Err(e) = stdin.write_all(&self.scratch) {
                write_result = Err(e);
                break;
            }
        }
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| VizError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| VizError::encode("ffmpeg stderr drain thread panicked"))?
            .map_err(|e| VizError::encode(format!("ffmpeg stderr read failed: {e}")))?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(VizError::encode(format!(
                "ffmpeg exited with status {status} for chunk {}: {}",
                batch.range,
                stderr.trim()
            )));
        }
        write_result.map_err(|e| {
            VizError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })
    }
}

impl ChunkSink for AviChunkSink {
    fn name(&self) -> &'static str {
        "avi"
    }

    fn begin(&mut self, cfg: &SinkConfig) -> VizResult<()> {
        if !cfg.fps.is_finite() || cfg.fps <= 0.0 {
            return Err(VizError::encode(format!("fps must be > 0, got {}", cfg.fps)));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(VizError::encode("avi sink width/height must be non-zero"));
        }
        if !is_ffmpeg_on_path() {
            return Err(VizError::encode(
                "ffmpeg is required for AVI encoding, but was not found on PATH",
            ));
        }
        ensure_dir(&self.dir)?;
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 3];
        self.cfg = Some(cfg.clone());
        Ok(())
    }

    fn write_chunk(&mut self, batch: &ChunkBatch) -> VizResult<Vec<ChunkArtifact>> {
        let cfg = self
            .cfg
            .clone()
            .ok_or_else(|| VizError::encode("avi sink not started"))?;
        check_batch(&cfg, batch)?;

        let path = self.dir.join(chunk_file_name(batch.range, "avi"));
        let part = part_path(&path);
        if let Err(e) = self.encode(&cfg, batch, &part) {
            let _ = std::fs::remove_file(&part);
            return Err(e);
        }
        Ok(vec![commit_part(&part, &path)?])
    }

    fn end(&mut self) -> VizResult<()> {
        self.cfg = None;
        self.scratch = Vec::new();
        Ok(())
    }
}

/// Ensure `dir` exists.
pub fn ensure_dir(dir: &Path) -> VizResult<()> {
    use anyhow::Context as _;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
