//! Chunk output sinks.
//!
//! Sinks receive one composited chunk at a time, in ascending frame order, and commit one file
//! per chunk before the next chunk is produced.

/// RGB to BGR reordering for encoders that expect BGR input.
pub mod channel;
/// `ffmpeg`-based AVI output.
pub mod ffmpeg;
/// Sink trait and built-in sinks.
pub mod sink;
/// Multi-page TIFF output.
pub mod tiff;
