//! Per-frame compositing and the chunked streaming controller.

/// Per-frame orchestrator.
pub mod compositor;
/// Composited RGB8 frames.
pub mod frame;
/// Chunk planning and the sequential run loop.
pub mod pipeline;
