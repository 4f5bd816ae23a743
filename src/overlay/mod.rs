//! Per-frame overlays: mask blending, trajectories and markers, scale/time metadata.

/// Class-coloured mask blending.
pub mod mask;
/// Elapsed-time label and scale bar.
pub mod metadata;
/// Vector overlay surface.
pub mod painter;
/// Label shaping.
pub mod text;
/// Trajectory paths and cell markers.
pub mod tracking;
/// Trajectory grouping and visibility queries.
pub mod trajectory;
