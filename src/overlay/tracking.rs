use crate::foundation::core::{FrameIndex, Rgb8};
use crate::overlay::painter::Painter;
use crate::overlay::text::TextEngine;
use crate::overlay::trajectory::{TrackId, TrajectoryIndex};
use std::collections::HashMap;

/// One point-in-time marker row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellLabelRow {
    /// Frame the marker is shown in.
    pub frame: FrameIndex,
    /// Column in pixels.
    pub x: i32,
    /// Row in pixels.
    pub y: i32,
    /// Identity shown next to the marker, if known.
    pub track_id: Option<TrackId>,
}

/// A named set of markers sharing one colour, indexed by frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellLabelSet {
    name: String,
    color: Rgb8,
    by_frame: HashMap<FrameIndex, Vec<CellLabelRow>>,
    len: usize,
}

impl CellLabelSet {
    /// Index `rows` by frame. Rows within a frame keep their input order.
    pub fn new(
        name: impl Into<String>,
        color: Rgb8,
        rows: impl IntoIterator<Item = CellLabelRow>,
    ) -> Self {
        let mut by_frame: HashMap<FrameIndex, Vec<CellLabelRow>> = HashMap::new();
        let mut len = 0;
        for row in rows {
            by_frame.entry(row.frame).or_default().push(row);
            len += 1;
        }
        Self {
            name: name.into(),
            color,
            by_frame,
            len,
        }
    }

    /// Set name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Marker colour.
    pub fn color(&self) -> Rgb8 {
        self.color
    }

    /// Rows shown in `frame`.
    pub fn rows_in_frame(&self, frame: FrameIndex) -> &[CellLabelRow] {
        self.by_frame.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` when the set has no rows.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Draws trajectory paths and cell markers for one frame.
#[derive(Clone, Debug, Default)]
pub struct TrackingOverlay {
    trajectories: TrajectoryIndex,
    labels: Vec<CellLabelSet>,
    track_id_color: Option<Rgb8>,
}

impl TrackingOverlay {
    /// Filled marker radius in pixels.
    pub const MARKER_RADIUS: f64 = 3.0;
    /// Trajectory stroke width in pixels.
    pub const LINE_WIDTH: f64 = 2.0;
    /// Offset of the track-id label's baseline origin from the marker centre.
    pub const TEXT_OFFSET: (i32, i32) = (5, 5);

    /// Build an overlay. Track ids are drawn next to markers only when `track_id_color` is set.
    pub fn new(
        trajectories: TrajectoryIndex,
        labels: Vec<CellLabelSet>,
        track_id_color: Option<Rgb8>,
    ) -> Self {
        Self {
            trajectories,
            labels,
            track_id_color,
        }
    }

    /// Trajectories drawn by this overlay.
    pub fn trajectories(&self) -> &TrajectoryIndex {
        &self.trajectories
    }

    /// Marker sets drawn by this overlay.
    pub fn labels(&self) -> &[CellLabelSet] {
        &self.labels
    }

    /// Draw paths visible at `frame`, then the markers of `frame`.
    pub fn draw(&self, painter: &mut Painter, text: &mut TextEngine, frame: FrameIndex) {
        let mut points = Vec::new();
        for track in self.trajectories.identities() {
            let path = track.visible_path(frame);
            if path.len() < 2 {
                continue;
            }
            points.clear();
            points.extend(path.iter().map(|p| (p.x, p.y)));
            painter.stroke_polyline(&points, track.color(), Self::LINE_WIDTH);
        }

        for set in &self.labels {
            for row in set.rows_in_frame(frame) {
                painter.fill_circle((row.x, row.y), Self::MARKER_RADIUS, set.color());
                if let (Some(color), Some(id)) = (self.track_id_color, row.track_id) {
                    let block = text.layout(&id.to_string());
                    let x = f64::from(row.x + Self::TEXT_OFFSET.0);
                    let baseline = f64::from(row.y + Self::TEXT_OFFSET.1);
                    painter.draw_text(&block, x, baseline - block.baseline, color);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/tracking.rs"]
mod tests;
