use crate::foundation::core::{FrameIndex, Rgb8};
use std::collections::BTreeMap;

/// Identity of a tracked object.
pub type TrackId = i64;

/// One observation of a tracked object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackPoint {
    /// Frame the observation belongs to.
    pub frame: FrameIndex,
    /// Column in pixels.
    pub x: i32,
    /// Row in pixels.
    pub y: i32,
}

/// A raw trajectory row: one observation tagged with its identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrajectoryRow {
    /// Identity the observation belongs to.
    pub track_id: TrackId,
    /// The observation.
    pub point: TrackPoint,
}

/// Frame-ordered observations of one identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackIdentity {
    id: TrackId,
    points: Vec<TrackPoint>,
    color: Rgb8,
}

impl TrackIdentity {
    /// Identity id.
    pub fn id(&self) -> TrackId {
        self.id
    }

    /// All observations in ascending frame order.
    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    /// Display colour.
    pub fn color(&self) -> Rgb8 {
        self.color
    }

    /// Last frame this identity was observed in.
    pub fn last_frame(&self) -> FrameIndex {
        // Groups are never empty and are sorted by frame.
        self.points.last().map(|p| p.frame).unwrap_or(FrameIndex(0))
    }

    /// Observations up to and including `current`, or nothing once `current` is past the last
    /// observation.
    pub fn visible_path(&self, current: FrameIndex) -> &[TrackPoint] {
        if current > self.last_frame() {
            return &[];
        }
        let n = self.points.partition_point(|p| p.frame <= current);
        &self.points[..n]
    }
}

/// Trajectories grouped by identity, built once and queried per frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrajectoryIndex {
    tracks: BTreeMap<TrackId, TrackIdentity>,
}

impl TrajectoryIndex {
    /// Group `rows` by identity and sort each group by frame.
    ///
    /// Rows sharing an identity and a frame keep their input order.
    pub fn build(rows: impl IntoIterator<Item = TrajectoryRow>, color: Rgb8) -> Self {
        let mut grouped: BTreeMap<TrackId, Vec<TrackPoint>> = BTreeMap::new();
        for row in rows {
            grouped.entry(row.track_id).or_default().push(row.point);
        }
        let tracks = grouped
            .into_iter()
            .map(|(id, mut points)| {
                points.sort_by_key(|p| p.frame);
                (id, TrackIdentity { id, points, color })
            })
            .collect();
        Self { tracks }
    }

    /// Look up one identity.
    pub fn get(&self, id: TrackId) -> Option<&TrackIdentity> {
        self.tracks.get(&id)
    }

    /// Visible path of `id` at `current`; empty for unknown identities.
    pub fn visible_path(&self, id: TrackId, current: FrameIndex) -> &[TrackPoint] {
        self.tracks
            .get(&id)
            .map(|t| t.visible_path(current))
            .unwrap_or(&[])
    }

    /// All identities in ascending id order.
    pub fn identities(&self) -> impl Iterator<Item = &TrackIdentity> {
        self.tracks.values()
    }

    /// Number of identities.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// `true` when there are no identities.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/trajectory.rs"]
mod tests;
