//! CSV ingestion of trajectory observations and cell markers.
//!
//! Columns are looked up by header name, so extra columns and any column order are accepted.
//! Numeric cells may be written as floats (`12.0`) and are truncated toward zero.

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{VizError, VizResult};
use crate::overlay::tracking::CellLabelRow;
use crate::overlay::trajectory::{TrackPoint, TrajectoryRow};
use std::path::Path;

const TRACK_ID: &str = "track_id";
const FRAME: &[&str] = &["frame_y", "frame"];
const X: &str = "x";
const Y: &str = "y";

struct Columns {
    track_id: Option<usize>,
    frame: usize,
    x: usize,
    y: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord, path: &Path) -> VizResult<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |names: &[&str]| {
            names
                .iter()
                .find_map(|n| find(n))
                .ok_or_else(|| missing_column(path, &names.join("' or '")))
        };
        Ok(Self {
            track_id: find(TRACK_ID),
            frame: require(FRAME)?,
            x: require(&[X])?,
            y: require(&[Y])?,
        })
    }
}

/// Load trajectory observations. Every row needs `track_id`, `frame_y`, `x` and `y`.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_trajectory_rows(path: impl AsRef<Path>) -> VizResult<Vec<TrajectoryRow>> {
    let path = path.as_ref();
    let mut rdr = open(path)?;
    let headers = rdr.headers().map_err(|e| csv_err(path, e))?.clone();
    let cols = Columns::resolve(&headers, path)?;
    let id_col = cols
        .track_id
        .ok_or_else(|| missing_column(path, TRACK_ID))?;

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec.map_err(|e| csv_err(path, e))?;
        let cell = Cell { path, rec: &rec };
        out.push(TrajectoryRow {
            track_id: cell.int(id_col, TRACK_ID)?,
            point: TrackPoint {
                frame: cell.frame(cols.frame)?,
                x: cell.coord(cols.x, X)?,
                y: cell.coord(cols.y, Y)?,
            },
        });
    }
    tracing::debug!(rows = out.len(), "loaded trajectory rows");
    Ok(out)
}

/// Load cell markers. `track_id` is optional, both as a column and per row.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_cell_label_rows(path: impl AsRef<Path>) -> VizResult<Vec<CellLabelRow>> {
    let path = path.as_ref();
    let mut rdr = open(path)?;
    let headers = rdr.headers().map_err(|e| csv_err(path, e))?.clone();
    let cols = Columns::resolve(&headers, path)?;

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec.map_err(|e| csv_err(path, e))?;
        let cell = Cell { path, rec: &rec };
        let track_id = match cols.track_id {
            Some(i) if !cell.is_blank(i) => Some(cell.int(i, TRACK_ID)?),
            _ => None,
        };
        out.push(CellLabelRow {
            frame: cell.frame(cols.frame)?,
            x: cell.coord(cols.x, X)?,
            y: cell.coord(cols.y, Y)?,
            track_id,
        });
    }
    tracing::debug!(rows = out.len(), "loaded cell label rows");
    Ok(out)
}

fn open(path: &Path) -> VizResult<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| csv_err(path, e))
}

fn csv_err(path: &Path, e: csv::Error) -> VizError {
    VizError::data(format!("{}: {e}", path.display()))
}

fn missing_column(path: &Path, name: &str) -> VizError {
    VizError::data(format!(
        "{}: missing required column '{name}'",
        path.display()
    ))
}

struct Cell<'a> {
    path: &'a Path,
    rec: &'a csv::StringRecord,
}

impl Cell<'_> {
    fn line(&self) -> u64 {
        self.rec.position().map(|p| p.line()).unwrap_or(0)
    }

    fn is_blank(&self, i: usize) -> bool {
        self.rec.get(i).is_none_or(|s| s.is_empty())
    }

    fn number(&self, i: usize, name: &str) -> VizResult<f64> {
        let raw = self.rec.get(i).unwrap_or("");
        if raw.is_empty() {
            return Err(VizError::data(format!(
                "{}:{}: missing value for '{name}'",
                self.path.display(),
                self.line()
            )));
        }
        let v: f64 = raw.parse().map_err(|_| {
            VizError::data(format!(
                "{}:{}: '{name}' is not a number: '{raw}'",
                self.path.display(),
                self.line()
            ))
        })?;
        if !v.is_finite() {
            return Err(VizError::data(format!(
                "{}:{}: '{name}' must be finite, got '{raw}'",
                self.path.display(),
                self.line()
            )));
        }
        Ok(v.trunc())
    }

    fn int(&self, i: usize, name: &str) -> VizResult<i64> {
        let v = self.number(i, name)?;
        if v < i64::MIN as f64 || v > i64::MAX as f64 {
            return Err(VizError::data(format!(
                "{}:{}: '{name}' out of range: {v}",
                self.path.display(),
                self.line()
            )));
        }
        Ok(v as i64)
    }

    fn coord(&self, i: usize, name: &str) -> VizResult<i32> {
        let v = self.int(i, name)?;
        i32::try_from(v).map_err(|_| {
            VizError::data(format!(
                "{}:{}: '{name}' out of range: {v}",
                self.path.display(),
                self.line()
            ))
        })
    }

    fn frame(&self, i: usize) -> VizResult<FrameIndex> {
        let v = self.int(i, FRAME[0])?;
        u64::try_from(v).map(FrameIndex).map_err(|_| {
            VizError::data(format!(
                "{}:{}: frame index must be >= 0, got {v}",
                self.path.display(),
                self.line()
            ))
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/tabular.rs"]
mod tests;
