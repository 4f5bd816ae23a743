use super::*;
use std::path::PathBuf;

fn write_csv(name: &str, contents: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "cellvis_tabular_{}_{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn trajectory_rows_accept_float_cells_and_extra_columns() {
    let path = write_csv(
        "tracks.csv",
        ",track_id,frame_y,x,y,area\n0,7,0,10.9,20.2,33\n1,7,3.0,12,22,31\n2,8,1,-4.7,5,30\n",
    );
    let rows = load_trajectory_rows(&path).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].track_id, 7);
    assert_eq!(rows[0].point.x, 10);
    assert_eq!(rows[0].point.y, 20);
    assert_eq!(rows[1].point.frame, FrameIndex(3));
    assert_eq!(rows[2].point.x, -4);
}

#[test]
fn frame_column_alias_is_accepted() {
    let path = write_csv("alias.csv", "x,y,frame,track_id\n1,2,5,9\n");
    let rows = load_trajectory_rows(&path).unwrap();
    assert_eq!(rows[0].point.frame, FrameIndex(5));
    assert_eq!(rows[0].track_id, 9);
}

#[test]
fn missing_required_column_is_fatal() {
    let path = write_csv("no_y.csv", "track_id,frame_y,x\n1,0,3\n");
    let err = load_trajectory_rows(&path).unwrap_err();
    assert!(matches!(err, VizError::Data(_)));
    assert!(err.to_string().contains("missing required column 'y'"), "{err}");

    let path = write_csv("no_id.csv", "frame_y,x,y\n0,3,4\n");
    let err = load_trajectory_rows(&path).unwrap_err();
    assert!(err.to_string().contains("'track_id'"), "{err}");
}

#[test]
fn empty_required_cell_reports_file_and_line() {
    let path = write_csv("gap.csv", "track_id,frame_y,x,y\n1,0,3,4\n1,,5,6\n");
    let err = load_trajectory_rows(&path).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("gap.csv:3"), "{msg}");
    assert!(msg.contains("'frame_y'"), "{msg}");
}

#[test]
fn negative_frame_is_rejected() {
    let path = write_csv("neg.csv", "track_id,frame_y,x,y\n1,-2,3,4\n");
    let err = load_trajectory_rows(&path).unwrap_err();
    assert!(err.to_string().contains("frame index must be >= 0"), "{err}");
}

#[test]
fn cell_labels_take_optional_track_ids() {
    let path = write_csv(
        "labels.csv",
        "frame_y,x,y,track_id\n4,10,11,3\n4,12,13,\n5,1,2,4.0\n",
    );
    let rows = load_cell_label_rows(&path).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].track_id, Some(3));
    assert_eq!(rows[1].track_id, None);
    assert_eq!(rows[2].frame, FrameIndex(5));
    assert_eq!(rows[2].track_id, Some(4));

    let path = write_csv("labels_no_id.csv", "frame_y,x,y\n0,1,1\n");
    let rows = load_cell_label_rows(&path).unwrap();
    assert_eq!(rows[0].track_id, None);
}

#[test]
fn unreadable_file_is_a_data_error() {
    let err = load_cell_label_rows("/no/such/labels.csv").unwrap_err();
    assert!(matches!(err, VizError::Data(_)));
    assert!(err.to_string().contains("/no/such/labels.csv"));
}
