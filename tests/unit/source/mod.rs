use super::memory::{MemoryFrames, MemoryMasks};
use super::*;

fn gray(w: u32, h: u32) -> RawFrame {
    RawFrame::new(w, h, RawPixels::Gray8(vec![0; (w * h) as usize])).unwrap()
}

#[test]
fn raw_frame_checks_sample_count() {
    assert!(RawFrame::new(2, 2, RawPixels::Rgb8(vec![0; 12])).is_ok());
    assert!(RawFrame::new(2, 2, RawPixels::Rgb8(vec![0; 4])).is_err());
    assert!(LabelMask::new(3, 1, vec![0, 1]).is_err());
}

#[test]
fn matching_sources_report_shape() {
    let frames = MemoryFrames::new(vec![gray(4, 3), gray(4, 3)]).unwrap();
    let masks = MemoryMasks::new(vec![LabelMask::filled(4, 3, 0); 2]).unwrap();
    let shape = check_sequence_shapes(&frames, &masks).unwrap();
    assert_eq!(
        shape,
        SequenceShape {
            num_frames: 2,
            width: 4,
            height: 3
        }
    );
}

#[test]
fn frame_count_mismatch_is_fatal() {
    let frames = MemoryFrames::new(vec![gray(4, 3); 3]).unwrap();
    let masks = MemoryMasks::new(vec![LabelMask::filled(4, 3, 0); 2]).unwrap();
    let err = check_sequence_shapes(&frames, &masks).unwrap_err();
    assert!(matches!(err, VizError::ShapeMismatch(_)));
    assert!(err.to_string().contains("3 frames"));
}

#[test]
fn spatial_mismatch_is_fatal() {
    let frames = MemoryFrames::new(vec![gray(4, 3)]).unwrap();
    let masks = MemoryMasks::new(vec![LabelMask::filled(3, 4, 0)]).unwrap();
    let err = check_sequence_shapes(&frames, &masks).unwrap_err();
    assert!(matches!(err, VizError::ShapeMismatch(_)));
}

#[test]
fn memory_sources_reject_mixed_sizes() {
    assert!(MemoryFrames::new(vec![gray(4, 3), gray(5, 3)]).is_err());
    assert!(
        MemoryMasks::new(vec![LabelMask::filled(2, 2, 0), LabelMask::filled(2, 3, 0)]).is_err()
    );
}
