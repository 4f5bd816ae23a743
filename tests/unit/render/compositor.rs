use super::*;
use crate::config::MetadataConfig;
use crate::foundation::core::Rgb8;
use crate::overlay::mask::ClassColorMap;
use crate::overlay::tracking::{CellLabelRow, CellLabelSet};
use crate::overlay::trajectory::TrajectoryIndex;
use crate::source::RawPixels;

const GREEN: Rgb8 = Rgb8::new(0, 255, 0);

fn compositor(alpha: f32, markers: Vec<CellLabelRow>) -> FrameCompositor {
    let mut colors = ClassColorMap::new();
    colors.insert(1, Rgb8::new(255, 0, 0)).unwrap();
    FrameCompositor::new(
        MaskCompositor::new(&colors, alpha).unwrap(),
        TrackingOverlay::new(
            TrajectoryIndex::default(),
            vec![CellLabelSet::new("m", GREEN, markers)],
            None,
        ),
        MetadataOverlay::new(&MetadataConfig::default()),
        TextEngine::without_font(),
    )
}

fn gray(width: u32, height: u32, v: u8) -> RawFrame {
    RawFrame::new(
        width,
        height,
        RawPixels::Gray8(vec![v; (width * height) as usize]),
    )
    .unwrap()
}

#[test]
fn gray_frame_is_normalized_and_mask_blended() {
    let mut c = compositor(0.5, Vec::new());
    let mut mask = LabelMask::filled(4, 4, 0);
    mask.classes[5] = 1;
    let out = c.composite(&gray(4, 4, 100), &mask, FrameIndex(0)).unwrap();

    assert_eq!(out.pixel(0, 0), Some(Rgb8::new(100, 100, 100)));
    assert_eq!(out.pixel(1, 1), Some(Rgb8::new(178, 50, 50)));
}

#[test]
fn markers_are_not_attenuated_by_the_mask() {
    let marker = CellLabelRow {
        frame: FrameIndex(2),
        x: 10,
        y: 10,
        track_id: None,
    };
    let mut c = compositor(0.5, vec![marker]);
    let mask = LabelMask::filled(20, 20, 1);

    let at = c.composite(&gray(20, 20, 0), &mask, FrameIndex(2)).unwrap();
    let px = at.pixel(10, 10).unwrap();
    assert!(px.r <= 3 && px.g >= 252 && px.b <= 3, "{px:?}");
    assert_eq!(at.pixel(0, 0), Some(Rgb8::new(128, 0, 0)));

    let other = c.composite(&gray(20, 20, 0), &mask, FrameIndex(3)).unwrap();
    assert_eq!(other.pixel(10, 10), Some(Rgb8::new(128, 0, 0)));
}

#[test]
fn surface_follows_frame_size() {
    let mut c = compositor(0.3, Vec::new());
    let a = c
        .composite(&gray(8, 8, 1), &LabelMask::filled(8, 8, 0), FrameIndex(0))
        .unwrap();
    let b = c
        .composite(&gray(6, 4, 1), &LabelMask::filled(6, 4, 0), FrameIndex(1))
        .unwrap();
    assert_eq!((a.width, a.height), (8, 8));
    assert_eq!((b.width, b.height), (6, 4));
}

#[test]
fn mismatched_mask_is_a_shape_error() {
    let mut c = compositor(0.3, Vec::new());
    let err = c
        .composite(&gray(8, 8, 1), &LabelMask::filled(8, 7, 0), FrameIndex(4))
        .unwrap_err();
    assert!(matches!(err, VizError::ShapeMismatch(_)));
    assert!(err.to_string().contains("frame 4"));
}
