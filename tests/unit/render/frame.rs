use super::*;

#[test]
fn gray8_is_duplicated_into_three_channels() {
    let raw = RawFrame::new(2, 1, RawPixels::Gray8(vec![7, 200])).unwrap();
    let rgb = RgbFrame::from_raw(&raw);
    assert_eq!(rgb.data, vec![7, 7, 7, 200, 200, 200]);
}

#[test]
fn rgb8_passes_through_unchanged() {
    let raw = RawFrame::new(1, 2, RawPixels::Rgb8(vec![1, 2, 3, 4, 5, 6])).unwrap();
    let rgb = RgbFrame::from_raw(&raw);
    assert_eq!(rgb.data, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(rgb.pixel(0, 1), Some(Rgb8::new(4, 5, 6)));
    assert_eq!(rgb.pixel(1, 0), None);
}

#[test]
fn sixteen_bit_samples_are_scaled() {
    let raw = RawFrame::new(2, 1, RawPixels::Gray16(vec![0, u16::MAX])).unwrap();
    let rgb = RgbFrame::from_raw(&raw);
    assert_eq!(rgb.data, vec![0, 0, 0, 255, 255, 255]);
}

#[test]
fn new_checks_length() {
    assert!(RgbFrame::new(2, 2, vec![0; 12]).is_ok());
    assert!(RgbFrame::new(2, 2, vec![0; 11]).is_err());
}
