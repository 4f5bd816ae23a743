use super::*;

#[test]
fn red_becomes_leading_byte_last() {
    let src = [255u8, 0, 0, 0, 128, 7];
    let mut dst = [0u8; 6];
    rgb_to_bgr_into(&mut dst, &src).unwrap();
    assert_eq!(dst, [0, 0, 255, 7, 128, 0]);
}

#[test]
fn applying_twice_restores_rgb() {
    let src: Vec<u8> = (0..30).collect();
    let mut bgr = vec![0u8; 30];
    let mut back = vec![0u8; 30];
    rgb_to_bgr_into(&mut bgr, &src).unwrap();
    rgb_to_bgr_into(&mut back, &bgr).unwrap();
    assert_eq!(back, src);
    assert_ne!(bgr, src);
}

#[test]
fn mismatched_buffers_are_rejected() {
    let mut dst = [0u8; 3];
    assert!(rgb_to_bgr_into(&mut dst, &[1, 2, 3, 4, 5, 6]).is_err());
    let mut dst = [0u8; 4];
    assert!(rgb_to_bgr_into(&mut dst, &[1, 2, 3, 4]).is_err());
}
