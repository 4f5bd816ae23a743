use super::*;

#[test]
fn lerp_endpoints_are_exact() {
    for base in [0u8, 1, 77, 128, 254, 255] {
        for over in [0u8, 13, 200, 255] {
            assert_eq!(lerp_u8(base, over, 0.0), base);
            assert_eq!(lerp_u8(base, over, 1.0), over);
        }
    }
}

#[test]
fn lerp_half_rounds() {
    assert_eq!(lerp_u8(100, 255, 0.5), 178);
    assert_eq!(lerp_u8(0, 255, 0.3), 77);
}

#[test]
fn premul_over_rgb_handles_alpha_extremes() {
    let mut px = [10u8, 20, 30];
    premul_over_rgb(&mut px, [200, 0, 0, 0]);
    assert_eq!(px, [10, 20, 30]);

    premul_over_rgb(&mut px, [1, 2, 3, 255]);
    assert_eq!(px, [1, 2, 3]);
}

#[test]
fn premul_over_rgb_half_coverage() {
    let mut px = [0u8, 0, 200];
    // 50% red, premultiplied.
    premul_over_rgb(&mut px, [128, 0, 0, 128]);
    assert_eq!(px[0], 128);
    assert_eq!(px[1], 0);
    assert_eq!(px[2], 100);
}

#[test]
fn u16_to_u8_scales_full_range() {
    assert_eq!(u16_to_u8(0), 0);
    assert_eq!(u16_to_u8(u16::MAX), 255);
    assert_eq!(u16_to_u8(32_896), 128);
}
