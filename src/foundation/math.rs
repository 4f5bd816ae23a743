pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Linear blend `base * (1 - alpha) + over * alpha`, rounded and saturated to `u8`.
pub(crate) fn lerp_u8(base: u8, over: u8, alpha: f32) -> u8 {
    let v = f32::from(base) * (1.0 - alpha) + f32::from(over) * alpha;
    v.round().clamp(0.0, 255.0) as u8
}

/// Composite one premultiplied RGBA8 source pixel over an opaque RGB8 destination pixel.
pub(crate) fn premul_over_rgb(dst: &mut [u8], src: [u8; 4]) {
    let a = src[3];
    if a == 0 {
        return;
    }
    if a == 255 {
        dst.copy_from_slice(&src[..3]);
        return;
    }
    let inv = 255u16 - u16::from(a);
    for (d, s) in dst.iter_mut().zip(&src[..3]) {
        let v = u16::from(*s) + mul_div255_u16(u16::from(*d), inv);
        *d = v.min(255) as u8;
    }
}

/// Scale a 16-bit sample to 8 bits, rounding to nearest.
pub(crate) fn u16_to_u8(v: u16) -> u8 {
    ((u32::from(v) * 255 + 32_767) / 65_535) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
