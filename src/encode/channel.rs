use crate::foundation::error::{VizError, VizResult};

/// Reorder packed RGB8 pixels into packed BGR8.
///
/// Frames travel through compositing in RGB order; this is the only place that order changes.
pub fn rgb_to_bgr_into(dst: &mut [u8], src_rgb: &[u8]) -> VizResult<()> {
    if dst.len() != src_rgb.len() || !src_rgb.len().is_multiple_of(3) {
        return Err(VizError::encode(format!(
            "rgb_to_bgr_into expects equal-length rgb8 buffers, got {} and {}",
            dst.len(),
            src_rgb.len()
        )));
    }
    for (d, s) in dst.chunks_exact_mut(3).zip(src_rgb.chunks_exact(3)) {
        d[0] = s[2];
        d[1] = s[1];
        d[2] = s[0];
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/channel.rs"]
mod tests;
