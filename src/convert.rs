//! Pixel-format conversion for the preview path.

/// Swap the R and B channels of packed 8-bit, 3-channel pixel data in place.
///
/// Works in both directions (RGB -> BGR and back). A trailing partial pixel
/// is left untouched.
pub fn rgb_to_bgr_in_place(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
}
