//! Image Validator
//!
//! Decides whether raw bytes decode to a usable grayscale raster.

/// Check that `bytes` decode to a non-empty 2D grayscale image.
///
/// Never fails: unparseable input, unsupported formats, and zero-area
/// rasters all yield `false`.
pub fn is_valid_image(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }

    let image = match image::load_from_memory(bytes) {
        Ok(image) => image,
        Err(e) => {
            tracing::debug!(len = bytes.len(), error = %e, "image decode failed");
            return false;
        }
    };

    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    width > 0 && height > 0
}
