use std::path::Path;

use crate::shared::frame::Frame;

/// Decodes still images into RGB frames.
pub trait ImageReader: Send + Sync {
    /// Returns `(width, height)` without decoding the pixel data.
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), Box<dyn std::error::Error>>;

    /// Decodes the image at `path`, tagging the frame with `index`.
    fn read(&self, path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>>;
}
