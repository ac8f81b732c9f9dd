use std::path::Path;

use crate::shared::frame::{Frame, RGB_CHANNELS};
use crate::video::domain::image_reader::ImageReader;

/// Decodes JPEG (and any other format the `image` crate knows) into RGB8
/// frames.
///
/// Stateless, so one instance can be shared across preparation workers.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), Box<dyn std::error::Error>> {
        Ok(image::image_dimensions(path)?)
    }

    fn read(&self, path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
        let rgb = image::open(path)?.into_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Frame::new(
            rgb.into_raw(),
            width,
            height,
            RGB_CHANNELS,
            index,
        ))
    }
}
