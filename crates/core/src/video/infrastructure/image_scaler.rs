use image::imageops::FilterType;

use crate::shared::frame::{Frame, RGB_CHANNELS};
use crate::video::domain::frame_scaler::FrameScaler;

/// Resizes frames with `image::imageops::resize`.
pub struct ImageScaler {
    filter: FilterType,
}

impl ImageScaler {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for ImageScaler {
    fn default() -> Self {
        Self::new(FilterType::Triangle)
    }
}

impl FrameScaler for ImageScaler {
    fn scale(
        &self,
        frame: &Frame,
        width: u32,
        height: u32,
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        if frame.channels() != RGB_CHANNELS {
            return Err(format!("expected RGB frame, got {} channels", frame.channels()).into());
        }
        if frame.width() == width && frame.height() == height {
            return Ok(frame.clone());
        }

        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;
        let resized = image::imageops::resize(&img, width, height, self.filter);

        Ok(Frame::new(
            resized.into_raw(),
            width,
            height,
            RGB_CHANNELS,
            frame.index(),
        ))
    }
}
