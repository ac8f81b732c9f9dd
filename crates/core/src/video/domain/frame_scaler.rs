use crate::shared::frame::Frame;

/// Resamples a frame to an exact size.
pub trait FrameScaler: Send + Sync {
    fn scale(
        &self,
        frame: &Frame,
        width: u32,
        height: u32,
    ) -> Result<Frame, Box<dyn std::error::Error>>;
}
