/// Stream parameters declared when an output video is opened.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub total_frames: usize,
    pub codec: String,
}
