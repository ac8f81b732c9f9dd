/// Extensions picked up by the frame encoder.
pub const ENCODABLE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Extensions picked up by the temporal grouper.
pub const GROUPABLE_EXTENSIONS: &[&str] = &["jpg"];

pub const DEFAULT_TARGET_WIDTH: u32 = 1920;

/// ffmpeg encoder name; MPEG-4 Part 2, the `mp4v` fourcc.
pub const DEFAULT_CODEC: &str = "mpeg4";

/// Consecutive files further apart than this start a new group.
pub const GROUP_GAP_SECONDS: i64 = 3;

pub const GROUP_DIR_PREFIX: &str = "group_";

pub const DEFAULT_GROUP_SOURCE_DIR: &str = "timelaps";

pub const MANIFEST_FILE_NAME: &str = "file_info.csv";

pub const MANIFEST_HEADER: [&str; 4] = ["filename", "modification_time", "size", "group"];

pub const MANIFEST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
