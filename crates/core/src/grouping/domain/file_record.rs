use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SubsecRound};

use crate::grouping::domain::group_error::GroupError;

/// Filesystem facts about one image, gathered before grouping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStat {
    pub path: PathBuf,
    pub filename: String,
    /// Local time, truncated to whole seconds.
    pub modification_time: DateTime<Local>,
    pub size: u64,
}

impl FileStat {
    pub fn read(path: &Path) -> Result<Self, GroupError> {
        let stat_error = |source| GroupError::Stat {
            path: path.to_path_buf(),
            source,
        };
        let metadata = fs::metadata(path).map_err(stat_error)?;
        let modified = metadata.modified().map_err(stat_error)?;

        Ok(Self {
            path: path.to_path_buf(),
            filename: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            modification_time: DateTime::<Local>::from(modified).trunc_subsecs(0),
            size: metadata.len(),
        })
    }

    pub fn into_record(self, group: u32) -> FileRecord {
        FileRecord {
            path: self.path,
            filename: self.filename,
            modification_time: self.modification_time,
            size: self.size,
            group,
        }
    }
}

/// One processed image and the group it was assigned to. Becomes one
/// manifest row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub filename: String,
    pub modification_time: DateTime<Local>,
    pub size: u64,
    pub group: u32,
}
