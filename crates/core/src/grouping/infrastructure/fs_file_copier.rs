use std::fs::{self, FileTimes};
use std::io;
use std::path::Path;

use crate::grouping::domain::file_copier::{CopyPolicy, FileCopier};
use crate::grouping::domain::group_error::GroupError;

/// Copies files with `std::fs::copy`, then restores the source's access and
/// modification times on the copy.
pub struct FsFileCopier {
    policy: CopyPolicy,
}

impl FsFileCopier {
    pub fn new(policy: CopyPolicy) -> Self {
        Self { policy }
    }
}

impl Default for FsFileCopier {
    fn default() -> Self {
        Self::new(CopyPolicy::default())
    }
}

impl FileCopier for FsFileCopier {
    fn copy_into(&self, source: &Path, dest_dir: &Path) -> Result<u64, GroupError> {
        fs::create_dir_all(dest_dir).map_err(|source| GroupError::CreateDir {
            path: dest_dir.to_path_buf(),
            source,
        })?;

        let file_name = source.file_name().ok_or_else(|| GroupError::Copy {
            from: source.to_path_buf(),
            to: dest_dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
        })?;
        let dest = dest_dir.join(file_name);

        if self.policy == CopyPolicy::FailOnConflict && dest.exists() {
            return Err(GroupError::DestinationExists(dest));
        }

        let copy_error = |e| GroupError::Copy {
            from: source.to_path_buf(),
            to: dest.clone(),
            source: e,
        };
        let bytes = fs::copy(source, &dest).map_err(copy_error)?;
        preserve_times(source, &dest).map_err(copy_error)?;
        Ok(bytes)
    }
}

fn preserve_times(source: &Path, dest: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);
    fs::OpenOptions::new()
        .write(true)
        .open(dest)?
        .set_times(times)
}
