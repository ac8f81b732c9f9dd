use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::grouping::domain::group_error::GroupError;

/// What to do when the destination already holds a file of the same name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CopyPolicy {
    #[default]
    Overwrite,
    FailOnConflict,
}

impl FromStr for CopyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overwrite" => Ok(CopyPolicy::Overwrite),
            "fail" => Ok(CopyPolicy::FailOnConflict),
            other => Err(format!(
                "conflict policy must be 'overwrite' or 'fail', got '{other}'"
            )),
        }
    }
}

impl fmt::Display for CopyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyPolicy::Overwrite => f.write_str("overwrite"),
            CopyPolicy::FailOnConflict => f.write_str("fail"),
        }
    }
}

/// Copies a file into a directory, keeping its name.
pub trait FileCopier: Send {
    /// Creates `dest_dir` if needed and returns the number of bytes copied.
    fn copy_into(&self, source: &Path, dest_dir: &Path) -> Result<u64, GroupError>;
}
