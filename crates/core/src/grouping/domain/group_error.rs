use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupError {
    #[error("source directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),
    #[error("failed to list {}: {source}", .path.display())]
    Listing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read metadata of {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} already exists", .0.display())]
    DestinationExists(PathBuf),
    #[error("failed to write manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
