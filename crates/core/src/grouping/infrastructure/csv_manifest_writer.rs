use std::path::{Path, PathBuf};

use crate::grouping::domain::file_record::FileRecord;
use crate::grouping::domain::group_error::GroupError;
use crate::grouping::domain::manifest_writer::ManifestWriter;
use crate::shared::constants::{MANIFEST_HEADER, MANIFEST_TIME_FORMAT};

/// Writes the manifest as CSV: `filename,modification_time,size,group`.
///
/// The file is created (or truncated) on each write and flushed before
/// returning. Rows end in CRLF.
pub struct CsvManifestWriter {
    path: PathBuf,
}

impl CsvManifestWriter {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

/// Manifest fields for one record, in header order.
pub fn manifest_row(record: &FileRecord) -> [String; 4] {
    [
        record.filename.clone(),
        record
            .modification_time
            .format(MANIFEST_TIME_FORMAT)
            .to_string(),
        record.size.to_string(),
        record.group.to_string(),
    ]
}

impl ManifestWriter for CsvManifestWriter {
    fn write(&mut self, records: &[FileRecord]) -> Result<(), GroupError> {
        let manifest_error = |source: csv::Error| GroupError::Manifest {
            path: self.path.clone(),
            source,
        };

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_path(&self.path)
            .map_err(manifest_error)?;

        writer
            .write_record(MANIFEST_HEADER)
            .map_err(manifest_error)?;
        for record in records {
            writer
                .write_record(manifest_row(record))
                .map_err(manifest_error)?;
        }
        writer
            .flush()
            .map_err(|e| manifest_error(csv::Error::from(e)))?;

        log::debug!(
            "Wrote {} manifest rows to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}
