use crate::grouping::domain::file_record::FileRecord;
use crate::grouping::domain::group_error::GroupError;

/// Persists the processed file list.
pub trait ManifestWriter: Send {
    /// Writes the header and one row per record, in order. An empty slice
    /// still produces the header.
    fn write(&mut self, records: &[FileRecord]) -> Result<(), GroupError>;
}
