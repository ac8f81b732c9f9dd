use std::path::Path;
use std::time::Instant;

use crate::grouping::domain::file_copier::FileCopier;
use crate::grouping::domain::file_record::{FileRecord, FileStat};
use crate::grouping::domain::group_error::GroupError;
use crate::grouping::domain::manifest_writer::ManifestWriter;
use crate::grouping::domain::temporal_grouper::{group_count, group_dir, TemporalGrouper};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::constants::GROUPABLE_EXTENSIONS;
use crate::shared::image_listing::list_images;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupingSummary {
    pub records: Vec<FileRecord>,
    pub groups: u32,
    pub bytes_copied: u64,
}

/// Directory → groups pipeline: list → stat → assign groups → copy into
/// `group_<N>` → write manifest.
///
/// Any failure aborts the run. Directories and copies made before the
/// failure are left in place.
pub struct GroupFilesUseCase {
    grouper: TemporalGrouper,
    copier: Box<dyn FileCopier>,
    manifest: Box<dyn ManifestWriter>,
    logger: Box<dyn PipelineLogger>,
}

impl GroupFilesUseCase {
    pub fn new(
        copier: Box<dyn FileCopier>,
        manifest: Box<dyn ManifestWriter>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            grouper: TemporalGrouper::new(),
            copier,
            manifest,
            logger,
        }
    }

    pub fn execute(&mut self, source_dir: &Path) -> Result<GroupingSummary, GroupError> {
        if !source_dir.exists() {
            return Err(GroupError::MissingDirectory(source_dir.to_path_buf()));
        }

        let paths =
            list_images(source_dir, GROUPABLE_EXTENSIONS).map_err(|source| GroupError::Listing {
                path: source_dir.to_path_buf(),
                source,
            })?;
        self.logger.info(&format!(
            "Found {} JPG files in {}",
            paths.len(),
            source_dir.display()
        ));

        let stats = paths
            .iter()
            .map(|path| FileStat::read(path))
            .collect::<Result<Vec<_>, _>>()?;
        let records = self.grouper.assign(stats);

        let total = records.len();
        let mut bytes_copied = 0;
        for (i, record) in records.iter().enumerate() {
            let start = Instant::now();
            let bytes = self
                .copier
                .copy_into(&record.path, &group_dir(source_dir, record.group))?;
            self.logger
                .timing("copy", start.elapsed().as_secs_f64() * 1000.0);
            self.logger.count("bytes_copied", bytes);
            bytes_copied += bytes;
            self.logger.progress(i + 1, total);
        }

        self.manifest.write(&records)?;

        let groups = group_count(&records);
        self.logger.count("groups", u64::from(groups));
        self.logger.summary();

        Ok(GroupingSummary {
            records,
            groups,
            bytes_copied,
        })
    }
}
