use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, TimeDelta};

use crate::grouping::domain::file_record::{FileRecord, FileStat};
use crate::shared::constants::{GROUP_DIR_PREFIX, GROUP_GAP_SECONDS};

/// Accumulator carried through the grouping fold.
///
/// Times are local wall-clock readings, so a DST shift between two shots
/// counts toward the gap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupingState {
    pub current_group: u32,
    pub last_time: Option<NaiveDateTime>,
}

impl Default for GroupingState {
    fn default() -> Self {
        Self {
            current_group: 1,
            last_time: None,
        }
    }
}

impl GroupingState {
    /// Moves to the next group when `time` is more than `gap` after the
    /// previous file. Equal, smaller or negative gaps stay in the group.
    pub fn advance(self, time: NaiveDateTime, gap: TimeDelta) -> Self {
        let current_group = match self.last_time {
            Some(last) if time - last > gap => self.current_group + 1,
            _ => self.current_group,
        };
        Self {
            current_group,
            last_time: Some(time),
        }
    }
}

/// Splits a sorted file sequence into runs whose consecutive modification
/// times are at most three seconds apart.
///
/// Groups follow the input order, not timestamp order: an older file that
/// sorts later by name joins whatever group is current.
#[derive(Clone, Copy, Debug)]
pub struct TemporalGrouper {
    gap: TimeDelta,
}

impl TemporalGrouper {
    pub fn new() -> Self {
        Self {
            gap: TimeDelta::seconds(GROUP_GAP_SECONDS),
        }
    }

    pub fn gap(&self) -> TimeDelta {
        self.gap
    }

    pub fn assign(&self, stats: impl IntoIterator<Item = FileStat>) -> Vec<FileRecord> {
        let (_, records) = stats.into_iter().fold(
            (GroupingState::default(), Vec::new()),
            |(state, mut records), stat| {
                let state = state.advance(stat.modification_time.naive_local(), self.gap);
                records.push(stat.into_record(state.current_group));
                (state, records)
            },
        );
        records
    }
}

impl Default for TemporalGrouper {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of distinct groups in an assigned sequence.
pub fn group_count(records: &[FileRecord]) -> u32 {
    records.last().map(|r| r.group).unwrap_or(0)
}

/// `<root>/group_<N>`
pub fn group_dir(root: &Path, group: u32) -> PathBuf {
    root.join(format!("{GROUP_DIR_PREFIX}{group}"))
}
