use std::fs;
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use timelapse_core::grouping::domain::file_copier::CopyPolicy;
use timelapse_core::grouping::domain::group_error::GroupError;
use timelapse_core::grouping::infrastructure::csv_manifest_writer::CsvManifestWriter;
use timelapse_core::grouping::infrastructure::fs_file_copier::FsFileCopier;
use timelapse_core::pipeline::group_files_use_case::{GroupFilesUseCase, GroupingSummary};
use timelapse_core::pipeline::pipeline_logger::NullPipelineLogger;

const T0: u64 = 1_650_000_000;

fn shot(dir: &Path, name: &str, offset_secs: u64, len: usize) {
    let path = dir.join(name);
    let contents: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    fs::write(&path, contents).unwrap();
    fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(UNIX_EPOCH + Duration::from_secs(T0 + offset_secs))
        .unwrap();
}

fn run(source: &Path, manifest: &Path, policy: CopyPolicy) -> Result<GroupingSummary, GroupError> {
    GroupFilesUseCase::new(
        Box::new(FsFileCopier::new(policy)),
        Box::new(CsvManifestWriter::new(manifest)),
        Box::new(NullPipelineLogger),
    )
    .execute(source)
}

fn manifest_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_groups_copies_and_manifest() {
    let work = tempfile::tempdir().unwrap();
    let source = work.path().join("timelaps");
    fs::create_dir(&source).unwrap();
    shot(&source, "IMG_001.jpg", 0, 100);
    shot(&source, "IMG_002.jpg", 1, 200);
    shot(&source, "IMG_003.jpg", 5, 300);
    shot(&source, "IMG_004.jpg", 6, 400);
    fs::write(source.join("readme.txt"), b"ignored").unwrap();
    let manifest = work.path().join("file_info.csv");

    let summary = run(&source, &manifest, CopyPolicy::Overwrite).unwrap();

    assert_eq!(summary.groups, 2);
    assert_eq!(summary.bytes_copied, 1000);

    for (name, group) in [
        ("IMG_001.jpg", 1),
        ("IMG_002.jpg", 1),
        ("IMG_003.jpg", 2),
        ("IMG_004.jpg", 2),
    ] {
        let copy = source.join(format!("group_{group}")).join(name);
        assert_eq!(fs::read(&copy).unwrap(), fs::read(source.join(name)).unwrap());
        assert_eq!(
            fs::metadata(&copy).unwrap().modified().unwrap(),
            fs::metadata(source.join(name)).unwrap().modified().unwrap()
        );
    }
    assert!(!source.join("group_3").exists());

    let lines = manifest_lines(&manifest);
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "filename,modification_time,size,group");
    let groups: Vec<_> = lines[1..]
        .iter()
        .map(|l| l.rsplit(',').next().unwrap().to_string())
        .collect();
    assert_eq!(groups, vec!["1", "1", "2", "2"]);
    assert!(lines[3].starts_with("IMG_003.jpg,"));
    assert!(lines[3].contains(",300,"));
}

#[test]
fn test_empty_directory_writes_header_only() {
    let work = tempfile::tempdir().unwrap();
    let source = work.path().join("empty");
    fs::create_dir(&source).unwrap();
    let manifest = work.path().join("file_info.csv");

    let summary = run(&source, &manifest, CopyPolicy::Overwrite).unwrap();

    assert_eq!(summary.groups, 0);
    assert_eq!(
        manifest_lines(&manifest),
        vec!["filename,modification_time,size,group"]
    );
    assert_eq!(fs::read_dir(&source).unwrap().count(), 0);
}

#[test]
fn test_rerun_produces_identical_manifest() {
    let work = tempfile::tempdir().unwrap();
    let source = work.path().join("shots");
    fs::create_dir(&source).unwrap();
    for i in 0..6 {
        shot(&source, &format!("{i:02}.jpg"), i * 2 + (i / 3) * 10, 50);
    }
    let manifest = work.path().join("file_info.csv");

    run(&source, &manifest, CopyPolicy::Overwrite).unwrap();
    let first = fs::read(&manifest).unwrap();
    run(&source, &manifest, CopyPolicy::Overwrite).unwrap();
    let second = fs::read(&manifest).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_fail_on_conflict_rejects_second_run() {
    let work = tempfile::tempdir().unwrap();
    let source = work.path().join("shots");
    fs::create_dir(&source).unwrap();
    shot(&source, "a.jpg", 0, 10);
    let manifest = work.path().join("file_info.csv");

    run(&source, &manifest, CopyPolicy::FailOnConflict).unwrap();
    let err = run(&source, &manifest, CopyPolicy::FailOnConflict).unwrap_err();

    assert!(matches!(err, GroupError::DestinationExists(_)));
}

#[test]
fn test_missing_directory_is_reported() {
    let work = tempfile::tempdir().unwrap();
    let manifest = work.path().join("file_info.csv");

    let err = run(&work.path().join("timelaps"), &manifest, CopyPolicy::Overwrite).unwrap_err();

    assert!(err.to_string().contains("does not exist"));
    assert!(!manifest.exists());
}
