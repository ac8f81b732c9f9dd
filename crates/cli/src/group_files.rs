use std::path::PathBuf;
use std::process;

use clap::Parser;

use timelapse_core::grouping::domain::file_copier::CopyPolicy;
use timelapse_core::grouping::infrastructure::csv_manifest_writer::CsvManifestWriter;
use timelapse_core::grouping::infrastructure::fs_file_copier::FsFileCopier;
use timelapse_core::pipeline::group_files_use_case::GroupFilesUseCase;
use timelapse_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use timelapse_core::shared::constants::{DEFAULT_GROUP_SOURCE_DIR, MANIFEST_FILE_NAME};

/// Group JPG files by modification time and copy each group into its own folder.
#[derive(Parser)]
#[command(name = "group-files")]
struct Cli {
    /// Directory holding the JPG files.
    #[arg(default_value = DEFAULT_GROUP_SOURCE_DIR)]
    directory: PathBuf,

    /// Where to write the CSV manifest.
    #[arg(long, default_value = MANIFEST_FILE_NAME)]
    manifest: PathBuf,

    /// When a group folder already holds a file of the same name: overwrite or fail.
    #[arg(long, default_value = "overwrite")]
    on_conflict: CopyPolicy,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut use_case = GroupFilesUseCase::new(
        Box::new(FsFileCopier::new(cli.on_conflict)),
        Box::new(CsvManifestWriter::new(&cli.manifest)),
        Box::new(StdoutPipelineLogger::new("files", 50)),
    );

    let summary = use_case.execute(&cli.directory)?;
    log::info!(
        "Copied {} files into {} groups",
        summary.records.len(),
        summary.groups
    );
    println!(
        "File information has been saved to {}",
        cli.manifest.display()
    );
    Ok(())
}
