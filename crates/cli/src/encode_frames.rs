use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use timelapse_core::encoding::frame_layout::FrameFit;
use timelapse_core::pipeline::encode_frames_use_case::{
    EncodeFramesUseCase, EncodeOptions, EncodeOutcome,
};
use timelapse_core::pipeline::frame_preparer::{FramePreparer, SequentialFramePreparer};
use timelapse_core::pipeline::infrastructure::threaded_frame_preparer::ThreadedFramePreparer;
use timelapse_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use timelapse_core::shared::constants::{DEFAULT_CODEC, DEFAULT_TARGET_WIDTH};
use timelapse_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;
use timelapse_core::video::infrastructure::image_file_reader::ImageFileReader;
use timelapse_core::video::infrastructure::image_scaler::ImageScaler;

/// Encode a folder of JPEG images into a video.
#[derive(Parser)]
#[command(name = "encode-frames")]
struct Cli {
    /// Folder containing JPEG images.
    image_folder: PathBuf,

    /// Name of the output video file.
    video_name: PathBuf,

    /// Frames per second for the video.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,

    /// Frame width in pixels; the height follows the first image's aspect ratio.
    #[arg(long, default_value_t = DEFAULT_TARGET_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Images with a different aspect ratio than the first: letterbox or strict.
    #[arg(long, default_value = "letterbox")]
    fit: FrameFit,

    /// ffmpeg encoder name.
    #[arg(long, default_value = DEFAULT_CODEC)]
    codec: String,

    /// Decode/resize worker threads (default: one per CPU, 1 = no threads).
    #[arg(long)]
    workers: Option<usize>,
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

    if !cli.image_folder.exists() {
        println!("The folder {} does not exist.", cli.image_folder.display());
        return Ok(());
    }

    let mut use_case = EncodeFramesUseCase::new(
        Arc::new(ImageFileReader::new()),
        Arc::new(ImageScaler::default()),
        Box::new(FfmpegWriter::new()),
        build_preparer(cli.workers),
        Box::new(StdoutPipelineLogger::new("frames", 25)),
    );

    let options = EncodeOptions {
        fps: cli.fps,
        target_width: cli.width,
        fit: cli.fit,
        codec: cli.codec,
    };

    match use_case.execute(&cli.image_folder, &cli.video_name, &options)? {
        EncodeOutcome::NoImages => {
            println!(
                "No JPG or JPEG files found in folder {}.",
                cli.image_folder.display()
            );
        }
        EncodeOutcome::Encoded {
            frames,
            width,
            height,
        } => {
            log::info!(
                "Wrote {frames} frames ({width}x{height}) to {}",
                cli.video_name.display()
            );
        }
    }

    Ok(())
}

fn build_preparer(workers: Option<usize>) -> Box<dyn FramePreparer> {
    match workers {
        Some(0 | 1) => Box::new(SequentialFramePreparer),
        Some(n) => Box::new(ThreadedFramePreparer::new(n)),
        None => Box::new(ThreadedFramePreparer::with_available_parallelism()),
    }
}
