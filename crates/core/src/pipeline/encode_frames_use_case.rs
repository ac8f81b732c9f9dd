use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::encoding::frame_layout::{FrameFit, FrameLayout};
use crate::pipeline::frame_preparer::{FramePreparer, FrameSources, PreparedFrame};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::constants::{DEFAULT_CODEC, DEFAULT_TARGET_WIDTH, ENCODABLE_EXTENSIONS};
use crate::shared::image_listing::list_images;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_scaler::FrameScaler;
use crate::video::domain::image_reader::ImageReader;
use crate::video::domain::video_writer::VideoWriter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    pub fps: u32,
    pub target_width: u32,
    pub fit: FrameFit,
    pub codec: String,
}

impl EncodeOptions {
    pub fn new(fps: u32) -> Self {
        Self {
            fps,
            target_width: DEFAULT_TARGET_WIDTH,
            fit: FrameFit::default(),
            codec: DEFAULT_CODEC.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeOutcome {
    /// The folder held no `.jpg`/`.jpeg` files; no video was created.
    NoImages,
    Encoded {
        frames: usize,
        width: u32,
        height: u32,
    },
}

/// Image folder → video pipeline: list → size stream from first image →
/// open writer → prepare frames → write in order → close.
pub struct EncodeFramesUseCase {
    sources: FrameSources,
    writer: Box<dyn VideoWriter>,
    preparer: Box<dyn FramePreparer>,
    logger: Box<dyn PipelineLogger>,
}

impl EncodeFramesUseCase {
    pub fn new(
        reader: Arc<dyn ImageReader>,
        scaler: Arc<dyn FrameScaler>,
        writer: Box<dyn VideoWriter>,
        preparer: Box<dyn FramePreparer>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            sources: FrameSources { reader, scaler },
            writer,
            preparer,
            logger,
        }
    }

    pub fn execute(
        &mut self,
        image_folder: &Path,
        output_path: &Path,
        options: &EncodeOptions,
    ) -> Result<EncodeOutcome, Box<dyn std::error::Error>> {
        let images = list_images(image_folder, ENCODABLE_EXTENSIONS)?;
        if images.is_empty() {
            self.logger.info(&format!(
                "No JPG or JPEG files found in folder {}",
                image_folder.display()
            ));
            return Ok(EncodeOutcome::NoImages);
        }

        let (first_w, first_h) = self.sources.reader.dimensions(&images[0])?;
        let layout =
            FrameLayout::from_first_image(first_w, first_h, options.target_width, options.fit)?;

        let metadata = VideoMetadata {
            width: layout.width(),
            height: layout.height(),
            fps: options.fps,
            total_frames: images.len(),
            codec: options.codec.clone(),
        };
        self.logger.info(&format!(
            "Encoding {} images into {} ({}x{} @ {} fps, fit={})",
            images.len(),
            output_path.display(),
            metadata.width,
            metadata.height,
            metadata.fps,
            layout.fit()
        ));

        self.writer.open(output_path, &metadata)?;
        let written = self.write_frames(&images, &layout);
        let closed = self.writer.close();
        let frames = written?;
        closed?;

        self.logger.summary();
        Ok(EncodeOutcome::Encoded {
            frames,
            width: layout.width(),
            height: layout.height(),
        })
    }

    fn write_frames(
        &mut self,
        images: &[PathBuf],
        layout: &FrameLayout,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let total = images.len();
        let writer = &mut self.writer;
        let logger = &mut self.logger;
        let mut written = 0;

        let mut sink = |prepared: PreparedFrame| -> Result<(), Box<dyn std::error::Error>> {
            logger.timing("prepare", prepared.prepare_ms);
            if prepared.letterboxed {
                log::warn!(
                    "{} does not match the stream aspect ratio; letterboxed",
                    prepared.source.display()
                );
                logger.count("letterboxed_frames", 1);
            }

            let start = Instant::now();
            writer.write(&prepared.frame)?;
            logger.timing("write", start.elapsed().as_secs_f64() * 1000.0);

            written += 1;
            logger.progress(written, total);
            Ok(())
        };

        self.preparer
            .prepare(images, layout, &self.sources, &mut sink)?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::frame_preparer::test_support::{FlatScaler, StubImageReader};
    use crate::pipeline::frame_preparer::SequentialFramePreparer;
    use crate::pipeline::infrastructure::threaded_frame_preparer::ThreadedFramePreparer;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::shared::frame::Frame;
    use std::sync::Mutex;

    // --- Stubs ---

    #[derive(Default)]
    struct Recorded {
        opened: Option<(PathBuf, VideoMetadata)>,
        frames: Vec<Frame>,
        closes: usize,
    }

    struct RecordingWriter {
        state: Arc<Mutex<Recorded>>,
        fail_on_write: Option<usize>,
    }

    impl RecordingWriter {
        fn new() -> (Self, Arc<Mutex<Recorded>>) {
            let state = Arc::new(Mutex::new(Recorded::default()));
            (
                Self {
                    state: state.clone(),
                    fail_on_write: None,
                },
                state,
            )
        }
    }

    impl VideoWriter for RecordingWriter {
        fn open(
            &mut self,
            path: &Path,
            metadata: &VideoMetadata,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.state.lock().unwrap().opened = Some((path.to_path_buf(), metadata.clone()));
            Ok(())
        }

        fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            let mut state = self.state.lock().unwrap();
            if Some(state.frames.len()) == self.fail_on_write {
                return Err("encoder rejected frame".into());
            }
            state.frames.push(frame.clone());
            Ok(())
        }

        fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.state.lock().unwrap().closes += 1;
            Ok(())
        }
    }

    // --- Helpers ---

    fn folder_with(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        dir
    }

    fn use_case(
        sizes: &[(&str, u32, u32)],
        writer: RecordingWriter,
        preparer: Box<dyn FramePreparer>,
    ) -> EncodeFramesUseCase {
        EncodeFramesUseCase::new(
            Arc::new(StubImageReader::new(sizes)),
            Arc::new(FlatScaler),
            Box::new(writer),
            preparer,
            Box::new(NullPipelineLogger),
        )
    }

    fn options(fps: u32, width: u32, fit: FrameFit) -> EncodeOptions {
        EncodeOptions {
            target_width: width,
            fit,
            ..EncodeOptions::new(fps)
        }
    }

    // --- Tests ---

    #[test]
    fn test_default_options() {
        let opts = EncodeOptions::new(24);
        assert_eq!(opts.fps, 24);
        assert_eq!(opts.target_width, 1920);
        assert_eq!(opts.fit, FrameFit::Letterbox);
        assert_eq!(opts.codec, "mpeg4");
    }

    #[test]
    fn test_no_images_never_opens_writer() {
        let dir = folder_with(&["notes.txt", "shot.png"]);
        let (writer, state) = RecordingWriter::new();
        let mut uc = use_case(&[], writer, Box::new(SequentialFramePreparer));

        let outcome = uc
            .execute(dir.path(), &dir.path().join("out.mp4"), &EncodeOptions::new(10))
            .unwrap();

        assert_eq!(outcome, EncodeOutcome::NoImages);
        let state = state.lock().unwrap();
        assert!(state.opened.is_none());
        assert_eq!(state.closes, 0);
    }

    #[test]
    fn test_n_images_produce_n_frames_at_target_width() {
        let names = ["c.jpg", "a.JPG", "b.jpeg"];
        let dir = folder_with(&names);
        let sizes: Vec<_> = names.iter().map(|n| (*n, 400, 300)).collect();
        let (writer, state) = RecordingWriter::new();
        let mut uc = use_case(&sizes, writer, Box::new(SequentialFramePreparer));

        let outcome = uc
            .execute(
                dir.path(),
                Path::new("out.mp4"),
                &options(5, 64, FrameFit::Strict),
            )
            .unwrap();

        assert_eq!(
            outcome,
            EncodeOutcome::Encoded {
                frames: 3,
                width: 64,
                height: 48
            }
        );
        let state = state.lock().unwrap();
        assert_eq!(state.frames.len(), 3);
        assert!(state.frames.iter().all(|f| f.width() == 64 && f.height() == 48));
        let indices: Vec<_> = state.frames.iter().map(|f| f.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(state.closes, 1);
    }

    #[test]
    fn test_stream_metadata_comes_from_first_sorted_image() {
        let dir = folder_with(&["b.jpg", "a.jpg"]);
        let (writer, state) = RecordingWriter::new();
        let mut uc = use_case(
            &[("a.jpg", 1000, 563), ("b.jpg", 1000, 563)],
            writer,
            Box::new(SequentialFramePreparer),
        );

        uc.execute(dir.path(), Path::new("clip.mp4"), &EncodeOptions::new(30))
            .unwrap();

        let state = state.lock().unwrap();
        let (path, meta) = state.opened.clone().unwrap();
        assert_eq!(path, PathBuf::from("clip.mp4"));
        assert_eq!(
            meta,
            VideoMetadata {
                width: 1920,
                height: 1081,
                fps: 30,
                total_frames: 2,
                codec: "mpeg4".to_string(),
            }
        );
    }

    #[test]
    fn test_letterbox_keeps_every_frame_at_stream_size() {
        let dir = folder_with(&["a.jpg", "b.jpg"]);
        let (writer, state) = RecordingWriter::new();
        let mut uc = use_case(
            &[("a.jpg", 400, 300), ("b.jpg", 160, 90)],
            writer,
            Box::new(SequentialFramePreparer),
        );

        uc.execute(
            dir.path(),
            Path::new("out.mp4"),
            &options(10, 80, FrameFit::Letterbox),
        )
        .unwrap();

        let state = state.lock().unwrap();
        assert!(state.frames.iter().all(|f| f.width() == 80 && f.height() == 60));
    }

    #[test]
    fn test_strict_divergent_aspect_fails_and_still_closes() {
        let dir = folder_with(&["a.jpg", "b.jpg"]);
        let (writer, state) = RecordingWriter::new();
        let mut uc = use_case(
            &[("a.jpg", 400, 300), ("b.jpg", 160, 90)],
            writer,
            Box::new(SequentialFramePreparer),
        );

        let err = uc
            .execute(
                dir.path(),
                Path::new("out.mp4"),
                &options(10, 80, FrameFit::Strict),
            )
            .unwrap_err();

        assert!(err.to_string().contains("b.jpg"));
        let state = state.lock().unwrap();
        assert_eq!(state.frames.len(), 1);
        assert_eq!(state.closes, 1);
    }

    #[test]
    fn test_writer_failure_propagates_and_closes() {
        let dir = folder_with(&["a.jpg", "b.jpg", "c.jpg"]);
        let (mut writer, state) = RecordingWriter::new();
        writer.fail_on_write = Some(1);
        let sizes = [("a.jpg", 40, 30), ("b.jpg", 40, 30), ("c.jpg", 40, 30)];
        let mut uc = use_case(&sizes, writer, Box::new(ThreadedFramePreparer::new(2)));

        let err = uc
            .execute(
                dir.path(),
                Path::new("out.mp4"),
                &options(10, 40, FrameFit::Strict),
            )
            .unwrap_err();

        assert_eq!(err.to_string(), "encoder rejected frame");
        assert_eq!(state.lock().unwrap().closes, 1);
    }

    #[test]
    fn test_unreadable_first_image_fails_before_open() {
        let dir = folder_with(&["a.jpg"]);
        let (writer, state) = RecordingWriter::new();
        let mut uc = use_case(&[], writer, Box::new(SequentialFramePreparer));

        assert!(uc
            .execute(dir.path(), Path::new("out.mp4"), &EncodeOptions::new(10))
            .is_err());
        assert!(state.lock().unwrap().opened.is_none());
    }

    #[test]
    fn test_threaded_and_sequential_agree() {
        let names: Vec<String> = (0..12).map(|i| format!("img_{i:02}.jpg")).collect();
        let refs: Vec<_> = names.iter().map(String::as_str).collect();
        let dir = folder_with(&refs);
        let sizes: Vec<_> = refs.iter().map(|n| (*n, 40, 30)).collect();

        let run = |preparer: Box<dyn FramePreparer>| {
            let (writer, state) = RecordingWriter::new();
            let mut uc = use_case(&sizes, writer, preparer);
            uc.execute(
                dir.path(),
                Path::new("out.mp4"),
                &options(10, 20, FrameFit::Strict),
            )
            .unwrap();
            let indices: Vec<_> = state.lock().unwrap().frames.iter().map(|f| f.index()).collect();
            indices
        };

        let sequential = run(Box::new(SequentialFramePreparer));
        let threaded = run(Box::new(ThreadedFramePreparer::new(4)));
        assert_eq!(sequential, threaded);
        assert_eq!(sequential.len(), 12);
    }

    #[test]
    fn test_missing_folder_is_error() {
        let (writer, _) = RecordingWriter::new();
        let mut uc = use_case(&[], writer, Box::new(SequentialFramePreparer));
        assert!(uc
            .execute(
                Path::new("/nonexistent/frames"),
                Path::new("out.mp4"),
                &EncodeOptions::new(10)
            )
            .is_err());
    }
}
