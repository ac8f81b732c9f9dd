use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::encoding::frame_layout::{FrameLayout, LayoutError};
use crate::shared::frame::Frame;
use crate::video::domain::frame_scaler::FrameScaler;
use crate::video::domain::image_reader::ImageReader;

#[derive(Error, Debug)]
pub enum PrepareError {
    #[error("failed to decode {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },
    #[error("cannot fit {} into the stream: {source}", .path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: LayoutError,
    },
    #[error("failed to scale {}: {message}", .path.display())]
    Scale { path: PathBuf, message: String },
    #[error("frame worker panicked while preparing {}", .path.display())]
    Panicked { path: PathBuf },
}

/// Decoder and scaler shared by every preparation worker.
#[derive(Clone)]
pub struct FrameSources {
    pub reader: Arc<dyn ImageReader>,
    pub scaler: Arc<dyn FrameScaler>,
}

/// A frame ready for the writer, plus what happened to it on the way.
#[derive(Debug)]
pub struct PreparedFrame {
    pub frame: Frame,
    pub source: PathBuf,
    pub letterboxed: bool,
    pub prepare_ms: f64,
}

/// Receives prepared frames in sorted-file order.
pub type FrameSink<'a> = dyn FnMut(PreparedFrame) -> Result<(), Box<dyn std::error::Error>> + 'a;

/// Turns a sorted list of image paths into stream-sized frames.
///
/// Implementations may decode out of order but must hand frames to `sink`
/// in the order of `paths`, and must stop at the first error.
pub trait FramePreparer: Send {
    fn prepare(
        &self,
        paths: &[PathBuf],
        layout: &FrameLayout,
        sources: &FrameSources,
        sink: &mut FrameSink<'_>,
    ) -> Result<(), Box<dyn std::error::Error>>;
}

/// Decode → place → scale → compose for a single image.
pub fn prepare_frame(
    sources: &FrameSources,
    layout: &FrameLayout,
    path: &Path,
    index: usize,
) -> Result<PreparedFrame, PrepareError> {
    let start = Instant::now();

    let decoded = sources
        .reader
        .read(path, index)
        .map_err(|e| PrepareError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let placement = layout
        .place(decoded.width(), decoded.height())
        .map_err(|source| PrepareError::Layout {
            path: path.to_path_buf(),
            source,
        })?;

    let scaled = sources
        .scaler
        .scale(&decoded, placement.width, placement.height)
        .map_err(|e| PrepareError::Scale {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let letterboxed = placement.width != layout.width() || placement.height != layout.height();
    let frame = layout.compose(scaled, &placement);

    Ok(PreparedFrame {
        frame,
        source: path.to_path_buf(),
        letterboxed,
        prepare_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}

/// Prepares frames one at a time on the calling thread.
pub struct SequentialFramePreparer;

impl FramePreparer for SequentialFramePreparer {
    fn prepare(
        &self,
        paths: &[PathBuf],
        layout: &FrameLayout,
        sources: &FrameSources,
        sink: &mut FrameSink<'_>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        for (index, path) in paths.iter().enumerate() {
            sink(prepare_frame(sources, layout, path, index)?)?;
        }
        Ok(())
    }
}
