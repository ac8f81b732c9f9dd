use std::fmt;
use std::str::FromStr;

use ndarray::s;
use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("image has zero size ({width}x{height})")]
    ZeroDimension { width: u32, height: u32 },
    #[error(
        "image is {width}x{height}, which scales to {natural_height} rows at the stream width; \
         the stream is {stream_width}x{stream_height}"
    )]
    AspectMismatch {
        width: u32,
        height: u32,
        natural_height: u32,
        stream_width: u32,
        stream_height: u32,
    },
}

/// What to do with an image whose aspect ratio differs from the stream's.
///
/// The stream height is fixed by the first image, so later images with a
/// different aspect ratio cannot simply be scaled to the target width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameFit {
    /// Scale to fit inside the stream and centre on a black canvas.
    #[default]
    Letterbox,
    /// Refuse the image.
    Strict,
}

impl FromStr for FrameFit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "letterbox" => Ok(FrameFit::Letterbox),
            "strict" => Ok(FrameFit::Strict),
            other => Err(format!(
                "fit must be 'letterbox' or 'strict', got '{other}'"
            )),
        }
    }
}

impl fmt::Display for FrameFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameFit::Letterbox => f.write_str("letterbox"),
            FrameFit::Strict => f.write_str("strict"),
        }
    }
}

/// Height that preserves the aspect ratio of a `width`x`height` image
/// scaled to `target_width`, rounded to the nearest row.
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> Result<u32, LayoutError> {
    if width == 0 || height == 0 {
        return Err(LayoutError::ZeroDimension { width, height });
    }
    Ok(scale_dimension(height, target_width, width))
}

fn scale_dimension(value: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = (value as f64 * numerator as f64 / denominator as f64).round();
    (scaled as u32).max(1)
}

/// Where a scaled source image lands on the stream canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Output stream dimensions plus the policy for images that do not match
/// them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLayout {
    width: u32,
    height: u32,
    fit: FrameFit,
}

impl FrameLayout {
    pub fn new(width: u32, height: u32, fit: FrameFit) -> Self {
        Self { width, height, fit }
    }

    /// Derives the stream size from the first image in the sequence.
    pub fn from_first_image(
        width: u32,
        height: u32,
        target_width: u32,
        fit: FrameFit,
    ) -> Result<Self, LayoutError> {
        if target_width == 0 {
            return Err(LayoutError::ZeroDimension {
                width: target_width,
                height,
            });
        }
        let stream_height = scaled_height(width, height, target_width)?;
        Ok(Self::new(target_width, stream_height, fit))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fit(&self) -> FrameFit {
        self.fit
    }

    /// Computes the scaled size and offset for a `width`x`height` source.
    pub fn place(&self, width: u32, height: u32) -> Result<Placement, LayoutError> {
        let natural_height = scaled_height(width, height, self.width)?;
        if natural_height == self.height {
            return Ok(self.full_canvas());
        }

        match self.fit {
            FrameFit::Strict => Err(LayoutError::AspectMismatch {
                width,
                height,
                natural_height,
                stream_width: self.width,
                stream_height: self.height,
            }),
            FrameFit::Letterbox => {
                let (w, h) = if natural_height > self.height {
                    (
                        scale_dimension(width, self.height, height).min(self.width),
                        self.height,
                    )
                } else {
                    (self.width, natural_height)
                };
                Ok(Placement {
                    width: w,
                    height: h,
                    x: (self.width - w) / 2,
                    y: (self.height - h) / 2,
                })
            }
        }
    }

    /// Places an already-scaled frame on the stream canvas.
    ///
    /// `scaled` must have the size given by `placement`.
    pub fn compose(&self, scaled: Frame, placement: &Placement) -> Frame {
        if *placement == self.full_canvas() {
            return scaled;
        }

        let (x, y) = (placement.x as usize, placement.y as usize);
        let (w, h) = (placement.width as usize, placement.height as usize);

        let mut canvas = Frame::black(self.width, self.height, scaled.index());
        canvas
            .as_ndarray_mut()
            .slice_mut(s![y..y + h, x..x + w, ..])
            .assign(&scaled.as_ndarray());
        canvas
    }

    fn full_canvas(&self) -> Placement {
        Placement {
            width: self.width,
            height: self.height,
            x: 0,
            y: 0,
        }
    }
}
