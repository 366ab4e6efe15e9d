//! Image loading and aspect-preserving fitting.
//!
//! Sources are decoded with the [`image`] crate. The natural size of an image is its pixel size
//! read as typographic points (72 dpi), which keeps small images from being blown up. Anything
//! that cannot be read or decoded is replaced by a [`PlaceholderBlock`] of the requested size.

use std::path::{Path, PathBuf};

use genpdf::error::{Context as _, Error};
use image::GenericImageView;
use log::{debug, warn};

use crate::model::{pt_to_mm, Dimensions, Figure, FittedImage, PlaceholderBlock};

/// Label printed on placeholder rectangles.
pub const PLACEHOLDER_LABEL: &str = "Portfolio Image";

/// Representation of image sources accepted by the fitter.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    /// Image loaded from raw bytes.
    Bytes(Vec<u8>),
    /// Image referenced by a file path.
    Path(PathBuf),
}

impl ImageSource {
    /// Creates a new in-memory image from raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Creates an image sourced from a file path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }
}

/// Loads an image from in-memory bytes using the [`image`] crate with descriptive errors.
pub fn decode_image_from_bytes(bytes: impl AsRef<[u8]>) -> Result<image::DynamicImage, Error> {
    image::load_from_memory(bytes.as_ref()).context("Failed to decode image from provided bytes")
}

/// Loads an image from the given path using the [`image`] crate with descriptive errors.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))
}

/// Size of a decoded image with one pixel per point.
pub fn natural_size(image: &image::DynamicImage) -> Dimensions {
    let (px_width, px_height) = image.dimensions();
    Dimensions::new(pt_to_mm(px_width as f64), pt_to_mm(px_height as f64))
}

/// Scales `source` to fit inside `bounds` while keeping its aspect ratio.
///
/// The longer side is fitted first and capped at its natural length; if the derived other side
/// still overflows its bound, that side is clamped and the first one re-derived.
pub fn fit_within(source: Dimensions, bounds: Dimensions) -> Dimensions {
    let aspect = source.aspect_ratio();

    if source.width >= source.height {
        let mut width = bounds.width.min(source.width);
        let mut height = width / aspect;
        if height > bounds.height {
            height = bounds.height;
            width = height * aspect;
        }
        Dimensions::new(width, height)
    } else {
        let mut height = bounds.height.min(source.height);
        let mut width = height * aspect;
        if width > bounds.width {
            width = bounds.width;
            height = width / aspect;
        }
        Dimensions::new(width, height)
    }
}

/// Builds the placeholder substituted for an unreadable image.
pub fn placeholder(bounds: Dimensions) -> PlaceholderBlock {
    PlaceholderBlock {
        label: PLACEHOLDER_LABEL.to_owned(),
        size: bounds,
    }
}

/// Resolves image sources into [`Figure`]s sized for a bounding box.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageFitter;

impl ImageFitter {
    pub fn new() -> Self {
        Self
    }

    /// Loads `source` and fits it into `bounds`, or returns a placeholder of exactly `bounds`.
    pub fn fit(&self, source: &ImageSource, bounds: Dimensions) -> Figure {
        match source {
            ImageSource::Path(path) => self.fit_path(path, bounds),
            ImageSource::Bytes(bytes) => self.fit_bytes(bytes, bounds),
        }
    }

    /// Loads the image file at `path` and fits it into `bounds`.
    pub fn fit_path(&self, path: &Path, bounds: Dimensions) -> Figure {
        let decoded = decode_image_from_path(path);
        self.fit_decoded(decoded, Some(path), bounds)
    }

    /// Decodes `bytes` and fits the image into `bounds`.
    pub fn fit_bytes(&self, bytes: &[u8], bounds: Dimensions) -> Figure {
        let decoded = decode_image_from_bytes(bytes);
        self.fit_decoded(decoded, None, bounds)
    }

    fn fit_decoded(
        &self,
        decoded: Result<image::DynamicImage, Error>,
        path: Option<&Path>,
        bounds: Dimensions,
    ) -> Figure {
        let origin = path
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<memory>".to_owned());

        let pixels = match decoded {
            Ok(pixels) => pixels,
            Err(err) => {
                warn!("Could not process image {}: {}", origin, err);
                return Figure::Placeholder(placeholder(bounds));
            }
        };

        let natural = natural_size(&pixels);
        if natural.width <= 0.0 || natural.height <= 0.0 {
            warn!("Could not process image {}: image has no pixels", origin);
            return Figure::Placeholder(placeholder(bounds));
        }

        let size = fit_within(natural, bounds);
        debug!(
            "Fitted image {} from {:.1}x{:.1}mm to {:.1}x{:.1}mm",
            origin, natural.width, natural.height, size.width, size.height
        );

        Figure::Image(FittedImage {
            source: path.map(Path::to_path_buf),
            natural,
            size,
            pixels,
        })
    }
}
