//! Data structures describing the composed content of a portfolio report.
//!
//! The composer produces a flat list of [`ContentBlock`] values. They stay independent of the
//! rendering crate where possible so tests can inspect the composed document without rendering
//! it; only decoded image pixels are carried along so files are read exactly once.

use std::fmt;
use std::path::PathBuf;

use crate::styles::StyleName;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;
/// Typographic points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Converts typographic points to millimetres.
pub fn pt_to_mm(points: f64) -> f64 {
    points * MM_PER_INCH / POINTS_PER_INCH
}

/// Converts inches to millimetres.
pub fn inch_to_mm(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

/// Horizontal alignment of text blocks.
///
/// The variants map to [`genpdf::Alignment`]; `Justified` has no counterpart there and is
/// rendered left aligned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Fully justified paragraphs.
    Justified,
}

impl From<HorizontalAlignment> for genpdf::Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left | HorizontalAlignment::Justified => genpdf::Alignment::Left,
            HorizontalAlignment::Center => genpdf::Alignment::Center,
        }
    }
}

/// Width and height in millimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Creates dimensions from inch measurements.
    pub fn from_inches(width: f64, height: f64) -> Self {
        Self::new(inch_to_mm(width), inch_to_mm(height))
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// A run of text rendered with one of the named styles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBlock {
    pub text: String,
    pub style: StyleName,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, style: StyleName) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Two-column label/value table with a highlighted label column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataTable {
    rows: Vec<(String, String)>,
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row and returns the updated table.
    pub fn with_row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push((label.into(), value.into()));
        self
    }

    /// Returns the label/value pairs in insertion order.
    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }
}

/// Labelled rectangle shown in place of an image that could not be loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceholderBlock {
    pub label: String,
    pub size: Dimensions,
}

/// A decoded image together with the size it is drawn at.
#[derive(Clone)]
pub struct FittedImage {
    /// File the pixels were read from; `None` for in-memory sources.
    pub source: Option<PathBuf>,
    /// Natural size of the source, in millimetres at 72 dpi.
    pub natural: Dimensions,
    /// Size the image is drawn at.
    pub size: Dimensions,
    pub pixels: image::DynamicImage,
}

impl fmt::Debug for FittedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FittedImage")
            .field("source", &self.source)
            .field("natural", &self.natural)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl PartialEq for FittedImage {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.natural == other.natural && self.size == other.size
    }
}

/// Either a loaded image or its placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum Figure {
    Image(FittedImage),
    Placeholder(PlaceholderBlock),
}

impl Figure {
    /// Size the figure occupies on the page.
    pub fn size(&self) -> Dimensions {
        match self {
            Figure::Image(image) => image.size,
            Figure::Placeholder(placeholder) => placeholder.size,
        }
    }

    /// Returns the placeholder if the image could not be loaded.
    pub fn placeholder(&self) -> Option<&PlaceholderBlock> {
        match self {
            Figure::Placeholder(placeholder) => Some(placeholder),
            Figure::Image(_) => None,
        }
    }
}

/// One discrete renderable unit of the composed report.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentBlock {
    /// Title or section heading.
    Heading(TextBlock),
    /// Body text or a bullet line.
    Paragraph(TextBlock),
    /// Label/value metadata table.
    Table(MetadataTable),
    /// A single image stacked in the flow.
    Figure(Figure),
    /// One row of the image grid, cells left to right.
    ImageRow(Vec<Figure>),
    /// Vertical whitespace, in points.
    Spacer(f64),
}

impl ContentBlock {
    pub fn heading(text: impl Into<String>, style: StyleName) -> Self {
        Self::Heading(TextBlock::new(text, style))
    }

    pub fn paragraph(text: impl Into<String>, style: StyleName) -> Self {
        Self::Paragraph(TextBlock::new(text, style))
    }

    /// Returns the text of heading and paragraph blocks.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Heading(block) | Self::Paragraph(block) => Some(&block.text),
            _ => None,
        }
    }
}
