//! Custom `genpdf` elements used by the report renderer.
//!
//! `genpdf` sizes images from their pixel count and a fixed DPI, so the figure element rescales
//! the decoded pixels until they cover exactly the size chosen by the image fitter. Placeholders
//! reuse the same path with a generated grey raster and a centered label drawn on top.

use genpdf::elements::{Image, Paragraph};
use genpdf::error::Error;
use genpdf::style::Style;
use genpdf::{render, Alignment, Element, Mm, Position, RenderResult, Scale, Size};
use image::{DynamicImage, GenericImageView, ImageBuffer, Rgb};

use crate::model::{Dimensions, Figure, MM_PER_INCH};

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const PLACEHOLDER_LABEL_FONT_SIZE: u8 = 12;
const PLACEHOLDER_RASTER_WIDTH: u32 = 240;
const PLACEHOLDER_BORDER_PX: u32 = 2;
const PLACEHOLDER_FILL: [u8; 3] = [211, 211, 211];
const PLACEHOLDER_STROKE: [u8; 3] = [128, 128, 128];

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

fn estimated_image_size(image: &DynamicImage, dpi: f64) -> Dimensions {
    let (px_width, px_height) = image.dimensions();
    Dimensions::new(
        MM_PER_INCH * (px_width as f64) / dpi,
        MM_PER_INCH * (px_height as f64) / dpi,
    )
}

/// Builds a `genpdf` image that renders at exactly `target`.
fn scaled_image(pixels: &DynamicImage, target: Dimensions) -> Result<Image, Error> {
    // genpdf rejects images with an alpha channel
    let opaque = DynamicImage::ImageRgb8(pixels.to_rgb8());
    let natural = estimated_image_size(&opaque, DEFAULT_IMAGE_DPI);
    let mut image = Image::from_dynamic_image(opaque)?;

    if natural.width > f64::EPSILON && natural.height > f64::EPSILON {
        image.set_scale(Scale::new(
            target.width / natural.width,
            target.height / natural.height,
        ));
    }
    Ok(image)
}

/// Generates the light grey, grey-bordered raster behind a placeholder label.
fn placeholder_raster(size: Dimensions) -> DynamicImage {
    let width = PLACEHOLDER_RASTER_WIDTH;
    let ratio = if size.width > f64::EPSILON {
        size.height / size.width
    } else {
        1.0
    };
    let height = ((width as f64) * ratio).round().max(1.0) as u32;

    let buffer = ImageBuffer::from_fn(width, height, |x, y| {
        let on_border = x < PLACEHOLDER_BORDER_PX
            || y < PLACEHOLDER_BORDER_PX
            || x >= width.saturating_sub(PLACEHOLDER_BORDER_PX)
            || y >= height.saturating_sub(PLACEHOLDER_BORDER_PX);
        if on_border {
            Rgb(PLACEHOLDER_STROKE)
        } else {
            Rgb(PLACEHOLDER_FILL)
        }
    });
    DynamicImage::ImageRgb8(buffer)
}

/// Renders a [`Figure`]: a fitted image, or a labelled placeholder rectangle.
///
/// The element refuses to split across pages. When the remaining area is too short it reports
/// `has_more` without drawing, so the document moves it to the next page as a whole.
pub struct FigureElement {
    image: Image,
    size: Dimensions,
    label: Option<Paragraph>,
}

impl FigureElement {
    /// Creates the element for `figure`, horizontally placed according to `alignment`.
    pub fn new(figure: &Figure, alignment: Alignment) -> Result<Self, Error> {
        let size = figure.size();
        let (pixels, label) = match figure {
            Figure::Image(fitted) => (fitted.pixels.clone(), None),
            Figure::Placeholder(placeholder) => {
                let mut label = Paragraph::new(placeholder.label.clone());
                label.set_alignment(Alignment::Center);
                (placeholder_raster(size), Some(label))
            }
        };

        let mut image = scaled_image(&pixels, size)?;
        image.set_alignment(alignment);

        Ok(Self { image, size, label })
    }
}

impl Element for FigureElement {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        if mm_from_f64(self.size.height) > area.size().height {
            let mut result = RenderResult::default();
            result.has_more = true;
            return Ok(result);
        }

        let result = self.image.render(context, area.clone(), style)?;

        if let Some(label) = &mut self.label {
            let label_style = style.and(Style::new().with_font_size(PLACEHOLDER_LABEL_FONT_SIZE));
            let line_height = mm_to_f64(label_style.line_height(&context.font_cache));
            let offset = ((self.size.height - line_height) / 2.0).max(0.0);
            area.add_offset(Position::new(0, mm_from_f64(offset)));
            label.render(context, area, label_style)?;
        }

        Ok(result)
    }
}

/// Wraps an element of known height so it is never split across pages.
///
/// Table rows render every cell on each attempt, so a row whose cells only partially fit would
/// draw the fitting cells twice. Checking the row height up front avoids that.
pub struct KeepTogether<E: Element> {
    inner: E,
    height: Mm,
}

impl<E: Element> KeepTogether<E> {
    pub fn new(inner: E, height: Mm) -> Self {
        Self { inner, height }
    }
}

impl<E: Element> Element for KeepTogether<E> {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        if self.height > area.size().height {
            let mut result = RenderResult::default();
            result.has_more = true;
            return Ok(result);
        }
        self.inner.render(context, area, style)
    }
}

/// Fixed amount of vertical whitespace, clipped at the end of a page.
pub struct Spacer {
    height: Mm,
}

impl Spacer {
    pub fn new(height: Mm) -> Self {
        Self { height }
    }
}

impl Element for Spacer {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let available = area.size().height;
        let height = if self.height > available {
            available
        } else {
            self.height
        };

        let mut result = RenderResult::default();
        result.size = Size::new(0, height);
        Ok(result)
    }
}
