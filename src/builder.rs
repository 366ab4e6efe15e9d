//! Document construction for portfolio reports.
//!
//! [`DocumentBuilder`] creates a `genpdf::Document` with the report page geometry and installs a
//! page decorator that draws the [`PageOverlay`] of every page inside the page margins.

use genpdf::elements::Paragraph;
use genpdf::error::{Error, ErrorKind};
use genpdf::style::{self, Color, Style};
use genpdf::{self, Alignment, Element, Margins, PageDecorator, PaperSize, Position, Size};
use serde::Deserialize;

use crate::decorator::PageOverlay;
use crate::elements::mm_from_f64;
use crate::fonts;
use crate::model::pt_to_mm;
use crate::styles::BRAND_COLOR;

const HEADER_FONT_SIZE: u8 = 12;
const FOOTER_FONT_SIZE: u8 = 9;
const FOOTER_COLOR: Color = Color::Rgb(128, 128, 128);

/// Page geometry in points, measured from the page edges.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Left and right content margin.
    pub side_margin: f64,
    /// Distance from the top edge to the first line of content.
    pub content_top: f64,
    /// Distance from the bottom edge to the last line of content.
    pub content_bottom: f64,
    /// Distance from the top edge to the header text box.
    pub header_top: f64,
    /// Distance from the bottom edge to the footer text box.
    pub footer_bottom: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            side_margin: 50.0,
            content_top: 80.0,
            content_bottom: 50.0,
            header_top: 38.0,
            footer_bottom: 27.0,
        }
    }
}

type OverlayFactory = dyn Fn(usize) -> PageOverlay;

/// Builder for `genpdf::Document` instances pre-configured for portfolio reports.
pub struct DocumentBuilder {
    paper_size: Size,
    layout: PageLayout,
    title: Option<String>,
    overlay: Option<Box<OverlayFactory>>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::Letter.into(),
            layout: PageLayout::default(),
            title: None,
            overlay: None,
        }
    }
}

impl DocumentBuilder {
    /// Creates a new builder for US Letter pages with the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page geometry.
    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Configures the overlay callback invoked with the 1-based number of every page.
    pub fn with_overlay<F>(mut self, overlay: F) -> Self
    where
        F: Fn(usize) -> PageOverlay + 'static,
    {
        self.overlay = Some(Box::new(overlay));
        self
    }

    /// Builds a fully configured `genpdf::Document` instance.
    ///
    /// Fails only when no font family can be loaded.
    pub fn build(self) -> Result<genpdf::Document, Error> {
        let font_family = fonts::default_font_family()?;
        let mut document = genpdf::Document::new(font_family);

        document.set_paper_size(self.paper_size);
        if let Some(title) = self.title {
            document.set_title(title);
        }

        let decorator = OverlayPageDecorator::new(self.layout, self.overlay);
        document.set_page_decorator(decorator);

        Ok(document)
    }
}

struct OverlayPageDecorator {
    page: usize,
    layout: PageLayout,
    overlay: Option<Box<OverlayFactory>>,
}

impl OverlayPageDecorator {
    fn new(layout: PageLayout, overlay: Option<Box<OverlayFactory>>) -> Self {
        Self {
            page: 0,
            layout,
            overlay,
        }
    }

    fn header_style() -> Style {
        let mut style = Style::new()
            .with_font_size(HEADER_FONT_SIZE)
            .with_color(BRAND_COLOR);
        style.set_bold();
        style
    }

    fn footer_style() -> Style {
        Style::new()
            .with_font_size(FOOTER_FONT_SIZE)
            .with_color(FOOTER_COLOR)
    }
}

impl PageDecorator for OverlayPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;
        let layout = self.layout;

        area.add_margins(Margins::trbl(
            mm_from_f64(pt_to_mm(layout.header_top)),
            mm_from_f64(pt_to_mm(layout.side_margin)),
            mm_from_f64(pt_to_mm(layout.footer_bottom)),
            mm_from_f64(pt_to_mm(layout.side_margin)),
        ));

        let overlay = self.overlay.as_ref().map(|factory| factory(self.page));

        if let Some(overlay) = &overlay {
            let mut header = Paragraph::new(overlay.header.clone());
            header.set_alignment(Alignment::Left);
            header.render(context, area.clone(), style.and(Self::header_style()))?;
        }
        area.add_offset(Position::new(
            0,
            mm_from_f64(pt_to_mm(layout.content_top - layout.header_top)),
        ));

        let available = area.size().height;
        let footer_band = mm_from_f64(pt_to_mm(layout.content_bottom - layout.footer_bottom));
        if footer_band > available {
            return Err(Error::new(
                "Footer band exceeds available space",
                ErrorKind::InvalidData,
            ));
        }

        if let Some(overlay) = &overlay {
            let footer_style = style.and(Self::footer_style());

            // the footer owns the whole band below the content area
            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer_band));

            let mut left = Paragraph::new(overlay.footer_left.clone());
            left.set_alignment(Alignment::Left);
            let left_result = left.render(context, footer_area.clone(), footer_style)?;

            let mut right = Paragraph::new(overlay.footer_right.clone());
            right.set_alignment(Alignment::Right);
            let right_result = right.render(context, footer_area, footer_style)?;

            if left_result.has_more || right_result.has_more {
                return Err(Error::new(
                    "Footer text does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }
        }

        area.set_height(available - footer_band);
        Ok(area)
    }
}
