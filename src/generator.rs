//! Top-level report generation.
//!
//! [`ReportGenerator`] resolves the input record, composes the block sequence and renders it
//! through `genpdf` into an in-memory buffer. A generator holds only read-only configuration, so
//! one instance can serve any number of renders.

use std::io::Cursor;

use chrono::{Local, NaiveDate};
use genpdf::elements::{FrameCellDecorator, Paragraph, TableLayout};
use genpdf::error::Error;
use genpdf::style::Style;
use genpdf::{Alignment, Document, Element, Margins};
use log::{debug, info};

use crate::builder::{DocumentBuilder, PageLayout};
use crate::composer::{DocumentComposer, DOCUMENT_HEADING};
use crate::config::ReportConfig;
use crate::decorator::OverlayTemplate;
use crate::elements::{mm_from_f64, FigureElement, KeepTogether, Spacer};
use crate::error::ReportError;
use crate::model::{pt_to_mm, ContentBlock, Figure, MetadataTable, TextBlock, POINTS_PER_INCH};
use crate::record::PortfolioData;
use crate::styles::{StyleSet, BRAND_COLOR};

/// MIME type of the rendered document.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Width of a US Letter page in points.
const LETTER_WIDTH_PT: f64 = 612.0;
const TABLE_FONT_SIZE: u8 = 10;
const LABEL_COLUMN_WIDTH_PT: f64 = 1.5 * POINTS_PER_INCH;
const VALUE_COLUMN_WIDTH_PT: f64 = 4.0 * POINTS_PER_INCH;
const GALLERY_CELL_WIDTH_PT: f64 = 2.8 * POINTS_PER_INCH;
const GALLERY_CELL_PADDING_PT: f64 = 10.0;

/// A finished PDF document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
}

impl RenderedReport {
    /// Returns a reader positioned at the start of the document.
    pub fn into_reader(self) -> Cursor<Vec<u8>> {
        Cursor::new(self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Renders portfolio records into paginated PDF documents.
#[derive(Clone, Debug)]
pub struct ReportGenerator {
    config: ReportConfig,
    styles: StyleSet,
    layout: PageLayout,
    composer: DocumentComposer,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}

impl ReportGenerator {
    pub fn new(config: ReportConfig) -> Self {
        let composer =
            DocumentComposer::new(config.main_image_paths(), config.gallery_image_paths());
        let layout = config.layout;
        Self {
            config,
            styles: StyleSet::new(),
            layout,
            composer,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn styles(&self) -> &StyleSet {
        &self.styles
    }

    /// Composes the blocks for `data`, or for the built-in sample record when `data` is `None`.
    pub fn compose(&self, data: Option<&PortfolioData>) -> Vec<ContentBlock> {
        let record = match data {
            Some(data) => data.resolve(),
            None => PortfolioData::sample().resolve(),
        };
        self.composer.compose(&record)
    }

    /// Renders a report stamped with today's date.
    pub fn generate(&self, data: Option<&PortfolioData>) -> Result<RenderedReport, ReportError> {
        self.generate_on(data, Local::now().date_naive())
    }

    /// Renders a report whose footers carry `generated_on`.
    pub fn generate_on(
        &self,
        data: Option<&PortfolioData>,
        generated_on: NaiveDate,
    ) -> Result<RenderedReport, ReportError> {
        let blocks = self.compose(data);
        self.render(&blocks, generated_on)
    }

    /// Paginates `blocks` and writes the document into memory.
    pub fn render(
        &self,
        blocks: &[ContentBlock],
        generated_on: NaiveDate,
    ) -> Result<RenderedReport, ReportError> {
        let template = OverlayTemplate::new(self.config.brand.clone(), generated_on);
        let mut document = DocumentBuilder::new()
            .with_layout(self.layout)
            .with_title(DOCUMENT_HEADING)
            .with_overlay(move |page| template.overlay(page))
            .build()
            .map_err(ReportError::FontLoad)?;

        for block in blocks {
            self.push_block(&mut document, block)
                .map_err(ReportError::Render)?;
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes).map_err(ReportError::Render)?;

        info!("Rendered portfolio report ({} bytes)", bytes.len());
        Ok(RenderedReport { bytes })
    }

    fn push_block(&self, document: &mut Document, block: &ContentBlock) -> Result<(), Error> {
        match block {
            ContentBlock::Heading(text) | ContentBlock::Paragraph(text) => {
                document.push(self.text_element(text));
            }
            ContentBlock::Table(table) => {
                document.push(self.metadata_table(table)?);
            }
            ContentBlock::Figure(figure) => {
                let height = mm_from_f64(figure.size().height);
                let element = FigureElement::new(figure, Alignment::Center)?;
                document.push(KeepTogether::new(element, height));
            }
            ContentBlock::ImageRow(cells) => {
                if let Some(row) = self.image_row(cells)? {
                    document.push(row);
                }
            }
            ContentBlock::Spacer(points) => {
                document.push(Spacer::new(mm_from_f64(pt_to_mm(*points))));
            }
        }
        Ok(())
    }

    fn content_width_pt(&self) -> f64 {
        LETTER_WIDTH_PT - 2.0 * self.layout.side_margin
    }

    fn centering_margins(&self, width_pt: f64) -> Margins {
        let side = mm_from_f64(pt_to_mm(((self.content_width_pt() - width_pt) / 2.0).max(0.0)));
        Margins::trbl(0, side, 0, side)
    }

    fn text_element(&self, block: &TextBlock) -> impl Element {
        let style = self.styles.get(block.style);
        let mut paragraph = Paragraph::new(block.text.clone());
        paragraph.set_alignment(style.alignment.into());

        paragraph.styled(style.text_style()).padded(Margins::trbl(
            mm_from_f64(pt_to_mm(style.space_before)),
            0,
            mm_from_f64(pt_to_mm(style.space_after)),
            mm_from_f64(pt_to_mm(style.left_indent)),
        ))
    }

    fn metadata_table(&self, metadata: &MetadataTable) -> Result<impl Element, Error> {
        let cell_padding = Margins::trbl(
            mm_from_f64(pt_to_mm(8.0)),
            mm_from_f64(pt_to_mm(10.0)),
            mm_from_f64(pt_to_mm(8.0)),
            mm_from_f64(pt_to_mm(10.0)),
        );
        let value_style = Style::new().with_font_size(TABLE_FONT_SIZE);
        let mut label_style = value_style.with_color(BRAND_COLOR);
        label_style.set_bold();

        // column weights follow the 1.5in / 4in split
        let mut table = TableLayout::new(vec![3, 8]);
        table.set_cell_decorator(FrameCellDecorator::new(true, true, false));

        for (label, value) in metadata.rows() {
            table
                .row()
                .element(
                    Paragraph::new(label.clone())
                        .styled(label_style)
                        .padded(cell_padding),
                )
                .element(
                    Paragraph::new(value.clone())
                        .styled(value_style)
                        .padded(cell_padding),
                )
                .push()?;
        }

        let width = LABEL_COLUMN_WIDTH_PT + VALUE_COLUMN_WIDTH_PT;
        Ok(table.padded(self.centering_margins(width)))
    }

    fn image_row(&self, cells: &[Figure]) -> Result<Option<impl Element>, Error> {
        if cells.is_empty() {
            return Ok(None);
        }

        let cell_padding = mm_from_f64(pt_to_mm(GALLERY_CELL_PADDING_PT));
        let mut table = TableLayout::new(vec![1; cells.len()]);
        let mut row = table.row();
        for figure in cells {
            let element = FigureElement::new(figure, Alignment::Center)?;
            row = row.element(element.padded(Margins::trbl(0, cell_padding, 0, cell_padding)));
        }
        row.push()?;

        let height = cells
            .iter()
            .map(|figure| figure.size().height)
            .fold(0.0, f64::max);
        debug!("Laid out gallery row with {} cell(s)", cells.len());

        let width = GALLERY_CELL_WIDTH_PT * cells.len() as f64;
        Ok(Some(KeepTogether::new(
            table.padded(self.centering_margins(width)),
            mm_from_f64(height),
        )))
    }
}
