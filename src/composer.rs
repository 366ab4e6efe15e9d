//! Assembles the block sequence of a portfolio report.

use std::path::PathBuf;

use log::debug;

use crate::images::ImageFitter;
use crate::model::{ContentBlock, Dimensions, Figure, MetadataTable};
use crate::record::PortfolioRecord;
use crate::styles::StyleName;

pub const DOCUMENT_HEADING: &str = "Portfolio Details";
pub const SCREENSHOTS_HEADING: &str = "Project Screenshots";
pub const OVERVIEW_HEADING: &str = "Project Overview";
pub const CHALLENGE_HEADING: &str = "The Challenge";
pub const SOLUTION_HEADING: &str = "The Solution";
pub const FEATURES_HEADING: &str = "Key Features";
pub const TECH_STACK_HEADING: &str = "Technology Stack";
pub const GALLERY_HEADING: &str = "Additional Screenshots";

/// Prefix of every feature line.
pub const BULLET: &str = "\u{2022} ";

const GALLERY_COLUMNS: usize = 2;

/// Bounding box of a main screenshot (5 × 3.5 inches).
pub fn main_image_bounds() -> Dimensions {
    Dimensions::from_inches(5.0, 3.5)
}

/// Bounding box of a gallery cell (2.5 × 2 inches).
pub fn gallery_image_bounds() -> Dimensions {
    Dimensions::from_inches(2.5, 2.0)
}

/// Turns a [`PortfolioRecord`] into the ordered list of report blocks.
///
/// The image sets are fixed per composer; composing only reads image files and is otherwise a
/// pure function of the record.
#[derive(Clone, Debug, Default)]
pub struct DocumentComposer {
    fitter: ImageFitter,
    main_images: Vec<PathBuf>,
    gallery_images: Vec<PathBuf>,
}

impl DocumentComposer {
    pub fn new(main_images: Vec<PathBuf>, gallery_images: Vec<PathBuf>) -> Self {
        Self {
            fitter: ImageFitter::new(),
            main_images,
            gallery_images,
        }
    }

    pub fn compose(&self, record: &PortfolioRecord) -> Vec<ContentBlock> {
        let mut blocks = Vec::new();

        blocks.push(ContentBlock::heading(DOCUMENT_HEADING, StyleName::Title));
        blocks.push(ContentBlock::Spacer(20.0));

        blocks.push(ContentBlock::Table(
            MetadataTable::new()
                .with_row("Project Type:", &record.project_type)
                .with_row("Date:", &record.date)
                .with_row("Client:", &record.client)
                .with_row("Website:", &record.website),
        ));
        blocks.push(ContentBlock::Spacer(30.0));

        blocks.push(ContentBlock::heading(&record.title, StyleName::Title));
        blocks.push(ContentBlock::Spacer(20.0));

        blocks.push(ContentBlock::heading(SCREENSHOTS_HEADING, StyleName::Subtitle));
        blocks.push(ContentBlock::Spacer(10.0));
        for path in &self.main_images {
            let figure = self.fitter.fit_path(path, main_image_bounds());
            blocks.push(ContentBlock::Figure(figure));
            blocks.push(ContentBlock::Spacer(15.0));
        }

        for (heading, text) in [
            (OVERVIEW_HEADING, &record.overview),
            (CHALLENGE_HEADING, &record.challenge),
            (SOLUTION_HEADING, &record.solution),
        ] {
            blocks.push(ContentBlock::heading(heading, StyleName::Subtitle));
            blocks.push(ContentBlock::paragraph(text, StyleName::Body));
            blocks.push(ContentBlock::Spacer(20.0));
        }

        blocks.push(ContentBlock::heading(FEATURES_HEADING, StyleName::Subtitle));
        for feature in &record.features {
            blocks.push(ContentBlock::paragraph(
                format!("{}{}", BULLET, feature),
                StyleName::FeatureBullet,
            ));
        }
        blocks.push(ContentBlock::Spacer(20.0));

        blocks.push(ContentBlock::heading(TECH_STACK_HEADING, StyleName::Subtitle));
        if !record.tech_stack.is_empty() {
            blocks.push(ContentBlock::paragraph(
                record.tech_stack.join(", "),
                StyleName::Body,
            ));
        }
        blocks.push(ContentBlock::Spacer(30.0));

        blocks.push(ContentBlock::heading(GALLERY_HEADING, StyleName::Subtitle));
        blocks.push(ContentBlock::Spacer(10.0));
        for row in self.gallery_rows() {
            blocks.push(ContentBlock::ImageRow(row));
            blocks.push(ContentBlock::Spacer(15.0));
        }

        debug!("Composed portfolio '{}' into {} blocks", record.title, blocks.len());
        blocks
    }

    fn gallery_rows(&self) -> Vec<Vec<Figure>> {
        self.gallery_images
            .chunks(GALLERY_COLUMNS)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|path| self.fitter.fit_path(path, gallery_image_bounds()))
                    .collect()
            })
            .collect()
    }
}
