//! Header and footer text repeated on every page.
//!
//! The overlay is computed from the page number alone, so the decorator that draws it keeps no
//! state apart from the page counter the document engine needs.

use chrono::NaiveDate;

/// Formats a generation date the way the footer prints it, e.g. `October 19, 2026`.
pub fn format_generation_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Texts drawn on top of a single page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageOverlay {
    /// Brand label at the top-left corner.
    pub header: String,
    /// Bottom-left text.
    pub footer_left: String,
    /// Bottom-right text.
    pub footer_right: String,
}

impl PageOverlay {
    /// Overlay of the 1-based page `page` of a report generated on `generated_on`.
    pub fn for_page(page: usize, generated_on: NaiveDate, brand: &str) -> Self {
        Self {
            header: brand.to_owned(),
            footer_left: format!("Generated on {}", format_generation_date(generated_on)),
            footer_right: format!("Page {}", page),
        }
    }
}

/// Produces the [`PageOverlay`] of each page of one render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayTemplate {
    brand: String,
    generated_on: NaiveDate,
}

impl OverlayTemplate {
    pub fn new(brand: impl Into<String>, generated_on: NaiveDate) -> Self {
        Self {
            brand: brand.into(),
            generated_on,
        }
    }

    /// Overlay for the 1-based page number `page`.
    pub fn overlay(&self, page: usize) -> PageOverlay {
        PageOverlay::for_page(page, self.generated_on, &self.brand)
    }
}
