//! Core entry point for the portfolio_report crate.
//!
//! [`ReportGenerator`] turns a [`PortfolioData`] record into a branded PDF. The [`forms`] and
//! [`submissions`] modules hold the contact and newsletter records of the portfolio site.

pub mod builder;
pub mod composer;
pub mod config;
pub mod decorator;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod forms;
pub mod generator;
pub mod images;
pub mod model;
pub mod record;
pub mod styles;
pub mod submissions;

pub use config::ReportConfig;
pub use error::ReportError;
pub use generator::{RenderedReport, ReportGenerator, PDF_MIME_TYPE};
pub use record::{PortfolioData, PortfolioRecord};
