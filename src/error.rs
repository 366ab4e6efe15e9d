//! Error types for report rendering.

use std::io;

use thiserror::Error;

/// Errors surfaced by [`crate::generator::ReportGenerator`].
///
/// Image problems never show up here: unreadable images are replaced by placeholders while the
/// document is composed. Everything in this enum aborts the render before any bytes are returned.
#[derive(Debug, Error)]
pub enum ReportError {
    /// No usable font family could be located or parsed.
    #[error("failed to load report fonts")]
    FontLoad(#[source] genpdf::error::Error),

    /// The document engine failed while laying out or writing pages.
    #[error("failed to render report document")]
    Render(#[source] genpdf::error::Error),

    /// A portfolio record was not valid JSON.
    #[error("invalid report input")]
    Input(#[from] serde_json::Error),

    /// The configuration file or `PORTFOLIO_*` variables could not be read.
    #[error("invalid report configuration")]
    Config(#[from] ::config::ConfigError),

    #[error(transparent)]
    Io(#[from] io::Error),
}
