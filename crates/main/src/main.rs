use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use portfolio_report::{PortfolioData, ReportConfig, ReportGenerator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Renders portfolio reports from the command line.
///
/// Fonts are looked up under `PORTFOLIO_FONTS_DIR`, `assets/fonts` or the system font
/// directories. Image paths come from the config file or the `PORTFOLIO_*` environment variables.
#[derive(Parser)]
#[command(author, version, about = "Render portfolio PDF reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a portfolio record to a PDF file.
    Render {
        /// JSON portfolio record. The built-in sample record is used when omitted.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Destination of the PDF.
        #[arg(short, long, default_value = "portfolio.pdf")]
        output: PathBuf,

        /// JSON report configuration. `PORTFOLIO_*` environment variables override it.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_report=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            input,
            output,
            config,
        } => render(input, output, config),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn render(
    input: Option<PathBuf>,
    output: PathBuf,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let config = ReportConfig::load(config.as_deref())?;
    let data = match input {
        Some(path) => Some(PortfolioData::from_json(&fs::read_to_string(path)?)?),
        None => None,
    };

    let report = ReportGenerator::new(config).generate(data.as_ref())?;
    fs::write(&output, &report.bytes)?;

    println!("Wrote {} ({} bytes)", output.display(), report.len());
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
