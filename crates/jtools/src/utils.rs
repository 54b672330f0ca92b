//! The `utils` command group: stand-alone helpers that run without a server.

use anstream::print;

use crate::prelude::*;
use jtools_core::markup;

#[derive(Debug, clap::Parser)]
#[command(name = "utils")]
#[command(about = "Generic utilities")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Converts text between tracker markup and markdown
    Convert(ConvertOptions),
}

#[derive(Debug, clap::Args)]
pub struct ConvertOptions {
    /// Target syntax
    #[arg(
        long,
        value_parser = clap::builder::PossibleValuesParser::new(["markdown", "tracker"]),
        ignore_case = true,
        default_value = "markdown"
    )]
    to: String,

    /// File to convert; stdin when omitted
    file: Option<String>,
}

pub async fn run(app: App, _global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Convert(options) => convert(options).await,
    }
}

pub async fn convert(options: ConvertOptions) -> Result<()> {
    let input = match &options.file {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| f!("Failed to read {}", path))?
        }
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?,
    };

    let output = if options.to.eq_ignore_ascii_case("tracker") {
        markup::to_tracker(&input)
    } else {
        markup::to_markdown(&input)
    };

    print!("{}", output);

    Ok(())
}
