//! Print the OpenAPI document for the Shelfmates API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;

use clap::{Parser, ValueEnum};
use shelfmates::ApiDoc;
use utoipa::OpenApi;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Format {
    #[default]
    Json,
    Yaml,
}

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Print the Shelfmates OpenAPI document",
    version
)]
struct CliArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn render(format: Format) -> io::Result<String> {
    let doc = ApiDoc::openapi();
    match format {
        Format::Json => doc.to_pretty_json().map_err(io::Error::other),
        Format::Yaml => doc.to_yaml().map_err(io::Error::other),
    }
}

fn main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    println!("{}", render(args.format)?);
    Ok(())
}
