//! syndex CLI
//!
//! Adds bookmarks to an RSS feed file, or serves the feed over HTTP.

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use syndex_core::Config;

mod commands;
mod output;
mod reachability;
mod server;

use commands::add::AddOptions;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "syndex")]
#[command(about = "syndex - Add bookmarks to an RSS feed or serve it")]
#[command(version)]
struct Cli {
    /// Path to the RSS feed file
    filepath: PathBuf,

    /// Start the server, optionally on the given port
    #[arg(short, long, value_name = "PORT")]
    server: Option<Option<u16>>,

    /// URL of the bookmark
    url: Option<String>,

    /// Title of the bookmark
    title: Option<String>,

    /// Description of the bookmark
    message: Option<String>,

    /// Add the bookmark without checking that the URL answers
    #[arg(long)]
    no_check: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config = Config::load()?;

    if let Some(port) = cli.server {
        let port = port.unwrap_or(config.port);
        return commands::serve::serve(&cli.filepath, &config.host, port, &output).await;
    }

    match cli.url.as_deref() {
        Some(url) => {
            let options = AddOptions {
                url,
                title: cli.title.as_deref(),
                message: cli.message.as_deref(),
                check_timeout: (!cli.no_check).then(|| config.check_timeout()),
            };
            commands::add::add(&cli.filepath, options, &output).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// Log to stderr; RUST_LOG overrides the -v level
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("syndex_core={},syndex={}", level, level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
