//! CLI for imgharvest.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use imgharvest_core::config::{self, HarvestConfig};
use std::path::Path;

use commands::{run_config, run_extract, run_issues, run_series_url, ExtractOptions};

/// Top-level CLI for imgharvest.
#[derive(Debug, Parser)]
#[command(name = "imgharvest")]
#[command(about = "imgharvest: ordered page image URLs from saved comic reader pages", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/imgharvest/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the page image URLs of a saved reader page, in reading order.
    Extract {
        /// Path to the saved reader page HTML.
        page: String,

        /// JSON file holding the page's encoded token array (default: read it from the page scripts).
        #[arg(long, value_name = "FILE")]
        tokens: Option<String>,

        /// External decoder, run as `<CMD> <mode> <token>` once per token.
        #[arg(long, value_name = "CMD")]
        decoder_cmd: Option<String>,

        /// Issue title for JSON output (default: page file name).
        #[arg(long)]
        title: Option<String>,

        /// Issue URL for JSON output.
        #[arg(long)]
        url: Option<String>,

        /// Print a JSON document instead of one URL per line.
        #[arg(long)]
        json: bool,
    },

    /// List the issues linked from a saved series page.
    Issues {
        /// Path to the saved series page HTML.
        page: String,

        /// Site root for resolving relative links (default: site_base_url from config).
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Print JSON instead of tab-separated title and URL.
        #[arg(long)]
        json: bool,
    },

    /// Print the series page URL for a series name.
    SeriesUrl {
        /// Series name, e.g. "Rick and Morty Ricklemania".
        name: String,

        /// Site root (default: site_base_url from config).
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },

    /// Show the config file location and effective settings.
    Config,
}

fn load_config(path: Option<&str>) -> Result<HarvestConfig> {
    match path {
        Some(p) => config::load_from(Path::new(p)),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Extract {
                page,
                tokens,
                decoder_cmd,
                title,
                url,
                json,
            } => {
                let opts = ExtractOptions {
                    tokens: tokens.as_deref().map(Path::new),
                    decoder_cmd: decoder_cmd.as_deref(),
                    title,
                    url,
                    json,
                };
                run_extract(&cfg, Path::new(&page), opts)?;
            }
            CliCommand::Issues {
                page,
                base_url,
                json,
            } => {
                let base = base_url.as_deref().unwrap_or(cfg.site_base_url.as_str());
                run_issues(Path::new(&page), base, json)?;
            }
            CliCommand::SeriesUrl { name, base_url } => {
                run_series_url(base_url.as_deref().unwrap_or(cfg.site_base_url.as_str()), &name);
            }
            CliCommand::Config => run_config(cli.config.as_deref(), &cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
