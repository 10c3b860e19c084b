//! Tests for issues, series-url, config.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_issues() {
    match parse(&["imgharvest", "issues", "series.html"]) {
        CliCommand::Issues {
            page,
            base_url,
            json,
        } => {
            assert_eq!(page, "series.html");
            assert!(base_url.is_none());
            assert!(!json);
        }
        _ => panic!("expected Issues"),
    }
}

#[test]
fn cli_parse_issues_base_url_json() {
    match parse(&[
        "imgharvest",
        "issues",
        "series.html",
        "--base-url",
        "https://reader.test",
        "--json",
    ]) {
        CliCommand::Issues { base_url, json, .. } => {
            assert_eq!(base_url.as_deref(), Some("https://reader.test"));
            assert!(json);
        }
        _ => panic!("expected Issues with options"),
    }
}

#[test]
fn cli_parse_series_url() {
    match parse(&["imgharvest", "series-url", "Rick and Morty"]) {
        CliCommand::SeriesUrl { name, base_url } => {
            assert_eq!(name, "Rick and Morty");
            assert!(base_url.is_none());
        }
        _ => panic!("expected SeriesUrl"),
    }
}

#[test]
fn cli_parse_config() {
    let cli = Cli::try_parse_from(["imgharvest", "--config", "/etc/ih.toml", "config"]).unwrap();
    assert!(matches!(cli.command, CliCommand::Config));
    assert_eq!(cli.config.as_deref(), Some("/etc/ih.toml"));
}

#[test]
fn cli_parse_unknown_subcommand_errs() {
    assert!(Cli::try_parse_from(["imgharvest", "download"]).is_err());
}
