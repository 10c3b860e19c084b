//! `imgharvest config` – where the config lives and what is in effect.

use anyhow::Result;
use imgharvest_core::config::{self, HarvestConfig};

pub fn run_config(explicit_path: Option<&str>, cfg: &HarvestConfig) -> Result<()> {
    let path = match explicit_path {
        Some(p) => p.to_string(),
        None => config::config_path()?.display().to_string(),
    };
    println!("# {path}");
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
