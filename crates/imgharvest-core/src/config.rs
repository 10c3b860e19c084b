use anyhow::{Context, Result};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Problems with a loaded configuration that make extraction impossible.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid container selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("fallback_base_url must not be empty")]
    EmptyFallbackBase,
}

/// Page-structure knobs for the reader page (the `[extract]` section of config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// CSS selector of the element whose direct `<img>` children are the pages.
    pub container_selector: String,
    /// Substrings marking a stand-in asset (blank/transparent/spinner) instead of a real page.
    pub placeholder_markers: Vec<String>,
    /// Prefix used to build URLs from raw tokens when no decoder is available.
    pub fallback_base_url: String,
    /// Mode selector passed as the first argument to the decoder.
    pub decode_mode: u32,
    /// Name of the in-page script variable holding the encoded token array.
    pub token_variable: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            container_selector: "#divImage".to_string(),
            placeholder_markers: vec![
                "blank.gif".to_string(),
                "trans.png".to_string(),
                "loading.gif".to_string(),
            ],
            fallback_base_url: "https://2.bp.blogspot.com/pw/AP1Gcz".to_string(),
            decode_mode: 5,
            token_variable: "_q1HQcHOD6h8".to_string(),
        }
    }
}

impl ExtractConfig {
    /// Parsed container selector.
    pub fn container(&self) -> Result<Selector, ConfigError> {
        Selector::parse(&self.container_selector).map_err(|e| ConfigError::InvalidSelector {
            selector: self.container_selector.clone(),
            reason: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.container()?;
        if self.fallback_base_url.is_empty() {
            return Err(ConfigError::EmptyFallbackBase);
        }
        Ok(())
    }
}

/// Global configuration loaded from `~/.config/imgharvest/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Site root used to build series URLs and resolve relative issue links.
    pub site_base_url: String,
    #[serde(default)]
    pub extract: ExtractConfig,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            site_base_url: "https://readcomiconline.li".to_string(),
            extract: ExtractConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgharvest")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HarvestConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HarvestConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load and validate configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<HarvestConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: HarvestConfig = toml::from_str(&data)
        .with_context(|| format!("parse config: {}", path.display()))?;
    cfg.extract.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let cfg = HarvestConfig::default();
        assert_eq!(cfg.site_base_url, "https://readcomiconline.li");
        assert_eq!(cfg.extract.container_selector, "#divImage");
        assert_eq!(cfg.extract.decode_mode, 5);
        assert_eq!(
            cfg.extract.placeholder_markers,
            vec!["blank.gif", "trans.png", "loading.gif"]
        );
        assert_eq!(
            cfg.extract.fallback_base_url,
            "https://2.bp.blogspot.com/pw/AP1Gcz"
        );
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = HarvestConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: HarvestConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_partial_extract_section() {
        let toml = r#"
            site_base_url = "https://reader.example.org"

            [extract]
            container_selector = "div.pages"
            placeholder_markers = ["spinner.svg"]
        "#;
        let cfg: HarvestConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.site_base_url, "https://reader.example.org");
        assert_eq!(cfg.extract.container_selector, "div.pages");
        assert_eq!(cfg.extract.placeholder_markers, vec!["spinner.svg"]);
        // Unset keys keep their defaults.
        assert_eq!(cfg.extract.decode_mode, 5);
        assert_eq!(cfg.extract.token_variable, "_q1HQcHOD6h8");
    }

    #[test]
    fn config_toml_without_extract_section() {
        let cfg: HarvestConfig = toml::from_str(r#"site_base_url = "https://x.test""#).unwrap();
        assert_eq!(cfg.extract, ExtractConfig::default());
    }

    #[test]
    fn validate_rejects_bad_selector() {
        let cfg = ExtractConfig {
            container_selector: "div[".to_string(),
            ..ExtractConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn validate_rejects_empty_fallback() {
        let cfg = ExtractConfig {
            fallback_base_url: String::new(),
            ..ExtractConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyFallbackBase)));
    }

    #[test]
    fn load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"site_base_url = \"https://a.test\"\n[extract]\ndecode_mode = 7\n")
            .unwrap();
        f.flush().unwrap();
        let cfg = load_from(f.path()).unwrap();
        assert_eq!(cfg.site_base_url, "https://a.test");
        assert_eq!(cfg.extract.decode_mode, 7);
    }

    #[test]
    fn load_from_file_with_invalid_selector_errs() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"site_base_url = \"https://a.test\"\n[extract]\ncontainer_selector = \"div[\"\n")
            .unwrap();
        f.flush().unwrap();
        assert!(load_from(f.path()).is_err());
    }
}
