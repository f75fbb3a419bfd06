use std::{fs, path::Path};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde::Deserialize;
use url::Url;

use crate::request::{QueryDefaults, DEFAULT_PAGE_SIZE, DEFAULT_PARTY_PAGE_SIZE};

pub const DEFAULT_API_BASE_URL: &str = "https://dadosabertos.camara.leg.br/api/v2";
pub const DEFAULT_CONFIG_FILE: &str = "directory.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: Url,
    pub start_date: NaiveDate,
    pub page_size: u32,
    pub party_page_size: u32,
    pub request_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn query_defaults(&self) -> QueryDefaults {
        QueryDefaults {
            page_size: self.page_size,
            party_page_size: self.party_page_size,
            start_date: self.start_date,
        }
    }

    /// Defaults, then the TOML document (if any), then environment overrides.
    pub fn from_sources<F>(file: Option<&str>, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = QueryDefaults::default();
        let mut settings = Self {
            api_base_url: parse_base_url(DEFAULT_API_BASE_URL)?,
            start_date: defaults.start_date,
            page_size: DEFAULT_PAGE_SIZE,
            party_page_size: DEFAULT_PARTY_PAGE_SIZE,
            request_timeout_secs: None,
        };

        if let Some(raw) = file {
            let file_cfg: FileSettings = toml::from_str(raw).context("invalid settings file")?;
            if let Some(v) = file_cfg.api_base_url {
                settings.api_base_url = parse_base_url(&v)?;
            }
            if let Some(v) = file_cfg.start_date {
                settings.start_date = parse_date(&v)?;
            }
            if let Some(v) = file_cfg.page_size {
                settings.page_size = v;
            }
            if let Some(v) = file_cfg.party_page_size {
                settings.party_page_size = v;
            }
            if file_cfg.request_timeout_secs.is_some() {
                settings.request_timeout_secs = file_cfg.request_timeout_secs;
            }
        }

        if let Some(v) = non_empty(env("APP__API_BASE_URL")) {
            settings.api_base_url = parse_base_url(&v)?;
        }
        if let Some(v) = non_empty(env("APP__START_DATE")) {
            settings.start_date = parse_date(&v)?;
        }
        if let Some(v) = non_empty(env("APP__PAGE_SIZE")) {
            settings.page_size = v
                .parse()
                .with_context(|| format!("APP__PAGE_SIZE is not a number: '{v}'"))?;
        }
        if let Some(v) = non_empty(env("APP__PARTY_PAGE_SIZE")) {
            settings.party_page_size = v
                .parse()
                .with_context(|| format!("APP__PARTY_PAGE_SIZE is not a number: '{v}'"))?;
        }
        if let Some(v) = non_empty(env("APP__REQUEST_TIMEOUT_SECS")) {
            settings.request_timeout_secs = Some(
                v.parse()
                    .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not a number: '{v}'"))?,
            );
        }

        if settings.page_size == 0 || settings.party_page_size == 0 {
            bail!("page sizes must be positive");
        }

        Ok(settings)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    start_date: Option<String>,
    page_size: Option<u32>,
    party_page_size: Option<u32>,
    request_timeout_secs: Option<u64>,
}

/// Reads `path` (or `directory.toml` in the working directory when present)
/// and applies process environment overrides.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let raw = match path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))?,
        ),
        None => fs::read_to_string(DEFAULT_CONFIG_FILE).ok(),
    };
    Settings::from_sources(raw.as_deref(), |key| std::env::var(key).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid api base url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        bail!("api base url must be an http(s) url: '{raw}'");
    }
    Ok(url)
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("start date must be YYYY-MM-DD: '{raw}'"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
