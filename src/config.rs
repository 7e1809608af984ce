use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MAIN_DOC_URL: &str = "https://docs.python.org/3/";
pub const MAIN_PEP_URL: &str = "https://peps.python.org/";

/// Marker phrase identifying the version list in the documentation sidebar.
pub const ALL_VERSIONS_MARKER: &str = "All versions";

pub const DOWNLOADS_DIR: &str = "downloads";
pub const RESULTS_DIR: &str = "results";
pub const CACHE_FILE: &str = "http_cache.sqlite";

pub const LOG_DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";
pub const FILE_DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// PEP status labels tracked by the audit, in report order.
pub const EXPECTED_STATUSES: &[&str] = &[
    "Active",
    "Accepted",
    "Deferred",
    "Final",
    "Provisional",
    "Rejected",
    "Superseded",
    "Withdrawn",
    "Draft",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub doc_url: String,
    pub pep_url: String,
    /// Root for the downloads and results directories and the HTTP cache file.
    pub base_dir: PathBuf,
    pub expected_statuses: Vec<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            doc_url: MAIN_DOC_URL.to_string(),
            pep_url: MAIN_PEP_URL.to_string(),
            base_dir: PathBuf::from("."),
            expected_statuses: EXPECTED_STATUSES.iter().map(|s| s.to_string()).collect(),
            request_timeout_secs: 30,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file; missing keys fall back to defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse TOML settings")
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.base_dir.join(DOWNLOADS_DIR)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.base_dir.join(RESULTS_DIR)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.base_dir.join(CACHE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.doc_url, "https://docs.python.org/3/");
        assert_eq!(settings.expected_statuses.len(), 9);
        assert_eq!(settings.expected_statuses[0], "Active");
        assert_eq!(settings.downloads_dir(), PathBuf::from("./downloads"));
    }

    #[test]
    fn test_settings_from_toml() {
        let raw = r#"
            pep_url = "http://localhost:8000/"
            base_dir = "/tmp/parser"
            expected_statuses = ["Active", "Final"]
        "#;

        let settings = Settings::from_toml(raw).unwrap();
        assert_eq!(settings.pep_url, "http://localhost:8000/");
        assert_eq!(settings.doc_url, MAIN_DOC_URL);
        assert_eq!(settings.expected_statuses, vec!["Active", "Final"]);
        assert_eq!(settings.cache_path(), PathBuf::from("/tmp/parser/http_cache.sqlite"));
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn test_settings_rejects_bad_toml() {
        assert!(Settings::from_toml("request_timeout_secs = \"soon\"").is_err());
    }
}
