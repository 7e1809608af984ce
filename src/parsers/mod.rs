//! Page-specific extraction strategies, one per parser mode.

pub mod download;
pub mod latest_versions;
pub mod pep;
pub mod whats_new;

use clap::ValueEnum;

use crate::config::Settings;
use crate::error::Result;
use crate::results::ResultTable;
use crate::session::CachedSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Release notes index with editors and authors
    WhatsNew,
    /// Documentation versions and their status
    LatestVersions,
    /// Download the A4 PDF documentation archive
    Download,
    /// Count PEPs per status and cross-check the index
    Pep,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Self::WhatsNew => "whats-new",
            Self::LatestVersions => "latest-versions",
            Self::Download => "download",
            Self::Pep => "pep",
        }
    }
}

/// Run one strategy. `download` only writes a file and yields no table.
pub async fn run(
    mode: Mode,
    session: &CachedSession,
    settings: &Settings,
) -> Result<Option<ResultTable>> {
    match mode {
        Mode::WhatsNew => whats_new::whats_new(session, settings).await.map(Some),
        Mode::LatestVersions => latest_versions::latest_versions(session, settings)
            .await
            .map(Some),
        Mode::Download => download::download(session, settings).await.map(|_| None),
        Mode::Pep => pep::pep(session, settings).await.map(Some),
    }
}
