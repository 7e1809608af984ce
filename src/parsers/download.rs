use regex::Regex;
use scraper::Html;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::config::Settings;
use crate::error::Result;
use crate::locator::{find_tag, require_attr, AttrMatcher};
use crate::session::{join_url, CachedSession};

static PDF_A4_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+pdf-a4\.zip$").expect("archive pattern is valid"));

/// Absolute URL of the A4 PDF archive listed in the downloads table.
pub fn archive_link(doc: &Html, page_url: &str) -> Result<String> {
    let main = find_tag(doc.root_element(), "div", &AttrMatcher::attr("role", "main"))?;
    let table = find_tag(main, "table", &AttrMatcher::attr("class", "docutils"))?;
    let anchor = find_tag(table, "a", &AttrMatcher::pattern("href", PDF_A4_PATTERN.clone()))?;
    join_url(page_url, require_attr(anchor, "href")?)
}

/// Final path segment of `url`.
pub fn archive_filename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Write `content` to `dir/filename`, creating `dir` if needed and replacing any existing file.
pub fn save_archive(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, content)?;
    Ok(path)
}

pub async fn download(session: &CachedSession, settings: &Settings) -> Result<PathBuf> {
    let downloads_url = join_url(&settings.doc_url, "download.html")?;
    let archive_url = {
        let doc = session.get_document(&downloads_url).await?;
        archive_link(&doc, &downloads_url)?
    };

    let content = session.get(&archive_url).await?;
    let path = save_archive(
        &settings.downloads_dir(),
        archive_filename(&archive_url),
        &content,
    )?;

    log::info!("Archive downloaded and saved: {}", path.display());
    Ok(path)
}
