use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

use crate::config::{Settings, ALL_VERSIONS_MARKER};
use crate::error::{ParserError, Result};
use crate::locator::{find_all, find_tag, require_attr, text_of, AttrMatcher};
use crate::progress;
use crate::results::{ResultRow, ResultTable};
use crate::session::CachedSession;

pub const HEADER: [&str; 3] = ["Documentation link", "Version", "Status"];

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Python (?P<version>\d+\.\d+) \((?P<status>.*)\)").expect("version pattern is valid")
});

/// Split anchor text like `Python 3.12 (stable)` into version and status.
/// Text that does not match is returned whole as the version, with an empty status.
pub fn parse_version(text: &str) -> (String, String) {
    match VERSION_PATTERN.captures(text) {
        Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
        None => (text.to_string(), String::new()),
    }
}

/// Rows for every anchor in the first sidebar list mentioning "All versions".
pub fn version_rows(doc: &Html) -> Result<Vec<ResultRow>> {
    let sidebar = find_tag(
        doc.root_element(),
        "div",
        &AttrMatcher::attr("class", "sphinxsidebarwrapper"),
    )?;

    let list = find_all(sidebar, "ul", &AttrMatcher::any())
        .into_iter()
        .find(|ul| text_of(*ul).contains(ALL_VERSIONS_MARKER))
        .ok_or_else(|| ParserError::ListNotFound {
            marker: ALL_VERSIONS_MARKER.to_string(),
        })?;

    let anchors = find_all(list, "a", &AttrMatcher::any());
    let pb = progress::bar(anchors.len(), "latest-versions");
    let rows = anchors
        .into_iter()
        .map(|anchor| -> Result<ResultRow> {
            let link = require_attr(anchor, "href")?.to_string();
            let (version, status) = parse_version(&text_of(anchor));
            pb.inc(1);
            Ok(vec![link, version, status])
        })
        .collect::<Result<Vec<_>>>()?;
    pb.finish_and_clear();

    Ok(rows)
}

pub async fn latest_versions(session: &CachedSession, settings: &Settings) -> Result<ResultTable> {
    let doc = session.get_document(&settings.doc_url).await?;

    let mut table = ResultTable::with_header(&HEADER);
    for row in version_rows(&doc)? {
        table.push(row);
    }
    Ok(table)
}
