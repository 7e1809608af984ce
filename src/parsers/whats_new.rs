use scraper::Html;

use crate::config::Settings;
use crate::error::Result;
use crate::locator::{find_all, find_tag, require_attr, text_of, AttrMatcher};
use crate::progress;
use crate::results::{ResultRow, ResultTable};
use crate::session::{join_url, CachedSession};

pub const HEADER: [&str; 3] = ["Article link", "Title", "Editor, author"];

/// Absolute links of the top-level entries in the "What's New" table of contents.
pub fn entry_links(doc: &Html, page_url: &str) -> Result<Vec<String>> {
    let section = find_tag(
        doc.root_element(),
        "section",
        &AttrMatcher::attr("id", "what-s-new-in-python"),
    )?;
    let wrapper = find_tag(section, "div", &AttrMatcher::attr("class", "toctree-wrapper"))?;

    find_all(wrapper, "li", &AttrMatcher::attr("class", "toctree-l1"))
        .into_iter()
        .map(|item| {
            let anchor = find_tag(item, "a", &AttrMatcher::any())?;
            join_url(page_url, require_attr(anchor, "href")?)
        })
        .collect()
}

/// One row from a release page: its link, first heading and the editor/author list.
pub fn parse_entry(doc: &Html, link: &str) -> Result<ResultRow> {
    let root = doc.root_element();
    let h1 = find_tag(root, "h1", &AttrMatcher::any())?;
    let dl = find_tag(root, "dl", &AttrMatcher::any())?;

    Ok(vec![
        link.to_string(),
        text_of(h1),
        text_of(dl).replace('\n', " "),
    ])
}

pub async fn whats_new(session: &CachedSession, settings: &Settings) -> Result<ResultTable> {
    let whats_new_url = join_url(&settings.doc_url, "whatsnew/")?;
    let links = {
        let doc = session.get_document(&whats_new_url).await?;
        entry_links(&doc, &whats_new_url)?
    };

    let mut table = ResultTable::with_header(&HEADER);
    let pb = progress::bar(links.len(), "whats-new");
    for link in &links {
        let doc = session.get_document(link).await?;
        table.push(parse_entry(&doc, link)?);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(table)
}
