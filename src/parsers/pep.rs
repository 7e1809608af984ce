use scraper::Html;

use crate::config::Settings;
use crate::error::{ParserError, Result};
use crate::locator::{
    describe, find_all, find_tag, find_text, next_sibling_tag, require_attr, text_of, AttrMatcher,
};
use crate::progress;
use crate::results::ResultTable;
use crate::session::{join_url, CachedSession};
use crate::status::StatusAudit;

/// A row of the numerical PEP index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub url: String,
    pub expected: String,
}

/// Status part of an index `abbr` title such as `"Standards Track, Final"`.
pub fn expected_status(title: &str) -> Result<String> {
    title
        .split(", ")
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| ParserError::UnexpectedFormat {
            what: "status abbreviation title".to_string(),
            value: title.to_string(),
        })
}

/// Detail page URL and declared status for every row of the index table.
pub fn index_entries(doc: &Html, pep_url: &str) -> Result<Vec<IndexEntry>> {
    let table = find_tag(
        doc.root_element(),
        "table",
        &AttrMatcher::attr("class", "pep-zero-table docutils align-default"),
    )?;
    let tbody = find_tag(table, "tbody", &AttrMatcher::any())?;

    find_all(tbody, "tr", &AttrMatcher::any())
        .into_iter()
        .map(|row| -> Result<IndexEntry> {
            let abbr = find_tag(row, "abbr", &AttrMatcher::any())?;
            let expected = expected_status(require_attr(abbr, "title")?)?;
            let anchor = find_tag(row, "a", &AttrMatcher::any())?;
            let url = join_url(pep_url, require_attr(anchor, "href")?)?;
            Ok(IndexEntry { url, expected })
        })
        .collect()
}

/// Status reported in the header field list of a PEP page.
pub fn page_status(doc: &Html) -> Result<String> {
    let label = find_text(doc.root_element(), "Status")?;
    let value = next_sibling_tag(label, "dd").ok_or_else(|| ParserError::TagNotFound {
        context: describe(label),
        tag: "dd".to_string(),
        matcher: "next sibling".to_string(),
    })?;
    Ok(text_of(value))
}

/// Fetch every detail page listed on the index and fold its status into `audit`.
pub async fn audit_statuses(
    session: &CachedSession,
    pep_url: &str,
    mut audit: StatusAudit,
) -> Result<StatusAudit> {
    let index_url = join_url(pep_url, "numerical/")?;
    let entries = {
        let doc = session.get_document(&index_url).await?;
        index_entries(&doc, pep_url)?
    };

    let pb = progress::bar(entries.len(), "pep");
    for entry in &entries {
        let observed = {
            let doc = session.get_document(&entry.url).await?;
            page_status(&doc)?
        };
        audit.record(&entry.url, &entry.expected, &observed);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(audit)
}

pub async fn pep(session: &CachedSession, settings: &Settings) -> Result<ResultTable> {
    let audit = StatusAudit::new(settings.expected_statuses.as_slice());
    let audit = audit_statuses(session, &settings.pep_url, audit).await?;
    audit.report_mismatches();
    Ok(audit.counter.to_table())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_status() {
        assert_eq!(expected_status("Process, Active").unwrap(), "Active");
        assert_eq!(expected_status("Standards Track, Final").unwrap(), "Final");
        assert!(matches!(
            expected_status("Final"),
            Err(ParserError::UnexpectedFormat { .. })
        ));
    }

    #[test]
    fn test_index_entries() {
        let page = r#"
            <html><body>
            <table class="pep-zero-table docutils align-default">
                <thead><tr><th>Type</th><th>PEP</th></tr></thead>
                <tbody>
                    <tr>
                        <td><abbr title="Process, Active">PA</abbr></td>
                        <td><a class="pep reference internal" href="pep-0001/">1</a></td>
                    </tr>
                    <tr>
                        <td><abbr title="Standards Track, Final">SF</abbr></td>
                        <td><a href="pep-0008/">8</a></td>
                    </tr>
                </tbody>
            </table>
            </body></html>
        "#;
        let doc = Html::parse_document(page);
        let entries = index_entries(&doc, "https://peps.python.org/").unwrap();
        assert_eq!(
            entries,
            vec![
                IndexEntry {
                    url: "https://peps.python.org/pep-0001/".to_string(),
                    expected: "Active".to_string(),
                },
                IndexEntry {
                    url: "https://peps.python.org/pep-0008/".to_string(),
                    expected: "Final".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_page_status() {
        let page = r#"
            <html><body><dl class="rfc2822 field-list simple">
                <dt class="field-odd">Author<span class="colon">:</span></dt>
                <dd class="field-odd">Guido van Rossum</dd>
                <dt class="field-even">Status<span class="colon">:</span></dt>
                <dd class="field-even"><abbr title="Accepted and implementation complete">Final</abbr></dd>
            </dl></body></html>
        "#;
        let doc = Html::parse_document(page);
        assert_eq!(page_status(&doc).unwrap(), "Final");
    }

    #[test]
    fn test_page_status_missing() {
        let doc = Html::parse_document("<html><body><p>Status: Final</p></body></html>");
        assert!(matches!(
            page_status(&doc),
            Err(ParserError::TextNotFound { .. })
        ));
    }
}
