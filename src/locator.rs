use regex::Regex;
use scraper::ElementRef;
use std::fmt;

use crate::error::{ParserError, Result};

/// Attribute predicate applied to candidate elements.
///
/// An empty matcher accepts any element. `class` rules accept either the full attribute value
/// or any single whitespace-separated class name, so both `"toctree-wrapper"` and
/// `"pep-zero-table docutils align-default"` work as expected values.
#[derive(Debug, Clone, Default)]
pub struct AttrMatcher {
    rules: Vec<AttrRule>,
}

#[derive(Debug, Clone)]
enum AttrRule {
    Equals { name: String, value: String },
    Pattern { name: String, pattern: Regex },
}

impl AttrMatcher {
    /// Matcher that accepts every element.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn attr(name: &str, value: &str) -> Self {
        Self::any().and(name, value)
    }

    pub fn pattern(name: &str, pattern: Regex) -> Self {
        Self::any().and_pattern(name, pattern)
    }

    pub fn and(mut self, name: &str, value: &str) -> Self {
        self.rules.push(AttrRule::Equals {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn and_pattern(mut self, name: &str, pattern: Regex) -> Self {
        self.rules.push(AttrRule::Pattern {
            name: name.to_string(),
            pattern,
        });
        self
    }

    pub fn matches(&self, element: ElementRef<'_>) -> bool {
        let element = element.value();
        self.rules.iter().all(|rule| match rule {
            AttrRule::Equals { name, value } => match element.attr(name) {
                Some(actual) if name == "class" => {
                    actual == value || actual.split_whitespace().any(|class| class == value)
                }
                Some(actual) => actual == value,
                None => false,
            },
            AttrRule::Pattern { name, pattern } => element
                .attr(name)
                .is_some_and(|actual| pattern.is_match(actual)),
        })
    }
}

impl fmt::Display for AttrMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rules.is_empty() {
            return write!(f, "any attributes");
        }
        let parts: Vec<String> = self
            .rules
            .iter()
            .map(|rule| match rule {
                AttrRule::Equals { name, value } => format!("{}={:?}", name, value),
                AttrRule::Pattern { name, pattern } => format!("{}~/{}/", name, pattern.as_str()),
            })
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Short `<tag attr="...">` rendering used in error messages.
pub fn describe(element: ElementRef<'_>) -> String {
    let value = element.value();
    let mut out = format!("<{}", value.name());
    for (name, attr) in value.attrs() {
        out.push_str(&format!(" {}=\"{}\"", name, attr));
    }
    out.push('>');
    out
}

/// All elements in the subtree of `root` (root included) named `tag` and accepted by `matcher`,
/// in document order.
pub fn find_all<'a>(root: ElementRef<'a>, tag: &str, matcher: &AttrMatcher) -> Vec<ElementRef<'a>> {
    root.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == tag && matcher.matches(*el))
        .collect()
}

/// First element in the subtree of `root` named `tag` and accepted by `matcher`.
pub fn find_tag<'a>(root: ElementRef<'a>, tag: &str, matcher: &AttrMatcher) -> Result<ElementRef<'a>> {
    root.descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == tag && matcher.matches(*el))
        .ok_or_else(|| ParserError::TagNotFound {
            context: describe(root),
            tag: tag.to_string(),
            matcher: matcher.to_string(),
        })
}

/// Parent element of the first text node in the subtree whose content is exactly `text`.
pub fn find_text<'a>(root: ElementRef<'a>, text: &str) -> Result<ElementRef<'a>> {
    root.descendants()
        .filter(|node| node.value().as_text().is_some_and(|t| &*t.text == text))
        .find_map(|node| node.parent().and_then(ElementRef::wrap))
        .ok_or_else(|| ParserError::TextNotFound {
            text: text.to_string(),
        })
}

/// First following sibling of `element` that is a `tag` element.
pub fn next_sibling_tag<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == tag)
}

/// Concatenated text of every descendant text node.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

pub fn require_attr<'a>(element: ElementRef<'a>, attribute: &str) -> Result<&'a str> {
    element
        .value()
        .attr(attribute)
        .ok_or_else(|| ParserError::MissingAttribute {
            tag: element.value().name().to_string(),
            attribute: attribute.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const PAGE: &str = r#"
        <html><body>
            <div class="sidebar wide" id="nav">
                <a href="/first.html">First</a>
                <a href="/docs/python-3-docs-pdf-a4.zip">PDF</a>
                <a href="/second.html">Second</a>
            </div>
            <dl><dt>Status<a>¶</a></dt><dd>Final</dd></dl>
        </body></html>
    "#;

    #[test]
    fn test_find_tag_returns_first_in_document_order() {
        let doc = Html::parse_document(PAGE);
        let a = find_tag(doc.root_element(), "a", &AttrMatcher::any()).unwrap();
        assert_eq!(a.value().attr("href"), Some("/first.html"));

        let again = find_tag(doc.root_element(), "a", &AttrMatcher::any()).unwrap();
        assert_eq!(a.id(), again.id());
    }

    #[test]
    fn test_find_tag_includes_root() {
        let doc = Html::parse_document(PAGE);
        let div = find_tag(doc.root_element(), "div", &AttrMatcher::any()).unwrap();
        let same = find_tag(div, "div", &AttrMatcher::attr("id", "nav")).unwrap();
        assert_eq!(div.id(), same.id());
    }

    #[test]
    fn test_class_matches_token_or_full_value() {
        let doc = Html::parse_document(PAGE);
        let root = doc.root_element();
        assert!(find_tag(root, "div", &AttrMatcher::attr("class", "wide")).is_ok());
        assert!(find_tag(root, "div", &AttrMatcher::attr("class", "sidebar wide")).is_ok());
        assert!(find_tag(root, "div", &AttrMatcher::attr("class", "side")).is_err());
        assert!(find_tag(root, "div", &AttrMatcher::attr("id", "na")).is_err());
    }

    #[test]
    fn test_pattern_matcher() {
        let doc = Html::parse_document(PAGE);
        let matcher = AttrMatcher::pattern("href", Regex::new(r".+pdf-a4\.zip$").unwrap());
        let a = find_tag(doc.root_element(), "a", &matcher).unwrap();
        assert_eq!(a.value().attr("href"), Some("/docs/python-3-docs-pdf-a4.zip"));
    }

    #[test]
    fn test_missing_tag_is_an_error() {
        let doc = Html::parse_document(PAGE);
        let err = find_tag(doc.root_element(), "table", &AttrMatcher::attr("class", "docutils"))
            .unwrap_err();
        match err {
            ParserError::TagNotFound { context, tag, matcher } => {
                assert_eq!(context, "<html>");
                assert_eq!(tag, "table");
                assert_eq!(matcher, "[class=\"docutils\"]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_find_all_keeps_order() {
        let doc = Html::parse_document(PAGE);
        let hrefs: Vec<_> = find_all(doc.root_element(), "a", &AttrMatcher::any())
            .into_iter()
            .filter_map(|a| a.value().attr("href"))
            .collect();
        assert_eq!(hrefs, vec!["/first.html", "/docs/python-3-docs-pdf-a4.zip", "/second.html"]);
    }

    #[test]
    fn test_find_text_and_sibling() {
        let doc = Html::parse_document(PAGE);
        let dt = find_text(doc.root_element(), "Status").unwrap();
        assert_eq!(dt.value().name(), "dt");
        let dd = next_sibling_tag(dt, "dd").unwrap();
        assert_eq!(text_of(dd), "Final");

        assert!(matches!(
            find_text(doc.root_element(), "Stat"),
            Err(ParserError::TextNotFound { .. })
        ));
    }

    #[test]
    fn test_require_attr() {
        let doc = Html::parse_document(PAGE);
        let dd = find_tag(doc.root_element(), "dd", &AttrMatcher::any()).unwrap();
        assert!(matches!(
            require_attr(dd, "title"),
            Err(ParserError::MissingAttribute { .. })
        ));
    }
}
