use scraper::Html;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::cache::HttpCache;
use crate::config::Settings;
use crate::error::{ParserError, Result};

/// HTTP client whose successful GET responses are served from an [`HttpCache`] on repeat.
pub struct CachedSession {
    client: reqwest::Client,
    cache: HttpCache,
}

impl CachedSession {
    pub fn new(settings: &Settings, cache: HttpCache) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .cookie_store(true)
            .build()
            .map_err(|source| ParserError::Request {
                url: String::new(),
                source,
            })?;

        Ok(Self { client, cache })
    }

    /// Session backed by the on-disk cache at `cache_path`.
    pub fn open<P: AsRef<Path>>(settings: &Settings, cache_path: P) -> Result<Self> {
        Self::new(settings, HttpCache::open(cache_path)?)
    }

    pub fn cache(&self) -> &HttpCache {
        &self.cache
    }

    pub fn clear_cache(&self) -> Result<usize> {
        let removed = self.cache.clear()?;
        log::info!("Cleared {} cached responses", removed);
        Ok(removed)
    }

    /// GET `url`, returning the response body. Non-success statuses are errors and are not cached.
    pub async fn get(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(hit) = self.cache.get("GET", url)? {
            log::debug!("Cache hit: {} (stored {})", url, hit.stored_at);
            return Ok(hit.body);
        }

        log::debug!("Fetching: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ParserError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ParserError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ParserError::Request {
                url: url.to_string(),
                source,
            })?
            .to_vec();

        self.cache.put("GET", url, status.as_u16(), &body)?;
        Ok(body)
    }

    /// GET `url` and parse the body as an HTML document.
    pub async fn get_document(&self, url: &str) -> Result<Html> {
        let body = self.get(url).await?;
        Ok(Html::parse_document(&String::from_utf8_lossy(&body)))
    }
}

/// Resolve `href` against `base` the way a browser follows a relative link.
pub fn join_url(base: &str, href: &str) -> Result<String> {
    let invalid = |source: url::ParseError| ParserError::InvalidUrl {
        base: base.to_string(),
        href: href.to_string(),
        source,
    };
    let base_url = Url::parse(base).map_err(invalid)?;
    Ok(base_url.join(href).map_err(invalid)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://docs.python.org/3/whatsnew/", "3.12.html").unwrap(),
            "https://docs.python.org/3/whatsnew/3.12.html"
        );
        assert_eq!(
            join_url("https://peps.python.org/", "pep-0008/").unwrap(),
            "https://peps.python.org/pep-0008/"
        );
        assert_eq!(
            join_url("https://docs.python.org/3/download.html", "archives/python-docs-pdf-a4.zip")
                .unwrap(),
            "https://docs.python.org/3/archives/python-docs-pdf-a4.zip"
        );
        assert_eq!(
            join_url("https://docs.python.org/3/", "https://example.com/x").unwrap(),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_join_url_rejects_bad_base() {
        assert!(matches!(
            join_url("not a url", "x.html"),
            Err(ParserError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_cached_response_served_without_network() {
        let cache = HttpCache::open_in_memory().unwrap();
        // Port 9 (discard) is never contacted: the body comes from the cache.
        let url = "http://127.0.0.1:9/page.html";
        cache.put("GET", url, 200, b"<html><h1>Cached</h1></html>").unwrap();

        let session = CachedSession::new(&Settings::default(), cache).unwrap();
        let doc = session.get_document(url).await.unwrap();
        let h1 = crate::locator::find_tag(doc.root_element(), "h1", &Default::default()).unwrap();
        assert_eq!(crate::locator::text_of(h1), "Cached");
    }
}
