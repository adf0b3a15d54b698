use crate::config::CrawlConfig;
use crate::crawlers::{BrowserSession, Crawler};
use crate::error::CrawlError;
use crate::filter::UrlFilter;
use crate::results::PageSnapshot;
use std::time::Duration;
use url::Url;

/// Capture each page in order, skipping the ones that fail
///
/// Every capture is bounded by `page_timeout`. Failures are logged, the
/// crawler recovers, and the walk moves on; only a walk that captures
/// nothing is an error.
pub async fn walk<C: Crawler>(
    crawler: &C,
    pages: &[Url],
    page_timeout: Duration,
) -> Result<Vec<PageSnapshot>, CrawlError> {
    let mut snapshots = Vec::with_capacity(pages.len());

    for (i, url) in pages.iter().enumerate() {
        ::log::info!("Capturing page {} of {}: {}", i + 1, pages.len(), url);

        let captured = match tokio::time::timeout(page_timeout, crawler.capture(url)).await {
            Ok(Ok(page)) => {
                ::log::info!(
                    "Captured {} ({} bytes of html, {} bytes of css)",
                    url,
                    page.html.len(),
                    page.stylesheet_text.len()
                );
                snapshots.push(page);
                true
            }
            Ok(Err(e)) => {
                ::log::error!("Skipping {}: {}", url, e);
                false
            }
            Err(_) => {
                ::log::error!(
                    "Skipping {}: timed out after {}s",
                    url,
                    page_timeout.as_secs()
                );
                false
            }
        };

        if !captured {
            if let Err(e) = crawler.recover().await {
                ::log::warn!("Could not recover after {}: {}", url, e);
            }
        }
    }

    if snapshots.is_empty() {
        let target = pages
            .first()
            .map(|u| u.origin().ascii_serialization())
            .unwrap_or_default();
        return Err(CrawlError::Unreachable(target));
    }

    Ok(snapshots)
}

/// Open a browser session, log in if configured, and capture every configured page
pub async fn crawl_site(config: &CrawlConfig) -> Result<Vec<PageSnapshot>, CrawlError> {
    let base =
        Url::parse(&config.target_url).map_err(|_| CrawlError::InvalidUrl(config.target_url.clone()))?;
    let filter = UrlFilter::for_base(base.clone());
    let pages = filter.resolve_pages(&config.pages);
    if pages.is_empty() {
        return Err(CrawlError::Unreachable(format!(
            "{} (no crawlable pages configured)",
            base
        )));
    }

    ::log::info!("Starting crawl of {} pages on {}", pages.len(), base);
    let session = BrowserSession::connect(config).await?;

    if config.has_credentials() {
        if let Err(e) = session.login(&base, config).await {
            ::log::warn!("Login failed, continuing unauthenticated: {}", e);
        }
    }

    // a capture spans several session waits, each bounded by timeout_secs
    let page_timeout = Duration::from_secs(config.timeout_secs.saturating_mul(2).max(1));
    let result = walk(&session, &pages, page_timeout).await;
    session.close().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves canned pages; anything else fails or hangs
    #[derive(Default)]
    struct FakeCrawler {
        pages: HashMap<String, &'static str>,
        hang: Vec<String>,
        recoveries: AtomicUsize,
    }

    impl Crawler for FakeCrawler {
        async fn capture(&self, url: &Url) -> Result<PageSnapshot, CrawlError> {
            if self.hang.contains(&url.to_string()) {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            match self.pages.get(url.as_str()) {
                Some(html) => {
                    let mut page = PageSnapshot::new(url.as_str(), url.path());
                    page.html = html.to_string();
                    Ok(page)
                }
                None => Err(CrawlError::Unreachable(url.to_string())),
            }
        }

        async fn recover(&self) -> Result<(), CrawlError> {
            self.recoveries.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_failed_pages_are_skipped() {
        let crawler = FakeCrawler {
            pages: HashMap::from([
                ("https://a.test/".to_string(), "<h1>Home</h1>"),
                ("https://a.test/tasks".to_string(), "<h1>Tasks</h1>"),
            ]),
            ..FakeCrawler::default()
        };
        let pages = vec![
            url("https://a.test/"),
            url("https://a.test/missing"),
            url("https://a.test/tasks"),
        ];

        let snapshots = walk(&crawler, &pages, Duration::from_secs(5)).await.unwrap();
        let paths: Vec<&str> = snapshots.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/tasks"]);
        assert_eq!(crawler.recoveries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_page_times_out() {
        let crawler = FakeCrawler {
            pages: HashMap::from([
                ("https://a.test/".to_string(), "<h1>Home</h1>"),
                ("https://a.test/slow".to_string(), "<h1>Slow</h1>"),
            ]),
            hang: vec!["https://a.test/slow".to_string()],
            ..FakeCrawler::default()
        };
        let pages = vec![url("https://a.test/slow"), url("https://a.test/")];

        let snapshots = walk(&crawler, &pages, Duration::from_millis(50)).await.unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].path, "/");
        // the interrupted capture is followed by a recovery before the next page
        assert_eq!(crawler.recoveries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_nothing_captured_is_unreachable() {
        let crawler = FakeCrawler::default();
        let pages = vec![url("https://a.test/"), url("https://a.test/x")];

        let err = walk(&crawler, &pages, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, CrawlError::Unreachable(ref t) if t == "https://a.test"));
    }
}
