pub mod browser;
pub mod walker;

use crate::error::CrawlError;
use crate::results::PageSnapshot;
use std::future::Future;
use url::Url;

pub use browser::BrowserSession;
pub use walker::{crawl_site, walk};

/// Something that can capture a page
pub trait Crawler {
    /// Visit `url` and capture everything downstream stages need
    fn capture(&self, url: &Url) -> impl Future<Output = Result<PageSnapshot, CrawlError>>;

    /// Undo whatever an interrupted or failed capture left behind
    fn recover(&self) -> impl Future<Output = Result<(), CrawlError>> {
        async { Ok(()) }
    }
}
