//! The extraction output tree.
//!
//! ```text
//! <root>/pages/<slug>.html
//! <root>/styles/<slug>.json       computed styles
//! <root>/css/<slug>.json          rule extraction with counts
//! <root>/screenshots/<slug>.png
//! <root>/screenshots/<slug>-full.png
//! <root>/summary.json
//! ```

use crate::error::{StoreError, store_io};
use crate::parsers::css::StyleExtraction;
use crate::results::{ComputedStyles, PageSnapshot, SiteSummary};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "summary.json";

/// Reads and writes one extraction directory
#[derive(Debug, Clone)]
pub struct ExtractionStore {
    root: PathBuf,
}

impl ExtractionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn html_path(&self, slug: &str) -> PathBuf {
        self.root.join("pages").join(format!("{}.html", slug))
    }

    fn styles_path(&self, slug: &str) -> PathBuf {
        self.root.join("styles").join(format!("{}.json", slug))
    }

    fn css_path(&self, slug: &str) -> PathBuf {
        self.root.join("css").join(format!("{}.json", slug))
    }

    fn screenshot_path(&self, slug: &str) -> PathBuf {
        self.root.join("screenshots").join(format!("{}.png", slug))
    }

    fn full_screenshot_path(&self, slug: &str) -> PathBuf {
        self.root.join("screenshots").join(format!("{}-full.png", slug))
    }

    /// Write every per-page file for one captured page under `slug`
    pub fn save_page(
        &self,
        page: &PageSnapshot,
        slug: &str,
        extraction: &StyleExtraction,
    ) -> Result<(), StoreError> {
        write_bytes(&self.html_path(slug), page.html.as_bytes())?;
        write_json(&self.styles_path(slug), &page.computed_styles)?;
        write_json(&self.css_path(slug), extraction)?;
        if !page.screenshot.is_empty() {
            write_bytes(&self.screenshot_path(slug), &page.screenshot)?;
        }
        if !page.full_screenshot.is_empty() {
            write_bytes(&self.full_screenshot_path(slug), &page.full_screenshot)?;
        }
        ::log::debug!("Saved extraction files for {} as {}", page.url, slug);
        Ok(())
    }

    pub fn save_summary(&self, summary: &SiteSummary) -> Result<(), StoreError> {
        let path = self.root.join(SUMMARY_FILE);
        write_json(&path, summary)?;
        ::log::info!(
            "Wrote {} ({} pages, {} components)",
            path.display(),
            summary.pages.len(),
            summary.components.len()
        );
        Ok(())
    }

    pub fn load_summary(&self) -> Result<SiteSummary, StoreError> {
        read_json(&self.root.join(SUMMARY_FILE))
    }

    /// Rebuild snapshots for every page listed in the summary
    ///
    /// Screenshots are optional; stylesheet text is not stored and stays empty.
    pub fn load_pages(&self, summary: &SiteSummary) -> Result<Vec<PageSnapshot>, StoreError> {
        let mut pages = Vec::with_capacity(summary.pages.len());

        for record in &summary.pages {
            let html_path = self.html_path(&record.slug);
            let html = fs::read_to_string(&html_path).map_err(store_io(&html_path))?;

            let mut page = PageSnapshot::new(&record.url, &record.path);
            page.title = record.title.clone();
            page.sidebar = record.sidebar.clone();
            page.html = html;
            page.computed_styles = self.load_optional::<ComputedStyles>(&self.styles_path(&record.slug))?;
            page.screenshot = read_optional_bytes(&self.screenshot_path(&record.slug))?;
            page.full_screenshot = read_optional_bytes(&self.full_screenshot_path(&record.slug))?;
            pages.push(page);
        }

        ::log::info!(
            "Loaded {} pages from {}",
            pages.len(),
            self.root.display()
        );
        Ok(pages)
    }

    fn load_optional<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T, StoreError> {
        if path.exists() {
            read_json(path)
        } else {
            Ok(T::default())
        }
    }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(store_io(parent))?;
    }
    fs::write(path, bytes).map_err(store_io(path))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_bytes(path, &json)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = fs::read(path).map_err(store_io(path))?;
    serde_json::from_slice(&contents).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional_bytes(path: &Path) -> Result<Vec<u8>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::css;
    use crate::results::{ComponentCandidate, ComponentKind, PageRecord, SidebarInfo};
    use crate::tokens::DesignTokenSet;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn captured_page() -> PageSnapshot {
        let mut page = PageSnapshot::new("https://app.example.com/tasks", "/tasks");
        page.title = Some("Tasks".to_string());
        page.html = "<html><body><aside>nav</aside></body></html>".to_string();
        page.computed_styles = BTreeMap::from([(
            "body".to_string(),
            BTreeMap::from([("color".to_string(), "rgb(17, 24, 39)".to_string())]),
        )]);
        page.stylesheet_text = "body { color: #111827; }".to_string();
        page.screenshot = vec![1, 2, 3];
        page.full_screenshot = vec![4, 5, 6, 7];
        page.sidebar = Some(SidebarInfo {
            selector: "aside".to_string(),
            collapsible: false,
        });
        page
    }

    fn summary_for(page: &PageSnapshot) -> SiteSummary {
        SiteSummary {
            base_url: "https://app.example.com/".to_string(),
            pages: vec![PageRecord::from(page)],
            components: vec![ComponentCandidate {
                kind: ComponentKind::Sidebar,
                name: "Sidebar".to_string(),
                selector: "aside".to_string(),
                html_snippet: "<aside>nav</aside>".to_string(),
                pages: vec![page.url.clone()],
            }],
            tokens: DesignTokenSet::default(),
        }
    }

    #[test]
    fn test_save_writes_the_tree() {
        let dir = TempDir::new().unwrap();
        let store = ExtractionStore::new(dir.path());
        let page = captured_page();
        let extraction = css::extract(&page.stylesheet_text);

        store.save_page(&page, "tasks", &extraction).unwrap();
        store.save_summary(&summary_for(&page)).unwrap();

        for file in [
            "pages/tasks.html",
            "styles/tasks.json",
            "css/tasks.json",
            "screenshots/tasks.png",
            "screenshots/tasks-full.png",
            "summary.json",
        ] {
            assert!(dir.path().join(file).is_file(), "missing {}", file);
        }
        let saved: StyleExtraction = read_json(&dir.path().join("css/tasks.json")).unwrap();
        assert_eq!(saved, extraction);
    }

    #[test]
    fn test_pages_load_back() {
        let dir = TempDir::new().unwrap();
        let store = ExtractionStore::new(dir.path());
        let page = captured_page();
        store.save_page(&page, "tasks", &StyleExtraction::default()).unwrap();
        store.save_summary(&summary_for(&page)).unwrap();

        let summary = store.load_summary().unwrap();
        assert_eq!(summary.components.len(), 1);
        assert_eq!(summary.pages[0].name, "TasksPage");

        let loaded = store.load_pages(&summary).unwrap();
        assert_eq!(loaded.len(), 1);
        let loaded = &loaded[0];
        assert_eq!(loaded.url, page.url);
        assert_eq!(loaded.title, page.title);
        assert_eq!(loaded.html, page.html);
        assert_eq!(loaded.computed_styles, page.computed_styles);
        assert_eq!(loaded.screenshot, page.screenshot);
        assert_eq!(loaded.full_screenshot, page.full_screenshot);
        assert_eq!(loaded.sidebar, page.sidebar);
        assert!(loaded.stylesheet_text.is_empty());
    }

    #[test]
    fn test_missing_screenshots_are_empty() {
        let dir = TempDir::new().unwrap();
        let store = ExtractionStore::new(dir.path());
        let mut page = captured_page();
        page.screenshot.clear();
        page.full_screenshot.clear();
        store.save_page(&page, "tasks", &StyleExtraction::default()).unwrap();

        let loaded = store.load_pages(&summary_for(&page)).unwrap();
        assert!(loaded[0].preferred_screenshot().is_none());
    }

    #[test]
    fn test_pages_with_colliding_paths_keep_separate_files() {
        let dir = TempDir::new().unwrap();
        let store = ExtractionStore::new(dir.path());
        let mut first = PageSnapshot::new("https://app.example.com/tasks/1", "/tasks/1");
        first.html = "<h1>one</h1>".to_string();
        let mut second = PageSnapshot::new("https://app.example.com/tasks_1", "/tasks_1");
        second.html = "<h1>two</h1>".to_string();
        assert_eq!(first.slug(), second.slug());

        let slugs = crate::utils::unique_slugs([first.slug(), second.slug()]);
        let mut summary = summary_for(&first);
        summary.pages = vec![PageRecord::from(&first), PageRecord::from(&second)];
        for ((page, record), slug) in [&first, &second].iter().zip(&mut summary.pages).zip(&slugs) {
            record.slug = slug.clone();
            store.save_page(page, slug, &StyleExtraction::default()).unwrap();
        }

        let loaded = store.load_pages(&summary).unwrap();
        assert_eq!(loaded[0].html, "<h1>one</h1>");
        assert_eq!(loaded[1].html, "<h1>two</h1>");
    }

    #[test]
    fn test_missing_summary_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = ExtractionStore::new(dir.path());
        assert!(matches!(store.load_summary(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_corrupt_summary_is_a_json_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SUMMARY_FILE), "{not json").unwrap();
        let store = ExtractionStore::new(dir.path());
        assert!(matches!(store.load_summary(), Err(StoreError::Json { .. })));
    }
}
