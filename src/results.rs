use crate::tokens::DesignTokenSet;
use crate::utils;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Computed style properties keyed by CSS selector
pub type ComputedStyles = BTreeMap<String, BTreeMap<String, String>>;

/// Sidebar found on a captured page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarInfo {
    /// Selector of the detected sidebar element
    pub selector: String,

    /// Whether the sidebar appears to expand and collapse
    pub collapsible: bool,
}

/// Captured state of one crawled page
///
/// Snapshots are created once per crawl pass and only read afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Absolute URL of the page
    pub url: String,

    /// Path relative to the target
    pub path: String,

    /// Document title (if available)
    pub title: Option<String>,

    /// Raw page source after masking
    #[serde(skip)]
    pub html: String,

    /// Selector to computed style properties
    #[serde(skip)]
    pub computed_styles: ComputedStyles,

    /// Concatenated stylesheet text reachable from the page
    #[serde(skip)]
    pub stylesheet_text: String,

    /// Viewport-sized PNG
    #[serde(skip)]
    pub screenshot: Vec<u8>,

    /// Full-page PNG
    #[serde(skip)]
    pub full_screenshot: Vec<u8>,

    /// Sidebar detection result
    #[serde(default)]
    pub sidebar: Option<SidebarInfo>,
}

impl PageSnapshot {
    /// Create a snapshot with no captured assets
    pub fn new(url: &str, path: &str) -> Self {
        Self {
            url: url.to_string(),
            path: path.to_string(),
            title: None,
            html: String::new(),
            computed_styles: BTreeMap::new(),
            stylesheet_text: String::new(),
            screenshot: Vec::new(),
            full_screenshot: Vec::new(),
            sidebar: None,
        }
    }

    /// File stem used for every per-page file in the extraction tree
    pub fn slug(&self) -> String {
        utils::path_slug(&self.path)
    }

    /// Logical page component name derived from the path
    pub fn page_name(&self) -> String {
        utils::page_name(&self.path)
    }

    /// The best screenshot available for prompting
    pub fn preferred_screenshot(&self) -> Option<&[u8]> {
        if !self.full_screenshot.is_empty() {
            Some(&self.full_screenshot)
        } else if !self.screenshot.is_empty() {
            Some(&self.screenshot)
        } else {
            None
        }
    }
}

/// The fixed vocabulary of detectable UI fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Header,
    Sidebar,
    MainContent,
    Card,
    List,
    Button,
    Form,
    Modal,
}

impl ComponentKind {
    /// Default component name for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Header => "Header",
            ComponentKind::Sidebar => "Sidebar",
            ComponentKind::MainContent => "MainContent",
            ComponentKind::Card => "Card",
            ComponentKind::List => "List",
            ComponentKind::Button => "Button",
            ComponentKind::Form => "Form",
            ComponentKind::Modal => "Modal",
        }
    }

    /// Whether generated code for this kind is expected to hold form inputs
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            ComponentKind::Form | ComponentKind::Modal | ComponentKind::Button
        )
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tagged UI fragment detected within one or more pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentCandidate {
    pub kind: ComponentKind,

    /// PascalCase component name
    pub name: String,

    /// CSS selector of the first occurrence
    pub selector: String,

    /// Shallow serialized HTML of the first occurrence
    pub html_snippet: String,

    /// URLs of every page the fragment was seen on
    pub pages: Vec<String>,
}

/// One page entry in the extraction summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub path: String,
    pub slug: String,
    pub name: String,
    pub title: Option<String>,
    #[serde(default)]
    pub sidebar: Option<SidebarInfo>,
}

impl From<&PageSnapshot> for PageRecord {
    fn from(page: &PageSnapshot) -> Self {
        Self {
            url: page.url.clone(),
            path: page.path.clone(),
            slug: page.slug(),
            name: page.page_name(),
            title: page.title.clone(),
            sidebar: page.sidebar.clone(),
        }
    }
}

/// Top-level record of everything discovered during extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSummary {
    pub base_url: String,
    pub pages: Vec<PageRecord>,
    pub components: Vec<ComponentCandidate>,
    pub tokens: DesignTokenSet,
}
