use crate::parsers::ParseResult;
use crate::results::SidebarInfo;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static LINKS: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static HEADINGS: LazyLock<Selector> = LazyLock::new(|| selector("h1, h2, h3"));
static BUTTONS: LazyLock<Selector> = LazyLock::new(|| selector("button, [role=\"button\"]"));
static STYLES: LazyLock<Selector> = LazyLock::new(|| selector("style"));
static SIDEBARS: LazyLock<Selector> =
    LazyLock::new(|| selector("aside, [class*=\"sidebar\"], [id*=\"sidebar\"]"));
static NAVS: LazyLock<Selector> = LazyLock::new(|| selector("nav"));
static EXPANDABLE: LazyLock<Selector> = LazyLock::new(|| selector("[aria-expanded]"));

/// Words marking a toggle for a collapsible sidebar
const TOGGLE_WORDS: &[&str] = &["sidebar", "menu", "toggle", "collapse", "expand"];

/// Parses HTML content to extract title, text, headings and links
pub fn parse(html: &str) -> ParseResult {
    let doc = Html::parse_document(html);

    // Extract text content
    let text = doc
        .select(&BODY)
        .flat_map(|n| n.text())
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let links = doc
        .select(&LINKS)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect::<Vec<String>>();

    let headings = doc
        .select(&HEADINGS)
        .map(element_text)
        .filter(|h| !h.is_empty())
        .collect::<Vec<String>>();

    ::log::debug!(
        "HTML parser found {} links and {} headings",
        links.len(),
        headings.len()
    );

    ParseResult {
        title: extract_title(&doc),
        content: text,
        headings,
        links,
    }
}

/// Concatenated text of every inline `<style>` element
pub fn extract_inline_styles(html: &str) -> String {
    let doc = Html::parse_document(html);
    doc.select(&STYLES)
        .flat_map(|e| e.text())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Detect a sidebar and whether it looks collapsible
///
/// Prefers `aside` or sidebar-named elements, then falls back to a `nav`
/// that does not live inside a header.
pub fn detect_sidebar(html: &str) -> Option<SidebarInfo> {
    let doc = Html::parse_document(html);

    let sidebar = doc.select(&SIDEBARS).next().or_else(|| {
        doc.select(&NAVS)
            .find(|nav| !has_ancestor(*nav, "header"))
    })?;

    let collapsible = looks_collapsible(sidebar) || has_toggle_button(&doc);

    Some(SidebarInfo {
        selector: element_selector(sidebar),
        collapsible,
    })
}

fn extract_title(doc: &Html) -> Option<String> {
    doc.select(&TITLE)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn has_ancestor(element: ElementRef<'_>, tag: &str) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().name() == tag)
}

fn looks_collapsible(sidebar: ElementRef<'_>) -> bool {
    let value = sidebar.value();
    let class_hint = value.classes().any(|c| {
        let c = c.to_ascii_lowercase();
        c.contains("collaps") || c.contains("toggle")
    });
    let attr_hint = value.attr("aria-expanded").is_some()
        || value.attr("data-collapsed").is_some()
        || value.attr("data-state").is_some();

    class_hint || attr_hint || sidebar.select(&EXPANDABLE).next().is_some()
}

fn has_toggle_button(doc: &Html) -> bool {
    doc.select(&BUTTONS).any(|button| {
        let value = button.value();
        let label = [
            value.attr("aria-label").unwrap_or_default(),
            value.attr("title").unwrap_or_default(),
            value.attr("class").unwrap_or_default(),
        ]
        .join(" ")
        .to_ascii_lowercase();
        TOGGLE_WORDS.iter().any(|w| label.contains(w))
    })
}

fn element_selector(element: ElementRef<'_>) -> String {
    let value = element.value();
    if let Some(id) = value.id() {
        return format!("{}#{}", value.name(), id);
    }
    let mut selector = value.name().to_string();
    if let Some(class) = value.classes().next() {
        selector.push('.');
        selector.push_str(class);
    }
    selector
}
