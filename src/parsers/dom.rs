use crate::utils::truncate_chars;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Maximum characters of outer HTML kept per node
pub const SNIPPET_CHARS: usize = 600;

/// Maximum characters of own text kept per node
const TEXT_CHARS: usize = 120;

/// Elements that never carry layout worth tagging
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg", "link", "meta"];

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("body selector is valid"));

/// Serialized DOM element, depth-capped at build time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DomNode {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub role: Option<String>,

    /// Text directly owned by this element
    pub text: String,

    /// Shallow outer HTML
    pub html: String,

    pub children: Vec<DomNode>,
}

impl DomNode {
    /// Short CSS selector identifying this element
    pub fn selector(&self) -> String {
        if let Some(id) = &self.id {
            return format!("{}#{}", self.tag, id);
        }
        let mut selector = self.tag.clone();
        for class in self.classes.iter().take(2) {
            selector.push('.');
            selector.push_str(class);
        }
        selector
    }

    /// Whether any class contains `needle`, case-insensitively
    pub fn class_contains(&self, needle: &str) -> bool {
        self.classes
            .iter()
            .any(|c| c.to_ascii_lowercase().contains(needle))
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(DomNode::node_count).sum::<usize>()
    }
}

/// Build a DOM tree from the document body, keeping at most `max_depth` levels below it
pub fn build_tree(html: &str, max_depth: usize) -> DomNode {
    let doc = Html::parse_document(html);
    match doc.select(&BODY).next() {
        Some(body) => build_node(body, 0, max_depth),
        None => build_node(doc.root_element(), 0, max_depth),
    }
}

fn build_node(element: ElementRef<'_>, depth: usize, max_depth: usize) -> DomNode {
    let value = element.value();

    let text = element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let children = if depth < max_depth {
        element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| !SKIPPED_TAGS.contains(&child.value().name()))
            .map(|child| build_node(child, depth + 1, max_depth))
            .collect()
    } else {
        Vec::new()
    };

    DomNode {
        tag: value.name().to_string(),
        id: value.id().map(str::to_string),
        classes: value.classes().map(str::to_string).collect(),
        role: value.attr("role").map(str::to_string),
        text: truncate_chars(&text, TEXT_CHARS),
        html: truncate_chars(&element.html(), SNIPPET_CHARS),
        children,
    }
}
