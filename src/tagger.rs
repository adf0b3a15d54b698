use crate::parsers::dom::{self, DomNode};
use crate::results::{ComponentCandidate, ComponentKind, PageSnapshot};
use crate::utils::pascal_case;
use std::collections::HashMap;

/// One tagging rule: tag names or class substrings that mark a kind
struct Rule {
    kind: ComponentKind,
    tags: &'static [&'static str],
    roles: &'static [&'static str],
    class_words: &'static [&'static str],
}

/// Evaluated in order; the first matching rule wins
const RULES: &[Rule] = &[
    Rule {
        kind: ComponentKind::Header,
        tags: &["header"],
        roles: &["banner"],
        class_words: &["header", "topbar", "navbar", "app-bar"],
    },
    Rule {
        kind: ComponentKind::Sidebar,
        tags: &["aside"],
        roles: &["navigation"],
        class_words: &["sidebar", "nav"],
    },
    Rule {
        kind: ComponentKind::Modal,
        tags: &["dialog"],
        roles: &["dialog"],
        class_words: &["modal", "dialog"],
    },
    Rule {
        kind: ComponentKind::Form,
        tags: &["form"],
        roles: &["form"],
        class_words: &["form"],
    },
    Rule {
        kind: ComponentKind::MainContent,
        tags: &["main"],
        roles: &["main"],
        class_words: &["main-content", "content"],
    },
    Rule {
        kind: ComponentKind::Card,
        tags: &[],
        roles: &[],
        class_words: &["card", "tile", "panel"],
    },
    Rule {
        kind: ComponentKind::List,
        tags: &["ul", "ol", "table"],
        roles: &["list"],
        class_words: &["list"],
    },
    Rule {
        kind: ComponentKind::Button,
        tags: &["button"],
        roles: &["button"],
        class_words: &["btn", "button"],
    },
];

/// Return the kind of the first rule matching `node`
pub fn classify(node: &DomNode) -> Option<ComponentKind> {
    matching_rule(node).map(|(rule, _)| rule.kind)
}

fn matching_rule(node: &DomNode) -> Option<(&'static Rule, Option<&str>)> {
    for rule in RULES {
        if rule.tags.contains(&node.tag.as_str()) {
            return Some((rule, matched_class(node, rule)));
        }
        if let Some(role) = &node.role {
            if rule.roles.contains(&role.as_str()) {
                return Some((rule, matched_class(node, rule)));
            }
        }
        if let Some(class) = matched_class(node, rule) {
            return Some((rule, Some(class)));
        }
    }
    None
}

fn matched_class<'a>(node: &'a DomNode, rule: &Rule) -> Option<&'a str> {
    node.classes
        .iter()
        .find(|class| {
            let class = class.to_ascii_lowercase();
            rule.class_words.iter().any(|w| class.contains(w))
        })
        .map(String::as_str)
}

/// Component name for a match
///
/// A class that already names the kind (`task-card` for Card) gives a more
/// specific name; otherwise the kind's name is used.
fn candidate_name(kind: ComponentKind, class: Option<&str>) -> String {
    if let Some(class) = class {
        let name = pascal_case(class);
        let starts_alpha = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
        if starts_alpha && name.to_ascii_lowercase().contains(&kind.as_str().to_ascii_lowercase())
        {
            return name;
        }
    }
    kind.as_str().to_string()
}

/// Tag a serialized DOM tree, visiting at most `max_depth` levels below the root
pub fn tag_tree(tree: &DomNode, page_url: &str, max_depth: usize) -> Vec<ComponentCandidate> {
    let mut candidates = Vec::new();
    visit(tree, page_url, 0, max_depth, &mut candidates);
    candidates
}

fn visit(
    node: &DomNode,
    page_url: &str,
    depth: usize,
    max_depth: usize,
    out: &mut Vec<ComponentCandidate>,
) {
    if depth > max_depth {
        return;
    }

    if let Some((rule, class)) = matching_rule(node) {
        ::log::trace!("Tagged {} as {}", node.selector(), rule.kind);
        out.push(ComponentCandidate {
            kind: rule.kind,
            name: candidate_name(rule.kind, class),
            selector: node.selector(),
            html_snippet: node.html.clone(),
            pages: vec![page_url.to_string()],
        });
    }

    for child in &node.children {
        visit(child, page_url, depth + 1, max_depth, out);
    }
}

/// Tag one captured page
pub fn tag_page(page: &PageSnapshot, max_depth: usize) -> Vec<ComponentCandidate> {
    let tree = dom::build_tree(&page.html, max_depth);
    let candidates = tag_tree(&tree, &page.url, max_depth);
    ::log::debug!(
        "Tagged {} candidates across {} nodes on {}",
        candidates.len(),
        tree.node_count(),
        page.url
    );
    candidates
}

/// Merge candidates sharing (kind, name), keeping the first occurrence
///
/// Origin page lists are unioned in first-seen order.
pub fn merge_candidates(candidates: Vec<ComponentCandidate>) -> Vec<ComponentCandidate> {
    let mut merged: Vec<ComponentCandidate> = Vec::new();
    let mut index: HashMap<(ComponentKind, String), usize> = HashMap::new();

    for candidate in candidates {
        let key = (candidate.kind, candidate.name.clone());
        match index.get(&key) {
            Some(&i) => {
                let existing = &mut merged[i];
                for page in candidate.pages {
                    if !existing.pages.contains(&page) {
                        existing.pages.push(page);
                    }
                }
            }
            None => {
                index.insert(key, merged.len());
                merged.push(candidate);
            }
        }
    }

    merged
}

/// Tag and merge every page
pub fn tag_pages(pages: &[PageSnapshot], max_depth: usize) -> Vec<ComponentCandidate> {
    let all = pages
        .iter()
        .flat_map(|page| tag_page(page, max_depth))
        .collect();
    let merged = merge_candidates(all);
    ::log::info!(
        "Detected {} unique components across {} pages",
        merged.len(),
        pages.len()
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(tag: &str, classes: &[&str]) -> DomNode {
        DomNode {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    fn candidate(kind: ComponentKind, name: &str, page: &str) -> ComponentCandidate {
        ComponentCandidate {
            kind,
            name: name.to_string(),
            selector: "div".to_string(),
            html_snippet: String::new(),
            pages: vec![page.to_string()],
        }
    }

    #[test]
    fn test_classify_by_tag() {
        assert_eq!(classify(&node("header", &[])), Some(ComponentKind::Header));
        assert_eq!(classify(&node("aside", &[])), Some(ComponentKind::Sidebar));
        assert_eq!(classify(&node("form", &[])), Some(ComponentKind::Form));
        assert_eq!(classify(&node("main", &[])), Some(ComponentKind::MainContent));
        assert_eq!(classify(&node("ul", &[])), Some(ComponentKind::List));
        assert_eq!(classify(&node("button", &[])), Some(ComponentKind::Button));
        assert_eq!(classify(&node("div", &[])), None);
        assert_eq!(classify(&node("span", &["label"])), None);
    }

    #[test]
    fn test_classify_by_class_substring() {
        assert_eq!(classify(&node("div", &["left-nav"])), Some(ComponentKind::Sidebar));
        assert_eq!(classify(&node("div", &["SideBar"])), Some(ComponentKind::Sidebar));
        assert_eq!(classify(&node("div", &["project-card"])), Some(ComponentKind::Card));
        assert_eq!(classify(&node("div", &["modal-backdrop"])), Some(ComponentKind::Modal));
        assert_eq!(classify(&node("a", &["btn", "btn-primary"])), Some(ComponentKind::Button));
    }

    #[test]
    fn test_classify_by_role() {
        let mut dialog = node("div", &[]);
        dialog.role = Some("dialog".to_string());
        assert_eq!(classify(&dialog), Some(ComponentKind::Modal));
    }

    #[test]
    fn test_first_rule_wins() {
        // navbar contains "nav" but the header rule comes first
        assert_eq!(classify(&node("div", &["navbar"])), Some(ComponentKind::Header));
        // a form inside a modal class is still a modal
        assert_eq!(classify(&node("form", &["modal-form"])), Some(ComponentKind::Modal));
        // an aside tag beats a card class
        assert_eq!(classify(&node("aside", &["card"])), Some(ComponentKind::Sidebar));
    }

    #[test]
    fn test_candidate_names() {
        assert_eq!(candidate_name(ComponentKind::Card, Some("task-card")), "TaskCard");
        assert_eq!(candidate_name(ComponentKind::Button, Some("btn")), "Button");
        assert_eq!(candidate_name(ComponentKind::Header, Some("app-header")), "AppHeader");
        assert_eq!(candidate_name(ComponentKind::Header, Some("navbar")), "Header");
        assert_eq!(candidate_name(ComponentKind::List, None), "List");
        assert_eq!(candidate_name(ComponentKind::Card, Some("2-card")), "Card");
    }

    #[test]
    fn test_tag_page() {
        let mut page = PageSnapshot::new("https://app.example.com/tasks", "/tasks");
        page.html = r#"<html><body>
            <header class="app-header"><h1>Tasks</h1></header>
            <aside class="sidebar"><ul><li>Home</li></ul></aside>
            <main><div class="task-card"><button>Add</button></div></main>
        </body></html>"#
            .to_string();

        let candidates = tag_page(&page, 6);
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["AppHeader", "Sidebar", "List", "MainContent", "TaskCard", "Button"]
        );
        assert!(candidates.iter().all(|c| c.pages == vec![page.url.clone()]));
        assert_eq!(candidates[0].selector, "header.app-header");
        assert!(candidates[4].html_snippet.contains("task-card"));
    }

    #[test]
    fn test_depth_cap_drops_deep_matches() {
        let mut page = PageSnapshot::new("https://app.example.com/", "/");
        page.html =
            "<body><div><div><div><button>Deep</button></div></div></div></body>".to_string();

        assert_eq!(tag_page(&page, 4).len(), 1);
        assert!(tag_page(&page, 3).is_empty());
    }

    #[test]
    fn test_merge_unions_pages() {
        let merged = merge_candidates(vec![
            candidate(ComponentKind::Sidebar, "Sidebar", "https://a/"),
            candidate(ComponentKind::Card, "TaskCard", "https://a/"),
            candidate(ComponentKind::Sidebar, "Sidebar", "https://a/projects"),
            candidate(ComponentKind::Sidebar, "Sidebar", "https://a/"),
        ]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].name, "Sidebar");
        assert_eq!(merged[0].pages, vec!["https://a/", "https://a/projects"]);
        assert_eq!(merged[1].name, "TaskCard");
    }

    #[test]
    fn test_merge_keeps_distinct_kinds() {
        let merged = merge_candidates(vec![
            candidate(ComponentKind::List, "List", "https://a/"),
            candidate(ComponentKind::Card, "List", "https://a/"),
        ]);
        assert_eq!(merged.len(), 2);
    }
}
