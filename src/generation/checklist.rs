//! Static presence checks gating generated source text.
//!
//! Every check is a substring or regex test over the raw text; nothing is
//! parsed.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

fn check(pattern: &'static str) -> Regex {
    Regex::new(pattern).expect("static checklist pattern is valid")
}

static STATE_HOOK: LazyLock<Regex> = LazyLock::new(|| check(r"\buseState\s*[<(]"));
static STATE_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    check(r"\[\s*([A-Za-z_$][\w$]*)\s*,\s*set[\w$]*\s*\]\s*=\s*(?:React\.)?useState\b")
});
static MUTATION_FN: LazyLock<Regex> = LazyLock::new(|| {
    check(r"\b(?:const|let|var|function)\s+(?:handle)?(?i:add|delete|remove|toggle|update|create|edit)(?:[A-Z][\w$]*)?\b")
});
static CLICK_HANDLER: LazyLock<Regex> = LazyLock::new(|| check(r"\bonClick\s*=\s*\{"));
static CHANGE_HANDLER: LazyLock<Regex> = LazyLock::new(|| check(r"\bonChange\s*=\s*\{"));
static LIST_RENDER: LazyLock<Regex> = LazyLock::new(|| check(r"\.map\s*\("));
static FORM_CONTROL: LazyLock<Regex> = LazyLock::new(|| check(r"<(?:input|textarea|select)\b"));
static BUTTON: LazyLock<Regex> = LazyLock::new(|| check(r"<button\b"));
// attribute values in braces may contain `=>`
static BUTTON_LABEL: LazyLock<Regex> =
    LazyLock::new(|| check(r"(?s)<button\b(?:[^>{]|\{[^}]*\})*>([^<]*)"));
static DEFAULT_EXPORT: LazyLock<Regex> = LazyLock::new(|| check(r"\bexport\s+default\b"));

/// Nouns a page's state is expected to hold
const DOMAIN_NOUNS: &[&str] = &["tasks", "projects", "items", "data"];

/// A CRUD action a button label can announce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudAction {
    Create,
    Update,
    Delete,
}

impl CrudAction {
    const ALL: [CrudAction; 3] = [CrudAction::Create, CrudAction::Update, CrudAction::Delete];

    /// Words in a button label announcing this action
    fn label_words(&self) -> &'static [&'static str] {
        match self {
            CrudAction::Create => &["add", "new", "create"],
            CrudAction::Update => &["edit", "update", "save"],
            CrudAction::Delete => &["delete", "remove"],
        }
    }

    /// Function name prefixes expected to implement this action
    fn function_prefixes(&self) -> &'static [&'static str] {
        match self {
            CrudAction::Create => &["add", "create"],
            CrudAction::Update => &["edit", "update", "save"],
            CrudAction::Delete => &["delete", "remove"],
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            CrudAction::Create => "add",
            CrudAction::Update => "edit",
            CrudAction::Delete => "delete",
        }
    }

    fn has_function(&self, source: &str) -> bool {
        self.function_prefixes().iter().any(|prefix| {
            let capitalized = format!("{}{}", prefix[..1].to_ascii_uppercase(), &prefix[1..]);
            [
                format!("const {}", prefix),
                format!("function {}", prefix),
                format!("handle{}", capitalized),
                format!("on{}", capitalized),
            ]
            .iter()
            .any(|needle| source.contains(needle.as_str()))
        })
    }
}

/// One failed checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    MissingStateHook,
    MissingDomainState,
    MissingMutationFunction,
    MissingClickHandler,
    MissingListRendering,
    MissingChangeHandler,
    MissingCrudHandler(CrudAction),
    MissingDefaultExport,
}

impl Violation {
    /// Short name of the failed item
    pub fn description(&self) -> String {
        match self {
            Violation::MissingStateHook => "missing state hook".to_string(),
            Violation::MissingDomainState => "missing domain state variable".to_string(),
            Violation::MissingMutationFunction => "missing mutation function".to_string(),
            Violation::MissingClickHandler => "missing click binding".to_string(),
            Violation::MissingListRendering => "missing list rendering".to_string(),
            Violation::MissingChangeHandler => "missing change handler".to_string(),
            Violation::MissingCrudHandler(action) => {
                format!("missing {} handler", action.as_str())
            }
            Violation::MissingDefaultExport => "missing default export".to_string(),
        }
    }

    /// Instruction telling the generator how to fix this item
    pub fn corrective(&self) -> String {
        let fix = match self {
            Violation::MissingStateHook => {
                "You MUST import useState from 'react' and manage the page data with it.".to_string()
            }
            Violation::MissingDomainState => "You MUST declare the main collection with useState, e.g. `const [tasks, setTasks] = useState([...])` (or projects/items/data), seeded with realistic sample entries.".to_string(),
            Violation::MissingMutationFunction => "You MUST define mutation functions such as addTask, deleteTask and toggleTask that update the state.".to_string(),
            Violation::MissingClickHandler => "You MUST attach onClick={...} handlers to the buttons so they actually do something.".to_string(),
            Violation::MissingListRendering => "You MUST render the collection with .map(...) instead of hard-coding repeated markup.".to_string(),
            Violation::MissingChangeHandler => "You MUST pair every input, textarea and select with an onChange={...} handler bound to state.".to_string(),
            Violation::MissingCrudHandler(action) => format!(
                "You MUST implement a function for every \"{}\" button (for example handle{}Item) and bind it with onClick.",
                action.as_str(),
                capitalize(action.as_str())
            ),
            Violation::MissingDefaultExport => {
                "You MUST end the file with a default export of the component.".to_string()
            }
        };
        format!("{} ({})", fix, self.description())
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Which fixed checklist to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checklist {
    Page,
    Component,
}

impl Checklist {
    pub fn run(&self, source: &str) -> Vec<Violation> {
        match self {
            Checklist::Page => check_page(source),
            Checklist::Component => check_component(source),
        }
    }
}

/// Page checklist: state, domain state, mutation, click binding, list rendering
pub fn check_page(source: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    if !STATE_HOOK.is_match(source) {
        violations.push(Violation::MissingStateHook);
    }
    if !has_domain_state(source) {
        violations.push(Violation::MissingDomainState);
    }
    if !MUTATION_FN.is_match(source) {
        violations.push(Violation::MissingMutationFunction);
    }
    if !CLICK_HANDLER.is_match(source) {
        violations.push(Violation::MissingClickHandler);
    }
    if !LIST_RENDER.is_match(source) {
        violations.push(Violation::MissingListRendering);
    }

    violations
}

/// Component checklist: controls paired with handlers, CRUD buttons with functions
pub fn check_component(source: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    if FORM_CONTROL.is_match(source) && !CHANGE_HANDLER.is_match(source) {
        violations.push(Violation::MissingChangeHandler);
    }
    if BUTTON.is_match(source) && !CLICK_HANDLER.is_match(source) {
        violations.push(Violation::MissingClickHandler);
    }

    let labels: Vec<String> = BUTTON_LABEL
        .captures_iter(source)
        .map(|c| c[1].to_ascii_lowercase())
        .collect();
    for action in CrudAction::ALL {
        let announced = labels.iter().any(|label| {
            label
                .split(|c: char| !c.is_ascii_alphabetic())
                .any(|word| action.label_words().contains(&word))
        });
        if announced && !action.has_function(source) {
            violations.push(Violation::MissingCrudHandler(action));
        }
    }

    if !DEFAULT_EXPORT.is_match(source) {
        violations.push(Violation::MissingDefaultExport);
    }

    violations
}

fn has_domain_state(source: &str) -> bool {
    STATE_BINDING.captures_iter(source).any(|c| {
        let name = c[1].to_ascii_lowercase();
        DOMAIN_NOUNS.iter().any(|noun| name.ends_with(noun))
    })
}
