//! Pure instruction builders: `(target, tokens, prior violations) -> text`.

use crate::generation::checklist::Violation;
use crate::generation::ArtifactKind;
use crate::parsers::html;
use crate::results::{ComponentCandidate, ComponentKind, PageSnapshot, SidebarInfo};
use crate::tokens::DesignTokenSet;

/// Characters of page text quoted in a page prompt
const EXCERPT_CHARS: usize = 1500;

/// Headings quoted in a page prompt
const MAX_HEADINGS: usize = 12;

pub const SYSTEM_PROMPT: &str = "You are an expert React developer. You write complete, working \
React function components styled only with Tailwind CSS utility classes. Reply with exactly one \
JSX module inside a single ```jsx code block and nothing else.";

/// Everything a page prompt needs, detached from the raw snapshot
#[derive(Debug, Clone)]
pub struct PageTarget<'a> {
    pub name: String,
    pub path: String,
    pub url: String,
    pub title: Option<String>,
    pub headings: Vec<String>,
    pub excerpt: String,
    /// Names of detected components that appear on this page
    pub components: Vec<String>,
    pub sidebar: Option<SidebarInfo>,
    pub screenshot: Option<&'a [u8]>,
}

impl<'a> PageTarget<'a> {
    pub fn from_snapshot(page: &'a PageSnapshot, components: &[ComponentCandidate]) -> Self {
        let outline = html::parse(&page.html);
        let mut headings = outline.headings.clone();
        headings.truncate(MAX_HEADINGS);

        Self {
            name: page.page_name(),
            path: page.path.clone(),
            url: page.url.clone(),
            title: page.title.clone().or(outline.title.clone()),
            headings,
            excerpt: outline.excerpt(EXCERPT_CHARS),
            components: components
                .iter()
                .filter(|c| c.pages.contains(&page.url))
                .map(|c| c.name.clone())
                .collect(),
            sidebar: page.sidebar.clone(),
            screenshot: page.preferred_screenshot(),
        }
    }
}

/// A file to synthesize
#[derive(Debug, Clone)]
pub enum Target<'a> {
    Page(PageTarget<'a>),
    Component(&'a ComponentCandidate),
}

impl Target<'_> {
    pub fn name(&self) -> &str {
        match self {
            Target::Page(page) => &page.name,
            Target::Component(candidate) => &candidate.name,
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            Target::Page(_) => ArtifactKind::Page,
            Target::Component(candidate) => ArtifactKind::Component(candidate.kind),
        }
    }

    /// Build the instruction text for this target
    pub fn instruction(
        &self,
        tokens: &DesignTokenSet,
        prior: &[Violation],
        with_screenshot: bool,
    ) -> String {
        match self {
            Target::Page(page) => page_instruction(page, tokens, prior, with_screenshot),
            Target::Component(candidate) => component_instruction(candidate, tokens, prior),
        }
    }
}

/// Instruction for one page component
pub fn page_instruction(
    page: &PageTarget<'_>,
    tokens: &DesignTokenSet,
    prior: &[Violation],
    with_screenshot: bool,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Create a React page component named {} for the route {}.\n",
        page.name, page.path
    ));
    out.push_str(&format!(
        "It recreates the page \"{}\" ({}) as a fully working, interactive screen.\n",
        page.title.as_deref().unwrap_or(&page.name),
        page.url
    ));
    if with_screenshot {
        out.push_str("The attached screenshot shows the original page; match its layout closely.\n");
    }

    if !page.headings.is_empty() {
        out.push_str("\nPage headings:\n");
        for heading in &page.headings {
            out.push_str(&format!("- {}\n", heading));
        }
    }

    if !page.excerpt.is_empty() {
        out.push_str(&format!("\nVisible text (excerpt):\n{}\n", page.excerpt));
    }

    if !page.components.is_empty() {
        out.push_str(&format!(
            "\nReusable components exist in ../components. Import and use them where they fit: \
             import {{ {} }} from '../components';\n",
            page.components.join(", ")
        ));
    }

    match &page.sidebar {
        Some(sidebar) if sidebar.collapsible => out.push_str(
            "\nLayout: the page has a collapsible sidebar. Keep its open/closed state in useState \
             and toggle it with a button.\n",
        ),
        Some(_) => out.push_str("\nLayout: the page has a fixed sidebar next to the main content.\n"),
        None => {}
    }

    out.push_str("\nDesign tokens:\n");
    out.push_str(&tokens.describe());
    out.push('\n');

    out.push_str(
        "\nRequirements:\n\
         - Import useState from 'react' and declare the main collection as state, e.g. \
         const [tasks, setTasks] = useState([...]) (or projects/items/data), seeded with 3-5 \
         realistic sample entries.\n\
         - Implement mutation functions such as addTask, deleteTask and toggleTask that update \
         that state.\n\
         - Bind them to buttons with onClick handlers.\n\
         - Render every collection with .map() and a stable key.\n\
         - Style with Tailwind classes only, using arbitrary values like bg-[#0f172a] for the \
         exact colors above.\n\
         - Do not fetch data or use UI libraries other than react and react-router-dom.\n\
         - Export the page as the default export.\n",
    );

    out.push_str(&corrective_section(prior));
    out
}

/// Instruction for one reusable component
pub fn component_instruction(
    candidate: &ComponentCandidate,
    tokens: &DesignTokenSet,
    prior: &[Violation],
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Create a reusable React component named {} that recreates this {} from an existing \
         web application (selector {}).\n",
        candidate.name,
        candidate.kind.as_str(),
        candidate.selector
    ));
    out.push_str(&format!(
        "\nOriginal HTML (truncated):\n```html\n{}\n```\n",
        candidate.html_snippet
    ));

    out.push_str("\nDesign tokens:\n");
    out.push_str(&tokens.describe());
    out.push('\n');

    out.push_str(
        "\nRequirements:\n\
         - Style with Tailwind classes only, using arbitrary values for the exact colors above.\n\
         - Every input, textarea and select needs an onChange handler; every button needs an \
         onClick handler.\n\
         - Buttons labelled Add, Edit or Delete must call correspondingly named functions \
         (handleAdd, handleEdit, handleDelete) defined locally or received as onAdd/onEdit/onDelete \
         props.\n",
    );
    out.push_str(kind_hint(candidate.kind));
    out.push_str("- Export the component as the default export.\n");

    out.push_str(&corrective_section(prior));
    out
}

fn kind_hint(kind: ComponentKind) -> &'static str {
    match kind {
        ComponentKind::Header => {
            "- Accept title and optional actions props; keep navigation links as <a> elements.\n"
        }
        ComponentKind::Sidebar => {
            "- Accept an items prop and render it with .map(); support collapsing with a \
             useState toggle.\n"
        }
        ComponentKind::MainContent => "- Render children inside the main content area.\n",
        ComponentKind::Card => "- Accept the displayed entity as a prop and forward actions via callbacks.\n",
        ComponentKind::List => "- Accept an items prop and render it with .map() and a stable key.\n",
        ComponentKind::Button => "- Accept label, onClick and variant props.\n",
        ComponentKind::Form => {
            "- Use controlled inputs held in useState and call onSubmit with the values.\n"
        }
        ComponentKind::Modal => "- Accept isOpen, onClose and children props; render nothing when closed.\n",
    }
}

/// Corrective instructions for the previous attempt's violations
pub fn corrective_section(prior: &[Violation]) -> String {
    if prior.is_empty() {
        return String::new();
    }

    let mut out = String::from(
        "\nIMPORTANT: your previous attempt failed validation. Fix every issue below:\n",
    );
    for violation in prior {
        out.push_str(&format!("- {}\n", violation.corrective()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_target() -> PageTarget<'static> {
        PageTarget {
            name: "TasksPage".to_string(),
            path: "/tasks".to_string(),
            url: "https://app.example.com/tasks".to_string(),
            title: Some("Tasks".to_string()),
            headings: vec!["My tasks".to_string()],
            excerpt: "My tasks Write docs".to_string(),
            components: vec!["Sidebar".to_string(), "TaskCard".to_string()],
            sidebar: Some(SidebarInfo {
                selector: "aside".to_string(),
                collapsible: true,
            }),
            screenshot: None,
        }
    }

    #[test]
    fn test_page_instruction() {
        let mut tokens = DesignTokenSet::default();
        tokens.accents.primary = Some("#6366f1".to_string());
        let text = page_instruction(&page_target(), &tokens, &[], true);

        assert!(text.starts_with("Create a React page component named TasksPage for the route /tasks."));
        assert!(text.contains("\"Tasks\""));
        assert!(text.contains("attached screenshot"));
        assert!(text.contains("- My tasks"));
        assert!(text.contains("import { Sidebar, TaskCard } from '../components';"));
        assert!(text.contains("collapsible sidebar"));
        assert!(text.contains("- Primary accent: #6366f1"));
        assert!(!text.contains("previous attempt"));
    }

    #[test]
    fn test_page_instruction_is_pure() {
        let tokens = DesignTokenSet::default();
        let prior = [Violation::MissingListRendering];
        assert_eq!(
            page_instruction(&page_target(), &tokens, &prior, false),
            page_instruction(&page_target(), &tokens, &prior, false)
        );
    }

    #[test]
    fn test_retry_instruction_lists_violations() {
        let tokens = DesignTokenSet::default();
        let prior = [Violation::MissingClickHandler];
        let text = page_instruction(&page_target(), &tokens, &prior, false);
        assert!(text.contains("previous attempt failed validation"));
        assert!(text.contains(&Violation::MissingClickHandler.corrective()));
        assert!(!text.contains("attached screenshot"));
    }

    #[test]
    fn test_component_instruction() {
        let candidate = ComponentCandidate {
            kind: ComponentKind::Modal,
            name: "Modal".to_string(),
            selector: "div.modal".to_string(),
            html_snippet: "<div class=\"modal\">Hi</div>".to_string(),
            pages: vec![],
        };
        let text = component_instruction(&candidate, &DesignTokenSet::default(), &[]);
        assert!(text.contains("named Modal that recreates this Modal"));
        assert!(text.contains("<div class=\"modal\">Hi</div>"));
        assert!(text.contains("isOpen, onClose"));
        assert!(text.ends_with("default export.\n"));
    }

    #[test]
    fn test_corrective_section() {
        assert_eq!(corrective_section(&[]), "");
        let text = corrective_section(&[Violation::MissingStateHook, Violation::MissingListRendering]);
        assert_eq!(text.lines().filter(|l| l.starts_with("- ")).count(), 2);
    }

    #[test]
    fn test_target_from_snapshot() {
        let mut page = PageSnapshot::new("https://app.example.com/projects", "/projects");
        page.html = "<html><head><title>Projects</title></head><body><h1>All projects</h1></body></html>"
            .to_string();
        let components = vec![
            ComponentCandidate {
                kind: ComponentKind::Header,
                name: "Header".to_string(),
                selector: "header".to_string(),
                html_snippet: String::new(),
                pages: vec!["https://app.example.com/projects".to_string()],
            },
            ComponentCandidate {
                kind: ComponentKind::Form,
                name: "Form".to_string(),
                selector: "form".to_string(),
                html_snippet: String::new(),
                pages: vec!["https://app.example.com/other".to_string()],
            },
        ];

        let target = PageTarget::from_snapshot(&page, &components);
        assert_eq!(target.name, "ProjectsPage");
        assert_eq!(target.title.as_deref(), Some("Projects"));
        assert_eq!(target.headings, vec!["All projects"]);
        assert_eq!(target.components, vec!["Header"]);
        assert!(target.screenshot.is_none());
    }
}
