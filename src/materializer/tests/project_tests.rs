use crate::generation::{ArtifactKind, ArtifactOrigin, Attempt, GeneratedArtifact, Violation, placeholder};
use crate::materializer::{APP_FILE, GenerationReport, Materializer, ProjectMeta, REPORT_FILE};
use crate::results::ComponentKind;
use crate::tokens::DesignTokenSet;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn meta() -> ProjectMeta {
    let mut tokens = DesignTokenSet::default();
    tokens.accents.primary = Some("#6366f1".to_string());
    ProjectMeta {
        package_name: "app-example-com-clone".to_string(),
        title: "app.example.com clone".to_string(),
        tokens,
    }
}

fn page(name: &str) -> GeneratedArtifact {
    GeneratedArtifact::accepted(
        name,
        ArtifactKind::Page,
        Attempt {
            number: 1,
            source: placeholder::page(name, name, &DesignTokenSet::default()),
            violations: vec![],
        },
    )
}

fn component(name: &str, kind: ComponentKind, source: &str) -> GeneratedArtifact {
    GeneratedArtifact::accepted(
        name,
        ArtifactKind::Component(kind),
        Attempt {
            number: 2,
            source: source.to_string(),
            violations: vec![],
        },
    )
}

fn artifacts() -> Vec<GeneratedArtifact> {
    vec![
        component(
            "Sidebar",
            ComponentKind::Sidebar,
            "export default function Sidebar() { return <aside />; }",
        ),
        component(
            "TaskCard",
            ComponentKind::Card,
            "export default function TaskCard() { return <div />; }",
        ),
        page("HomePage"),
        page("ProjectsPage"),
        page("TasksPage"),
        page("TaskDetailPage"),
    ]
}

/// Every file under `root` keyed by relative path
fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut files = BTreeMap::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_string_lossy().to_string();
                files.insert(rel, fs::read(&path).unwrap());
            }
        }
    }
    files
}

#[test]
fn test_project_layout() {
    let dir = TempDir::new().unwrap();
    let materializer = Materializer::new(dir.path());

    let output = materializer.materialize(&meta(), &artifacts()).unwrap();

    for file in [
        "package.json",
        "index.html",
        "vite.config.js",
        "postcss.config.js",
        "tailwind.config.js",
        "src/main.jsx",
        "src/index.css",
        "src/theme/tokens.json",
        "src/App.jsx",
        "src/components/index.js",
        "src/components/Sidebar.jsx",
        "src/components/TaskCard.jsx",
        "src/pages/HomePage.jsx",
        "src/pages/TaskDetailPage.jsx",
        REPORT_FILE,
    ] {
        assert!(dir.path().join(file).is_file(), "missing {}", file);
    }
    assert_eq!(output.components, vec!["Sidebar", "TaskCard"]);
    assert_eq!(output.routes.len(), 4);
    assert_eq!(output.files_written, 8 + 6 + 3);
}

#[test]
fn test_materialize_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let materializer = Materializer::new(dir.path());

    materializer.materialize(&meta(), &artifacts()).unwrap();
    let first = snapshot(dir.path());
    materializer.materialize(&meta(), &artifacts()).unwrap();
    let second = snapshot(dir.path());

    assert_eq!(first, second);
}

#[test]
fn test_router_matches_page_files() {
    let dir = TempDir::new().unwrap();
    Materializer::new(dir.path())
        .materialize(&meta(), &artifacts())
        .unwrap();

    let app = fs::read_to_string(dir.path().join(APP_FILE)).unwrap();
    assert!(app.contains("<Route path=\"/\" element={<HomePage />} />"));
    assert!(app.contains("<Route path=\"/projects\" element={<ProjectsPage />} />"));
    assert!(app.contains("<Route path=\"/tasks\" element={<TasksPage />} />"));
    assert!(app.contains("<Route path=\"/tasks/:id\" element={<TaskDetailPage />} />"));
}

#[test]
fn test_barrel_reexports_stale_components() {
    let dir = TempDir::new().unwrap();
    let stale = dir.path().join("src/components/OldModal.jsx");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "export default function OldModal() {}\n").unwrap();

    let output = Materializer::new(dir.path())
        .materialize(&meta(), &artifacts())
        .unwrap();

    assert_eq!(output.components, vec!["OldModal", "Sidebar", "TaskCard"]);
    let barrel = fs::read_to_string(dir.path().join("src/components/index.js")).unwrap();
    assert!(barrel.contains("export { default as OldModal } from './OldModal';"));
}

#[test]
fn test_duplicate_paths_are_written_once() {
    let dir = TempDir::new().unwrap();
    let materializer = Materializer::new(dir.path());
    let first = component("Header", ComponentKind::Header, "export default function Header() { return 1; }");
    let second = component("Header", ComponentKind::Header, "export default function Header() { return 2; }");

    let written = materializer.write_artifacts(&[first, second]).unwrap();

    assert_eq!(written, 1);
    let source = fs::read_to_string(dir.path().join("src/components/Header.jsx")).unwrap();
    assert!(source.contains("return 1;"));
    assert!(source.ends_with('\n'));
}

#[test]
fn test_report_records_defects() {
    let dir = TempDir::new().unwrap();
    let materializer = Materializer::new(dir.path());
    let mut defective = page("TasksPage");
    defective.violations = vec![Violation::MissingClickHandler];
    defective.attempts = 4;

    materializer
        .materialize(&meta(), &[page("HomePage"), defective])
        .unwrap();

    let report = materializer.load_report().unwrap();
    assert_eq!(report.artifacts.len(), 2);
    assert!(!report.all_passed());
    let names: Vec<&str> = report.defective().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["TasksPage"]);
    assert_eq!(report.artifacts[1].attempts, 4);

    let raw = fs::read_to_string(dir.path().join(REPORT_FILE)).unwrap();
    assert!(raw.contains("\"missing_click_handler\""));
    assert!(!raw.contains("useState"));
}

#[test]
fn test_read_existing_runs_checklists() {
    let dir = TempDir::new().unwrap();
    let materializer = Materializer::new(dir.path());
    let broken = component(
        "TaskForm",
        ComponentKind::Form,
        "export default function TaskForm() { return <input value=\"x\" />; }",
    );
    materializer
        .materialize(&meta(), &[page("HomePage"), broken])
        .unwrap();

    let existing = materializer.read_existing().unwrap();

    assert_eq!(existing.len(), 2);
    assert!(existing.iter().all(|a| a.origin == ArtifactOrigin::Existing));
    let home = existing.iter().find(|a| a.name == "HomePage").unwrap();
    assert!(home.passed());
    let form = existing.iter().find(|a| a.name == "TaskForm").unwrap();
    assert_eq!(form.kind, ArtifactKind::Component(ComponentKind::Form));
    assert_eq!(form.violations, vec![Violation::MissingChangeHandler]);
}

#[test]
fn test_empty_report_passes() {
    assert!(GenerationReport::default().all_passed());
    assert_eq!(GenerationReport::default().placeholders(), 0);
}
