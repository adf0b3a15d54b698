pub mod barrel;
pub mod project;
pub mod routes;

use crate::error::{MaterializeError, materialize_io};
use crate::generation::{ArtifactKind, ArtifactOrigin, Checklist, GeneratedArtifact, SOURCE_EXT};
use crate::results::ComponentKind;
use crate::tokens::DesignTokenSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const REPORT_FILE: &str = "generation-report.json";
pub const APP_FILE: &str = "src/App.jsx";

/// Run metadata the project files are derived from
#[derive(Debug, Clone)]
pub struct ProjectMeta {
    pub package_name: String,
    pub title: String,
    pub tokens: DesignTokenSet,
}

/// Machine-readable record of every artifact written in a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub artifacts: Vec<GeneratedArtifact>,
}

impl GenerationReport {
    /// Artifacts accepted with outstanding violations
    pub fn defective(&self) -> impl Iterator<Item = &GeneratedArtifact> {
        self.artifacts.iter().filter(|a| !a.passed())
    }

    pub fn placeholders(&self) -> usize {
        self.artifacts
            .iter()
            .filter(|a| a.origin == ArtifactOrigin::Placeholder)
            .count()
    }

    pub fn all_passed(&self) -> bool {
        self.defective().next().is_none()
    }
}

/// What a materialization wrote
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectOutput {
    pub root: PathBuf,
    pub files_written: usize,
    pub components: Vec<String>,
    pub routes: Vec<routes::Route>,
}

/// Writes a buildable front-end project under one root directory
#[derive(Debug, Clone)]
pub struct Materializer {
    root: PathBuf,
}

impl Materializer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn pages_dir(&self) -> PathBuf {
        self.root.join(ArtifactKind::Page.directory())
    }

    fn components_dir(&self) -> PathBuf {
        self.root.join(ArtifactKind::Component(ComponentKind::Card).directory())
    }

    fn write_file(&self, relative: impl AsRef<Path>, contents: &str) -> Result<(), MaterializeError> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(materialize_io(parent))?;
        }
        fs::write(&path, contents).map_err(materialize_io(&path))
    }

    /// Write the fixed manifests and token-derived files
    pub fn write_scaffold(&self, meta: &ProjectMeta) -> Result<usize, MaterializeError> {
        let files = project::scaffold(&meta.package_name, &meta.title, &meta.tokens).map_err(
            |source| MaterializeError::Json {
                what: "design tokens",
                source,
            },
        )?;
        for (relative, contents) in &files {
            self.write_file(relative, contents)?;
        }
        Ok(files.len())
    }

    /// Write each artifact once at its final path
    ///
    /// A later artifact resolving to an already written path is skipped.
    pub fn write_artifacts(&self, artifacts: &[GeneratedArtifact]) -> Result<usize, MaterializeError> {
        let mut written: HashSet<PathBuf> = HashSet::new();
        for artifact in artifacts {
            let relative = artifact.relative_path();
            if !written.insert(relative.clone()) {
                ::log::warn!(
                    "Skipping duplicate artifact {} ({} already written)",
                    artifact.name,
                    relative.display()
                );
                continue;
            }
            let mut source = artifact.source.clone();
            if !source.ends_with('\n') {
                source.push('\n');
            }
            self.write_file(&relative, &source)?;
            ::log::debug!("Wrote {}", relative.display());
        }
        Ok(written.len())
    }

    /// Rewrite the components barrel from the directory listing
    pub fn write_barrel(&self) -> Result<Vec<String>, MaterializeError> {
        barrel::write(&self.components_dir())
    }

    /// Rewrite `src/App.jsx` from the page files present on disk
    pub fn write_router(&self) -> Result<Vec<routes::Route>, MaterializeError> {
        let pages = barrel::list_modules(&self.pages_dir())?;
        let table = routes::derive_routes(&pages);
        self.write_file(APP_FILE, &routes::render_app(&table))?;
        Ok(table)
    }

    pub fn write_report(&self, report: &GenerationReport) -> Result<(), MaterializeError> {
        let json = serde_json::to_string_pretty(report).map_err(|source| {
            MaterializeError::Json {
                what: "generation report",
                source,
            }
        })?;
        self.write_file(REPORT_FILE, &(json + "\n"))
    }

    /// Write the whole project tree
    pub fn materialize(
        &self,
        meta: &ProjectMeta,
        artifacts: &[GeneratedArtifact],
    ) -> Result<ProjectOutput, MaterializeError> {
        let scaffold = self.write_scaffold(meta)?;
        let sources = self.write_artifacts(artifacts)?;
        let components = self.write_barrel()?;
        let routes = self.write_router()?;
        self.write_report(&GenerationReport {
            artifacts: artifacts.to_vec(),
        })?;

        let files_written = scaffold + sources + 3;
        ::log::info!(
            "Materialized {} files under {} ({} components, {} routes)",
            files_written,
            self.root.display(),
            components.len(),
            routes.len()
        );

        Ok(ProjectOutput {
            root: self.root.clone(),
            files_written,
            components,
            routes,
        })
    }

    /// Read back every generated source file and run its checklist
    ///
    /// Component kinds are not recorded on disk, so components are reported
    /// with the kind from a previous report when one exists, else as Card.
    pub fn read_existing(&self) -> Result<Vec<GeneratedArtifact>, MaterializeError> {
        let previous = self.load_report().unwrap_or_default();
        let mut artifacts = Vec::new();

        for name in barrel::list_modules(&self.pages_dir())? {
            let source = self.read_source(&self.pages_dir(), &name)?;
            artifacts.push(existing(name, ArtifactKind::Page, source));
        }

        for name in barrel::list_modules(&self.components_dir())? {
            let kind = previous
                .artifacts
                .iter()
                .find(|a| a.name == name && matches!(a.kind, ArtifactKind::Component(_)))
                .map(|a| a.kind)
                .unwrap_or(ArtifactKind::Component(ComponentKind::Card));
            let source = self.read_source(&self.components_dir(), &name)?;
            artifacts.push(existing(name, kind, source));
        }

        Ok(artifacts)
    }

    fn read_source(&self, dir: &Path, name: &str) -> Result<String, MaterializeError> {
        let path = dir.join(format!("{}.{}", name, SOURCE_EXT));
        fs::read_to_string(&path).map_err(materialize_io(&path))
    }

    /// The report left by the previous run, if readable
    pub fn load_report(&self) -> Option<GenerationReport> {
        let contents = fs::read_to_string(self.root.join(REPORT_FILE)).ok()?;
        serde_json::from_str(&contents).ok()
    }
}

fn existing(name: String, kind: ArtifactKind, source: String) -> GeneratedArtifact {
    let checklist: Checklist = kind.checklist();
    GeneratedArtifact {
        violations: checklist.run(&source),
        name,
        kind,
        source,
        origin: ArtifactOrigin::Existing,
        attempts: 0,
    }
}

#[cfg(test)]
mod tests;
