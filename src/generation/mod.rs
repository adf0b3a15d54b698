pub mod batch;
pub mod checklist;
pub mod client;
pub mod placeholder;
pub mod prompt;
pub mod synth;

#[cfg(test)]
pub(crate) mod tests;

pub use checklist::{Checklist, Violation};
pub use client::{ChatClient, CodeGenerator, GenerationRequest};
pub use prompt::{PageTarget, Target};
pub use synth::Synthesizer;

use crate::results::ComponentKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File extension of every generated source file
pub const SOURCE_EXT: &str = "jsx";

/// What a generated file implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "component", rename_all = "lowercase")]
pub enum ArtifactKind {
    Page,
    Component(ComponentKind),
}

impl ArtifactKind {
    /// Checklist gating this kind of file
    pub fn checklist(&self) -> Checklist {
        match self {
            ArtifactKind::Page => Checklist::Page,
            ArtifactKind::Component(_) => Checklist::Component,
        }
    }

    /// Project directory holding this kind of file
    pub fn directory(&self) -> &'static str {
        match self {
            ArtifactKind::Page => "src/pages",
            ArtifactKind::Component(_) => "src/components",
        }
    }
}

/// How the accepted source text was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactOrigin {
    /// Returned by the generation service
    Generated,
    /// Templated fallback after a transport failure
    Placeholder,
    /// Read back from disk for validation
    Existing,
}

/// One generation attempt and its checklist outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub number: u32,
    pub source: String,
    pub violations: Vec<Violation>,
}

/// A synthesized source file plus its validation verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub name: String,
    pub kind: ArtifactKind,
    #[serde(skip)]
    pub source: String,
    pub origin: ArtifactOrigin,
    /// Generation calls made for this file
    pub attempts: u32,
    /// Checklist items still failing when the file was accepted
    pub violations: Vec<Violation>,
}

impl GeneratedArtifact {
    /// Accept an attempt as final
    pub fn accepted(name: &str, kind: ArtifactKind, attempt: Attempt) -> Self {
        Self {
            name: name.to_string(),
            kind,
            source: attempt.source,
            origin: ArtifactOrigin::Generated,
            attempts: attempt.number,
            violations: attempt.violations,
        }
    }

    /// Whether the accepted text passed its checklist
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, SOURCE_EXT)
    }

    /// Path relative to the project root
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(self.kind.directory()).join(self.file_name())
    }
}
