pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod generation;
pub mod materializer;
pub mod parsers;
pub mod results;
pub mod snapshots;
pub mod tagger;
pub mod tokens;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{Config, RunMode};
pub use error::{Error, Result};
pub use results::{ComponentCandidate, PageSnapshot, SiteSummary};

use generation::synth::SynthSettings;
use generation::{ChatClient, CodeGenerator, GeneratedArtifact, PageTarget, Synthesizer, Target};
use materializer::{GenerationReport, Materializer, ProjectMeta, ProjectOutput};
use parsers::css::{self, StyleExtraction};
use results::PageRecord;
use snapshots::ExtractionStore;
use std::collections::HashSet;
use std::path::PathBuf;
use tokens::DesignTokenSet;

/// Everything the generation stage reads: the site summary plus page snapshots
#[derive(Debug, Clone)]
pub struct Extraction {
    pub summary: SiteSummary,
    pub pages: Vec<PageSnapshot>,
}

impl Extraction {
    /// Tag components and summarize styles for a set of captured pages
    ///
    /// Returns the per-page rule extractions alongside, in page order.
    pub fn analyze(
        base_url: &str,
        pages: Vec<PageSnapshot>,
        tag_max_depth: usize,
    ) -> (Self, Vec<StyleExtraction>) {
        let per_page: Vec<StyleExtraction> = pages
            .iter()
            .map(|page| {
                let text = if page.stylesheet_text.trim().is_empty() {
                    parsers::html::extract_inline_styles(&page.html)
                } else {
                    page.stylesheet_text.clone()
                };
                css::extract(&text)
            })
            .collect();

        let mut merged = StyleExtraction::default();
        for extraction in &per_page {
            merged.merge(extraction);
        }
        let tokens = DesignTokenSet::from_extraction(&merged);
        let components = tagger::tag_pages(&pages, tag_max_depth);

        // distinct paths can share a slug; each page needs its own files
        let slugs = utils::unique_slugs(pages.iter().map(PageSnapshot::slug));
        let records = pages
            .iter()
            .zip(slugs)
            .map(|(page, slug)| PageRecord {
                slug,
                ..PageRecord::from(page)
            })
            .collect();

        let summary = SiteSummary {
            base_url: base_url.to_string(),
            pages: records,
            components,
            tokens,
        };
        (Self { summary, pages }, per_page)
    }

    /// Generation targets: components first, then one page per distinct page name
    pub fn targets(&self) -> Vec<Target<'_>> {
        let mut targets: Vec<Target<'_>> = self
            .summary
            .components
            .iter()
            .map(Target::Component)
            .collect();

        let mut seen = HashSet::new();
        for page in &self.pages {
            let name = page.page_name();
            if !seen.insert(name.clone()) {
                ::log::info!("{} already covers {}; not generating it twice", name, page.url);
                continue;
            }
            targets.push(Target::Page(PageTarget::from_snapshot(
                page,
                &self.summary.components,
            )));
        }
        targets
    }
}

/// What a run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub mode: RunMode,
    pub pages: usize,
    pub components: usize,
    pub report: Option<GenerationReport>,
    pub project: Option<ProjectOutput>,
}

impl RunSummary {
    /// Artifacts accepted with outstanding checklist violations
    pub fn defective(&self) -> usize {
        self.report
            .as_ref()
            .map(|r| r.defective().count())
            .unwrap_or(0)
    }
}

/// Main builder for a clone run
pub struct Pipeline {
    config: Config,
    mode: RunMode,
}

impl Pipeline {
    /// Create a full-pipeline run over `config`
    pub fn new(config: Config) -> Self {
        Self {
            config,
            mode: RunMode::Full,
        }
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_target_url(mut self, url: impl Into<String>) -> Self {
        self.config.crawl.target_url = url.into();
        self
    }

    /// Replace the page paths to visit
    pub fn with_pages(mut self, pages: Vec<String>) -> Self {
        self.config.crawl.pages = pages;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.project_dir = dir.into();
        self
    }

    /// Set the corrective re-prompt ceiling
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config.generation.max_retries = max_retries;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn store(&self) -> ExtractionStore {
        ExtractionStore::new(&self.config.output_dir)
    }

    fn materializer(&self) -> Materializer {
        Materializer::new(&self.config.project_dir)
    }

    /// Validate configuration for the selected mode and run it
    pub async fn run(self) -> Result<RunSummary> {
        self.config.validate(self.mode)?;
        ::log::info!("Starting {:?} run", self.mode);

        match self.mode {
            RunMode::Full => {
                let extraction = self.extract().await?;
                self.generate(&extraction).await
            }
            RunMode::Crawl => {
                let extraction = self.extract().await?;
                Ok(RunSummary {
                    mode: self.mode,
                    pages: extraction.pages.len(),
                    components: extraction.summary.components.len(),
                    report: None,
                    project: None,
                })
            }
            RunMode::Regenerate => {
                let extraction = self.load_extraction()?;
                self.generate(&extraction).await
            }
            RunMode::Validate => self.validate_existing(),
        }
    }

    /// Crawl the target, analyze the pages and save the extraction tree
    pub async fn extract(&self) -> Result<Extraction> {
        let pages = crawlers::crawl_site(&self.config.crawl).await?;
        let (extraction, per_page) =
            Extraction::analyze(&self.config.crawl.target_url, pages, self.config.tag_max_depth);

        let store = self.store();
        let saved = extraction
            .pages
            .iter()
            .zip(&extraction.summary.pages)
            .zip(&per_page);
        for ((page, record), rules) in saved {
            store.save_page(page, &record.slug, rules)?;
        }
        store.save_summary(&extraction.summary)?;
        Ok(extraction)
    }

    /// Read a previous extraction tree back
    pub fn load_extraction(&self) -> Result<Extraction> {
        let store = self.store();
        let summary = store.load_summary()?;
        let pages = store.load_pages(&summary)?;
        Ok(Extraction { summary, pages })
    }

    async fn generate(&self, extraction: &Extraction) -> Result<RunSummary> {
        let client = ChatClient::new(&self.config.generation)?;
        ::log::info!("Generating with model {}", client.model());
        self.generate_with(&client, extraction).await
    }

    /// Synthesize every target with `generator` and materialize the project
    pub async fn generate_with<G: CodeGenerator>(
        &self,
        generator: &G,
        extraction: &Extraction,
    ) -> Result<RunSummary> {
        let tokens = &extraction.summary.tokens;
        let synthesizer =
            Synthesizer::new(generator, tokens, SynthSettings::from(&self.config.generation));
        let artifacts: Vec<GeneratedArtifact> =
            synthesizer.synthesize_all(extraction.targets()).await;

        let package_name = utils::package_name(&extraction.summary.base_url);
        let meta = ProjectMeta {
            title: package_name.clone(),
            package_name,
            tokens: tokens.clone(),
        };
        let project = self.materializer().materialize(&meta, &artifacts)?;
        let report = GenerationReport { artifacts };
        log_report(&report);

        Ok(RunSummary {
            mode: self.mode,
            pages: extraction.pages.len(),
            components: extraction.summary.components.len(),
            report: Some(report),
            project: Some(project),
        })
    }

    /// Run the checklists over the files already in the project directory
    pub fn validate_existing(&self) -> Result<RunSummary> {
        let materializer = self.materializer();
        let artifacts = materializer.read_existing()?;
        let report = GenerationReport { artifacts };
        materializer.write_report(&report)?;
        log_report(&report);

        let pages = report
            .artifacts
            .iter()
            .filter(|a| a.kind == generation::ArtifactKind::Page)
            .count();
        Ok(RunSummary {
            mode: self.mode,
            pages,
            components: report.artifacts.len() - pages,
            report: Some(report),
            project: None,
        })
    }
}

fn log_report(report: &GenerationReport) {
    for artifact in report.defective() {
        let violations: Vec<String> = artifact.violations.iter().map(|v| v.to_string()).collect();
        ::log::warn!(
            "{} accepted with violations: {}",
            artifact.name,
            violations.join(", ")
        );
    }
    ::log::info!(
        "{} artifacts, {} with violations, {} placeholders",
        report.artifacts.len(),
        report.defective().count(),
        report.placeholders()
    );
}
