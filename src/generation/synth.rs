use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::generation::batch::run_in_batches;
use crate::generation::client::{CodeGenerator, GenerationRequest, Message};
use crate::generation::prompt::{SYSTEM_PROMPT, Target};
use crate::generation::{ArtifactOrigin, Attempt, GeneratedArtifact, Violation, placeholder};
use crate::parsers::source::clean_generated;
use crate::tokens::DesignTokenSet;
use std::time::Duration;

/// Knobs of the synthesis loop
#[derive(Debug, Clone)]
pub struct SynthSettings {
    /// Corrective re-prompts allowed after the first call
    pub max_retries: u32,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
    pub attach_screenshots: bool,
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl From<&GenerationConfig> for SynthSettings {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            timeout: Duration::from_secs(config.timeout_secs),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            attach_screenshots: config.attach_screenshots,
            batch_size: config.batch_size,
            batch_delay: Duration::from_millis(config.batch_delay_ms),
        }
    }
}

/// Drives the generate, validate, re-prompt loop for each target
pub struct Synthesizer<'a, G: CodeGenerator> {
    generator: &'a G,
    tokens: &'a DesignTokenSet,
    settings: SynthSettings,
}

impl<'a, G: CodeGenerator> Synthesizer<'a, G> {
    pub fn new(generator: &'a G, tokens: &'a DesignTokenSet, settings: SynthSettings) -> Self {
        Self {
            generator,
            tokens,
            settings,
        }
    }

    /// Build the request for one call, carrying the previous attempt's violations
    fn request(&self, target: &Target<'_>, prior: &[Violation]) -> GenerationRequest {
        let screenshot = match target {
            Target::Page(page) if self.settings.attach_screenshots => page.screenshot,
            _ => None,
        };
        let instruction = target.instruction(self.tokens, prior, screenshot.is_some());

        let user = match screenshot {
            Some(png) => Message::user_with_png(instruction, png),
            None => Message::user(instruction),
        };

        GenerationRequest {
            messages: vec![Message::system(SYSTEM_PROMPT), user],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    async fn call(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        match tokio::time::timeout(self.settings.timeout, self.generator.generate(request)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(self.settings.timeout.as_secs())),
        }
    }

    /// Synthesize one file
    ///
    /// Makes at most `max_retries + 1` calls. An attempt that passes its
    /// checklist is accepted at once; when the ceiling is reached the last
    /// attempt is accepted with its violations recorded. A transport failure
    /// on any call ends the loop with a templated placeholder.
    pub async fn synthesize(&self, target: &Target<'_>) -> GeneratedArtifact {
        let name = target.name();
        let kind = target.kind();
        let checklist = kind.checklist();
        let mut last: Option<Attempt> = None;
        let mut number: u32 = 1;

        loop {
            let prior = last.as_ref().map(|a| a.violations.as_slice()).unwrap_or(&[]);
            let request = self.request(target, prior);

            let raw = match self.call(&request).await {
                Ok(raw) => raw,
                Err(e) => {
                    ::log::warn!(
                        "Generation call {} for {} failed ({}); writing a placeholder",
                        number,
                        name,
                        e
                    );
                    return self.placeholder(target, number);
                }
            };

            let source = clean_generated(&raw);
            let violations = checklist.run(&source);
            let attempt = Attempt {
                number,
                source,
                violations,
            };

            if attempt.violations.is_empty() {
                ::log::info!("Generated {} on attempt {}", name, number);
                return GeneratedArtifact::accepted(name, kind, attempt);
            }

            if number > self.settings.max_retries {
                ::log::warn!(
                    "Accepting {} after {} attempts with violations: {}",
                    name,
                    number,
                    describe(&attempt.violations)
                );
                return GeneratedArtifact::accepted(name, kind, attempt);
            }

            ::log::debug!(
                "Attempt {} for {} failed validation: {}",
                number,
                name,
                describe(&attempt.violations)
            );
            last = Some(attempt);
            number += 1;
        }
    }

    fn placeholder(&self, target: &Target<'_>, calls: u32) -> GeneratedArtifact {
        let source = match target {
            Target::Page(page) => placeholder::page(
                &page.name,
                page.title.as_deref().unwrap_or(&page.name),
                self.tokens,
            ),
            Target::Component(candidate) => {
                placeholder::component(&candidate.name, candidate.kind, self.tokens)
            }
        };
        let kind = target.kind();
        GeneratedArtifact {
            name: target.name().to_string(),
            kind,
            violations: kind.checklist().run(&source),
            source,
            origin: ArtifactOrigin::Placeholder,
            attempts: calls,
        }
    }

    /// Synthesize every target, batching calls per the settings
    ///
    /// Artifacts are returned in target order.
    pub async fn synthesize_all(&self, targets: Vec<Target<'_>>) -> Vec<GeneratedArtifact> {
        ::log::info!(
            "Synthesizing {} files (batch size {})",
            targets.len(),
            self.settings.batch_size
        );
        run_in_batches(
            targets,
            self.settings.batch_size,
            self.settings.batch_delay,
            |target| async move { self.synthesize(&target).await },
        )
        .await
    }
}

fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.description())
        .collect::<Vec<_>>()
        .join(", ")
}
