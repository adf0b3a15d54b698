use clap::Parser;
use clonesmith::{Config, Pipeline, RunSummary};
use std::process::ExitCode;

mod args;
use args::{Args, Overrides};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    let mode = args.command.mode();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if mode.crawls() {
        println!("Note: crawling requires a WebDriver server (e.g., ChromeDriver).");
        println!("Set WEBDRIVER_URL if not using the default {}", config.crawl.webdriver_url);
    }

    let start_time = std::time::Instant::now();
    let pipeline = apply_overrides(Pipeline::new(config).with_mode(mode), args.command.overrides());

    let summary = match pipeline.run().await {
        Ok(summary) => summary,
        Err(e) => {
            ::log::error!("Run failed: {}", e);
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!(
        "Run complete in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
    print_summary(&summary);

    if args.strict && summary.defective() > 0 {
        eprintln!(
            "{} artifacts were accepted with checklist violations",
            summary.defective()
        );
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn load_config(args: &Args) -> clonesmith::Result<Config> {
    let config = match &args.config {
        Some(path) => {
            let mut config = Config::from_file(path)?;
            config.apply_env(|key| std::env::var(key).ok())?;
            config
        }
        None => Config::from_env()?,
    };
    Ok(config)
}

fn apply_overrides(mut pipeline: Pipeline, overrides: &Overrides) -> Pipeline {
    if let Some(url) = &overrides.url {
        pipeline = pipeline.with_target_url(url.clone());
    }
    if !overrides.pages.is_empty() {
        pipeline = pipeline.with_pages(overrides.pages.clone());
    }
    if let Some(dir) = &overrides.output_dir {
        pipeline = pipeline.with_output_dir(dir.clone());
    }
    if let Some(dir) = &overrides.project_dir {
        pipeline = pipeline.with_project_dir(dir.clone());
    }
    if let Some(max_retries) = overrides.max_retries {
        pipeline = pipeline.with_max_retries(max_retries);
    }
    pipeline
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{:?}: {} pages, {} components",
        summary.mode, summary.pages, summary.components
    );
    if let Some(project) = &summary.project {
        println!(
            "Wrote {} files to {} ({} routes)",
            project.files_written,
            project.root.display(),
            project.routes.len()
        );
    }
    if let Some(report) = &summary.report {
        println!(
            "{} artifacts: {} with violations, {} placeholders",
            report.artifacts.len(),
            summary.defective(),
            report.placeholders()
        );
        for artifact in report.defective() {
            let violations: Vec<String> =
                artifact.violations.iter().map(|v| v.to_string()).collect();
            println!("  {}: {}", artifact.name, violations.join(", "));
        }
    }
}
