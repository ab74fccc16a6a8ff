//! reqforge-validate - corpus validation CLI
//!
//! Reads a JSON array of tagged documents, validates all of them with the
//! whole file as corpus context, and prints a summary (or the full report
//! with `--json`). Exits with status 1 when any document is invalid.
//!
//! **Usage:**
//! ```bash
//! reqforge-validate docs.json [--config reqforge.toml] [--json] [--fixes]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use reqforge_common::config::{load_or_default, resolve_config_path, CONFIG_ENV_VAR};
use reqforge_engine::{
    generate_auto_fix_suggestions, BatchReport, CorpusContext, Document, EngineConfig,
    PrecisionEngine,
};
use serde::Serialize;
use tracing::info;

/// Command-line arguments for reqforge-validate
#[derive(Parser, Debug)]
#[command(name = "reqforge-validate")]
#[command(about = "Validate capability, enabler and requirement documents")]
#[command(version)]
struct Args {
    /// JSON file holding an array of documents
    corpus: PathBuf,

    /// Config file (overrides REQFORGE_CONFIG and the user config file)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Include auto-fix suggestions
    #[arg(long)]
    fixes: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a BatchReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_fixes: Option<Vec<reqforge_engine::AutoFixSuggestion>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref(), CONFIG_ENV_VAR);
    let toml_config = load_or_default(config_path.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing (RUST_LOG wins over the config file level)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&toml_config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = &config_path {
        info!("Configuration: {}", path.display());
    }

    let engine_config =
        EngineConfig::resolve(&toml_config.engine).context("Invalid engine configuration")?;
    let engine = PrecisionEngine::new(engine_config).context("Failed to create validation engine")?;

    let content = std::fs::read_to_string(&args.corpus)
        .with_context(|| format!("Failed to read {}", args.corpus.display()))?;
    let documents: Vec<Document> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse documents from {}", args.corpus.display()))?;
    let corpus = CorpusContext::new(documents.iter().cloned());

    info!(
        documents = documents.len(),
        corpus = %args.corpus.display(),
        "Validating corpus"
    );

    let report = engine.batch_validate(&documents, Some(&corpus)).await;
    let fixes = args
        .fixes
        .then(|| generate_auto_fix_suggestions(&report.results, Some(&corpus)));

    if args.json {
        let output = JsonOutput {
            report: &report,
            auto_fixes: fixes,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize report")?
        );
    } else {
        print_summary(&report);
        if let Some(fixes) = &fixes {
            println!();
            println!("Auto-fix suggestions: {}", fixes.len());
            for fix in fixes {
                println!(
                    "  {} {}: '{}' ({:.0}%) {}",
                    fix.document_id.as_deref().unwrap_or("<no id>"),
                    fix.field,
                    fix.suggested_value,
                    fix.confidence * 100.0,
                    fix.description
                );
            }
        }
    }

    if !report.all_valid() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_summary(report: &BatchReport) {
    for result in &report.results {
        let marker = if result.is_valid { "PASS" } else { "FAIL" };
        println!(
            "{} {} [{}] score {}",
            marker,
            result.document_id.as_deref().unwrap_or("<no id>"),
            result.kind,
            result.quality_score
        );
        for finding in &result.findings {
            println!(
                "    {:?}/{:?} {} ({}): {}",
                finding.kind, finding.severity, finding.category, finding.field, finding.message
            );
        }
    }

    let summary = &report.summary;
    println!();
    println!(
        "{} documents: {} valid, {} invalid; {} errors, {} warnings, {} suggestions",
        summary.total_documents,
        summary.valid_documents,
        summary.invalid_documents,
        summary.total_errors,
        summary.total_warnings,
        summary.total_suggestions
    );
    println!(
        "Average quality score {:.1}, {} ms",
        summary.average_quality_score, summary.processing_time_ms
    );
}
