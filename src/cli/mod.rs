//! Command-line interface for sciclaims.
//!
//! Provides commands for serving the web UI, analyzing a document from the
//! terminal, listing the sample documents and showing the configuration.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{ClaimAnalyzer, ClaimsApiClient};
use crate::config::{self, ResolvedConfig};
use crate::domain::{ClaimAnalysisResult, EvidenceReport, ExampleSet, MAX_TEXT_CHARS};
use crate::evidence::{locate_spans, Span};

/// sciclaims - Biomedical scientific claim verification demo
#[derive(Parser, Debug)]
#[command(name = "sciclaims")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to $SCICLAIMS_CONFIG, then ./config.yaml)
    #[arg(short, long, global = true, env = "SCICLAIMS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web UI
    Serve,

    /// Analyze a document and print the verdicts
    Analyze {
        /// Input file (reads from stdin if neither --input nor --example is given)
        #[arg(short, long, conflicts_with = "example")]
        input: Option<PathBuf>,

        /// Analyze a sample document by id
        #[arg(short, long)]
        example: Option<i64>,

        /// Print the raw service response as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the sample documents
    Examples,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let cfg = config::load(self.config.as_deref()).context("Failed to load configuration")?;

        match self.command {
            Commands::Serve => crate::web::serve(&cfg).await,
            Commands::Analyze {
                input,
                example,
                json,
            } => analyze(&cfg, input, example, json).await,
            Commands::Examples => list_examples(&cfg),
            Commands::Config => {
                show_config(&cfg);
                Ok(())
            }
        }
    }
}

/// Read the document to analyze from a file, a sample, or stdin
fn read_input(cfg: &ResolvedConfig, input: Option<&Path>, example: Option<i64>) -> Result<String> {
    if let Some(path) = input {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()));
    }

    if let Some(id) = example {
        let examples = ExampleSet::load(&cfg.examples_path())?;
        let example = examples
            .get(id)
            .with_context(|| format!("No example with id {}", id))?;
        return Ok(example.text.clone());
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer)
}

async fn analyze(
    cfg: &ResolvedConfig,
    input: Option<PathBuf>,
    example: Option<i64>,
    json: bool,
) -> Result<()> {
    let text = read_input(cfg, input.as_deref(), example)?;

    let chars = text.chars().count();
    if chars > MAX_TEXT_CHARS {
        anyhow::bail!(
            "Input is {} characters long; the limit is {} characters",
            chars,
            MAX_TEXT_CHARS
        );
    }

    let client = ClaimsApiClient::new(&cfg.api)?;
    let result = client.analyze(&text).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", format_report(&result));
    }

    Ok(())
}

/// Plain-text report of an analysis result
pub fn format_report(result: &ClaimAnalysisResult) -> String {
    if result.is_empty() {
        return "No claims found.\n".to_string();
    }

    let mut out = String::new();
    for entry in result {
        out.push_str(&format!("Claim: {}\n", entry.claim));
        for report in &entry.claim_analysis {
            out.push_str(&format_evidence(report));
        }
        out.push('\n');
    }
    out
}

fn format_evidence(report: &EvidenceReport) -> String {
    let spans = locate_spans(&report.report.evidence, &report.abstract_text);
    let unmatched = report.report.evidence.len() - spans.len();

    let mut out = format!(
        "  [{}] {}% {}\n    Rationale: {}\n    Source:    {}\n",
        report.report.response,
        report.report.confidence,
        report.title,
        report.report.rationale,
        report.source_url()
    );

    let span_list = if spans.is_empty() {
        "(none)".to_string()
    } else {
        spans
            .iter()
            .map(|Span { start, end }| format!("{}..{}", start, end))
            .collect::<Vec<_>>()
            .join(", ")
    };
    out.push_str(&format!("    Evidence:  {}", span_list));
    if unmatched > 0 {
        out.push_str(&format!(" ({} not found in abstract)", unmatched));
    }
    out.push('\n');
    out
}

fn list_examples(cfg: &ResolvedConfig) -> Result<()> {
    let examples = ExampleSet::load(&cfg.examples_path())?;

    for example in examples.iter() {
        println!("{}", example.label());
        println!("    {}", example.doc_source);
    }

    Ok(())
}

fn show_config(cfg: &ResolvedConfig) {
    println!("SciClaims Configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using environment)".to_string())
    );
    println!();
    println!("Claim analysis API:");
    println!("  Endpoint:             {}", cfg.api.claims);
    println!("  Timeout:              {}s", cfg.api.timeout_seconds);
    println!(
        "  Certificate checks:   {}",
        if cfg.api.accept_invalid_certs {
            "DISABLED"
        } else {
            "enabled"
        }
    );
    println!();
    println!("Data:");
    println!("  Resource directory:   {}", cfg.res_dir.display());
    println!("  Examples:             {}", cfg.examples_path().display());
    println!();
    println!("Server:");
    println!("  Address:              {}", cfg.bind_addr());
    println!("  Session idle timeout: {}m", cfg.session_idle_minutes);
}
