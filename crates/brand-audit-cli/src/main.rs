//! Brand Audit CLI
//!
//! The `brand-audit` command runs the audit pipeline from a terminal.
//!
//! ## Commands
//!
//! - `audit`: score a target and print the result
//! - `prompt`: print the instruction text sent to the model
//! - `models`: show the model fallback list and credential status

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;

use brand_audit_core::{
    build_prompt, render_audit_md, write_audit_report_json, AuditConfig, AuditController,
    AuditInvoker, AuditOutcome, AuditReport, AuditRequest, AuditResult, IgnoreReason, RunStatus,
    METRICS,
};

#[derive(Parser)]
#[command(name = "brand-audit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Score a brand's public presence across five pillars", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a target URL
    Audit {
        /// Target to audit (usually a URL)
        target: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Also write a JSON report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the prompt that would be sent for a target
    Prompt {
        /// Target to build the prompt for
        target: String,
    },

    /// Show configured models and whether a credential is set
    Models,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Md,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    brand_audit_core::init_tracing(cli.json_logs, level);

    match cli.command {
        Commands::Audit {
            target,
            format,
            output,
        } => {
            let config = AuditConfig::from_env().context("Failed to load audit configuration")?;
            let failed = cmd_audit(config, &target, format, output.as_deref()).await?;
            if failed {
                std::process::exit(2);
            }
            Ok(())
        }
        Commands::Prompt { target } => cmd_prompt(&target),
        Commands::Models => {
            let config = AuditConfig::from_env().context("Failed to load audit configuration")?;
            cmd_models(&config);
            Ok(())
        }
    }
}

/// Returns `true` when the run ended in a failure result.
async fn cmd_audit(
    config: AuditConfig,
    target: &str,
    format: Format,
    output: Option<&Path>,
) -> Result<bool> {
    let request = AuditRequest::new(target)?;
    if !config.has_credential() {
        eprintln!("No GEMINI_API_KEY set: serving demo result.");
    }
    let invoker = AuditInvoker::gemini(config).context("Failed to create model client")?;
    let controller = AuditController::new(Arc::new(invoker));

    eprintln!("Scanning {} ...", request.target());
    let outcome = match controller.run_request(request.clone()).await {
        RunStatus::Settled(outcome) => outcome,
        RunStatus::Ignored(IgnoreReason::EmptyTarget) => bail!("target must not be empty"),
        RunStatus::Ignored(IgnoreReason::NotIdle) => bail!("an audit is already running"),
    };

    let result = outcome.result();
    println!("{}", render(format, request.target(), &result)?);

    if let Some(path) = output {
        let report = AuditReport::new(&request, &outcome);
        write_audit_report_json(path, &report)?;
        eprintln!("Report written to {}", path.display());
    }

    METRICS.flush();
    Ok(matches!(outcome, AuditOutcome::Failed(_)))
}

fn cmd_prompt(target: &str) -> Result<()> {
    let request = AuditRequest::new(target)?;
    println!("{}", build_prompt(&request));
    Ok(())
}

fn cmd_models(config: &AuditConfig) {
    println!("Models (tried in order):");
    for (i, model) in config.models.iter().enumerate() {
        println!("  {}. {}", i + 1, model);
    }
    println!("Deadline:     {}s", config.deadline.as_secs());
    println!("Grounding:    {}", if config.search_grounding { "on" } else { "off" });
    println!(
        "Credential:   {}",
        if config.has_credential() {
            "configured"
        } else {
            "missing (demo mode)"
        }
    );
}

fn render(format: Format, target: &str, result: &AuditResult) -> Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(result)?,
        Format::Md => render_audit_md(target, result),
        Format::Text => render_text(target, result),
    })
}

fn render_text(target: &str, result: &AuditResult) -> String {
    let mut out = format!(
        "{}\n  Score:   {:.1} / 10\n  Verdict: {}\n\n",
        target,
        result.total_score(),
        result.verdict()
    );
    for p in result.pillars() {
        out.push_str(&format!(
            "  [{:>2}] {:<8} {:<18} {}\n",
            p.score, p.code, p.name, p.critique
        ));
    }
    if !result.hard_questions().is_empty() {
        out.push_str("\n  Hard questions:\n");
        for q in result.hard_questions() {
            out.push_str(&format!("    - {}\n", q));
        }
    }
    out
}
