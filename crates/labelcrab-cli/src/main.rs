mod loader;
mod settings;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use labelcrab_core::{LabelReport, Labeler, RuleRegistry};
use settings::AppConfig;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "labelcrab")]
#[command(about = "Label pull requests from declarative rules")]
#[command(version = VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the rules against a PR and print the label report as JSON
    Label {
        /// Path to the PR data JSON file
        #[arg(short, long)]
        pr: PathBuf,

        /// Path to the rules file (YAML, JSON or TOML)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },

    /// Build every label rule and report configuration errors
    Check {
        /// Path to the rules file (YAML, JSON or TOML)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = AppConfig::load().context("Failed to load configuration")?;

    match cli.command {
        Commands::Label {
            pr,
            rules,
            debug,
            pretty,
        } => {
            let settings = settings.with_overrides(rules, debug, pretty);
            init_tracing(settings.debug);
            label_command(&pr, &settings)?;
        }
        Commands::Check { rules, debug } => {
            let settings = settings.with_overrides(rules, debug, false);
            init_tracing(settings.debug);
            check_command(&settings)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the report
fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    debug!("Debug mode enabled");
}

fn label_command(pr_path: &Path, settings: &AppConfig) -> Result<()> {
    debug!("Loading PR data from: {:?}", pr_path);
    debug!("Loading rules from: {:?}", settings.rules_path);

    let ctx = loader::load_pr_context(pr_path)?;
    let rule_set = loader::load_rule_set(&settings.rules_path)?;

    let registry = RuleRegistry::default();
    let labeler = Labeler::from_rule_set(&registry, &rule_set);
    let report = labeler.evaluate(&ctx);

    info!("Matched labels: {:?}", report.labels);
    if let Some(analysis) = &report.file_analysis {
        debug!("File analysis: {:?}", analysis);
    }

    println!("{}", render_report(&report, settings.pretty)?);
    Ok(())
}

fn check_command(settings: &AppConfig) -> Result<()> {
    let rule_set = loader::load_rule_set(&settings.rules_path)?;

    let registry = RuleRegistry::default();
    let labeler = Labeler::from_rule_set(&registry, &rule_set);

    for label in labeler.labels() {
        println!("ok    {}", label);
    }
    for failure in labeler.failures() {
        println!("FAIL  {}: {}", failure.label, failure.error);
    }

    if !labeler.failures().is_empty() {
        bail!(
            "{} of {} labels have invalid rules",
            labeler.failures().len(),
            rule_set.len()
        );
    }

    Ok(())
}

fn render_report(report: &LabelReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    json.context("Failed to serialize label report")
}
