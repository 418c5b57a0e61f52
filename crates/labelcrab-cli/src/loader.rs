use anyhow::{Context, Result};
use labelcrab_core::{PrContext, RuleSet};
use std::path::Path;
use tracing::debug;

/// Serialization format of a rules file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesFormat {
    Yaml,
    Json,
    Toml,
}

impl RulesFormat {
    /// Pick the format from the file extension, defaulting to YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => RulesFormat::Json,
            Some("toml") => RulesFormat::Toml,
            _ => RulesFormat::Yaml,
        }
    }
}

/// Parse rules file content into a label rule set
pub fn parse_rule_set(content: &str, format: RulesFormat) -> Result<RuleSet> {
    let rules: RuleSet = match format {
        RulesFormat::Yaml => serde_yaml::from_str(content).context("Failed to parse rules YAML")?,
        RulesFormat::Json => serde_json::from_str(content).context("Failed to parse rules JSON")?,
        RulesFormat::Toml => toml::from_str(content).context("Failed to parse rules TOML")?,
    };
    Ok(rules)
}

/// Read and parse a rules file
pub fn load_rule_set(path: &Path) -> Result<RuleSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file: {:?}", path))?;

    let rules = parse_rule_set(&content, RulesFormat::from_path(path))
        .with_context(|| format!("Invalid rules file: {:?}", path))?;
    debug!("Loaded {} rules from {:?}", rules.len(), path);

    Ok(rules)
}

/// Read and parse the PR data JSON file
pub fn load_pr_context(path: &Path) -> Result<PrContext> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read PR data file: {:?}", path))?;

    let ctx: PrContext = serde_json::from_str(&content).context("Failed to parse PR data JSON")?;
    debug!(
        "Loaded PR data: title={:?}, branch={:?}, files={}",
        ctx.title,
        ctx.branch,
        ctx.changed_files.len()
    );
    debug!("PR body: {:?}", ctx.body);
    debug!("Changed files: {:?}", ctx.changed_files);

    Ok(ctx)
}
