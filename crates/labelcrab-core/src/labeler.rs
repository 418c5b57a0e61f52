use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::analysis::{FileAnalysis, analyze_files};
use crate::config::{RuleSet, rule_definition};
use crate::context::PrContext;
use crate::error::{RuleError, RuleResult};
use crate::registry::RuleRegistry;
use crate::result::MatchResult;
use crate::rules::Rule;

/// A label whose rule could not be built
#[derive(Debug)]
pub struct LabelFailure {
    pub label: String,
    pub error: RuleError,
}

/// Labels and diagnostics produced for one PR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelReport {
    /// Matched labels, sorted
    pub labels: Vec<String>,

    /// Result of every label that was evaluated, matched or not
    #[serde(rename = "debugInfo")]
    pub debug_info: BTreeMap<String, MatchResult>,

    /// Labels skipped because their rule failed to build
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,

    /// Present only when the PR carried structured file records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_analysis: Option<FileAnalysis>,
}

impl LabelReport {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Rule trees for every configured label, built once and evaluated per PR
#[derive(Debug)]
pub struct Labeler {
    rules: Vec<(String, Box<dyn Rule>)>,
    failures: Vec<LabelFailure>,
}

impl Labeler {
    /// Build each label's rule.
    ///
    /// A label whose rule fails to build is recorded in [`Labeler::failures`]
    /// and left out of evaluation; other labels are unaffected.
    pub fn from_rule_set(registry: &RuleRegistry, rule_set: &RuleSet) -> Self {
        let mut rules = Vec::with_capacity(rule_set.len());
        let mut failures = Vec::new();

        for (label, definition) in rule_set {
            match build_label_rule(registry, definition) {
                Ok(rule) => {
                    debug!("Built {} rule for label '{}'", rule.rule_type(), label);
                    rules.push((label.clone(), rule));
                }
                Err(error) => {
                    warn!("Failed to build rule for label '{}': {}", label, error);
                    failures.push(LabelFailure {
                        label: label.clone(),
                        error,
                    });
                }
            }
        }

        Self { rules, failures }
    }

    /// Labels with a successfully built rule
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(label, _)| label.as_str())
    }

    pub fn failures(&self) -> &[LabelFailure] {
        &self.failures
    }

    /// Evaluate every label against `ctx`
    pub fn evaluate(&self, ctx: &PrContext) -> LabelReport {
        let mut labels = Vec::new();
        let mut debug_info = BTreeMap::new();

        for (label, rule) in &self.rules {
            let result = rule.evaluate(ctx);
            debug!(
                "Rule evaluation for '{}': matched={}\n{}",
                label,
                result.matched,
                result.render_tree()
            );

            if result.matched {
                info!("Label '{}' matched", label);
                labels.push(label.clone());
            }
            debug_info.insert(label.clone(), result);
        }

        let errors = self
            .failures
            .iter()
            .map(|f| (f.label.clone(), f.error.to_string()))
            .collect();

        let file_analysis = ctx.files.as_deref().map(analyze_files);

        LabelReport {
            labels,
            debug_info,
            errors,
            file_analysis,
        }
    }
}

/// Build the rule for a single label definition
pub fn build_label_rule(registry: &RuleRegistry, definition: &Value) -> RuleResult<Box<dyn Rule>> {
    let (rule_type, config) = rule_definition(definition)?;
    registry.build(&rule_type, &config)
}
