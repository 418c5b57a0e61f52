use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::config::{RuleKind, condition_entries, or_entries, string_list};
use crate::error::{RuleError, RuleResult};
use crate::rules::{CompositeRule, FilePatternRule, Rule, TextField, TextPatternRule};

/// Builds one rule variant from its configuration value.
///
/// Builders receive the registry so composite rules can build their children.
pub trait RuleBuilder: Send + Sync {
    fn build(&self, registry: &RuleRegistry, config: &Value) -> RuleResult<Box<dyn Rule>>;
}

/// Maps rule type names to the builders that construct them
#[derive(Clone)]
pub struct RuleRegistry {
    builders: HashMap<String, Arc<dyn RuleBuilder>>,
}

impl RuleRegistry {
    /// Create a registry with no builders
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Register a builder, replacing any previous builder for `name`
    pub fn register(&mut self, name: impl Into<String>, builder: impl RuleBuilder + 'static) {
        self.builders.insert(name.into(), Arc::new(builder));
    }

    pub fn contains(&self, rule_type: &str) -> bool {
        self.builders.contains_key(rule_type)
    }

    /// Registered rule type names, sorted
    pub fn rule_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a rule of `rule_type` from its configuration
    pub fn build(&self, rule_type: &str, config: &Value) -> RuleResult<Box<dyn Rule>> {
        let builder = self
            .builders
            .get(rule_type)
            .ok_or_else(|| RuleError::UnknownRuleType(rule_type.to_string()))?;

        debug!("Building {} rule", rule_type);
        builder.build(self, config)
    }
}

impl Default for RuleRegistry {
    /// Registry with every built-in rule type
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(RuleKind::HeadBranch.as_str(), TextRuleBuilder(TextField::HeadBranch));
        registry.register(RuleKind::Title.as_str(), TextRuleBuilder(TextField::Title));
        registry.register(RuleKind::Body.as_str(), TextRuleBuilder(TextField::Body));
        registry.register(RuleKind::ChangedFiles.as_str(), FilesRuleBuilder);
        registry.register(RuleKind::Any.as_str(), CompositeRuleBuilder { require_all: false });
        registry.register(RuleKind::All.as_str(), CompositeRuleBuilder { require_all: true });
        registry.register(RuleKind::Or.as_str(), OrRuleBuilder);
        registry
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rule_types", &self.rule_types())
            .finish()
    }
}

/// Builds title, body and head-branch rules
pub struct TextRuleBuilder(pub TextField);

impl RuleBuilder for TextRuleBuilder {
    fn build(&self, _registry: &RuleRegistry, config: &Value) -> RuleResult<Box<dyn Rule>> {
        let patterns = string_list(self.0.rule_type(), config)?;
        Ok(Box::new(TextPatternRule::new(self.0, &patterns)?))
    }
}

/// Builds changed-files rules
pub struct FilesRuleBuilder;

impl RuleBuilder for FilesRuleBuilder {
    fn build(&self, _registry: &RuleRegistry, config: &Value) -> RuleResult<Box<dyn Rule>> {
        let patterns = string_list(RuleKind::ChangedFiles.as_str(), config)?;
        Ok(Box::new(FilePatternRule::new(&patterns)))
    }
}

/// Builds `any`/`all` rules from an array of condition maps
pub struct CompositeRuleBuilder {
    pub require_all: bool,
}

impl RuleBuilder for CompositeRuleBuilder {
    fn build(&self, registry: &RuleRegistry, config: &Value) -> RuleResult<Box<dyn Rule>> {
        let kind = if self.require_all {
            RuleKind::All
        } else {
            RuleKind::Any
        };

        let rules = build_children(registry, condition_entries(kind.as_str(), config)?)?;
        Ok(Box::new(CompositeRule::new(rules, self.require_all, kind.as_str())))
    }
}

/// Builds an `any` rule from a map of rule type to config
pub struct OrRuleBuilder;

impl RuleBuilder for OrRuleBuilder {
    fn build(&self, registry: &RuleRegistry, config: &Value) -> RuleResult<Box<dyn Rule>> {
        let rules = build_children(registry, or_entries(config)?)?;
        Ok(Box::new(CompositeRule::new(rules, false, RuleKind::Or.as_str())))
    }
}

fn build_children(
    registry: &RuleRegistry,
    entries: Vec<(String, Value)>,
) -> RuleResult<Vec<Box<dyn Rule>>> {
    entries
        .iter()
        .map(|(rule_type, config)| registry.build(rule_type, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PrContext;
    use serde_json::json;

    #[test]
    fn test_default_registry_rule_types() {
        let registry = RuleRegistry::default();
        assert_eq!(
            registry.rule_types(),
            vec!["all", "any", "body", "changed-files", "head-branch", "or", "title"]
        );
    }

    #[test]
    fn test_unknown_rule_type() {
        let err = RuleRegistry::default()
            .build("bogus", &json!(["x"]))
            .unwrap_err();
        assert!(matches!(err, RuleError::UnknownRuleType(name) if name == "bogus"));
    }

    #[test]
    fn test_empty_registry_knows_nothing() {
        let registry = RuleRegistry::new();
        assert!(!registry.contains("title"));
        assert!(registry.build("title", &json!(["x"])).is_err());
    }

    #[test]
    fn test_build_text_rules() {
        let registry = RuleRegistry::default();
        let ctx = PrContext::new("Add feature", "Fixes #1", "feature/login");

        let title = registry.build("title", &json!(["add"])).unwrap();
        let body = registry.build("body", &json!(["fixes #\\d"])).unwrap();
        let branch = registry.build("head-branch", &json!(["^feature/"])).unwrap();

        assert_eq!(title.rule_type(), "title");
        assert!(title.evaluate(&ctx).matched);
        assert!(body.evaluate(&ctx).matched);
        assert!(branch.evaluate(&ctx).matched);
    }

    #[test]
    fn test_build_rejects_bad_pattern_type() {
        let err = RuleRegistry::default()
            .build("title", &json!(["ok", {"nested": true}]))
            .unwrap_err();
        assert!(err.to_string().contains("title[1]"));
        assert!(err.to_string().contains("map"));
    }

    #[test]
    fn test_build_rejects_invalid_regex() {
        let err = RuleRegistry::default()
            .build("body", &json!(["[unclosed"]))
            .unwrap_err();
        assert!(matches!(err, RuleError::PatternCompile { .. }));
    }

    #[test]
    fn test_build_composite_requires_conditions() {
        let registry = RuleRegistry::default();
        assert!(matches!(
            registry.build("all", &json!([])),
            Err(RuleError::EmptyConfiguration(_))
        ));
        assert!(matches!(
            registry.build("any", &json!({"title": ["x"]})),
            Err(RuleError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            registry.build("or", &json!({})),
            Err(RuleError::EmptyConfiguration(_))
        ));
    }

    #[test]
    fn test_composite_propagates_child_errors() {
        let err = RuleRegistry::default()
            .build("any", &json!([{"title": ["ok"]}, {"bogus": ["x"]}]))
            .unwrap_err();
        assert!(matches!(err, RuleError::UnknownRuleType(name) if name == "bogus"));
    }

    #[test]
    fn test_or_inside_all() {
        let registry = RuleRegistry::default();
        let rule = registry
            .build(
                "all",
                &json!([
                    {"or": {"title": ["a"], "body": ["b"]}},
                    {"head-branch": ["feature/.*"]}
                ]),
            )
            .unwrap();

        let ctx = PrContext::new("a-something", "", "feature/x");
        let result = rule.evaluate(&ctx);

        assert!(result.matched);
        assert_eq!(result.rule_type, "all");
        assert_eq!(result.sub_results[0].rule_type, "or");
        assert_eq!(result.sub_results[1].rule_type, "head-branch");
    }

    #[test]
    fn test_nested_all_inside_any() {
        let registry = RuleRegistry::default();
        let rule = registry
            .build(
                "any",
                &json!([
                    {"all": [{"title": ["release"]}, {"changed-files": ["Cargo.toml"]}]},
                    {"head-branch": ["^release/"]}
                ]),
            )
            .unwrap();

        let ctx = PrContext::new("Release 1.2", "", "main").with_changed_files(["Cargo.toml"]);
        let result = rule.evaluate(&ctx);

        assert!(result.matched);
        assert_eq!(result.matched_files, vec!["Cargo.toml"]);
        assert_eq!(result.sub_results.len(), 1);
    }

    #[test]
    fn test_register_custom_builder() {
        struct AlwaysBuilder;

        impl RuleBuilder for AlwaysBuilder {
            fn build(&self, _registry: &RuleRegistry, _config: &Value) -> RuleResult<Box<dyn Rule>> {
                Ok(Box::new(CompositeRule::all(vec![Box::new(
                    TextPatternRule::new(TextField::Title, &[String::new()])?,
                )])))
            }
        }

        let mut registry = RuleRegistry::default();
        registry.register("always", AlwaysBuilder);

        let rule = registry
            .build("any", &json!([{"always": null}]))
            .unwrap();
        assert!(rule.evaluate(&PrContext::default()).matched);
    }
}
