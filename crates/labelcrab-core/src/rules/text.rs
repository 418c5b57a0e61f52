use regex::Regex;

use super::Rule;
use crate::context::PrContext;
use crate::error::{RuleError, RuleResult};
use crate::result::MatchResult;

const CASE_INSENSITIVE_FLAG: &str = "(?i)";

/// PR text field a pattern rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Body,
    HeadBranch,
}

impl TextField {
    pub fn rule_type(&self) -> &'static str {
        match self {
            TextField::Title => "title",
            TextField::Body => "body",
            TextField::HeadBranch => "head-branch",
        }
    }

    pub fn extract<'a>(&self, ctx: &'a PrContext) -> &'a str {
        match self {
            TextField::Title => &ctx.title,
            TextField::Body => &ctx.body,
            TextField::HeadBranch => &ctx.branch,
        }
    }
}

#[derive(Debug)]
struct CompiledPattern {
    /// Pattern as written in the configuration
    source: String,
    regex: Regex,
}

/// Case-insensitive regex search over one PR text field
#[derive(Debug)]
pub struct TextPatternRule {
    field: TextField,
    patterns: Vec<CompiledPattern>,
}

impl TextPatternRule {
    /// Compile every pattern, failing on the first one that is not a valid regex
    pub fn new(field: TextField, patterns: &[String]) -> RuleResult<Self> {
        let patterns = patterns
            .iter()
            .map(String::as_str)
            .map(compile_pattern)
            .collect::<RuleResult<Vec<_>>>()?;

        Ok(Self { field, patterns })
    }

    fn pattern_sources(&self) -> Vec<&str> {
        self.patterns.iter().map(|p| p.source.as_str()).collect()
    }
}

/// Compile a user pattern with the engine's case-insensitive flag.
///
/// Any inline `(?i)` the user already wrote is dropped first so the flag is
/// applied exactly once.
fn compile_pattern(pattern: &str) -> RuleResult<CompiledPattern> {
    let stripped = pattern.replace(CASE_INSENSITIVE_FLAG, "");
    let regex = Regex::new(&format!("{CASE_INSENSITIVE_FLAG}{stripped}")).map_err(|source| {
        RuleError::PatternCompile {
            pattern: pattern.to_string(),
            source,
        }
    })?;

    Ok(CompiledPattern {
        source: pattern.to_string(),
        regex,
    })
}

impl Rule for TextPatternRule {
    fn evaluate(&self, ctx: &PrContext) -> MatchResult {
        let text = self.field.extract(ctx);

        for pattern in &self.patterns {
            if let Some(found) = pattern.regex.find(text) {
                return MatchResult::new(
                    true,
                    self.rule_type(),
                    format!(
                        "Pattern '{}' matched '{}' in text: {}",
                        pattern.source,
                        found.as_str(),
                        text
                    ),
                );
            }
        }

        MatchResult::new(
            false,
            self.rule_type(),
            format!(
                "No patterns matched text: {}\nPatterns checked: {:?}",
                text,
                self.pattern_sources()
            ),
        )
    }

    fn rule_type(&self) -> &str {
        self.field.rule_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(field: TextField, patterns: &[&str]) -> TextPatternRule {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        TextPatternRule::new(field, &patterns).unwrap()
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let ctx = PrContext::new("Fix bug", "", "");
        let result = rule(TextField::Title, &["fix"]).evaluate(&ctx);

        assert!(result.matched);
        assert_eq!(result.rule_type, "title");
        assert!(result.description.contains("'fix'"));
        assert!(result.description.contains("'Fix'"));
    }

    #[test]
    fn test_match_is_substring_search() {
        let ctx = PrContext::new("", "This closes #42 for good", "");
        assert!(rule(TextField::Body, &["closes #\\d+"]).evaluate(&ctx).matched);
    }

    #[test]
    fn test_anchored_pattern_respects_anchor() {
        let ctx = PrContext::new("", "", "hotfix/login");
        assert!(!rule(TextField::HeadBranch, &["^fix/"]).evaluate(&ctx).matched);
        assert!(rule(TextField::HeadBranch, &["^hotfix/"]).evaluate(&ctx).matched);
    }

    #[test]
    fn test_first_matching_pattern_is_reported() {
        let ctx = PrContext::new("docs: update readme", "", "");
        let result = rule(TextField::Title, &["feat", "docs", "readme"]).evaluate(&ctx);

        assert!(result.matched);
        assert!(result.description.starts_with("Pattern 'docs'"));
    }

    #[test]
    fn test_no_match_lists_text_and_patterns() {
        let ctx = PrContext::new("", "", "main");
        let result = rule(TextField::HeadBranch, &["feature/.*", "release"]).evaluate(&ctx);

        assert!(!result.matched);
        assert_eq!(result.rule_type, "head-branch");
        assert!(result.description.contains("main"));
        assert!(result.description.contains("feature/.*"));
        assert!(result.description.contains("release"));
    }

    #[test]
    fn test_explicit_flag_is_not_doubled() {
        let ctx = PrContext::new("WIP: refactor", "", "");
        let result = rule(TextField::Title, &["(?i)wip"]).evaluate(&ctx);

        assert!(result.matched);
        assert!(result.description.contains("'(?i)wip'"));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let err = TextPatternRule::new(TextField::Title, &["(unclosed".to_string()]).unwrap_err();
        assert!(matches!(err, RuleError::PatternCompile { pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn test_empty_pattern_list_never_matches() {
        let ctx = PrContext::new("anything", "", "");
        assert!(!rule(TextField::Title, &[]).evaluate(&ctx).matched);
    }
}
