use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Outcome of evaluating a rule against a PR, with its diagnostic trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Whether the rule (or sub-tree) matched
    pub matched: bool,

    /// Files that satisfied a file-pattern rule
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_files: Vec<String>,

    /// Rule variant that produced this result (e.g. "title", "all")
    pub rule_type: String,

    /// Human-readable trace of the evaluation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Child results of a composite rule, in evaluation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_results: Vec<MatchResult>,
}

impl MatchResult {
    /// Create a result with no matched files and no children
    pub fn new(matched: bool, rule_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            matched,
            matched_files: Vec::new(),
            rule_type: rule_type.into(),
            description: description.into(),
            sub_results: Vec::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched
    }

    /// Render the result tree as indented lines, one node per line
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let marker = if self.matched { "+" } else { "-" };
        let description = self.description.trim_end().replace('\n', "; ");
        let _ = writeln!(
            out,
            "{}{} [{}] {}",
            "  ".repeat(depth),
            marker,
            self.rule_type,
            description
        );
        for sub in &self.sub_results {
            sub.render_into(out, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_leaves_collections_empty() {
        let result = MatchResult::new(true, "title", "Pattern 'fix' matched text: Fix bug");

        assert!(result.is_match());
        assert_eq!(result.rule_type, "title");
        assert!(result.matched_files.is_empty());
        assert!(result.sub_results.is_empty());
    }

    #[test]
    fn test_structural_equality() {
        let a = MatchResult::new(false, "body", "No patterns matched");
        let mut b = MatchResult::new(false, "body", "No patterns matched");
        assert_eq!(a, b);

        b.matched_files.push("x".to_string());
        assert_ne!(a, b);
    }

    #[test]
    fn test_serialization_omits_empty_fields() {
        let result = MatchResult::new(false, "changed-files", "");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json, serde_json::json!({"matched": false, "rule_type": "changed-files"}));
    }

    #[test]
    fn test_render_tree_indents_children() {
        let mut root = MatchResult::new(false, "all", "Not all rules matched");
        root.sub_results
            .push(MatchResult::new(true, "title", "Pattern 'a' matched text: a"));
        root.sub_results
            .push(MatchResult::new(false, "changed-files", "No files matched\nFiles checked: []"));

        let rendered = root.render_tree();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "- [all] Not all rules matched");
        assert_eq!(lines[1], "  + [title] Pattern 'a' matched text: a");
        assert_eq!(lines[2], "  - [changed-files] No files matched; Files checked: []");
    }
}
