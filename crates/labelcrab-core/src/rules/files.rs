use glob::{MatchOptions, Pattern};
use std::fmt::Write;
use tracing::warn;

use super::Rule;
use crate::config::RuleKind;
use crate::context::PrContext;
use crate::result::MatchResult;

/// `*` stays within one path segment
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug)]
struct FileGlob {
    /// Normalized pattern text
    source: String,
    /// `None` when the pattern is not a valid glob; matching then falls back
    /// to exact string equality
    matcher: Option<Pattern>,
}

impl FileGlob {
    fn new(pattern: &str) -> Self {
        let source = normalize_pattern(pattern);
        let matcher = match Pattern::new(&source) {
            Ok(matcher) => Some(matcher),
            Err(e) => {
                warn!(
                    "Invalid glob pattern '{}': {}. Falling back to exact match.",
                    source, e
                );
                None
            }
        };
        Self { source, matcher }
    }

    fn matches(&self, path: &str) -> bool {
        match &self.matcher {
            Some(matcher) => matcher.matches_with(path, MATCH_OPTIONS),
            None => self.source == path,
        }
    }
}

/// Collapse `**` into `*`.
///
/// Recursive wildcards are not supported; `src/**/*.go` behaves like
/// `src/*/*.go`.
fn normalize_pattern(pattern: &str) -> String {
    let mut normalized = pattern.to_string();
    while normalized.contains("**") {
        normalized = normalized.replace("**", "*");
    }
    normalized
}

/// Glob match over the PR's changed files
#[derive(Debug)]
pub struct FilePatternRule {
    globs: Vec<FileGlob>,
}

impl FilePatternRule {
    pub fn new(patterns: &[String]) -> Self {
        Self {
            globs: patterns
                .iter()
                .map(String::as_str)
                .map(FileGlob::new)
                .collect(),
        }
    }

    fn pattern_sources(&self) -> Vec<&str> {
        self.globs.iter().map(|g| g.source.as_str()).collect()
    }
}

impl Rule for FilePatternRule {
    fn evaluate(&self, ctx: &PrContext) -> MatchResult {
        let mut result = MatchResult::new(false, self.rule_type(), "");

        for file in &ctx.changed_files {
            if let Some(glob) = self.globs.iter().find(|g| g.matches(file)) {
                let _ = writeln!(
                    result.description,
                    "File {} matched pattern {}",
                    file, glob.source
                );
                result.matched_files.push(file.clone());
            }
        }

        result.matched = !result.matched_files.is_empty();
        if !result.matched {
            result.description = format!(
                "No files matched patterns: {:?}\nFiles checked: {:?}",
                self.pattern_sources(),
                ctx.changed_files
            );
        }
        result
    }

    fn rule_type(&self) -> &str {
        RuleKind::ChangedFiles.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(patterns: &[&str]) -> FilePatternRule {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        FilePatternRule::new(&patterns)
    }

    fn ctx(files: &[&str]) -> PrContext {
        PrContext::default().with_changed_files(files.iter().copied())
    }

    #[test]
    fn test_normalize_pattern() {
        assert_eq!(normalize_pattern("src/**/*.go"), "src/*/*.go");
        assert_eq!(normalize_pattern("a/***.rs"), "a/*.rs");
        assert_eq!(normalize_pattern("*.md"), "*.md");
    }

    #[test]
    fn test_double_star_is_single_segment() {
        let rule = rule(&["src/**/*.go"]);

        assert!(rule.evaluate(&ctx(&["src/pkg/file.go"])).matched);
        assert!(!rule.evaluate(&ctx(&["src/file.go"])).matched);
        assert!(!rule.evaluate(&ctx(&["src/a/b/file.go"])).matched);
    }

    #[test]
    fn test_collects_all_matching_files_in_order() {
        let result = rule(&["*.md", "docs/*"]).evaluate(&ctx(&[
            "README.md",
            "main.go",
            "docs/guide.txt",
            "CHANGELOG.md",
        ]));

        assert!(result.matched);
        assert_eq!(
            result.matched_files,
            vec!["README.md", "docs/guide.txt", "CHANGELOG.md"]
        );
        assert!(result.description.contains("File README.md matched pattern *.md"));
        assert!(result.description.contains("File docs/guide.txt matched pattern docs/*"));
    }

    #[test]
    fn test_file_counted_once_when_several_patterns_match() {
        let result = rule(&["*.md", "README*"]).evaluate(&ctx(&["README.md"]));

        assert_eq!(result.matched_files, vec!["README.md"]);
        assert_eq!(result.description.lines().count(), 1);
    }

    #[test]
    fn test_star_does_not_cross_directories() {
        assert!(!rule(&["*.md"]).evaluate(&ctx(&["docs/guide.md"])).matched);
    }

    #[test]
    fn test_malformed_glob_falls_back_to_exact_match() {
        let rule = rule(&["src/[abc.rs"]);

        assert!(rule.evaluate(&ctx(&["src/[abc.rs"])).matched);
        assert!(!rule.evaluate(&ctx(&["src/a.rs"])).matched);
    }

    #[test]
    fn test_empty_changed_files() {
        let result = rule(&["*.md"]).evaluate(&ctx(&[]));

        assert!(!result.matched);
        assert!(result.matched_files.is_empty());
        assert!(result.description.starts_with("No files matched patterns"));
    }
}
