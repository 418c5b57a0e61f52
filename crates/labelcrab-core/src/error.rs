use thiserror::Error;

/// Errors raised while turning rule configuration into rules
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Unknown rule type: {0}")]
    UnknownRuleType(String),

    #[error("Invalid configuration for {field}: expected {expected}, got {actual}")]
    InvalidConfiguration {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid pattern '{pattern}': {source}")]
    PatternCompile {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Empty configuration: no rules found in {0}")]
    EmptyConfiguration(String),
}

impl RuleError {
    pub(crate) fn invalid(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        RuleError::InvalidConfiguration {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

pub type RuleResult<T> = Result<T, RuleError>;
