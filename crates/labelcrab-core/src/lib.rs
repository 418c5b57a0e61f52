pub mod analysis;
pub mod config;
pub mod context;
pub mod error;
pub mod labeler;
pub mod registry;
pub mod result;
pub mod rules;

// Re-export commonly used types
pub use analysis::{FileAnalysis, analyze_files};
pub use config::{RuleKind, RuleSet, rule_definition};
pub use context::{FileChange, PrContext};
pub use error::{RuleError, RuleResult};
pub use labeler::{LabelFailure, LabelReport, Labeler, build_label_rule};
pub use registry::{RuleBuilder, RuleRegistry};
pub use result::MatchResult;
pub use rules::{CompositeRule, FilePatternRule, Rule, TextField, TextPatternRule};
