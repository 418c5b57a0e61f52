mod composite;
mod files;
mod text;

pub use composite::CompositeRule;
pub use files::FilePatternRule;
pub use text::{TextField, TextPatternRule};

use crate::context::PrContext;
use crate::result::MatchResult;

/// A predicate over a pull request.
///
/// Rules are immutable once built, so a rule tree can be evaluated any number
/// of times (or from several threads) with identical results.
pub trait Rule: Send + Sync + std::fmt::Debug {
    /// Evaluate the rule and describe how the decision was reached
    fn evaluate(&self, ctx: &PrContext) -> MatchResult;

    /// Rule type name reported in results (e.g. "title", "any")
    fn rule_type(&self) -> &str;
}
