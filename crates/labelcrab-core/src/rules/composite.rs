use super::Rule;
use crate::context::PrContext;
use crate::result::MatchResult;

/// Boolean combination of child rules.
///
/// `all` short-circuits on the first child that fails, `any` on the first
/// child that matches. Children evaluated so far are always kept in
/// `sub_results`.
#[derive(Debug)]
pub struct CompositeRule {
    rules: Vec<Box<dyn Rule>>,
    require_all: bool,
    rule_type: String,
}

impl CompositeRule {
    pub fn new(rules: Vec<Box<dyn Rule>>, require_all: bool, rule_type: impl Into<String>) -> Self {
        Self {
            rules,
            require_all,
            rule_type: rule_type.into(),
        }
    }

    /// AND over `rules`
    pub fn all(rules: Vec<Box<dyn Rule>>) -> Self {
        Self::new(rules, true, "all")
    }

    /// OR over `rules`
    pub fn any(rules: Vec<Box<dyn Rule>>) -> Self {
        Self::new(rules, false, "any")
    }

    fn evaluate_all(&self, ctx: &PrContext) -> MatchResult {
        let mut result = MatchResult::new(true, &self.rule_type, "All rules matched");

        for rule in &self.rules {
            let sub = rule.evaluate(ctx);
            let matched = sub.matched;
            if matched {
                result.matched_files.extend(sub.matched_files.iter().cloned());
            }
            result.sub_results.push(sub);

            if !matched {
                result.matched = false;
                result.matched_files.clear();
                result.description = format!(
                    "Not all rules matched: rule {} of {} ({}) failed",
                    result.sub_results.len(),
                    self.rules.len(),
                    rule.rule_type()
                );
                return result;
            }
        }

        result
    }

    fn evaluate_any(&self, ctx: &PrContext) -> MatchResult {
        let mut result = MatchResult::new(false, &self.rule_type, "No rules matched");

        for rule in &self.rules {
            let sub = rule.evaluate(ctx);
            if sub.matched {
                result.matched = true;
                result.matched_files = sub.matched_files.clone();
                result.description = format!(
                    "Rule {} of {} ({}) matched",
                    result.sub_results.len() + 1,
                    self.rules.len(),
                    rule.rule_type()
                );
                result.sub_results.push(sub);
                return result;
            }
            result.sub_results.push(sub);
        }

        result
    }
}

impl Rule for CompositeRule {
    fn evaluate(&self, ctx: &PrContext) -> MatchResult {
        if self.require_all {
            self.evaluate_all(ctx)
        } else {
            self.evaluate_any(ctx)
        }
    }

    fn rule_type(&self) -> &str {
        &self.rule_type
    }
}
