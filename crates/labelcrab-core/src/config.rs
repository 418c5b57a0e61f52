//! Validation of untyped rule configuration.
//!
//! Rule files are parsed by the caller into `serde_json::Value` trees. The
//! helpers here check the shape each builder expects and turn mismatches into
//! [`RuleError`]s that name the offending field.

use crate::error::{RuleError, RuleResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Label name to raw rule definition, sorted by label
pub type RuleSet = BTreeMap<String, Value>;

/// Built-in rule types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    HeadBranch,
    Title,
    Body,
    ChangedFiles,
    Any,
    All,
    Or,
}

impl RuleKind {
    pub const ALL: [RuleKind; 7] = [
        RuleKind::HeadBranch,
        RuleKind::Title,
        RuleKind::Body,
        RuleKind::ChangedFiles,
        RuleKind::Any,
        RuleKind::All,
        RuleKind::Or,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::HeadBranch => "head-branch",
            RuleKind::Title => "title",
            RuleKind::Body => "body",
            RuleKind::ChangedFiles => "changed-files",
            RuleKind::Any => "any",
            RuleKind::All => "all",
            RuleKind::Or => "or",
        }
    }

    /// Whether this kind takes an array of condition maps
    pub fn is_composite(&self) -> bool {
        matches!(self, RuleKind::Any | RuleKind::All)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| RuleError::UnknownRuleType(s.to_string()))
    }
}

/// JSON type name used in error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}

/// Coerce a pattern list into strings.
///
/// A lone string is accepted as a one-element list.
pub fn string_list(field: &str, value: &Value) -> RuleResult<Vec<String>> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(RuleError::invalid(
                    format!("{field}[{i}]"),
                    "string",
                    type_name(other),
                )),
            })
            .collect(),
        other => Err(RuleError::invalid(field, "list of strings", type_name(other))),
    }
}

/// Flatten an array of condition maps into `(rule_type, config)` pairs.
///
/// A map with several keys contributes one pair per key, in key order.
pub fn condition_entries(field: &str, value: &Value) -> RuleResult<Vec<(String, Value)>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Err(RuleError::EmptyConfiguration(field.to_string())),
        other => {
            return Err(RuleError::invalid(
                field,
                "array of condition maps",
                type_name(other),
            ));
        }
    };

    let mut entries = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let map = item.as_object().ok_or_else(|| {
            RuleError::invalid(format!("{field}[{i}]"), "map", type_name(item))
        })?;
        entries.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    if entries.is_empty() {
        return Err(RuleError::EmptyConfiguration(field.to_string()));
    }
    Ok(entries)
}

/// Entries of an `or` map, in key order
pub fn or_entries(value: &Value) -> RuleResult<Vec<(String, Value)>> {
    let field = RuleKind::Or.as_str();
    let map = match value {
        Value::Object(map) => map,
        Value::Null => return Err(RuleError::EmptyConfiguration(field.to_string())),
        other => return Err(RuleError::invalid(field, "map of rule types", type_name(other))),
    };

    if map.is_empty() {
        return Err(RuleError::EmptyConfiguration(field.to_string()));
    }
    Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

/// Resolve a label's rule definition into the rule type and its config.
///
/// Definitions follow the labeler convention `[ {rule_type: config} ]`; only
/// the first list element is considered. A bare map is accepted too, which
/// allows `{or: {...}}` without the list wrapper. When the map holds an `any`
/// or `all` key that key wins, otherwise the first key is used.
pub fn rule_definition(value: &Value) -> RuleResult<(String, Value)> {
    let condition = match value {
        Value::Array(items) => items
            .first()
            .ok_or_else(|| RuleError::EmptyConfiguration("rule definition".to_string()))?,
        Value::Object(_) => value,
        other => {
            return Err(RuleError::invalid(
                "rule definition",
                "array of condition maps",
                type_name(other),
            ));
        }
    };

    let map = condition.as_object().ok_or_else(|| {
        RuleError::invalid("rule definition[0]", "map", type_name(condition))
    })?;

    let composite = map.iter().find(|(key, _)| {
        key.parse::<RuleKind>()
            .map(|kind| kind.is_composite())
            .unwrap_or(false)
    });

    composite
        .or_else(|| map.iter().next())
        .map(|(key, config)| (key.clone(), config.clone()))
        .ok_or_else(|| RuleError::EmptyConfiguration("rule definition".to_string()))
}
