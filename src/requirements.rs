//! Requirement gate: a pure integer predicate over a caller-supplied context
//! map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl Comparison {
    /// Parse the DB-stored comparison token. Unknown tokens return `None`;
    /// the caller treats that the same as an unknown operator (always fails).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "=" => Some(Self::Eq),
            "!=" => Some(Self::NotEq),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::LtEq),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::GtEq),
            _ => None,
        }
    }

    fn apply(self, actual: i64, expected: i64) -> bool {
        match self {
            Self::Eq => actual == expected,
            Self::NotEq => actual != expected,
            Self::Lt => actual < expected,
            Self::LtEq => actual <= expected,
            Self::Gt => actual > expected,
            Self::GtEq => actual >= expected,
        }
    }
}

/// A row from the `requirements` table.
#[derive(Debug, Clone)]
pub struct RequirementRow {
    pub id: i64,
    pub meta: Option<String>,
    pub key: String,
    pub value: i64,
    /// Raw comparison token as stored; parsed lazily so an unparseable
    /// operator fails evaluation rather than failing the row load.
    pub comparison: String,
}

/// Evaluate a single requirement against a context map.
///
/// Pure and total: missing key, missing/unknown operator, or a comparison
/// that can't be parsed all evaluate to `false` — never panics, never does
/// I/O.
pub fn evaluate(req: &RequirementRow, ctx: &HashMap<String, i64>) -> bool {
    let Some(&actual) = ctx.get(req.key.as_str()) else {
        return false;
    };
    let Some(comparison) = Comparison::parse(&req.comparison) else {
        return false;
    };
    comparison.apply(actual, req.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, value: i64, cmp: &str) -> RequirementRow {
        RequirementRow {
            id: 1,
            meta: None,
            key: key.to_string(),
            value,
            comparison: cmp.to_string(),
        }
    }

    #[test]
    fn missing_key_fails() {
        let req = row("skill_x", 50, ">=");
        let ctx = HashMap::new();
        assert!(!evaluate(&req, &ctx));
    }

    #[test]
    fn unknown_operator_fails() {
        let req = row("skill_x", 50, "~=");
        let mut ctx = HashMap::new();
        ctx.insert("skill_x".to_string(), 99);
        assert!(!evaluate(&req, &ctx));
    }

    #[test]
    fn all_six_comparisons() {
        let mut ctx = HashMap::new();
        ctx.insert("k".to_string(), 10);
        assert!(evaluate(&row("k", 10, "="), &ctx));
        assert!(evaluate(&row("k", 9, "!="), &ctx));
        assert!(evaluate(&row("k", 11, "<"), &ctx));
        assert!(evaluate(&row("k", 10, "<="), &ctx));
        assert!(evaluate(&row("k", 9, ">"), &ctx));
        assert!(evaluate(&row("k", 10, ">="), &ctx));
    }

    #[test]
    fn requirement_just_below_threshold_fails() {
        // requirement skill_x >= 50, context provides 49.
        let req = row("skill_x", 50, ">=");
        let mut ctx = HashMap::new();
        ctx.insert("skill_x".to_string(), 49);
        assert!(!evaluate(&req, &ctx));
    }
}
