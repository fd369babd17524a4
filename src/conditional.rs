//! Conditional rules attached to widget instances.
//!
//! `when` is a JSON array of clauses; each clause compares the widget value
//! against a number and the clauses are OR-ed together. A clause string may
//! itself chain comparisons with `||` (or `or`). `then` is a JSON array of
//! actions the front end runs when the rule fires. The rules are only
//! validated and stored here, never evaluated.

use crate::error::{QrfeedzError, Result};
use regex::Regex;
use serde_json::{json, Value};
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Le,
    Ge,
    Lt,
    Gt,
    Eq,
    Ne,
}

impl Operator {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "<=" => Operator::Le,
            ">=" => Operator::Ge,
            "<" => Operator::Lt,
            ">" => Operator::Gt,
            "==" => Operator::Eq,
            "!=" => Operator::Ne,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Eq => "==",
            Operator::Ne => "!=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub op: Operator,
    pub operand: f64,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value {} {}", self.op.as_str(), self.operand)
    }
}

fn comparison_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:widget\.)?value\s*(<=|>=|==|!=|<|>)\s*(-?\d+(?:\.\d+)?)\s*$")
            .expect("static regex")
    })
}

fn or_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\|\||\s+or\s+").expect("static regex"))
}

/// One `when` entry: comparisons joined by OR.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause(pub Vec<Comparison>);

impl Clause {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut comparisons = Vec::new();
        for part in or_re().split(raw) {
            let caps = comparison_re()
                .captures(part)
                .ok_or_else(|| QrfeedzError::InvalidConditional(format!("bad clause `{}`", raw)))?;
            let op = Operator::parse(&caps[1]).ok_or_else(|| {
                QrfeedzError::InvalidConditional(format!("bad operator in `{}`", raw))
            })?;
            let operand = caps[2].parse::<f64>().map_err(|_| {
                QrfeedzError::InvalidConditional(format!("bad operand in `{}`", raw))
            })?;
            comparisons.push(Comparison { op, operand });
        }
        Ok(Clause(comparisons))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        f.write_str(&parts.join(" || "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TextareaSlidedown,
    SubtextAppear,
    JumpToPage(u32),
}

impl Action {
    fn to_json(self) -> Value {
        match self {
            Action::TextareaSlidedown => json!("textarea-slidedown"),
            Action::SubtextAppear => json!("subtext-appear"),
            Action::JumpToPage(page) => json!({ "jump-to-page": page }),
        }
    }

    fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => match s.as_str() {
                "textarea-slidedown" => Ok(Action::TextareaSlidedown),
                "subtext-appear" => Ok(Action::SubtextAppear),
                "jump-to-page" => Err(QrfeedzError::InvalidConditional(
                    "jump-to-page needs a page number".to_string(),
                )),
                other => Err(QrfeedzError::InvalidConditional(format!(
                    "unknown action `{}`",
                    other
                ))),
            },
            Value::Object(map) if map.len() == 1 => match map.get("jump-to-page") {
                Some(page) => page
                    .as_u64()
                    .filter(|p| *p >= 1 && *p <= u32::MAX as u64)
                    .map(|p| Action::JumpToPage(p as u32))
                    .ok_or_else(|| {
                        QrfeedzError::InvalidConditional(format!("bad page number {}", page))
                    }),
                None => Err(QrfeedzError::InvalidConditional(format!(
                    "unknown action {}",
                    value
                ))),
            },
            other => Err(QrfeedzError::InvalidConditional(format!(
                "unknown action {}",
                other
            ))),
        }
    }
}

/// A validated `when` / `then` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub when: Vec<Clause>,
    pub then: Vec<Action>,
}

impl Conditional {
    pub fn new(when: &[&str], then: Vec<Action>) -> Result<Self> {
        if when.is_empty() {
            return Err(QrfeedzError::InvalidConditional("empty `when`".to_string()));
        }
        if then.is_empty() {
            return Err(QrfeedzError::InvalidConditional("empty `then`".to_string()));
        }
        let when = when
            .iter()
            .map(|raw| Clause::parse(raw))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { when, then })
    }

    /// Validates the JSON stored in `widget_instances.when` / `.then`.
    pub fn from_json(when: &Value, then: &Value) -> Result<Self> {
        let when: Vec<&str> = match when {
            Value::String(s) => vec![s.as_str()],
            Value::Array(items) => items
                .iter()
                .map(|v| {
                    v.as_str().ok_or_else(|| {
                        QrfeedzError::InvalidConditional(format!("clause {} is not a string", v))
                    })
                })
                .collect::<Result<_>>()?,
            other => {
                return Err(QrfeedzError::InvalidConditional(format!(
                    "`when` must be a string or an array, got {}",
                    other
                )))
            }
        };
        let then = match then {
            Value::Array(items) => items
                .iter()
                .map(Action::from_json)
                .collect::<Result<Vec<_>>>()?,
            single => vec![Action::from_json(single)?],
        };
        Self::new(&when, then)
    }

    pub fn when_json(&self) -> Value {
        Value::Array(self.when.iter().map(|c| json!(c.to_string())).collect())
    }

    pub fn then_json(&self) -> Value {
        Value::Array(self.then.iter().map(|a| a.to_json()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chained_clause_from_the_restaurant_demo() {
        let c = Conditional::new(&["value <=2 || value == 5"], vec![Action::TextareaSlidedown])
            .unwrap();
        assert_eq!(c.when.len(), 1);
        assert_eq!(
            c.when[0].0,
            vec![
                Comparison { op: Operator::Le, operand: 2.0 },
                Comparison { op: Operator::Eq, operand: 5.0 },
            ]
        );
        assert_eq!(c.when_json(), json!(["value <= 2 || value == 5"]));
        assert_eq!(c.then_json(), json!(["textarea-slidedown"]));
    }

    #[test]
    fn accepts_widget_prefix_and_or_keyword() {
        let clause = Clause::parse("widget.value <=2 or widget.value ==5").unwrap();
        assert_eq!(clause.0.len(), 2);
        assert_eq!(clause.to_string(), "value <= 2 || value == 5");
    }

    #[test]
    fn decimal_operands_keep_their_fraction() {
        let clause = Clause::parse("value > 2.5").unwrap();
        assert_eq!(clause.to_string(), "value > 2.5");
    }

    #[test]
    fn large_operands_survive_serialisation() {
        let clause = Clause::parse("value < 99999999999999999999").unwrap();
        assert_eq!(clause.to_string(), "value < 100000000000000000000");
        assert_eq!(Clause::parse(&clause.to_string()).unwrap(), clause);
    }

    #[test]
    fn from_json_reads_stored_rules() {
        let c = Conditional::from_json(
            &json!(["value == 3"]),
            &json!(["subtext-appear", { "jump-to-page": 2 }]),
        )
        .unwrap();
        assert_eq!(c.then, vec![Action::SubtextAppear, Action::JumpToPage(2)]);
        assert_eq!(
            Conditional::from_json(&c.when_json(), &c.then_json()).unwrap(),
            c
        );
    }

    #[test]
    fn rejects_malformed_rules() {
        assert!(Clause::parse("rating <= 2").is_err());
        assert!(Clause::parse("value => 2").is_err());
        assert!(Clause::parse("value <= two").is_err());
        assert!(Conditional::new(&[], vec![Action::SubtextAppear]).is_err());
        assert!(Conditional::new(&["value < 1"], vec![]).is_err());
        assert!(Conditional::from_json(&json!(["value < 1"]), &json!(["explode"])).is_err());
        assert!(Conditional::from_json(&json!(["value < 1"]), &json!(["jump-to-page"])).is_err());
        assert!(
            Conditional::from_json(&json!(["value < 1"]), &json!([{ "jump-to-page": 0 }])).is_err()
        );
        assert!(Conditional::from_json(&json!(42), &json!(["subtext-appear"])).is_err());
    }
}
