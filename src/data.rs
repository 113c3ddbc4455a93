use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::board::ColumnKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl Eq for Value {}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Value::Boolean(b) => b.to_string(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Truthiness for 0/1 feature columns: boolean `true`, numeric `1`,
    /// or the literal strings `1` / `true` (any ASCII case).
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Integer(i) => *i == 1,
            Value::Float(f) => *f == 1.0,
            Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            // A numeric column can hold both integer and float literals.
            (Value::Integer(a), Value::Float(b)) => (*a as f64).total_cmp(b),
            (Value::Float(a), Value::Integer(b)) => a.total_cmp(&(*b as f64)),
            (a, b) => variant_rank(a).cmp(&variant_rank(b)),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

fn variant_rank(value: &Value) -> u8 {
    match value {
        Value::Boolean(_) => 0,
        Value::Integer(_) | Value::Float(_) => 1,
        Value::String(_) => 2,
    }
}

/// Missing-aware ordering wrapper: `None` sorts before every present value,
/// so a descending sort pushes missing cells to the bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparableValue(pub Option<Value>);

impl Ord for ComparableValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (&self.0, &other.0) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(left), Some(right)) => left.cmp(right),
        }
    }
}

impl PartialOrd for ComparableValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Parse a canonicalized cell into a typed value.
///
/// Unparseable cells become `None` (a missing cell) rather than an error:
/// one bad numeric in a column must not poison the whole evaluation, and
/// range filters exclude missing cells anyway.
pub fn parse_typed_value(value: &str, kind: ColumnKind) -> Option<Value> {
    if value.is_empty() {
        return None;
    }
    match kind {
        ColumnKind::Categorical | ColumnKind::Text | ColumnKind::Link => {
            Some(Value::String(value.to_string()))
        }
        ColumnKind::Boolean => parse_boolean(value).map(Value::Boolean),
        ColumnKind::Numeric => parse_numeric(value),
    }
}

fn parse_boolean(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

fn parse_numeric(value: &str) -> Option<Value> {
    if let Ok(parsed) = value.parse::<i64>() {
        return Some(Value::Integer(parsed));
    }
    if let Ok(parsed) = value.parse::<f64>() {
        return Some(Value::Float(parsed));
    }
    parse_currency_literal(value).map(Value::Float)
}

/// Accept price-like literals (`$1,299.99`, `€ 12.50`) as numerics by
/// stripping a leading currency symbol and thousands separators.
pub fn parse_currency_literal(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let stripped = trimmed
        .trim_start_matches(['$', '€', '£', '¥'])
        .trim()
        .replace(',', "");
    if stripped.is_empty() {
        return None;
    }
    stripped
        .parse::<Decimal>()
        .ok()
        .and_then(|decimal| decimal.to_f64())
}

/// Render a numeric as currency with an exact two-decimal scale.
pub fn format_currency(symbol: &str, value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(decimal) => format!("{symbol}{:.2}", decimal.round_dp(2)),
        None => format!("{symbol}{value:.2}"),
    }
}
