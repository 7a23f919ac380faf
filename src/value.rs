use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// The field-to-value mapping an expression is evaluated against.
pub type Context = HashMap<String, Value>;

/// A dynamically-typed runtime value held by a context field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Value {
    /// String form used for membership matching and diagnostics.
    pub(crate) fn render(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Number(n) => render_number(*n),
            Self::Bool(b) => b.to_string(),
            Self::Date(d) => d.format("%m/%d/%Y").to_string(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

/// Build a context from a JSON object of scalar fields. Returns `None` for
/// non-objects or for nested array/object/null values. Strings in
/// `MM/DD/YYYY` form become dates.
pub fn context_from_json(value: &JsonValue) -> Option<Context> {
    let obj = value.as_object()?;
    let mut ctx = Context::with_capacity(obj.len());
    for (name, v) in obj {
        ctx.insert(name.clone(), value_from_json(v)?);
    }
    Some(ctx)
}

fn value_from_json(v: &JsonValue) -> Option<Value> {
    match v {
        JsonValue::String(s) => Some(match parse_date(s) {
            Some(d) => Value::Date(d),
            None => Value::String(s.clone()),
        }),
        JsonValue::Number(n) => n.as_f64().map(Value::Number),
        JsonValue::Bool(b) => Some(Value::Bool(*b)),
        _ => None,
    }
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok()
}

pub(crate) fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_number() {
        assert_eq!(render_number(10.0), "10");
        assert_eq!(render_number(-3.0), "-3");
        assert_eq!(render_number(2.5), "2.5");
    }

    #[test]
    fn test_parse_date() {
        let d = parse_date("04/02/2016").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2016, 4, 2).unwrap());
        assert!(parse_date("23/23/2016").is_none());
        assert!(parse_date("not a date").is_none());
    }

    #[test]
    fn test_context_from_json() {
        let ctx = context_from_json(&json!({
            "country": "CA",
            "num": 20,
            "flag": true,
            "date": "04/02/2016"
        }))
        .unwrap();

        assert_eq!(ctx.get("country"), Some(&Value::String("CA".to_string())));
        assert_eq!(ctx.get("num"), Some(&Value::Number(20.0)));
        assert_eq!(ctx.get("flag"), Some(&Value::Bool(true)));
        assert_eq!(
            ctx.get("date"),
            Some(&Value::Date(NaiveDate::from_ymd_opt(2016, 4, 2).unwrap()))
        );
    }

    #[test]
    fn test_context_from_json_rejects_nested() {
        assert!(context_from_json(&json!({"tags": ["a", "b"]})).is_none());
        assert!(context_from_json(&json!("scalar")).is_none());
    }
}
