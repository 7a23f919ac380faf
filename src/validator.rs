use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use crate::error::EvalError;
use crate::value::{parse_date, render_number, Context, Value};

/// Pluggable capability constraining which fields and literal values an
/// expression may use. The field name of the predicate under evaluation is
/// passed to every coercion call, so implementations carry no per-call state
/// and a single instance is safe to share across concurrent evaluations.
///
/// The default method bodies accept everything, so implementations only
/// override the checks they care about.
pub trait Validator {
    /// Resolve a field name against the context. `Ok(None)` means the field
    /// is acceptable but absent from this context.
    fn resolve_field<'a>(
        &self,
        name: &str,
        context: &'a Context,
    ) -> Result<Option<&'a Value>, EvalError> {
        Ok(context.get(name))
    }

    fn coerce_string(&self, field: &str, input: &str) -> Result<String, EvalError> {
        let _ = field;
        Ok(input.to_string())
    }

    fn coerce_number(&self, field: &str, input: f64) -> Result<f64, EvalError> {
        let _ = field;
        Ok(input)
    }

    fn coerce_date(&self, field: &str, input: &str) -> Result<NaiveDate, EvalError> {
        let _ = field;
        parse_date(input).ok_or_else(|| EvalError::InvalidDate(input.to_string()))
    }

    fn coerce_list(&self, field: &str, inputs: &[String]) -> Result<Vec<String>, EvalError> {
        inputs
            .iter()
            .map(|item| self.coerce_string(field, item))
            .collect()
    }
}

/// Pass-through validator: every field name resolves and every literal is
/// accepted as-is. Used when no validator is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl Validator for DefaultValidator {}

/// The allowed values for one registered field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDomain {
    /// Any literal is acceptable.
    Any,
    /// Only literals whose rendered form is in the set are acceptable.
    OneOf(HashSet<String>),
}

/// Validator backed by a finite registry of field domains. Unregistered
/// field names fail closed with `UnknownField`.
#[derive(Debug, Clone, Default)]
pub struct DomainValidator {
    fields: HashMap<String, FieldDomain>,
}

impl DomainValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, domain: FieldDomain) -> Self {
        self.fields.insert(name.into(), domain);
        self
    }

    /// Register a field without restricting its values.
    pub fn any(self, name: impl Into<String>) -> Self {
        self.field(name, FieldDomain::Any)
    }

    /// Register a field restricted to a finite value set.
    pub fn one_of<I, S>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = values.into_iter().map(Into::into).collect();
        self.field(name, FieldDomain::OneOf(set))
    }

    fn check(&self, field: &str, input: &str) -> Result<(), EvalError> {
        match self.fields.get(field) {
            None => Err(EvalError::UnknownField(field.to_string())),
            Some(FieldDomain::Any) => Ok(()),
            Some(FieldDomain::OneOf(set)) if set.contains(input) => Ok(()),
            Some(FieldDomain::OneOf(_)) => Err(EvalError::InvalidLiteral {
                field: field.to_string(),
                input: input.to_string(),
            }),
        }
    }
}

impl Validator for DomainValidator {
    fn resolve_field<'a>(
        &self,
        name: &str,
        context: &'a Context,
    ) -> Result<Option<&'a Value>, EvalError> {
        if !self.fields.contains_key(name) {
            return Err(EvalError::UnknownField(name.to_string()));
        }
        Ok(context.get(name))
    }

    fn coerce_string(&self, field: &str, input: &str) -> Result<String, EvalError> {
        self.check(field, input)?;
        Ok(input.to_string())
    }

    fn coerce_number(&self, field: &str, input: f64) -> Result<f64, EvalError> {
        self.check(field, &render_number(input))?;
        Ok(input)
    }
}
