//! A small boolean rule-expression language.
//!
//! Expressions like `platform in ["web", "roku"] and country = "US" and
//! date > 01/01/2016` are parsed into an immutable AST and evaluated against
//! a field-to-value [`Context`]. An optional [`Validator`] restricts which
//! fields and literal values are acceptable before evaluation.
//!
//! ```
//! use rule_expr::{run, Context, Value};
//!
//! let mut ctx = Context::new();
//! ctx.insert("country".to_string(), Value::from("US"));
//! ctx.insert("num".to_string(), Value::from(20.0));
//!
//! assert!(run(r#"country = "US" and num > 10"#, &ctx).unwrap());
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod validator;
pub mod value;

pub use ast::{CompareOp, Expr, Literal};
pub use error::{Error, EvalError, LexError, ParseError, SyntaxError};
pub use eval::{evaluate, evaluate_with};
pub use parser::parse;
pub use validator::{DefaultValidator, DomainValidator, FieldDomain, Validator};
pub use value::{context_from_json, Context, Value};

/// Parse and evaluate in one shot with the pass-through validator.
pub fn run(input: &str, context: &Context) -> Result<bool, Error> {
    let expr = parse(input)?;
    let result = evaluate(&expr, context)?;
    tracing::debug!(input, result, "rule evaluated");
    Ok(result)
}

/// Parse and evaluate in one shot with an explicit validator.
pub fn run_with(
    input: &str,
    context: &Context,
    validator: &dyn Validator,
) -> Result<bool, Error> {
    let expr = parse(input)?;
    let result = evaluate_with(&expr, context, validator)?;
    tracing::debug!(input, result, "rule evaluated");
    Ok(result)
}
