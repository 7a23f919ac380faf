use chrono::NaiveDate;

use crate::ast::{CompareOp, Expr, Literal};
use crate::error::EvalError;
use crate::validator::{DefaultValidator, Validator};
use crate::value::{Context, Value};

/// Evaluate an AST against a context with the pass-through validator.
pub fn evaluate(expr: &Expr, context: &Context) -> Result<bool, EvalError> {
    evaluate_with(expr, context, &DefaultValidator)
}

/// Evaluate an AST against a context, consulting `validator` for field
/// resolution and literal coercion.
pub fn evaluate_with(
    expr: &Expr,
    context: &Context,
    validator: &dyn Validator,
) -> Result<bool, EvalError> {
    match expr {
        // both sides are always evaluated, so validation errors surface
        // regardless of which branch decides the result
        Expr::And(left, right) => {
            let l = evaluate_with(left, context, validator)?;
            let r = evaluate_with(right, context, validator)?;
            Ok(l && r)
        }
        Expr::Or(left, right) => {
            let l = evaluate_with(left, context, validator)?;
            let r = evaluate_with(right, context, validator)?;
            Ok(l || r)
        }
        Expr::Not(operand) => Ok(!evaluate_with(operand, context, validator)?),
        Expr::Comparison { field, op, literal } => {
            eval_comparison(field, *op, literal, context, validator)
        }
        Expr::Membership {
            field,
            negated,
            list,
        } => eval_membership(field, *negated, list, context, validator),
    }
}

/// A literal after validator coercion, ready for native comparison.
enum Coerced {
    Str(String),
    Num(f64),
    Date(NaiveDate),
}

fn eval_comparison(
    field: &str,
    op: CompareOp,
    literal: &Literal,
    context: &Context,
    validator: &dyn Validator,
) -> Result<bool, EvalError> {
    let value = validator.resolve_field(field, context)?;

    let coerced = match literal {
        // a boolean literal is the result itself: `field = true` asks only
        // whether the field resolves, not what its value is
        Literal::Bool(b) => return Ok(*b),
        Literal::List(_) => return Err(EvalError::NotComparable(literal.render())),
        Literal::String(s) => Coerced::Str(validator.coerce_string(field, s)?),
        Literal::Number(n) => Coerced::Num(validator.coerce_number(field, *n)?),
        Literal::Date(raw) => Coerced::Date(validator.coerce_date(field, raw)?),
    };

    let Some(value) = value else {
        return Ok(false);
    };
    Ok(compare(value, op, &coerced))
}

fn eval_membership(
    field: &str,
    negated: bool,
    list: &Literal,
    context: &Context,
    validator: &dyn Validator,
) -> Result<bool, EvalError> {
    let value = validator.resolve_field(field, context)?;

    let Literal::List(items) = list else {
        return Err(EvalError::NotAList(list.render()));
    };
    let items = validator.coerce_list(field, items)?;

    let hit = match value {
        Some(value) => {
            let needle = value.render();
            items.iter().any(|item| *item == needle)
        }
        None => false,
    };
    Ok(hit != negated)
}

fn compare(value: &Value, op: CompareOp, literal: &Coerced) -> bool {
    match (value, literal) {
        (Value::String(a), Coerced::Str(b)) => compare_ord(a.as_str(), b.as_str(), op),
        (Value::Number(a), Coerced::Num(b)) => compare_float(*a, *b, op),
        (Value::Date(a), Coerced::Date(b)) => compare_ord(a, b, op),
        // mismatched types never compare true
        _ => false,
    }
}

fn compare_ord<T: PartialOrd>(a: T, b: T, op: CompareOp) -> bool {
    match op {
        CompareOp::Eq => a == b,
        CompareOp::Ne => a != b,
        CompareOp::Gt => a > b,
        CompareOp::Lt => a < b,
        CompareOp::Ge => a >= b,
        CompareOp::Le => a <= b,
    }
}

fn compare_float(a: f64, b: f64, op: CompareOp) -> bool {
    match op {
        CompareOp::Eq => (a - b).abs() < f64::EPSILON,
        CompareOp::Ne => (a - b).abs() >= f64::EPSILON,
        CompareOp::Gt => a > b,
        CompareOp::Lt => a < b,
        CompareOp::Ge => a >= b,
        CompareOp::Le => a <= b,
    }
}
