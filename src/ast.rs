use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::render_number;

/// A parsed rule expression. Immutable once built; safe to share across
/// concurrent evaluations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Comparison {
        field: String,
        op: CompareOp,
        literal: Literal,
    },
    Membership {
        field: String,
        negated: bool,
        /// `Literal::List` after comma-sugar expansion; any other variant
        /// fails evaluation with `NotAList`.
        list: Literal,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        };
        f.write_str(s)
    }
}

/// A literal operand, typed at parse time from its lexical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    String(String),
    Number(f64),
    /// Raw `MM/DD/YYYY` text; calendar validity is checked at evaluation.
    Date(String),
    Bool(bool),
    List(Vec<String>),
}

impl Literal {
    /// Rendering used in evaluation diagnostics.
    pub(crate) fn render(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Number(n) => render_number(*n),
            Self::Date(raw) => raw.clone(),
            Self::Bool(b) => b.to_string(),
            Self::List(items) => items.join(","),
        }
    }
}
