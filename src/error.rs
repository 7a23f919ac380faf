use thiserror::Error;

/// Errors raised while tokenizing expression text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unrecognized character {found:?} at position {pos}")]
    UnrecognizedChar { found: char, pos: usize },

    #[error("unterminated string literal starting at position {pos}")]
    UnterminatedString { pos: usize },

    #[error("invalid number {text:?} at position {pos}")]
    InvalidNumber { text: String, pos: usize },
}

/// A token-stream violation of the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at position {pos}: expected {expected}, found {found}")]
pub struct SyntaxError {
    pub pos: usize,
    pub expected: String,
    pub found: String,
}

/// Any failure to turn expression text into an AST. Fatal to the `parse`
/// call; callers never receive a partial AST.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Errors raised while evaluating an AST against a context. Fatal to the
/// single `evaluate` call; the AST and validator stay usable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("{0} is invalid")]
    UnknownField(String),

    #[error("{input} is not a valid {field}")]
    InvalidLiteral { field: String, input: String },

    #[error("{0} is not a valid date")]
    InvalidDate(String),

    #[error("{0} is an array, cannot be compared")]
    NotComparable(String),

    #[error("{0} is not an array")]
    NotAList(String),
}

/// Either error family, for the one-shot parse+evaluate entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
