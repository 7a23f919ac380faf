use std::fmt;

use crate::ast::CompareOp;
use crate::error::LexError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Str(String),
    Number(f64),
    /// Raw `MM/DD/YYYY` text; only the digit/digit/digit shape is checked here.
    Date(String),
    Bool(bool),
    Compare(CompareOp),
    And,
    Or,
    Not,
    In,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "identifier {name:?}"),
            Self::Str(s) => write!(f, "string {s:?}"),
            Self::Number(n) => write!(f, "number {n}"),
            Self::Date(raw) => write!(f, "date {raw}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Compare(op) => write!(f, "'{op}'"),
            Self::And => f.write_str("'and'"),
            Self::Or => f.write_str("'or'"),
            Self::Not => f.write_str("'not'"),
            Self::In => f.write_str("'in'"),
            Self::LBracket => f.write_str("'['"),
            Self::RBracket => f.write_str("']'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::Comma => f.write_str("','"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset into the source text.
    pub pos: usize,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer { input, pos: 0 }.run()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            if self.pos >= self.input.len() {
                break;
            }

            let pos = self.pos;
            let c = self.current_char();
            let kind = match c {
                '(' => {
                    self.pos += 1;
                    TokenKind::LParen
                }
                ')' => {
                    self.pos += 1;
                    TokenKind::RParen
                }
                '[' => {
                    self.pos += 1;
                    TokenKind::LBracket
                }
                ']' => {
                    self.pos += 1;
                    TokenKind::RBracket
                }
                ',' => {
                    self.pos += 1;
                    TokenKind::Comma
                }
                '"' => self.lex_string()?,
                '=' => {
                    self.pos += 1;
                    TokenKind::Compare(CompareOp::Eq)
                }
                '<' => {
                    self.pos += 1;
                    if self.match_char('>') {
                        TokenKind::Compare(CompareOp::Ne)
                    } else if self.match_char('=') {
                        TokenKind::Compare(CompareOp::Le)
                    } else {
                        TokenKind::Compare(CompareOp::Lt)
                    }
                }
                '>' => {
                    self.pos += 1;
                    if self.match_char('=') {
                        TokenKind::Compare(CompareOp::Ge)
                    } else {
                        TokenKind::Compare(CompareOp::Gt)
                    }
                }
                c if c.is_ascii_digit() || c == '-' => self.lex_number_or_date()?,
                c if c.is_alphanumeric() || c == '_' => self.lex_word(),
                found => return Err(LexError::UnrecognizedChar { found, pos }),
            };

            tokens.push(Token { kind, pos });
        }

        Ok(tokens)
    }

    fn lex_string(&mut self) -> Result<TokenKind, LexError> {
        let quote_pos = self.pos;
        self.pos += 1;

        let start = self.pos;
        while self.pos < self.input.len() && self.current_char() != '"' {
            self.pos += self.current_char().len_utf8();
        }
        if self.pos >= self.input.len() {
            return Err(LexError::UnterminatedString { pos: quote_pos });
        }

        let s = self.input[start..self.pos].to_string();
        self.pos += 1;
        Ok(TokenKind::Str(s))
    }

    fn lex_number_or_date(&mut self) -> Result<TokenKind, LexError> {
        let start = self.pos;
        self.match_char('-');

        while self.pos < self.input.len() {
            let c = self.current_char();
            if c.is_ascii_digit() || c == '.' || c == '/' {
                self.pos += 1;
            } else {
                break;
            }
        }

        let text = &self.input[start..self.pos];
        if is_date_shaped(text) {
            return Ok(TokenKind::Date(text.to_string()));
        }

        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| LexError::InvalidNumber {
                text: text.to_string(),
                pos: start,
            })
    }

    fn lex_word(&mut self) -> TokenKind {
        let start = self.pos;
        while self.pos < self.input.len() {
            let c = self.current_char();
            if c.is_alphanumeric() || c == '_' || c == '-' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }

        let word = &self.input[start..self.pos];
        if word.eq_ignore_ascii_case("and") {
            TokenKind::And
        } else if word.eq_ignore_ascii_case("or") {
            TokenKind::Or
        } else if word.eq_ignore_ascii_case("not") {
            TokenKind::Not
        } else if word.eq_ignore_ascii_case("in") {
            TokenKind::In
        } else if word.eq_ignore_ascii_case("true") {
            TokenKind::Bool(true)
        } else if word.eq_ignore_ascii_case("false") {
            TokenKind::Bool(false)
        } else {
            TokenKind::Ident(word.to_string())
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && self.current_char().is_whitespace() {
            self.pos += self.current_char().len_utf8();
        }
    }

    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\0')
    }

    fn match_char(&mut self, c: char) -> bool {
        if self.pos < self.input.len() && self.current_char() == c {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}

fn is_date_shaped(text: &str) -> bool {
    let parts: Vec<&str> = text.split('/').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_mixed_expression() {
        let toks = kinds(r#"country in ["US", "CA"] and num >= 10"#);
        assert_eq!(
            toks,
            vec![
                TokenKind::Ident("country".to_string()),
                TokenKind::In,
                TokenKind::LBracket,
                TokenKind::Str("US".to_string()),
                TokenKind::Comma,
                TokenKind::Str("CA".to_string()),
                TokenKind::RBracket,
                TokenKind::And,
                TokenKind::Ident("num".to_string()),
                TokenKind::Compare(CompareOp::Ge),
                TokenKind::Number(10.0),
            ]
        );
    }

    #[test]
    fn test_date_vs_number() {
        assert_eq!(kinds("01/01/2016"), vec![TokenKind::Date("01/01/2016".to_string())]);
        assert_eq!(kinds("-3.5"), vec![TokenKind::Number(-3.5)]);
        // calendar validity is not the lexer's concern
        assert_eq!(kinds("23/23/2016"), vec![TokenKind::Date("23/23/2016".to_string())]);
    }

    #[test]
    fn test_compare_operators() {
        assert_eq!(
            kinds("= <> < <= > >="),
            vec![
                TokenKind::Compare(CompareOp::Eq),
                TokenKind::Compare(CompareOp::Ne),
                TokenKind::Compare(CompareOp::Lt),
                TokenKind::Compare(CompareOp::Le),
                TokenKind::Compare(CompareOp::Gt),
                TokenKind::Compare(CompareOp::Ge),
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            kinds("AND Or not IN TRUE false"),
            vec![
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::In,
                TokenKind::Bool(true),
                TokenKind::Bool(false),
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(kinds("android"), vec![TokenKind::Ident("android".to_string())]);
        assert_eq!(kinds("india"), vec![TokenKind::Ident("india".to_string())]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize(r#"str = "world"#).unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { pos: 6 });
    }

    #[test]
    fn test_unrecognized_char() {
        let err = tokenize("num ! 10").unwrap_err();
        assert_eq!(err, LexError::UnrecognizedChar { found: '!', pos: 4 });
    }

    #[test]
    fn test_token_positions() {
        let toks = tokenize("a = 1").unwrap();
        assert_eq!(toks[0].pos, 0);
        assert_eq!(toks[1].pos, 2);
        assert_eq!(toks[2].pos, 4);
    }
}
