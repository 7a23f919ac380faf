use crate::ast::{Expr, Literal};
use crate::error::{ParseError, SyntaxError};
use crate::lexer::{tokenize, Token, TokenKind};

/// Parse rule-expression text into an AST.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    tracing::trace!(input, "parsing rule expression");
    let tokens = tokenize(input)?;
    let expr = Parser::new(&tokens, input.len()).parse()?;
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Byte length of the source, reported as the position of end-of-input errors.
    end: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], end: usize) -> Self {
        Self { tokens, pos: 0, end }
    }

    fn parse(mut self) -> Result<Expr, SyntaxError> {
        let expr = self.parse_or()?;
        if self.peek().is_some() {
            return Err(self.expected("end of input"));
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_not()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // `not` binds only the immediately following atom.
    fn parse_not(&mut self) -> Result<Expr, SyntaxError> {
        if self.eat(&TokenKind::Not) {
            let operand = self.parse_atom()?;
            return Ok(Expr::Not(Box::new(operand)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expr, SyntaxError> {
        if self.eat(&TokenKind::LParen) {
            let expr = self.parse_or()?;
            if !self.eat(&TokenKind::RParen) {
                return Err(self.expected("')'"));
            }
            return Ok(expr);
        }
        self.parse_predicate()
    }

    fn parse_predicate(&mut self) -> Result<Expr, SyntaxError> {
        let field = match self.peek() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => {
                let name = name.clone();
                self.pos += 1;
                name
            }
            _ => return Err(self.expected("field name")),
        };

        if self.eat(&TokenKind::Not) {
            if !self.eat(&TokenKind::In) {
                return Err(self.expected("'in'"));
            }
            let list = self.parse_membership_rhs()?;
            return Ok(Expr::Membership {
                field,
                negated: true,
                list,
            });
        }

        if self.eat(&TokenKind::In) {
            let list = self.parse_membership_rhs()?;
            return Ok(Expr::Membership {
                field,
                negated: false,
                list,
            });
        }

        match self.peek() {
            Some(Token {
                kind: TokenKind::Compare(op),
                ..
            }) => {
                let op = *op;
                self.pos += 1;
                let literal = self.parse_literal()?;
                Ok(Expr::Comparison { field, op, literal })
            }
            _ => Err(self.expected("comparison operator or 'in'")),
        }
    }

    /// Right-hand side of `in`/`not in`. A quoted string here is comma-sugar
    /// for a list; other scalar literals are kept as-is and rejected at
    /// evaluation time.
    fn parse_membership_rhs(&mut self) -> Result<Literal, SyntaxError> {
        let literal = self.parse_literal()?;
        Ok(match literal {
            Literal::String(s) => Literal::List(split_list_sugar(&s)),
            other => other,
        })
    }

    fn parse_literal(&mut self) -> Result<Literal, SyntaxError> {
        let literal = match self.peek() {
            Some(token) => match &token.kind {
                TokenKind::Str(s) => Literal::String(s.clone()),
                TokenKind::Number(n) => Literal::Number(*n),
                TokenKind::Date(raw) => Literal::Date(raw.clone()),
                TokenKind::Bool(b) => Literal::Bool(*b),
                TokenKind::LBracket => return self.parse_list(),
                _ => return Err(self.expected("literal value")),
            },
            None => return Err(self.expected("literal value")),
        };
        self.pos += 1;
        Ok(literal)
    }

    fn parse_list(&mut self) -> Result<Literal, SyntaxError> {
        if !self.eat(&TokenKind::LBracket) {
            return Err(self.expected("'['"));
        }

        let mut items = Vec::new();
        if self.eat(&TokenKind::RBracket) {
            // an empty list is valid and denotes an always-false membership
            return Ok(Literal::List(items));
        }

        loop {
            match self.peek() {
                Some(Token {
                    kind: TokenKind::Str(s),
                    ..
                }) => {
                    items.push(s.clone());
                    self.pos += 1;
                }
                _ => return Err(self.expected("string literal")),
            }

            if self.eat(&TokenKind::Comma) {
                continue;
            }
            if self.eat(&TokenKind::RBracket) {
                break;
            }
            return Err(self.expected("',' or ']'"));
        }

        Ok(Literal::List(items))
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().map(|t| &t.kind == kind).unwrap_or(false) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expected(&self, expected: &str) -> SyntaxError {
        match self.peek() {
            Some(token) => SyntaxError {
                pos: token.pos,
                expected: expected.to_string(),
                found: token.kind.to_string(),
            },
            None => SyntaxError {
                pos: self.end,
                expected: expected.to_string(),
                found: "end of input".to_string(),
            },
        }
    }
}

fn split_list_sugar(s: &str) -> Vec<String> {
    s.split(',').map(|part| part.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CompareOp;

    #[test]
    fn test_simple_eq() {
        let expr = parse(r#"status = "active""#).unwrap();
        assert_eq!(
            expr,
            Expr::Comparison {
                field: "status".to_string(),
                op: CompareOp::Eq,
                literal: Literal::String("active".to_string()),
            }
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let expr = parse(r#"a = 1 or b = 2 and c = 3"#).unwrap();
        let Expr::Or(left, right) = expr else {
            panic!("expected Or at the top");
        };
        assert!(matches!(*left, Expr::Comparison { .. }));
        assert!(matches!(*right, Expr::And(_, _)));
    }

    #[test]
    fn test_not_binds_single_atom() {
        // ((not a) and b) or c
        let expr = parse(r#"not (a = 1) and b = 2 or c = 3"#).unwrap();
        let Expr::Or(left, _) = expr else {
            panic!("expected Or at the top");
        };
        let Expr::And(not_a, _) = *left else {
            panic!("expected And on the left");
        };
        assert!(matches!(*not_a, Expr::Not(_)));
    }

    #[test]
    fn test_not_before_membership() {
        let expr = parse(r#"not str in ["a"]"#).unwrap();
        assert!(matches!(expr, Expr::Not(_)));
    }

    #[test]
    fn test_membership() {
        let expr = parse(r#"str not in ["a", "b"]"#).unwrap();
        assert_eq!(
            expr,
            Expr::Membership {
                field: "str".to_string(),
                negated: true,
                list: Literal::List(vec!["a".to_string(), "b".to_string()]),
            }
        );
    }

    #[test]
    fn test_empty_list() {
        let expr = parse(r#"str in []"#).unwrap();
        assert!(matches!(
            expr,
            Expr::Membership {
                list: Literal::List(items),
                ..
            } if items.is_empty()
        ));
    }

    #[test]
    fn test_comma_sugar() {
        let expr = parse(r#"str in "a, b,c""#).unwrap();
        assert!(matches!(
            expr,
            Expr::Membership {
                list: Literal::List(items),
                ..
            } if items == vec!["a", "b", "c"]
        ));
    }

    #[test]
    fn test_single_string_sugar_is_one_element_list() {
        let expr = parse(r#"country not in "US""#).unwrap();
        assert!(matches!(
            expr,
            Expr::Membership {
                negated: true,
                list: Literal::List(items),
                ..
            } if items == vec!["US"]
        ));
    }

    #[test]
    fn test_date_literal_kept_raw() {
        let expr = parse("date > 01/01/2016").unwrap();
        assert_eq!(
            expr,
            Expr::Comparison {
                field: "date".to_string(),
                op: CompareOp::Gt,
                literal: Literal::Date("01/01/2016".to_string()),
            }
        );
    }

    #[test]
    fn test_list_on_comparison_rhs_parses() {
        // semantically invalid, but rejected at evaluation, not here
        let expr = parse(r#"country = ["CA"]"#).unwrap();
        assert!(matches!(
            expr,
            Expr::Comparison {
                literal: Literal::List(_),
                ..
            }
        ));
    }

    #[test]
    fn test_unbalanced_paren() {
        let err = parse(r#"(a = 1"#).unwrap_err();
        let ParseError::Syntax(err) = err else {
            panic!("expected syntax error");
        };
        assert_eq!(err.expected, "')'");
        assert_eq!(err.found, "end of input");
    }

    #[test]
    fn test_trailing_input() {
        let err = parse(r#"a = 1 b = 2"#).unwrap_err();
        let ParseError::Syntax(err) = err else {
            panic!("expected syntax error");
        };
        assert_eq!(err.expected, "end of input");
    }

    #[test]
    fn test_missing_operator() {
        let err = parse(r#"a "x""#).unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn test_lex_error_propagates() {
        let err = parse(r#"a = "unterminated"#).unwrap_err();
        assert!(matches!(err, ParseError::Lex(_)));
    }

    #[test]
    fn test_non_string_in_bracketed_list() {
        let err = parse(r#"a in [1, 2]"#).unwrap_err();
        let ParseError::Syntax(err) = err else {
            panic!("expected syntax error");
        };
        assert_eq!(err.expected, "string literal");
    }
}
