/*
 * Copyright (c) 2026. Mikhail Kulik.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use super::*;
use crate::lexer::unescape;
use ast::expr::Literal;
use ast::op::BinOp;

impl<'src, I: Iterator<Item = Token<'src>>> Parser<'src, I> {
    /// Entry point for expression parsing. Assignment is the loosest level.
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_assignment()
    }

    /// `name = value`, right-associative.
    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let target = self.parse_or()?;
        if self.peek_token() != TokenKind::Assign {
            return Ok(target);
        }
        let eq_span = self.peek_span();
        self.advance(); // consume `=`
        let value = self.parse_assignment()?;
        match target.kind {
            ExprKind::Identifier(name) => {
                let span = target.span.to(value.span);
                Ok(self.make_expr(
                    ExprKind::Assign {
                        target: name,
                        value: Box::new(value),
                    },
                    span,
                ))
            }
            _ => Err(ParseError::syntax(
                "left-hand side of '=' must be a variable name",
                eq_span,
            )),
        }
    }

    // or, ||
    fn parse_or(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::parse_and, |kind| match kind {
            TokenKind::Or | TokenKind::PipePipe => Some(BinOp::Or),
            _ => None,
        })
    }

    // and, &&
    fn parse_and(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::parse_equality, |kind| match kind {
            TokenKind::And | TokenKind::AmpAmp => Some(BinOp::And),
            _ => None,
        })
    }

    pub(crate) fn parse_primary(&mut self) -> ParseResult<Expr> {
        let start = self.peek_span();
        match self.peek_token() {
            TokenKind::Ident => self.parse_name_or_call(),
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Str
            | TokenKind::Char
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => {
                let literal = self.parse_literal()?;
                Ok(self.make_expr(ExprKind::Literal(literal), start))
            }
            TokenKind::LParen => {
                self.advance(); // consume `(`
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Consumes one literal token. Malformed literals are reported as lexical
    /// diagnostics and replaced by a placeholder so parsing continues undisturbed.
    pub(crate) fn parse_literal(&mut self) -> ParseResult<Literal> {
        let token = self.advance();
        let literal = match token.kind {
            TokenKind::Int => match token.lexeme.parse::<i64>() {
                Ok(n) => Literal::Int(n),
                Err(_) => {
                    self.report(ParseError::lexical(
                        format!("integer literal '{}' is out of range", token.lexeme),
                        token.span,
                    ));
                    Literal::Int(0)
                }
            },
            TokenKind::Float => match token.lexeme.parse::<f64>() {
                Ok(x) => Literal::Float(x),
                Err(_) => {
                    self.report(ParseError::lexical(
                        format!("malformed float literal '{}'", token.lexeme),
                        token.span,
                    ));
                    Literal::Float(0.0)
                }
            },
            TokenKind::Str => Literal::Str(self.decode_quoted(token)),
            TokenKind::Char => {
                let text = self.decode_quoted(token);
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Literal::Char(c),
                    _ => {
                        self.report(ParseError::lexical(
                            "character literal must hold exactly one character",
                            token.span,
                        ));
                        Literal::Char('\0')
                    }
                }
            }
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            TokenKind::Null => Literal::Null,
            _ => {
                return Err(ParseError::syntax(
                    format!("expected literal, found {}", token.kind),
                    token.span,
                ))
            }
        };
        Ok(literal)
    }

    /// Strips the surrounding quotes and decodes escapes.
    fn decode_quoted(&mut self, token: Token<'src>) -> String {
        let lexeme = token.lexeme;
        let body = if lexeme.len() >= 2 {
            &lexeme[1..lexeme.len() - 1]
        } else {
            ""
        };
        match unescape(body) {
            Ok(text) => text,
            Err(err) => {
                self.report(ParseError::lexical(err.to_string(), token.span));
                body.to_string()
            }
        }
    }
}
