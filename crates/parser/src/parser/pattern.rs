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
use ast::expr::Literal;
use ast::pattern::Pattern;

impl<'src, I: Iterator<Item = Token<'src>>> Parser<'src, I> {
    /// `_`, `name`, a literal (optionally negated), `(p, ...)` or `Name { field: p, ... }`.
    pub(crate) fn parse_pattern(&mut self) -> ParseResult<Spanned<Pattern>> {
        let start = self.peek_span();
        let pattern = match self.peek_token() {
            TokenKind::Ident => {
                let (name, _) = self.expect_name()?;
                if name == "_" {
                    Pattern::Wildcard
                } else if self.peek_token() == TokenKind::LBrace {
                    self.parse_struct_pattern(name)?
                } else {
                    Pattern::Identifier(name)
                }
            }
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Str
            | TokenKind::Char
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => Pattern::Literal(self.parse_literal()?),
            TokenKind::Minus => {
                self.advance(); // consume `-`
                match self.peek_token() {
                    TokenKind::Int | TokenKind::Float => {}
                    _ => return Err(self.unexpected("numeric literal after '-' in pattern")),
                }
                if self.peek_token() == TokenKind::Int {
                    // Parsed with its sign so `i64::MIN` stays in range.
                    let token = self.advance();
                    let text = format!("-{}", token.lexeme);
                    let value = text.parse::<i64>().unwrap_or_else(|_| {
                        self.report(ParseError::lexical(
                            format!("integer literal '{}' is out of range", text),
                            token.span,
                        ));
                        0
                    });
                    Pattern::Literal(Literal::Int(value))
                } else {
                    match self.parse_literal()? {
                        Literal::Float(x) => Pattern::Literal(Literal::Float(-x)),
                        other => Pattern::Literal(other),
                    }
                }
            }
            TokenKind::LParen => {
                self.advance(); // consume `(`
                let mut elems = Vec::new();
                if self.peek_token() != TokenKind::RParen {
                    loop {
                        elems.push(self.parse_pattern()?.node);
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RParen)?;
                Pattern::Tuple(elems)
            }
            _ => return Err(self.unexpected("pattern")),
        };
        Ok(spanned(pattern, self.span_from(start)))
    }

    /// `{ field (: pattern)?, ... }` after the struct name. A bare field binds its own name.
    fn parse_struct_pattern(&mut self, name: String) -> ParseResult<Pattern> {
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while self.peek_token() != TokenKind::RBrace {
            let (field, _) = self.expect_name()?;
            let pattern = if self.eat(TokenKind::Colon) {
                self.parse_pattern()?.node
            } else {
                Pattern::Identifier(field.clone())
            };
            fields.push((field, pattern));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Pattern::Struct { name, fields })
    }
}
