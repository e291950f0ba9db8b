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
use ast::stmt::{MatchArm, Stmt};
use ast::types::Type;

impl<'src, I: Iterator<Item = Token<'src>>> Parser<'src, I> {
    pub(crate) fn parse_stmt(&mut self) -> ParseResult<Spanned<Stmt>> {
        let start = self.peek_span();
        let stmt = match self.peek_token() {
            TokenKind::Let => {
                let (name, annotation, value) = self.parse_let_parts()?;
                Stmt::Let {
                    name,
                    annotation,
                    value,
                }
            }
            TokenKind::Return => self.parse_return()?,
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::Match => self.parse_match()?,
            TokenKind::LBrace => Stmt::Block(self.parse_block()?),
            _ => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon)?;
                Stmt::Expr(expr)
            }
        };
        Ok(spanned(stmt, self.span_from(start)))
    }

    /// `let name (: type)? = expr ;`, shared by locals and globals.
    pub(crate) fn parse_let_parts(
        &mut self,
    ) -> ParseResult<(String, Option<Spanned<Type>>, Expr)> {
        self.expect(TokenKind::Let)?;
        let (name, _) = self.expect_name()?;
        let annotation = if self.eat(TokenKind::Colon) {
            Some(self.parse_type_hint()?)
        } else {
            None
        };
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        Ok((name, annotation, value))
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume `return`
        let value = if self.peek_token() != TokenKind::Semicolon {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Return(value))
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume `if`
        let cond = self.parse_expr()?;
        let then_block = self.parse_block()?;
        let else_block = if self.eat(TokenKind::Else) {
            if self.peek_token() == TokenKind::If {
                // `else if` nests as the only statement of the else block.
                let start = self.peek_span();
                let nested = self.parse_if()?;
                let span = self.span_from(start);
                Some(Block {
                    stmts: vec![spanned(nested, span)],
                    span,
                })
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_block,
            else_block,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume `while`
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::While { cond, body })
    }

    /// `for name in start..end block`
    fn parse_for(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume `for`
        let (var, _) = self.expect_name()?;
        self.expect(TokenKind::In)?;
        let start = self.parse_expr()?;
        self.expect(TokenKind::DotDot)?;
        let end = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::For {
            var,
            start,
            end,
            body,
        })
    }

    /// `match expr { pattern => block-or-expr ,? ... }`
    fn parse_match(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume `match`
        let scrutinee = self.parse_expr()?;
        self.expect(TokenKind::LBrace)?;
        let mut arms = Vec::new();
        while self.peek_token() != TokenKind::RBrace && self.peek_token() != TokenKind::Eof {
            arms.push(self.parse_match_arm()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Stmt::Match { scrutinee, arms })
    }

    fn parse_match_arm(&mut self) -> ParseResult<MatchArm> {
        let pattern = self.parse_pattern()?;
        self.expect(TokenKind::FatArrow)?;
        let body = if self.peek_token() == TokenKind::LBrace {
            self.parse_block()?
        } else {
            let expr = self.parse_expr()?;
            let span = expr.span;
            Block {
                stmts: vec![spanned(Stmt::Expr(expr), span)],
                span,
            }
        };
        self.eat(TokenKind::Comma);
        Ok(MatchArm { pattern, body })
    }
}
