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
use ast::op::{BinOp, UnaryOp};

impl<'src, I: Iterator<Item = Token<'src>>> Parser<'src, I> {
    /// One left-associative precedence level: `operand (op operand)*`.
    pub(crate) fn binary_level(
        &mut self,
        operand: fn(&mut Self) -> ParseResult<Expr>,
        op_for: fn(TokenKind) -> Option<BinOp>,
    ) -> ParseResult<Expr> {
        let mut left = operand(self)?;
        while let Some(op) = op_for(self.peek_token()) {
            self.advance();
            let right = operand(self)?;
            let span = left.span.to(right.span);
            left = self.make_expr(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    // == !=
    pub(crate) fn parse_equality(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::parse_comparison, |kind| match kind {
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::NotEq => Some(BinOp::NotEq),
            _ => None,
        })
    }

    // < <= > >=
    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::parse_arith, |kind| match kind {
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::Le => Some(BinOp::LtE),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::Ge => Some(BinOp::GtE),
            _ => None,
        })
    }

    // + -
    fn parse_arith(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::parse_term, |kind| match kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            _ => None,
        })
    }

    // * / %
    fn parse_term(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::parse_factor, |kind| match kind {
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            TokenKind::Percent => Some(BinOp::Mod),
            _ => None,
        })
    }

    // Unary: -x, !x, not x
    pub(crate) fn parse_factor(&mut self) -> ParseResult<Expr> {
        let start = self.peek_span();
        let op = match self.peek_token() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang | TokenKind::Not => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_factor()?; // right-associative
            let span = start.to(operand.span);
            return Ok(self.make_expr(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_primary()
    }
}
