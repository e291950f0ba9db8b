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

impl<'src, I: Iterator<Item = Token<'src>>> Parser<'src, I> {
    /// An identifier, or a call when the identifier is immediately followed by `(`.
    pub(crate) fn parse_name_or_call(&mut self) -> ParseResult<Expr> {
        let (name, start) = self.expect_name()?;
        if self.peek_token() != TokenKind::LParen {
            return Ok(self.make_expr(ExprKind::Identifier(name), start));
        }
        self.advance(); // consume `(`
        let args = self.parse_call_args()?;
        self.expect(TokenKind::RParen)?;
        let span = self.span_from(start);
        Ok(self.make_expr(ExprKind::Call { callee: name, args }, span))
    }

    /// Comma-separated, possibly empty; stops before `)`.
    fn parse_call_args(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.peek_token() == TokenKind::RParen {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
            if self.peek_token() == TokenKind::RParen {
                let comma = self.previous.span;
                self.report(ParseError::syntax("trailing comma in argument list", comma));
                break;
            }
        }
        Ok(args)
    }
}
