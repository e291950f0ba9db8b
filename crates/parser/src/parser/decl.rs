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
use ast::{Decl, Function, Global, Param, TypeDef};

impl<'src, I: Iterator<Item = Token<'src>>> Parser<'src, I> {
    pub(crate) fn parse_decl(&mut self) -> ParseResult<Spanned<Decl>> {
        let start = self.peek_span();
        let decl = match self.peek_token() {
            TokenKind::Fn => Decl::Function(self.parse_function()?),
            TokenKind::Type => Decl::TypeDef(self.parse_type_def()?),
            TokenKind::Let => Decl::Global(self.parse_global()?),
            _ => return Err(self.unexpected("'fn', 'type' or 'let' at top level")),
        };
        Ok(spanned(decl, self.span_from(start)))
    }

    /// `fn name(params) -> type (priority N)? block`
    fn parse_function(&mut self) -> ParseResult<Function> {
        self.expect(TokenKind::Fn)?;
        let (name, _) = self.expect_name()?;
        self.expect(TokenKind::LParen)?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Arrow)?;
        let return_type = self.parse_type_hint()?;
        let priority = if self.eat(TokenKind::Priority) {
            Some(self.parse_priority()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(Function {
            name,
            params,
            return_type,
            priority,
            body,
        })
    }

    /// `name: type (, name: type)*`, stopping before `)`. A trailing comma is
    /// reported but does not abandon the declaration.
    fn parse_params(&mut self) -> ParseResult<Vec<Param>> {
        let mut params = Vec::new();
        if self.peek_token() == TokenKind::RParen {
            return Ok(params);
        }
        loop {
            let (name, start) = self.expect_name()?;
            self.expect(TokenKind::Colon)?;
            let ty = self.parse_type_hint()?;
            params.push(Param {
                name,
                ty,
                span: self.span_from(start),
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
            if self.peek_token() == TokenKind::RParen {
                let comma = self.previous.span;
                self.report(ParseError::syntax("trailing comma in parameter list", comma));
                break;
            }
        }
        Ok(params)
    }

    pub(crate) fn parse_priority(&mut self) -> ParseResult<u32> {
        let token = self.expect(TokenKind::Int)?;
        token.lexeme.parse::<u32>().map_err(|_| {
            ParseError::syntax(
                format!("priority '{}' does not fit in 32 bits", token.lexeme),
                token.span,
            )
        })
    }

    /// `type Name = T;`
    fn parse_type_def(&mut self) -> ParseResult<TypeDef> {
        self.expect(TokenKind::Type)?;
        let (name, _) = self.expect_name()?;
        self.expect(TokenKind::Assign)?;
        let ty = self.parse_type_hint()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(TypeDef { name, ty })
    }

    /// Top-level `let name (: T)? = value;`
    fn parse_global(&mut self) -> ParseResult<Global> {
        let (name, annotation, value) = self.parse_let_parts()?;
        Ok(Global {
            name,
            annotation,
            value,
        })
    }
}
