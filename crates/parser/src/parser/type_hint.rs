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
use ast::types::Type;

impl<'src, I: Iterator<Item = Token<'src>>> Parser<'src, I> {
    /// Parse a type annotation.
    /// Handles: `int`, `float`, `bool`, `string`, `char`, `void`, `()`,
    ///          `(A, B)`, `[T]`, `*T`, `fn(A, B) -> R @p`, `vecN<T>`, `matRxC<T>`,
    ///          `tensor<AxBxC, T>`, `quat<T>`, `complex<T>`, and named types.
    pub fn parse_type_hint(&mut self) -> ParseResult<Spanned<Type>> {
        let start = self.peek_span();
        let ty = match self.peek_token() {
            TokenKind::LParen => {
                self.advance(); // consume `(`
                if self.eat(TokenKind::RParen) {
                    Type::Unit
                } else {
                    let elems = self.parse_type_list()?;
                    self.expect(TokenKind::RParen)?;
                    Type::Tuple(elems)
                }
            }
            TokenKind::LBracket => {
                self.advance(); // consume `[`
                let elem = self.parse_type_hint()?.node;
                self.expect(TokenKind::RBracket)?;
                Type::array(elem)
            }
            TokenKind::Star => {
                self.advance(); // consume `*`
                Type::pointer(self.parse_type_hint()?.node)
            }
            TokenKind::Fn => self.parse_function_type()?,
            TokenKind::Ident => {
                let (name, name_span) = self.expect_name()?;
                self.parse_named_type(name, name_span)?
            }
            _ => return Err(self.unexpected("type")),
        };
        Ok(spanned(ty, self.span_from(start)))
    }

    fn parse_type_list(&mut self) -> ParseResult<Vec<Type>> {
        let mut types = vec![self.parse_type_hint()?.node];
        while self.eat(TokenKind::Comma) {
            types.push(self.parse_type_hint()?.node);
        }
        Ok(types)
    }

    /// `fn(A, B) -> R`, optionally followed by `@priority`.
    fn parse_function_type(&mut self) -> ParseResult<Type> {
        self.advance(); // consume `fn`
        self.expect(TokenKind::LParen)?;
        let params = if self.peek_token() == TokenKind::RParen {
            Vec::new()
        } else {
            self.parse_type_list()?
        };
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Arrow)?;
        let ret = self.parse_type_hint()?.node;
        let priority = if self.eat(TokenKind::At) {
            Some(self.parse_priority()?)
        } else {
            None
        };
        Ok(Type::function(params, ret, priority))
    }

    fn parse_named_type(&mut self, name: String, name_span: Span) -> ParseResult<Type> {
        let scalar = match name.as_str() {
            "int" => Some(Type::Int),
            "float" => Some(Type::Float),
            "bool" => Some(Type::Bool),
            "string" => Some(Type::String),
            "char" => Some(Type::Char),
            "void" => Some(Type::Void),
            _ => None,
        };
        if let Some(ty) = scalar {
            return Ok(ty);
        }

        // Shape-parameterised types only take that meaning when followed by `<`.
        if self.peek_token() != TokenKind::Lt {
            return Ok(Type::Named(name));
        }

        if let Some(dim) = name.strip_prefix("vec").and_then(parse_dimension) {
            let elem = self.parse_angle_element()?;
            return Ok(Type::vector(dim, elem));
        }
        if let Some((rows, cols)) = name
            .strip_prefix("mat")
            .and_then(|rest| rest.split_once('x'))
            .and_then(|(r, c)| Some((parse_dimension(r)?, parse_dimension(c)?)))
        {
            let elem = self.parse_angle_element()?;
            return Ok(Type::matrix(rows, cols, elem));
        }
        match name.as_str() {
            "quat" => Ok(Type::quaternion(self.parse_angle_element()?)),
            "complex" => Ok(Type::complex(self.parse_angle_element()?)),
            "tensor" => self.parse_tensor(),
            _ => Err(ParseError::syntax(
                format!("type '{}' does not take parameters", name),
                name_span,
            )),
        }
    }

    /// `<T>`
    fn parse_angle_element(&mut self) -> ParseResult<Type> {
        self.expect(TokenKind::Lt)?;
        let elem = self.parse_type_hint()?.node;
        self.expect(TokenKind::Gt)?;
        Ok(elem)
    }

    /// `<AxBxC, T>`. The dimension list lexes as an integer followed by
    /// identifiers such as `x3x4`, so it is reassembled from the raw lexemes.
    fn parse_tensor(&mut self) -> ParseResult<Type> {
        self.expect(TokenKind::Lt)?;
        let start = self.peek_span();
        let mut text = String::new();
        while matches!(self.peek_token(), TokenKind::Int | TokenKind::Ident) {
            text.push_str(self.advance().lexeme);
        }
        let dims = if text.is_empty() {
            Vec::new()
        } else {
            text.split('x')
                .map(parse_dimension)
                .collect::<Option<Vec<usize>>>()
                .ok_or_else(|| {
                    ParseError::syntax(
                        format!("malformed tensor dimensions '{}'", text),
                        self.span_from(start),
                    )
                })?
        };
        self.expect(TokenKind::Comma)?;
        let elem = self.parse_type_hint()?.node;
        self.expect(TokenKind::Gt)?;
        Ok(Type::tensor(dims, elem))
    }
}

fn parse_dimension(text: &str) -> Option<usize> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
