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

pub mod lexer;
pub mod parser;

#[cfg(test)]
mod tests;

pub use lexer::{LexError, Token, TokenKind, TokenStream};
pub use parser::{ParseError, Parser};

use ast::types::Type;
use ast::{Diagnostic, Program};

/// Lex and parse a whole source file. Always returns a tree; lexical and
/// syntax problems are returned alongside it.
pub fn parse(source: &str) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(TokenStream::new(source));
    let program = parser.parse_program();
    let diagnostics = parser.into_diagnostics();
    log::debug!(
        "parsed {} declaration(s) with {} diagnostic(s)",
        program.decls.len(),
        diagnostics.len()
    );
    (program, diagnostics)
}

/// Parse a standalone type expression such as `fn(int, string) -> bool @1`.
/// The whole input must be consumed.
pub fn parse_type(source: &str) -> Result<Type, Vec<Diagnostic>> {
    let mut parser = Parser::new(TokenStream::new(source));
    let result = parser.parse_type_hint().and_then(|ty| parser.finish().map(|_| ty));
    let mut diagnostics = parser.into_diagnostics();
    match result {
        Ok(ty) if diagnostics.is_empty() => Ok(ty.node),
        Ok(_) => Err(diagnostics),
        Err(err) => {
            diagnostics.push(err.into());
            Err(diagnostics)
        }
    }
}

/// Every token of `source`, ending with `Eof`. Error tokens are included.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    TokenStream::new(source).collect()
}
