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

mod binop;
mod decl;
mod expr;
mod pattern;
mod postfix;
mod statement;
mod type_hint;

use ast::expr::{Expr, ExprKind};
use ast::stmt::Block;
use ast::{Diagnostic, DiagnosticKind, NodeId, Program, Span, Spanned};
use thiserror::Error;

use crate::lexer::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: DiagnosticKind::Syntax,
            message: message.into(),
            span,
        }
    }

    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: DiagnosticKind::Lexical,
            message: message.into(),
            span,
        }
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        Diagnostic::new(err.kind, err.message, err.span)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser with one token of lookahead.
///
/// Lexical error tokens never reach the grammar rules: they are reported as
/// `Lexical` diagnostics and skipped when pulled from the stream.
pub struct Parser<'src, I: Iterator<Item = Token<'src>>> {
    tokens: I,
    /// The lookahead token.
    current: Token<'src>,
    /// The last consumed token.
    previous: Token<'src>,
    diagnostics: Vec<Diagnostic>,
    next_id: NodeId,
    /// Tokens consumed so far; recovery uses it to guarantee progress.
    consumed: usize,
}

impl<'src, I: Iterator<Item = Token<'src>>> Parser<'src, I> {
    pub fn new(tokens: I) -> Self {
        let eof = Token {
            kind: TokenKind::Eof,
            lexeme: "",
            span: Span::new(0, 0, 1, 1),
            error: None,
        };
        let mut parser = Self {
            tokens,
            current: eof,
            previous: eof,
            diagnostics: Vec::new(),
            next_id: 0,
            consumed: 0,
        };
        parser.current = parser.pull();
        parser
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Next non-error token from the underlying stream.
    fn pull(&mut self) -> Token<'src> {
        loop {
            match self.tokens.next() {
                Some(token) if token.kind == TokenKind::Error => {
                    let message = token
                        .error_message()
                        .unwrap_or_else(|| format!("invalid token '{}'", token.lexeme));
                    self.diagnostics.push(Diagnostic::lexical(message, token.span));
                }
                Some(token) => return token,
                None => {
                    let end = self.previous.span.end.max(self.current.span.end);
                    return Token {
                        kind: TokenKind::Eof,
                        lexeme: "",
                        span: Span { start: end, end, ..self.current.span },
                        error: None,
                    };
                }
            }
        }
    }

    fn peek_token(&self) -> TokenKind {
        self.current.kind
    }

    fn peek_span(&self) -> Span {
        self.current.span
    }

    /// Consumes the lookahead token and returns it.
    fn advance(&mut self) -> Token<'src> {
        if self.current.kind == TokenKind::Eof {
            return self.current;
        }
        let next = self.pull();
        self.previous = std::mem::replace(&mut self.current, next);
        self.consumed += 1;
        self.previous
    }

    /// Consumes the next token if it matches `expected`, else returns an error.
    fn expect(&mut self, expected: TokenKind) -> ParseResult<Token<'src>> {
        if self.peek_token() == expected {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    /// Consume an identifier and return its text.
    fn expect_name(&mut self) -> ParseResult<(String, Span)> {
        if self.peek_token() == TokenKind::Ident {
            let token = self.advance();
            Ok((token.lexeme.to_string(), token.span))
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    /// Checks if the next token matches, consuming it if so.
    fn eat(&mut self, expected: TokenKind) -> bool {
        if self.peek_token() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected(&self, wanted: &str) -> ParseError {
        ParseError::syntax(
            format!("expected {}, found {}", wanted, self.describe_current()),
            self.peek_span(),
        )
    }

    fn describe_current(&self) -> String {
        match self.current.kind {
            TokenKind::Ident | TokenKind::Int | TokenKind::Float => {
                format!("'{}'", self.current.lexeme)
            }
            other => other.to_string(),
        }
    }

    /// Succeeds only when every token has been consumed.
    pub fn finish(&mut self) -> ParseResult<()> {
        if self.peek_token() == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    fn report(&mut self, err: ParseError) {
        self.diagnostics.push(err.into());
    }

    fn fresh_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn make_expr(&mut self, kind: ExprKind, span: Span) -> Expr {
        let id = self.fresh_id();
        Expr::new(id, kind, span)
    }

    /// Span from `start` through the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.to(self.previous.span)
    }

    // --- Error recovery ---

    /// Discards tokens until a statement-starting keyword, a `}` or a `;`.
    /// The `;` is consumed; keywords and `}` are left for the caller.
    fn synchronize(&mut self) {
        while self.peek_token() != TokenKind::Eof {
            match self.peek_token() {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RBrace => return,
                kind if is_statement_start(kind) => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Statement-level recovery. Always makes progress.
    fn recover(&mut self, consumed_before: usize) {
        self.synchronize();
        if self.consumed == consumed_before {
            self.advance();
            self.synchronize();
        }
    }

    /// Declaration-level recovery: skips to the next `fn`, `type` or `let`
    /// outside any braces.
    fn synchronize_declaration(&mut self, consumed_before: usize) {
        if self.consumed == consumed_before {
            self.advance();
        }
        let mut depth = 0usize;
        loop {
            match self.peek_token() {
                TokenKind::Eof => return,
                TokenKind::Fn | TokenKind::Type | TokenKind::Let if depth == 0 => return,
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }

    // --- Top-level ---

    /// Parse a complete program. Never fails: errors become diagnostics and the
    /// returned tree holds every declaration that parsed.
    pub fn parse_program(&mut self) -> Program {
        let mut decls = Vec::new();
        while self.peek_token() != TokenKind::Eof {
            let before = self.consumed;
            match self.parse_decl() {
                Ok(decl) => decls.push(decl),
                Err(err) => {
                    self.report(err);
                    self.synchronize_declaration(before);
                }
            }
        }
        Program { decls }
    }

    // --- Block ---

    /// `{ stmt* }`. A missing `}` is reported and the partial block is kept.
    pub(crate) fn parse_block(&mut self) -> ParseResult<Block> {
        let open = self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        loop {
            match self.peek_token() {
                TokenKind::RBrace => {
                    self.advance();
                    break;
                }
                TokenKind::Eof | TokenKind::Fn | TokenKind::Type => {
                    let err = self.unexpected("'}'");
                    self.report(err);
                    break;
                }
                _ => {}
            }
            let before = self.consumed;
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.report(err);
                    self.recover(before);
                }
            }
        }
        Ok(Block {
            stmts,
            span: self.span_from(open.span),
        })
    }
}

fn is_statement_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Fn
            | TokenKind::Let
            | TokenKind::If
            | TokenKind::While
            | TokenKind::For
            | TokenKind::Return
            | TokenKind::Match
            | TokenKind::Type
    )
}

fn spanned<T>(node: T, span: Span) -> Spanned<T> {
    Spanned::new(node, span)
}
