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

use ast::Span;
use logos::{Lexer, Logos};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
pub enum LexError {
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("malformed character literal")]
    MalformedChar,
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
}

/// Line bookkeeping carried through the logos lexer.
#[derive(Debug, Clone, Copy)]
pub struct LinePosition {
    pub line: u32,
    /// Byte offset where the current line begins.
    pub line_start: usize,
}

impl Default for LinePosition {
    fn default() -> Self {
        Self { line: 1, line_start: 0 }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(error = LexError)]
#[logos(extras = LinePosition)]
#[logos(skip r"[ \t\r\f]+")]
pub enum TokenKind {
    // Newlines and comments only move the line counter; they never reach the parser.
    #[regex(r"\n", newline)]
    #[regex(r"//[^\n]*", logos::skip)]
    Newline,

    // Keywords
    #[token("fn")] Fn,
    #[token("let")] Let,
    #[token("if")] If,
    #[token("else")] Else,
    #[token("while")] While,
    #[token("for")] For,
    #[token("in")] In,
    #[token("return")] Return,
    #[token("match")] Match,
    #[token("type")] Type,
    #[token("priority")] Priority,
    #[token("and")] And,
    #[token("or")] Or,
    #[token("not")] Not,
    #[token("true")] True,
    #[token("false")] False,
    #[token("null")] Null,

    // Multi-char operators
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("->")] Arrow,
    #[token("=>")] FatArrow,
    #[token("&&")] AmpAmp,
    #[token("||")] PipePipe,
    #[token("..")] DotDot,

    // Single-char operators
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,
    #[token("=")] Assign,
    #[token("@")] At,

    // Delimiters
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token("[")] LBracket,
    #[token("]")] RBracket,
    #[token(",")] Comma,
    #[token(";")] Semicolon,
    #[token(":")] Colon,
    #[token(".")] Dot,

    // Literals and identifiers
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]+")]
    Float,

    #[token("\"", lex_string)]
    Str,

    #[token("'", lex_char)]
    Char,

    /// A span the lexer could not turn into a token. The token carries the reason.
    Error,

    Eof,
}

fn newline(lex: &mut Lexer<'_, TokenKind>) -> logos::Skip {
    lex.extras.line += 1;
    lex.extras.line_start = lex.span().end;
    logos::Skip
}

/// Scans the rest of a string literal after its opening quote.
/// A raw newline or end of input before the closing quote is an error.
fn lex_string(lex: &mut Lexer<'_, TokenKind>) -> Result<(), LexError> {
    let rest = lex.remainder();
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        match c {
            '\n' => {
                lex.bump(i);
                return Err(LexError::UnterminatedString);
            }
            '\\' if !escaped => {
                escaped = true;
                continue;
            }
            '"' if !escaped => {
                lex.bump(i + 1);
                return Ok(());
            }
            _ => {}
        }
        escaped = false;
    }
    lex.bump(rest.len());
    Err(LexError::UnterminatedString)
}

fn lex_char(lex: &mut Lexer<'_, TokenKind>) -> Result<(), LexError> {
    let rest = lex.remainder();
    let mut chars = rest.char_indices();
    let body_end = match chars.next() {
        Some((_, '\\')) => chars.next().map(|(i, c)| i + c.len_utf8()),
        Some((_, '\'')) | Some((_, '\n')) | None => None,
        Some((i, c)) => Some(i + c.len_utf8()),
    };
    match body_end {
        Some(end) if rest[end..].starts_with('\'') => {
            lex.bump(end + 1);
            Ok(())
        }
        _ => {
            let consumed = body_end.unwrap_or(0);
            let skip = if rest[consumed..].starts_with('\'') { 1 } else { 0 };
            lex.bump(consumed + skip);
            Err(LexError::MalformedChar)
        }
    }
}

/// Decodes the escapes inside a string or char literal body (quotes stripped).
pub fn unescape(body: &str) -> Result<String, LexError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => return Err(LexError::InvalidEscape(other)),
            None => return Err(LexError::InvalidEscape('\\')),
        }
    }
    Ok(out)
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Newline => "newline",
            TokenKind::Fn => "'fn'",
            TokenKind::Let => "'let'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::While => "'while'",
            TokenKind::For => "'for'",
            TokenKind::In => "'in'",
            TokenKind::Return => "'return'",
            TokenKind::Match => "'match'",
            TokenKind::Type => "'type'",
            TokenKind::Priority => "'priority'",
            TokenKind::And => "'and'",
            TokenKind::Or => "'or'",
            TokenKind::Not => "'not'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Null => "'null'",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Le => "'<='",
            TokenKind::Ge => "'>='",
            TokenKind::Arrow => "'->'",
            TokenKind::FatArrow => "'=>'",
            TokenKind::AmpAmp => "'&&'",
            TokenKind::PipePipe => "'||'",
            TokenKind::DotDot => "'..'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Bang => "'!'",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Assign => "'='",
            TokenKind::At => "'@'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::Dot => "'.'",
            TokenKind::Ident => "identifier",
            TokenKind::Int => "integer literal",
            TokenKind::Float => "float literal",
            TokenKind::Str => "string literal",
            TokenKind::Char => "character literal",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of input",
        };
        f.write_str(text)
    }
}

/// A scanned token. Error tokens carry the reason in `error`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub span: Span,
    pub error: Option<LexError>,
}

impl Token<'_> {
    /// Human-readable message for an error token.
    pub fn error_message(&self) -> Option<String> {
        self.error.map(|err| match err {
            LexError::UnexpectedCharacter => format!("unexpected character '{}'", self.lexeme),
            other => other.to_string(),
        })
    }
}

/// Lazy token stream over one source text.
///
/// `peek_token` scans from a copy of the lexer state, so it never changes what
/// the following `next_token` returns. Once the input is exhausted every call
/// yields `Eof`.
#[derive(Clone)]
pub struct TokenStream<'src> {
    source: &'src str,
    lexer: Lexer<'src, TokenKind>,
    /// Set once the iterator has handed out `Eof`.
    finished: bool,
}

impl<'src> TokenStream<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            lexer: TokenKind::lexer(source),
            finished: false,
        }
    }

    /// Advances past the next token and returns it.
    pub fn next_token(&mut self) -> Token<'src> {
        match self.lexer.next() {
            Some(Ok(kind)) => self.make_token(kind, None),
            Some(Err(err)) => self.make_token(TokenKind::Error, Some(err)),
            None => {
                let end = self.source.len();
                let position = self.lexer.extras;
                Token {
                    kind: TokenKind::Eof,
                    lexeme: "",
                    span: Span::new(end, end, position.line, column_of(self.source, position, end)),
                    error: None,
                }
            }
        }
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&self) -> Token<'src> {
        self.clone().next_token()
    }

    pub fn is_at_end(&self) -> bool {
        self.peek_token().kind == TokenKind::Eof
    }

    fn make_token(&self, kind: TokenKind, error: Option<LexError>) -> Token<'src> {
        let range = self.lexer.span();
        let position = self.lexer.extras;
        Token {
            kind,
            lexeme: self.lexer.slice(),
            span: Span::new(
                range.start,
                range.end,
                position.line,
                column_of(self.source, position, range.start),
            ),
            error,
        }
    }
}

fn column_of(source: &str, position: LinePosition, offset: usize) -> u32 {
    let start = position.line_start.min(offset);
    source[start..offset].chars().count() as u32 + 1
}

/// Yields every token up to and including `Eof`, then stops.
impl<'src> Iterator for TokenStream<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.kind == TokenKind::Eof;
        Some(token)
    }
}
