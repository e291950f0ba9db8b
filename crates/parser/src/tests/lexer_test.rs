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

use crate::lexer::{unescape, LexError, TokenKind, TokenStream};
use crate::tokenize;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).into_iter().map(|t| t.kind).collect()
}

#[test]
fn test_keywords_and_identifiers() {
    assert_eq!(
        kinds("fn fnord let letter priority"),
        vec![
            TokenKind::Fn,
            TokenKind::Ident,
            TokenKind::Let,
            TokenKind::Ident,
            TokenKind::Priority,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_longest_operator_wins() {
    assert_eq!(
        kinds("<= < == = -> - => != ! .. . && ||"),
        vec![
            TokenKind::Le,
            TokenKind::Lt,
            TokenKind::EqEq,
            TokenKind::Assign,
            TokenKind::Arrow,
            TokenKind::Minus,
            TokenKind::FatArrow,
            TokenKind::NotEq,
            TokenKind::Bang,
            TokenKind::DotDot,
            TokenKind::Dot,
            TokenKind::AmpAmp,
            TokenKind::PipePipe,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_numeric_literals() {
    let tokens = tokenize("42 3.14 7.");
    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(tokens[0].lexeme, "42");
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].lexeme, "3.14");
    // A trailing dot is not part of the number.
    assert_eq!(tokens[2].kind, TokenKind::Int);
    assert_eq!(tokens[3].kind, TokenKind::Dot);
}

#[test]
fn test_string_and_char_literals() {
    let tokens = tokenize(r#""hi\n" 'a' '\t'"#);
    assert_eq!(tokens[0].kind, TokenKind::Str);
    assert_eq!(tokens[0].lexeme, r#""hi\n""#);
    assert_eq!(tokens[1].kind, TokenKind::Char);
    assert_eq!(tokens[1].lexeme, "'a'");
    assert_eq!(tokens[2].kind, TokenKind::Char);
    assert_eq!(tokens[3].kind, TokenKind::Eof);
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("let // the rest is ignored\nx"),
        vec![TokenKind::Let, TokenKind::Ident, TokenKind::Eof]
    );
}

#[test]
fn test_line_and_column_tracking() {
    let tokens = tokenize("let x = 1;\n  foo");
    let foo = tokens[5];
    assert_eq!(foo.lexeme, "foo");
    assert_eq!(foo.span.line, 2);
    assert_eq!(foo.span.column, 3);
    assert_eq!(tokens[0].span.line, 1);
    assert_eq!(tokens[0].span.column, 1);
}

#[test]
fn test_unterminated_string_stops_at_newline() {
    let tokens = tokenize("\"abc\nlet");
    assert_eq!(tokens[0].kind, TokenKind::Error);
    assert_eq!(tokens[0].error, Some(LexError::UnterminatedString));
    assert_eq!(tokens[1].kind, TokenKind::Let);
    assert_eq!(tokens[1].span.line, 2);
}

#[test]
fn test_unexpected_character() {
    let tokens = tokenize("a $ b");
    assert_eq!(tokens[1].kind, TokenKind::Error);
    assert_eq!(
        tokens[1].error_message().as_deref(),
        Some("unexpected character '$'")
    );
    assert_eq!(tokens[2].kind, TokenKind::Ident);
}

#[test]
fn test_peek_does_not_consume() {
    let mut stream = TokenStream::new("a + b");
    let peeked = stream.peek_token();
    assert_eq!(stream.peek_token(), peeked);
    let next = stream.next_token();
    assert_eq!(next, peeked);
    assert_eq!(stream.next_token().kind, TokenKind::Plus);
}

#[test]
fn test_eof_repeats() {
    let mut stream = TokenStream::new("x");
    assert!(!stream.is_at_end());
    stream.next_token();
    assert!(stream.is_at_end());
    assert_eq!(stream.next_token().kind, TokenKind::Eof);
    assert_eq!(stream.next_token().kind, TokenKind::Eof);
}

#[test]
fn test_iterator_ends_after_eof() {
    let tokens: Vec<_> = TokenStream::new("").collect();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn test_unescape() {
    assert_eq!(unescape(r"a\tb\\c\0").unwrap(), "a\tb\\c\0");
    assert_eq!(unescape(r#"say \"hi\""#).unwrap(), "say \"hi\"");
    assert_eq!(unescape(r"\q"), Err(LexError::InvalidEscape('q')));
}
