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

use std::fmt;
use thiserror::Error;

use crate::Span;

/// Which stage produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Unterminated string, unrecognized character, malformed literal.
    Lexical,
    /// Unexpected or missing token.
    Syntax,
    /// Incompatible types, unknown names, arity mismatches, ambiguous priority ties.
    Type,
    /// A contract violation between stages. Always fatal.
    Internal,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::Lexical => "Lexical",
            DiagnosticKind::Syntax => "Syntax",
            DiagnosticKind::Type => "Type",
            DiagnosticKind::Internal => "Internal",
        };
        f.write_str(name)
    }
}

/// A structured message returned by every stage. Presentation is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {kind}: {message}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Lexical, message, span)
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Syntax, message, span)
    }

    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Type, message, span)
    }

    pub fn internal(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Internal, message, span)
    }

    pub fn is_fatal(&self) -> bool {
        self.kind == DiagnosticKind::Internal
    }
}
