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

pub mod diagnostic;
pub mod expr;
pub mod format;
pub mod op;
pub mod pattern;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;

pub use diagnostic::{Diagnostic, DiagnosticKind};

use expr::Expr;
use stmt::Block;
use types::Type;

/// Identifies an expression node within one parse. Type annotations are keyed by it.
pub type NodeId = u32;

/// Byte range plus the 1-based line/column of its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self { start, end, line, column }
    }

    /// Extends this span through `end`, keeping the starting position.
    pub fn to(self, end: Span) -> Span {
        Span {
            end: end.end.max(self.end),
            ..self
        }
    }
}

/// Every AST node carries a source span for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A whole source file: an ordered list of top-level declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub decls: Vec<Spanned<Decl>>,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.decls.iter().filter_map(|decl| match &decl.node {
            Decl::Function(func) => Some(func),
            _ => None,
        })
    }

    pub fn globals(&self) -> impl Iterator<Item = &Global> {
        self.decls.iter().filter_map(|decl| match &decl.node {
            Decl::Global(global) => Some(global),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Function(Function),
    TypeDef(TypeDef),
    Global(Global),
}

/// `fn name(params) -> ret priority N { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Spanned<Type>,
    /// Tie-breaker between same-named declarations at a call site.
    pub priority: Option<u32>,
    pub body: Block,
}

impl Function {
    /// The function's type as seen by callers.
    pub fn signature(&self) -> Type {
        Type::function(
            self.params.iter().map(|p| p.ty.node.clone()).collect(),
            self.return_type.node.clone(),
            self.priority,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Spanned<Type>,
    pub span: Span,
}

/// `type Name = T;`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: String,
    pub ty: Spanned<Type>,
}

/// A top-level `let`. Storage is a zero-initialized data word; the
/// initializer runs on entry to `main`.
#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub name: String,
    pub annotation: Option<Spanned<Type>>,
    pub value: Expr,
}
