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

use crate::op::*;
use crate::types::Type;
use crate::{NodeId, Span};

/// An expression node. `id` is unique within one parse and keys the
/// type checker's annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(id: NodeId, kind: ExprKind, span: Span) -> Self {
        Self { id, kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `42`, `3.5`, `"hi"`, `'c'`, `true`, `null`
    Literal(Literal),

    /// A variable reference: `foo`
    Identifier(String),

    /// `a + b`, `a < b`, `a and b`
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `-x`, `!x`, `not x`
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// `f(a, b)`. Only named functions are callable.
    Call {
        callee: String,
        args: Vec<Expr>,
    },

    /// `x = value`
    Assign {
        target: String,
        value: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
    Bool(bool),
    Null,
}

impl Literal {
    /// The type a literal infers to without context.
    pub fn ty(&self) -> Type {
        match self {
            Literal::Int(_) => Type::Int,
            Literal::Float(_) => Type::Float,
            Literal::Str(_) => Type::String,
            Literal::Char(_) => Type::Char,
            Literal::Bool(_) => Type::Bool,
            Literal::Null => Type::Unit,
        }
    }
}
