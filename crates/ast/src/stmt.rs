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

use crate::expr::Expr;
use crate::pattern::Pattern;
use crate::types::Type;
use crate::{Span, Spanned};

/// `{ stmt* }`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let x: T = value;` (annotation optional)
    Let {
        name: String,
        annotation: Option<Spanned<Type>>,
        value: Expr,
    },

    /// `return value?;`
    Return(Option<Expr>),

    /// `if cond { ... } else { ... }`. An `else if` chain nests inside `else_block`.
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },

    /// `while cond { ... }`
    While {
        cond: Expr,
        body: Block,
    },

    /// `for var in start..end { ... }`, half-open integer range.
    For {
        var: String,
        start: Expr,
        end: Expr,
        body: Block,
    },

    /// `match scrutinee { pattern => body, ... }`. The first matching arm wins.
    Match {
        scrutinee: Expr,
        arms: Vec<MatchArm>,
    },

    /// An expression evaluated for its effect: `f(x);`
    Expr(Expr),

    /// A nested `{ ... }` scope.
    Block(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub pattern: Spanned<Pattern>,
    pub body: Block,
}
