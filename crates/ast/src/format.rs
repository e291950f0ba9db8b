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

//! Canonical source printer. Binary expressions come out fully parenthesised,
//! so printing a reparsed program yields the same text.

use std::fmt::{self, Write};

use crate::expr::{Expr, ExprKind, Literal};
use crate::pattern::Pattern;
use crate::stmt::{Block, Stmt};
use crate::{Decl, Function, Program};

const INDENT: &str = "    ";

pub struct SourceFormatter {
    indent_level: usize,
    output: String,
}

impl SourceFormatter {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            output: String::new(),
        }
    }

    pub fn format(mut self, program: &Program) -> String {
        for (i, decl) in program.decls.iter().enumerate() {
            if i > 0 {
                self.output.push('\n');
            }
            self.decl(&decl.node);
        }
        self.output
    }

    fn line(&mut self, text: fmt::Arguments<'_>) {
        for _ in 0..self.indent_level {
            self.output.push_str(INDENT);
        }
        // Writing into a String cannot fail.
        let _ = self.output.write_fmt(text);
        self.output.push('\n');
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Function(func) => self.function(func),
            Decl::TypeDef(def) => self.line(format_args!("type {} = {};", def.name, def.ty.node)),
            Decl::Global(global) => match &global.annotation {
                Some(ty) => self.line(format_args!("let {}: {} = {};", global.name, ty.node, global.value)),
                None => self.line(format_args!("let {} = {};", global.name, global.value)),
            },
        }
    }

    fn function(&mut self, func: &Function) {
        let params: Vec<String> = func
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty.node))
            .collect();
        let priority = func
            .priority
            .map(|p| format!(" priority {}", p))
            .unwrap_or_default();
        self.line(format_args!(
            "fn {}({}) -> {}{} {{",
            func.name,
            params.join(", "),
            func.return_type.node,
            priority
        ));
        self.block_body(&func.body);
        self.line(format_args!("}}"));
    }

    fn block_body(&mut self, block: &Block) {
        self.indent_level += 1;
        for stmt in &block.stmts {
            self.stmt(&stmt.node);
        }
        self.indent_level -= 1;
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Let { name, annotation: Some(ty), value } => {
                self.line(format_args!("let {}: {} = {};", name, ty.node, value))
            }
            Stmt::Let { name, annotation: None, value } => {
                self.line(format_args!("let {} = {};", name, value))
            }
            Stmt::Return(Some(value)) => self.line(format_args!("return {};", value)),
            Stmt::Return(None) => self.line(format_args!("return;")),
            Stmt::If { cond, then_block, else_block } => {
                self.line(format_args!("if {} {{", cond));
                self.block_body(then_block);
                if let Some(else_block) = else_block {
                    self.line(format_args!("}} else {{"));
                    self.block_body(else_block);
                }
                self.line(format_args!("}}"));
            }
            Stmt::While { cond, body } => {
                self.line(format_args!("while {} {{", cond));
                self.block_body(body);
                self.line(format_args!("}}"));
            }
            Stmt::For { var, start, end, body } => {
                self.line(format_args!("for {} in {}..{} {{", var, start, end));
                self.block_body(body);
                self.line(format_args!("}}"));
            }
            Stmt::Match { scrutinee, arms } => {
                self.line(format_args!("match {} {{", scrutinee));
                self.indent_level += 1;
                for arm in arms {
                    self.line(format_args!("{} => {{", arm.pattern.node));
                    self.block_body(&arm.body);
                    self.line(format_args!("}}"));
                }
                self.indent_level -= 1;
                self.line(format_args!("}}"));
            }
            Stmt::Expr(expr) => self.line(format_args!("{};", expr)),
            Stmt::Block(block) => {
                self.line(format_args!("{{"));
                self.block_body(block);
                self.line(format_args!("}}"));
            }
        }
    }
}

impl Default for SourceFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&SourceFormatter::new().format(self))
    }
}

fn escape_char(c: char, quote: char, out: &mut String) {
    match c {
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        '\0' => out.push_str("\\0"),
        '\\' => out.push_str("\\\\"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c => out.push(c),
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(x) => {
                let text = x.to_string();
                if text.contains('.') {
                    f.write_str(&text)
                } else {
                    write!(f, "{}.0", text)
                }
            }
            Literal::Str(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                out.push('"');
                s.chars().for_each(|c| escape_char(c, '"', &mut out));
                out.push('"');
                f.write_str(&out)
            }
            Literal::Char(c) => {
                let mut out = String::from("'");
                escape_char(*c, '\'', &mut out);
                out.push('\'');
                f.write_str(&out)
            }
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Null => f.write_str("null"),
        }
    }
}

/// Operands that would otherwise re-associate when printed are parenthesised.
fn fmt_operand(expr: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &expr.kind {
        ExprKind::Assign { .. } => write!(f, "({})", expr),
        ExprKind::Literal(Literal::Int(n)) if *n < 0 => write!(f, "({})", expr),
        ExprKind::Literal(Literal::Float(x)) if x.is_sign_negative() => write!(f, "({})", expr),
        _ => write!(f, "{}", expr),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(lit) => write!(f, "{}", lit),
            ExprKind::Identifier(name) => f.write_str(name),
            ExprKind::Binary { op, left, right } => {
                f.write_str("(")?;
                fmt_operand(left, f)?;
                write!(f, " {} ", op)?;
                fmt_operand(right, f)?;
                f.write_str(")")
            }
            ExprKind::Unary { op, operand } => {
                write!(f, "{}", op)?;
                fmt_operand(operand, f)
            }
            ExprKind::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            ExprKind::Assign { target, value } => write!(f, "{} = {}", target, value),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Wildcard => f.write_str("_"),
            Pattern::Identifier(name) => f.write_str(name),
            Pattern::Literal(lit) => write!(f, "{}", lit),
            Pattern::Tuple(elems) => {
                f.write_str("(")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", elem)?;
                }
                f.write_str(")")
            }
            Pattern::Struct { name, fields } => {
                write!(f, "{} {{ ", name)?;
                for (i, (field, pattern)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", field, pattern)?;
                }
                f.write_str(" }")
            }
        }
    }
}
