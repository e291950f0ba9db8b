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

//! x86-64 System-V code generator.
//!
//! Lowers a type-checked program to GNU `as` assembly in Intel syntax. Every
//! value is one 8-byte word held in `rax`; floats travel as their IEEE bits and
//! are moved into `xmm` registers only for arithmetic, calls and returns.
//!
//! The generator trusts the [`Analysis`]: a missing expression type, call
//! target or variable means the checker and the generator disagree, and is
//! reported as [`CodegenError::Internal`].

pub(crate) mod call;
mod control_flow;
mod helpers;
mod literal;
mod op;

use ast::expr::{Expr, ExprKind};
use ast::stmt::{Block, Stmt};
use ast::types::Type;
use ast::{Diagnostic, Function, Global, Program, Span, Spanned};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::frame::FunctionFrame;
use crate::symbol;
use crate::type_checker::{Analysis, FunctionInfo, GlobalInfo};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodegenError {
    #[error("internal compiler error: {message}")]
    Internal { message: String, span: Span },
}

impl CodegenError {
    pub fn internal(message: impl Into<String>, span: Span) -> Self {
        CodegenError::Internal {
            message: message.into(),
            span,
        }
    }
}

impl From<CodegenError> for Diagnostic {
    fn from(err: CodegenError) -> Self {
        match err {
            CodegenError::Internal { message, span } => Diagnostic::internal(message, span),
        }
    }
}

pub type CodegenResult<T> = Result<T, CodegenError>;

/// The assembly generator. One instance compiles one program.
///
/// ## Output layout
///
/// - `.text` holds every function that checked cleanly, in source order.
/// - `.data` holds the string pool (`str_<i>`) followed by one zeroed word per global.
/// - Global initializers run at the top of `main`.
pub struct Compiler<'a> {
    analysis: &'a Analysis,
    /// Function label → declaration (for call lowering)
    targets: HashMap<&'a str, &'a FunctionInfo>,
    /// Globals with their checked types, in declaration order
    globals: Vec<(&'a Global, &'a GlobalInfo)>,
    global_names: HashSet<&'a str>,
    /// Finished function text
    text: String,
    /// String literal pool; the index is the `str_<i>` suffix.
    strings: Vec<String>,
    /// Per-compilation counter behind every `.L<n>` label
    next_label: usize,
    frame: FunctionFrame,
    /// Return type of the function being compiled
    current_ret: Type,
    /// Set while global initializers run: names resolve to globals only,
    /// never to the enclosing function's parameters.
    globals_only: bool,
}

impl<'a> Compiler<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        Self {
            analysis,
            targets: analysis
                .functions
                .iter()
                .map(|info| (info.label.as_str(), info))
                .collect(),
            globals: Vec::new(),
            global_names: HashSet::new(),
            text: String::new(),
            strings: Vec::new(),
            next_label: 0,
            frame: FunctionFrame::new(),
            current_ret: Type::Void,
            globals_only: false,
        }
    }

    /// Compile `program` using the results of type checking it.
    pub fn generate(program: &'a Program, analysis: &'a Analysis) -> CodegenResult<String> {
        let mut compiler = Compiler::new(analysis);
        compiler.compile_program(program)?;
        Ok(compiler.finish())
    }

    /// Main entry point: compile every emitted function.
    pub fn compile_program(&mut self, program: &'a Program) -> CodegenResult<()> {
        let analysis = self.analysis;
        let functions: Vec<&Function> = program.functions().collect();
        let program_globals: Vec<&Global> = program.globals().collect();
        if functions.len() != analysis.functions.len()
            || program_globals.len() != analysis.globals.len()
        {
            return Err(CodegenError::internal(
                "analysis was produced for a different program",
                Span::default(),
            ));
        }

        self.globals = program_globals.into_iter().zip(&analysis.globals).collect();
        self.global_names = program.globals().map(|g| g.name.as_str()).collect();

        for (func, info) in functions.into_iter().zip(&analysis.functions) {
            if !info.emit {
                log::trace!("not emitting '{}'", info.label);
                continue;
            }
            self.compile_function(func, info)?;
        }
        if !self.globals.is_empty() && !analysis.emitted().any(|label| label == symbol::ENTRY) {
            log::warn!("no 'main' function: globals keep their zero value");
        }
        log::debug!(
            "generated {} function(s), {} string(s), {} global(s)",
            analysis.emitted().count(),
            self.strings.len(),
            self.globals.len()
        );
        Ok(())
    }

    /// Assemble the final text: header, functions, then the data section.
    pub fn finish(self) -> String {
        let mut out = String::from(".intel_syntax noprefix\n.section .text\n");
        out.push_str(&self.text);
        out.push_str(".section .data\n");
        out.push_str(&self.data_section());
        out
    }

    fn compile_function(&mut self, func: &Function, info: &FunctionInfo) -> CodegenResult<()> {
        self.frame = FunctionFrame::new();
        self.current_ret = info.ret.clone();

        self.bind_params(func, info)?;
        if info.label == symbol::ENTRY {
            self.initialize_globals()?;
        }
        for stmt in &func.body.stmts {
            self.compile_stmt(stmt)?;
        }
        // Falling off the end returns zero.
        self.frame.emit("xor eax, eax");
        self.frame.emit_epilogue();

        let frame = std::mem::take(&mut self.frame);
        log::trace!("'{}' uses a {}-byte frame", info.label, frame.frame_size());
        self.text.push_str(&frame.build(&info.label));
        Ok(())
    }

    fn initialize_globals(&mut self) -> CodegenResult<()> {
        self.globals_only = true;
        let result = self.compile_global_initializers();
        self.globals_only = false;
        result
    }

    fn compile_global_initializers(&mut self) -> CodegenResult<()> {
        let globals = self.globals.clone();
        for (global, info) in globals {
            let Some(ty) = info.ty.as_ref().filter(|_| info.initialize) else {
                continue;
            };
            self.compile_expr(&global.value)?;
            let value_ty = self.type_of(&global.value)?;
            self.emit_conversion(&value_ty, ty);
            self.frame
                .emit(format!("mov QWORD PTR [rip + {}], rax", symbol::global(&global.name)));
        }
        Ok(())
    }

    // ─── Statements ──────────────────────────────────────────────────────

    fn compile_block(&mut self, block: &Block) -> CodegenResult<()> {
        self.frame.push_scope();
        for stmt in &block.stmts {
            self.compile_stmt(stmt)?;
        }
        self.frame.pop_scope();
        Ok(())
    }

    fn compile_stmt(&mut self, stmt: &Spanned<Stmt>) -> CodegenResult<()> {
        match &stmt.node {
            Stmt::Let {
                name,
                annotation,
                value,
            } => {
                self.compile_expr(value)?;
                let value_ty = self.type_of(value)?;
                let ty = match annotation {
                    Some(annotation) => annotation.node.clone(),
                    None => value_ty.clone(),
                };
                self.emit_conversion(&value_ty, &ty);
                // Declared after the initializer so it may read a shadowed binding.
                let slot = self.frame.declare_local(name, ty);
                self.frame.emit(format!("mov {}, rax", slot.operand()));
            }

            Stmt::Return(value) => {
                if let Some(value) = value {
                    self.compile_expr(value)?;
                    let value_ty = self.type_of(value)?;
                    let ret = self.current_ret.clone();
                    self.emit_conversion(&value_ty, &ret);
                    if ret.is_float() {
                        self.frame.emit("movq xmm0, rax");
                    }
                }
                self.frame.emit_epilogue();
            }

            Stmt::If {
                cond,
                then_block,
                else_block,
            } => self.compile_if(cond, then_block, else_block.as_ref())?,

            Stmt::While { cond, body } => self.compile_while(cond, body)?,

            Stmt::For {
                var,
                start,
                end,
                body,
            } => self.compile_for(var, start, end, body)?,

            Stmt::Match { scrutinee, arms } => self.compile_match(scrutinee, arms)?,

            Stmt::Expr(expr) => self.compile_expr(expr)?,

            Stmt::Block(block) => self.compile_block(block)?,
        }
        Ok(())
    }

    // ─── Expressions ─────────────────────────────────────────────────────

    /// Compile an expression, leaving its value in `rax`.
    fn compile_expr(&mut self, expr: &Expr) -> CodegenResult<()> {
        match &expr.kind {
            ExprKind::Literal(literal) => {
                self.compile_literal(literal);
                Ok(())
            }

            ExprKind::Identifier(name) => {
                let operand = self.variable_operand(name, expr.span)?;
                self.frame.emit(format!("mov rax, {}", operand));
                Ok(())
            }

            ExprKind::Binary { op, left, right } => self.compile_binary(*op, left, right),

            ExprKind::Unary { op, operand } => self.compile_unary(*op, operand),

            ExprKind::Call { callee, args } => self.compile_call(expr, callee, args),

            ExprKind::Assign { target, value } => {
                self.compile_expr(value)?;
                let value_ty = self.type_of(value)?;
                let target_ty = self.type_of(expr)?;
                self.emit_conversion(&value_ty, &target_ty);
                let operand = self.variable_operand(target, expr.span)?;
                self.frame.emit(format!("mov {}, rax", operand));
                Ok(())
            }
        }
    }
}
