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

//! Static type checker.
//!
//! Walks the program in two passes. The first registers type definitions,
//! global annotations and every function signature so that bodies may refer to
//! declarations in any order. The second infers and checks each global
//! initializer and function body.
//!
//! Problems are collected as `Type` diagnostics. Each problem is reported once,
//! by the node that detects it: a sub-expression that failed to type yields
//! `None` and its parents stay silent. A function whose body produced any
//! diagnostic is excluded from code generation.

mod infer;

use ast::expr::Expr;
use ast::pattern::Pattern;
use ast::stmt::{Block, Stmt};
use ast::types::Type;
use ast::{Decl, Diagnostic, Function, NodeId, Program, Span, Spanned};
use std::collections::{HashMap, HashSet};

use crate::symbol;

// ─── Analysis results ────────────────────────────────────────────────────────

/// A function declaration as seen by callers and the code generator.
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub name: String,
    /// Assembly symbol. Overloaded names get one label per declaration.
    pub label: String,
    pub params: Vec<Type>,
    pub ret: Type,
    pub priority: Option<u32>,
    /// False when the signature or the body failed to check.
    pub emit: bool,
}

impl FunctionInfo {
    /// Priority used for overload selection. A missing priority counts as 0.
    pub fn rank(&self) -> u32 {
        self.priority.unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct GlobalInfo {
    pub name: String,
    pub ty: Option<Type>,
    /// Whether the initializer checked cleanly and should run on entry to `main`.
    pub initialize: bool,
}

/// Everything the code generator needs to know about a checked program.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Inferred type of every expression node; `None` where inference failed.
    pub expr_types: HashMap<NodeId, Option<Type>>,
    /// Label of the declaration each call expression resolved to.
    pub call_targets: HashMap<NodeId, String>,
    /// One entry per function declaration, in source order.
    pub functions: Vec<FunctionInfo>,
    /// One entry per global, in source order.
    pub globals: Vec<GlobalInfo>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    pub fn type_of(&self, id: NodeId) -> Option<&Type> {
        self.expr_types.get(&id).and_then(Option::as_ref)
    }

    /// Labels of the functions that will be emitted.
    pub fn emitted(&self) -> impl Iterator<Item = &str> {
        self.functions
            .iter()
            .filter(|f| f.emit)
            .map(|f| f.label.as_str())
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ─── Type environment (scoped symbol table) ──────────────────────────────────

/// Variable scopes, innermost first. A binding holding `None` belongs to a
/// declaration whose type could not be determined; uses of it fail silently.
#[derive(Debug, Clone, Default)]
pub struct TypeEnv {
    variables: HashMap<String, Option<Type>>,
    parent: Option<Box<TypeEnv>>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new innermost scope on top of `self`.
    pub fn child(self) -> Self {
        Self {
            variables: HashMap::new(),
            parent: Some(Box::new(self)),
        }
    }

    /// Drops the innermost scope.
    pub fn into_parent(self) -> Option<TypeEnv> {
        self.parent.map(|parent| *parent)
    }

    pub fn declare_var(&mut self, name: String, ty: Option<Type>) {
        self.variables.insert(name, ty);
    }

    /// Whether `name` is bound in the innermost scope itself.
    pub fn declares(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn lookup_var(&self, name: &str) -> Option<&Option<Type>> {
        match self.variables.get(name) {
            Some(ty) => Some(ty),
            None => self.parent.as_ref().and_then(|p| p.lookup_var(name)),
        }
    }
}

// ─── Type checker ────────────────────────────────────────────────────────────

pub struct TypeChecker {
    env: TypeEnv,
    type_defs: HashMap<String, Type>,
    /// Function name → indices into `analysis.functions`.
    overloads: HashMap<String, Vec<usize>>,
    analysis: Analysis,
    /// Declared return type and name of the function being checked.
    current_function: Option<(String, Type)>,
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        Self {
            env: TypeEnv::new(),
            type_defs: HashMap::new(),
            overloads: HashMap::new(),
            analysis: Analysis::default(),
            current_function: None,
        }
    }

    /// Main entry point: check a whole program.
    pub fn check_program(mut self, program: &Program) -> Analysis {
        // First pass: names that may be referenced before their declaration
        self.register_type_defs(program);
        self.register_globals(program);
        self.register_functions(program);

        // Second pass: initializers and bodies
        for global in program.globals() {
            self.check_global(global);
        }
        for (index, func) in program.functions().enumerate() {
            if !self.analysis.functions[index].emit {
                continue; // malformed signature, already reported
            }
            let before = self.analysis.diagnostics.len();
            self.check_function(func);
            if self.analysis.diagnostics.len() > before {
                log::warn!(
                    "skipping code generation for '{}': its body has type errors",
                    func.name
                );
                self.analysis.functions[index].emit = false;
            }
        }

        log::debug!(
            "type checked {} function(s), {} diagnostic(s)",
            self.analysis.functions.len(),
            self.analysis.diagnostics.len()
        );
        self.analysis
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.analysis.diagnostics.push(Diagnostic::type_error(message, span));
    }

    fn enter_scope(&mut self) {
        let env = std::mem::take(&mut self.env);
        self.env = env.child();
    }

    fn exit_scope(&mut self) {
        let env = std::mem::take(&mut self.env);
        self.env = env.into_parent().unwrap_or_default();
    }

    /// Reports every named type inside `ty` that has no definition.
    fn check_type_known(&mut self, ty: &Spanned<Type>) -> bool {
        let unknown: Vec<String> = ty
            .node
            .named_references()
            .into_iter()
            .filter(|name| !self.type_defs.contains_key(*name))
            .map(str::to_string)
            .collect();
        for name in &unknown {
            self.error(format!("unknown type '{}'", name), ty.span);
        }
        unknown.is_empty()
    }

    // ─── Declaration registration ────────────────────────────────────────

    fn register_type_defs(&mut self, program: &Program) {
        for decl in &program.decls {
            if let Decl::TypeDef(def) = &decl.node {
                if self.type_defs.contains_key(&def.name) {
                    self.error(format!("type '{}' is already defined", def.name), decl.span);
                } else {
                    self.type_defs.insert(def.name.clone(), def.ty.node.clone());
                }
            }
        }
        // Definitions may refer to each other in any order.
        for decl in &program.decls {
            if let Decl::TypeDef(def) = &decl.node {
                self.check_type_known(&def.ty);
            }
        }
    }

    fn register_globals(&mut self, program: &Program) {
        let function_names: HashSet<&str> = program.functions().map(|f| f.name.as_str()).collect();
        let mut seen = HashSet::new();
        for decl in &program.decls {
            let Decl::Global(global) = &decl.node else {
                continue;
            };
            if function_names.contains(global.name.as_str()) {
                self.error(
                    format!("global '{}' conflicts with a function of the same name", global.name),
                    decl.span,
                );
            }
            if !seen.insert(global.name.as_str()) {
                self.error(format!("global '{}' is already defined", global.name), decl.span);
            }
            if let Some(annotation) = &global.annotation {
                let known = self.check_type_known(annotation);
                let ty = known.then(|| annotation.node.clone());
                self.env.declare_var(global.name.clone(), ty);
            }
        }
    }

    fn register_functions(&mut self, program: &Program) {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for func in program.functions() {
            *counts.entry(func.name.as_str()).or_default() += 1;
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for func in program.functions() {
            let ordinal = seen.entry(func.name.as_str()).or_default();
            let overloaded = counts.get(func.name.as_str()).copied().unwrap_or(0) > 1;
            let label = symbol::function(&func.name, overloaded.then_some(*ordinal));
            *ordinal += 1;

            let mut well_formed = true;
            for param in &func.params {
                well_formed &= self.check_type_known(&param.ty);
            }
            well_formed &= self.check_type_known(&func.return_type);
            if !well_formed {
                log::warn!("dropping '{}': malformed signature", func.name);
            }

            log::trace!("registered {} as {}", func.signature(), label);
            let index = self.analysis.functions.len();
            self.analysis.functions.push(FunctionInfo {
                name: func.name.clone(),
                label,
                params: func.params.iter().map(|p| p.ty.node.clone()).collect(),
                ret: func.return_type.node.clone(),
                priority: func.priority,
                emit: well_formed,
            });
            self.overloads.entry(func.name.clone()).or_default().push(index);
        }
    }

    // ─── Globals and functions ───────────────────────────────────────────

    fn check_global(&mut self, global: &ast::Global) {
        let before = self.analysis.diagnostics.len();
        let value = self.infer(&global.value);
        let ty = match &global.annotation {
            Some(annotation) => {
                if let Some(value) = &value {
                    if !value.is_compatible(&annotation.node) {
                        self.error(
                            format!(
                                "cannot initialize global '{}' of type {} with {}",
                                global.name, annotation.node, value
                            ),
                            global.value.span,
                        );
                    }
                }
                self.env.lookup_var(&global.name).cloned().flatten()
            }
            None => {
                self.env.declare_var(global.name.clone(), value.clone());
                value
            }
        };
        let initialize = ty.is_some() && self.analysis.diagnostics.len() == before;
        self.analysis.globals.push(GlobalInfo {
            name: global.name.clone(),
            ty,
            initialize,
        });
    }

    fn check_function(&mut self, func: &Function) {
        self.enter_scope();
        self.current_function = Some((func.name.clone(), func.return_type.node.clone()));

        for param in &func.params {
            if self.env.declares(&param.name) {
                self.error(
                    format!("duplicate parameter '{}' in function '{}'", param.name, func.name),
                    param.span,
                );
            }
            self.env.declare_var(param.name.clone(), Some(param.ty.node.clone()));
        }
        for stmt in &func.body.stmts {
            self.check_stmt(stmt);
        }

        self.current_function = None;
        self.exit_scope();
    }

    // ─── Statement checking ──────────────────────────────────────────────

    fn check_block(&mut self, block: &Block) {
        self.enter_scope();
        for stmt in &block.stmts {
            self.check_stmt(stmt);
        }
        self.exit_scope();
    }

    fn check_stmt(&mut self, stmt: &Spanned<Stmt>) {
        match &stmt.node {
            Stmt::Let {
                name,
                annotation,
                value,
            } => self.check_let(name, annotation.as_ref(), value),

            Stmt::Return(value) => self.check_return(value.as_ref(), stmt.span),

            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                self.check_condition("if", cond);
                self.check_block(then_block);
                if let Some(else_block) = else_block {
                    self.check_block(else_block);
                }
            }

            Stmt::While { cond, body } => {
                self.check_condition("while", cond);
                self.check_block(body);
            }

            Stmt::For {
                var,
                start,
                end,
                body,
            } => {
                for bound in [start, end] {
                    if let Some(ty) = self.infer(bound) {
                        if ty != Type::Int {
                            self.error(
                                format!("for-loop range bounds must be int, got {}", ty),
                                bound.span,
                            );
                        }
                    }
                }
                self.enter_scope();
                self.env.declare_var(var.clone(), Some(Type::Int));
                self.check_block(body);
                self.exit_scope();
            }

            Stmt::Match { scrutinee, arms } => {
                let scrutinee_ty = self.infer(scrutinee);
                for arm in arms {
                    self.enter_scope();
                    match &scrutinee_ty {
                        Some(ty) => self.check_pattern(&arm.pattern.node, ty, arm.pattern.span),
                        None => self.bind_unknown(&arm.pattern.node),
                    }
                    self.check_block(&arm.body);
                    self.exit_scope();
                }
            }

            Stmt::Expr(expr) => {
                let _ = self.infer(expr);
            }

            Stmt::Block(block) => self.check_block(block),
        }
    }

    fn check_let(&mut self, name: &str, annotation: Option<&Spanned<Type>>, value: &Expr) {
        let inferred = self.infer(value);
        let bound = match annotation {
            Some(annotation) => {
                let known = self.check_type_known(annotation);
                if let (true, Some(inferred)) = (known, &inferred) {
                    if !inferred.is_compatible(&annotation.node) {
                        self.error(
                            format!(
                                "cannot initialize '{}' of type {} with {}",
                                name, annotation.node, inferred
                            ),
                            value.span,
                        );
                    }
                }
                known.then(|| annotation.node.clone())
            }
            None => match inferred {
                Some(Type::Void) => {
                    self.error(format!("'{}' cannot be bound to a void value", name), value.span);
                    None
                }
                other => other,
            },
        };
        self.env.declare_var(name.to_string(), bound);
    }

    fn check_return(&mut self, value: Option<&Expr>, span: Span) {
        let Some((func_name, expected)) = self.current_function.clone() else {
            self.error("'return' outside of a function", span);
            return;
        };
        match value {
            Some(expr) => {
                let Some(actual) = self.infer(expr) else {
                    return;
                };
                if !actual.is_compatible(&expected) {
                    self.error(
                        format!(
                            "incompatible return type: '{}' returns {}, found {}",
                            func_name, expected, actual
                        ),
                        expr.span,
                    );
                }
            }
            None => {
                if !expected.is_empty_return() {
                    self.error(
                        format!("missing return value: '{}' returns {}", func_name, expected),
                        span,
                    );
                }
            }
        }
    }

    fn check_condition(&mut self, construct: &str, cond: &Expr) {
        if let Some(ty) = self.infer(cond) {
            if ty != Type::Bool {
                self.error(
                    format!("{} condition must be bool, got {}", construct, ty),
                    cond.span,
                );
            }
        }
    }

    // ─── Patterns ────────────────────────────────────────────────────────

    /// Checks `pattern` against the scrutinee type and binds its names in the
    /// current scope.
    fn check_pattern(&mut self, pattern: &Pattern, ty: &Type, span: Span) {
        match pattern {
            Pattern::Wildcard => {}
            Pattern::Identifier(name) => self.env.declare_var(name.clone(), Some(ty.clone())),
            Pattern::Literal(literal) => {
                let literal_ty = literal.ty();
                if literal_ty == Type::String {
                    self.error("string literals cannot be used as patterns", span);
                } else if !literal_ty.is_equatable() || !literal_ty.is_compatible(ty) {
                    self.error(
                        format!(
                            "pattern of type {} cannot match a value of type {}",
                            literal_ty, ty
                        ),
                        span,
                    );
                }
            }
            Pattern::Tuple(elems) => match ty {
                Type::Tuple(elem_types) if elem_types.len() == elems.len() => {
                    for (elem, elem_ty) in elems.iter().zip(elem_types) {
                        self.check_pattern(elem, elem_ty, span);
                    }
                }
                _ => {
                    self.error(
                        format!(
                            "tuple pattern with {} element(s) cannot match a value of type {}",
                            elems.len(),
                            ty
                        ),
                        span,
                    );
                    self.bind_unknown(pattern);
                }
            },
            Pattern::Struct { name, .. } => {
                self.error(
                    format!("struct pattern '{}' is not supported: types have no field layout", name),
                    span,
                );
                self.bind_unknown(pattern);
            }
        }
    }

    /// Binds every name in `pattern` without a type, so later uses stay quiet.
    fn bind_unknown(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Identifier(name) => self.env.declare_var(name.clone(), None),
            Pattern::Tuple(elems) => elems.iter().for_each(|p| self.bind_unknown(p)),
            Pattern::Struct { fields, .. } => {
                fields.iter().for_each(|(_, p)| self.bind_unknown(p))
            }
            Pattern::Wildcard | Pattern::Literal(_) => {}
        }
    }
}
