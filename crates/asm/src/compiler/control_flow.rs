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

use super::literal::literal_word;
use super::*;
use ast::expr::Literal;
use ast::pattern::Pattern;
use ast::stmt::MatchArm;

use crate::frame::Slot;

impl Compiler<'_> {
    pub(super) fn compile_if(
        &mut self,
        cond: &Expr,
        then_block: &Block,
        else_block: Option<&Block>,
    ) -> CodegenResult<()> {
        let else_label = self.new_label();
        let end_label = self.new_label();

        self.compile_expr(cond)?;
        self.frame.emit("cmp rax, 0");
        self.frame.emit(format!("je {}", else_label));
        self.compile_block(then_block)?;
        self.frame.emit(format!("jmp {}", end_label));
        self.frame.emit_label(&else_label);
        if let Some(else_block) = else_block {
            self.compile_block(else_block)?;
        }
        self.frame.emit_label(&end_label);
        Ok(())
    }

    pub(super) fn compile_while(&mut self, cond: &Expr, body: &Block) -> CodegenResult<()> {
        let start_label = self.new_label();
        let exit_label = self.new_label();

        self.frame.emit_label(&start_label);
        self.compile_expr(cond)?;
        self.frame.emit("cmp rax, 0");
        self.frame.emit(format!("je {}", exit_label));
        self.compile_block(body)?;
        self.frame.emit(format!("jmp {}", start_label));
        self.frame.emit_label(&exit_label);
        Ok(())
    }

    /// `for var in start..end`: the bound is evaluated once, before the first
    /// iteration, and the loop variable counts up by one.
    pub(super) fn compile_for(
        &mut self,
        var: &str,
        start: &Expr,
        end: &Expr,
        body: &Block,
    ) -> CodegenResult<()> {
        let top_label = self.new_label();
        let exit_label = self.new_label();

        self.frame.push_scope();
        // Both bounds are evaluated before the loop variable becomes visible.
        self.compile_expr(start)?;
        let counter = self.frame.alloc_temp(Type::Int);
        self.frame.emit(format!("mov {}, rax", counter.operand()));
        self.compile_expr(end)?;
        let bound = self.frame.alloc_temp(Type::Int);
        self.frame.emit(format!("mov {}, rax", bound.operand()));
        self.frame.bind(var, counter.clone());

        self.frame.emit_label(&top_label);
        self.frame.emit(format!("mov rax, {}", counter.operand()));
        self.frame.emit(format!("cmp rax, {}", bound.operand()));
        self.frame.emit(format!("jge {}", exit_label));
        self.compile_block(body)?;
        self.frame.emit(format!("add {}, 1", counter.operand()));
        self.frame.emit(format!("jmp {}", top_label));
        self.frame.emit_label(&exit_label);
        self.frame.pop_scope();
        Ok(())
    }

    /// Arms are tried in order; the first whose pattern matches runs and the
    /// rest are skipped. No arm matching is not an error.
    pub(super) fn compile_match(&mut self, scrutinee: &Expr, arms: &[MatchArm]) -> CodegenResult<()> {
        let end_label = self.new_label();

        self.compile_expr(scrutinee)?;
        let ty = self.type_of(scrutinee)?;
        let value = self.frame.alloc_temp(ty);
        self.frame.emit(format!("mov {}, rax", value.operand()));

        for arm in arms {
            let next_label = self.new_label();
            self.frame.push_scope();
            self.compile_pattern(&arm.pattern.node, &value, &next_label, arm.pattern.span)?;
            self.compile_block(&arm.body)?;
            self.frame.pop_scope();
            self.frame.emit(format!("jmp {}", end_label));
            self.frame.emit_label(&next_label);
        }
        self.frame.emit_label(&end_label);
        Ok(())
    }

    /// Test the value in `value` against `pattern`, jumping to `fail` on a
    /// mismatch. Bindings are declared in the current scope.
    fn compile_pattern(
        &mut self,
        pattern: &Pattern,
        value: &Slot,
        fail: &str,
        span: Span,
    ) -> CodegenResult<()> {
        match pattern {
            Pattern::Wildcard => Ok(()),

            Pattern::Identifier(name) => {
                let slot = self.frame.declare_local(name, value.ty.clone());
                self.frame.emit(format!("mov rax, {}", value.operand()));
                self.frame.emit(format!("mov {}, rax", slot.operand()));
                Ok(())
            }

            Pattern::Literal(literal) => self.compile_literal_test(literal, value, fail, span),

            Pattern::Tuple(elems) => {
                let Type::Tuple(elem_types) = &value.ty else {
                    return Err(CodegenError::internal(
                        format!("tuple pattern matched against {}", value.ty),
                        span,
                    ));
                };
                if elem_types.len() != elems.len() {
                    return Err(CodegenError::internal("tuple pattern arity mismatch", span));
                }
                // A tuple value is a pointer to its consecutive element words.
                for (k, (elem, elem_ty)) in elems.iter().zip(elem_types).enumerate() {
                    if matches!(elem, Pattern::Wildcard) {
                        continue;
                    }
                    let element = self.frame.alloc_temp(elem_ty.clone());
                    self.frame.emit(format!("mov rax, {}", value.operand()));
                    self.frame
                        .emit(format!("mov rax, QWORD PTR [rax + {}]", 8 * k));
                    self.frame.emit(format!("mov {}, rax", element.operand()));
                    self.compile_pattern(elem, &element, fail, span)?;
                }
                Ok(())
            }

            Pattern::Struct { name, .. } => Err(CodegenError::internal(
                format!("struct pattern '{}' reached code generation", name),
                span,
            )),
        }
    }

    fn compile_literal_test(
        &mut self,
        literal: &Literal,
        value: &Slot,
        fail: &str,
        span: Span,
    ) -> CodegenResult<()> {
        let literal_ty = literal.ty();
        if value.ty.is_float() || literal_ty.is_float() {
            let as_double = match literal {
                Literal::Int(n) => *n as f64,
                Literal::Float(x) => *x,
                _ => {
                    return Err(CodegenError::internal(
                        format!("literal {:?} compared with {}", literal, value.ty),
                        span,
                    ))
                }
            };
            self.frame.emit(format!("mov rax, {}", value.operand()));
            let value_ty = value.ty.clone();
            self.emit_to_double("xmm0", "rax", &value_ty);
            self.frame
                .emit(format!("mov rcx, 0x{:x}", as_double.to_bits()));
            self.frame.emit("movq xmm1, rcx");
            self.frame.emit("comisd xmm0, xmm1");
            // Unordered (NaN) never matches.
            self.frame.emit(format!("jp {}", fail));
            self.frame.emit(format!("jne {}", fail));
            return Ok(());
        }

        let word = literal_word(literal).ok_or_else(|| {
            CodegenError::internal(format!("literal {:?} cannot be a pattern", literal), span)
        })?;
        self.frame.emit(format!("mov rax, {}", value.operand()));
        self.frame.emit(format!("mov rcx, {}", word));
        self.frame.emit("cmp rax, rcx");
        self.frame.emit(format!("jne {}", fail));
        Ok(())
    }
}
