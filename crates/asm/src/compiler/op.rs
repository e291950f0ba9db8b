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

use super::*;
use ast::op::{BinOp, UnaryOp};

impl Compiler<'_> {
    /// Evaluates the right operand first and parks it on the stack, then the
    /// left operand, so the left value ends up in `rax` and the right in `rcx`.
    pub(super) fn compile_binary(&mut self, op: BinOp, left: &Expr, right: &Expr) -> CodegenResult<()> {
        if op.is_logical() {
            return self.compile_logical(op, left, right);
        }
        let left_ty = self.type_of(left)?;
        let right_ty = self.type_of(right)?;

        self.compile_expr(right)?;
        self.frame.push_rax();
        self.compile_expr(left)?;
        self.frame.pop("rcx");

        if left_ty.is_float() || right_ty.is_float() {
            self.emit_to_double("xmm0", "rax", &left_ty);
            self.emit_to_double("xmm1", "rcx", &right_ty);
            self.emit_float_op(op, left.span)
        } else {
            self.emit_int_op(op);
            Ok(())
        }
    }

    fn emit_int_op(&mut self, op: BinOp) {
        match op {
            BinOp::Add => self.frame.emit("add rax, rcx"),
            BinOp::Sub => self.frame.emit("sub rax, rcx"),
            BinOp::Mul => self.frame.emit("imul rax, rcx"),
            BinOp::Div => {
                self.frame.emit("cqo");
                self.frame.emit("idiv rcx");
            }
            BinOp::Mod => {
                self.frame.emit("cqo");
                self.frame.emit("idiv rcx");
                self.frame.emit("mov rax, rdx");
            }
            _ => {
                let set = match op {
                    BinOp::Eq => "sete",
                    BinOp::NotEq => "setne",
                    BinOp::Lt => "setl",
                    BinOp::LtE => "setle",
                    BinOp::Gt => "setg",
                    _ => "setge",
                };
                self.frame.emit("cmp rax, rcx");
                self.frame.emit(format!("{} al", set));
                self.frame.emit("movzx eax, al");
            }
        }
    }

    /// Operands are in `xmm0` (left) and `xmm1` (right).
    fn emit_float_op(&mut self, op: BinOp, span: Span) -> CodegenResult<()> {
        let arith = match op {
            BinOp::Add => Some("addsd"),
            BinOp::Sub => Some("subsd"),
            BinOp::Mul => Some("mulsd"),
            BinOp::Div => Some("divsd"),
            _ => None,
        };
        if let Some(instr) = arith {
            self.frame.emit(format!("{} xmm0, xmm1", instr));
            self.frame.emit("movq rax, xmm0");
            return Ok(());
        }
        // comisd sets CF/ZF like an unsigned compare and PF on an unordered
        // (NaN) operand; only `!=` holds for unordered operands.
        match op {
            BinOp::Eq => {
                self.frame.emit("comisd xmm0, xmm1");
                self.frame.emit("sete al");
                self.frame.emit("setnp cl");
                self.frame.emit("and al, cl");
            }
            BinOp::NotEq => {
                self.frame.emit("comisd xmm0, xmm1");
                self.frame.emit("setne al");
                self.frame.emit("setp cl");
                self.frame.emit("or al, cl");
            }
            BinOp::Gt | BinOp::GtE => {
                self.frame.emit("comisd xmm0, xmm1");
                self.frame.emit(if op == BinOp::Gt { "seta al" } else { "setae al" });
            }
            // Swapped so the unordered case (CF=1) reads as false.
            BinOp::Lt | BinOp::LtE => {
                self.frame.emit("comisd xmm1, xmm0");
                self.frame.emit(if op == BinOp::Lt { "seta al" } else { "setae al" });
            }
            other => {
                return Err(CodegenError::internal(
                    format!("operator '{}' has no floating-point lowering", other),
                    span,
                ))
            }
        }
        self.frame.emit("movzx eax, al");
        Ok(())
    }

    /// `and` / `or` skip the right operand once the left one decides the result.
    fn compile_logical(&mut self, op: BinOp, left: &Expr, right: &Expr) -> CodegenResult<()> {
        let short_circuit = self.new_label();
        let end = self.new_label();

        self.compile_expr(left)?;
        self.frame.emit("cmp rax, 0");
        let jump = if op == BinOp::And { "je" } else { "jne" };
        self.frame.emit(format!("{} {}", jump, short_circuit));

        self.compile_expr(right)?;
        self.frame.emit("cmp rax, 0");
        self.frame.emit("setne al");
        self.frame.emit("movzx eax, al");
        self.frame.emit(format!("jmp {}", end));

        self.frame.emit_label(&short_circuit);
        let value = if op == BinOp::And { 0 } else { 1 };
        self.frame.emit(format!("mov eax, {}", value));
        self.frame.emit_label(&end);
        Ok(())
    }

    pub(super) fn compile_unary(&mut self, op: UnaryOp, operand: &Expr) -> CodegenResult<()> {
        self.compile_expr(operand)?;
        match op {
            UnaryOp::Neg if self.type_of(operand)?.is_float() => {
                self.frame.emit("movq xmm1, rax");
                self.frame.emit("xorpd xmm0, xmm0");
                self.frame.emit("subsd xmm0, xmm1");
                self.frame.emit("movq rax, xmm0");
            }
            UnaryOp::Neg => self.frame.emit("neg rax"),
            UnaryOp::Not => {
                self.frame.emit("cmp rax, 0");
                self.frame.emit("sete al");
                self.frame.emit("movzx eax, al");
            }
        }
        Ok(())
    }
}
