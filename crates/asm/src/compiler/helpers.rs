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

impl Compiler<'_> {
    /// A fresh local label. The counter spans the whole compilation, so labels
    /// never collide across functions.
    pub(super) fn new_label(&mut self) -> String {
        let label = format!(".L{}", self.next_label);
        self.next_label += 1;
        label
    }

    /// The checked type of `expr`.
    pub(super) fn type_of(&self, expr: &Expr) -> CodegenResult<Type> {
        self.analysis.type_of(expr.id).cloned().ok_or_else(|| {
            CodegenError::internal(
                format!("no type recorded for expression '{}'", expr),
                expr.span,
            )
        })
    }

    /// Memory operand for a variable: a frame slot, or a global's data word.
    pub(super) fn variable_operand(&self, name: &str, span: Span) -> CodegenResult<String> {
        if let Some(slot) = self.frame.lookup(name).filter(|_| !self.globals_only) {
            return Ok(slot.operand());
        }
        if self.global_names.contains(name) {
            return Ok(format!("QWORD PTR [rip + {}]", symbol::global(name)));
        }
        Err(CodegenError::internal(
            format!("unknown variable '{}'", name),
            span,
        ))
    }

    /// Convert the value in `rax` from `actual` to `expected`.
    /// Only the int/float pair needs instructions; everything else is one word as-is.
    pub(super) fn emit_conversion(&mut self, actual: &Type, expected: &Type) {
        match (actual, expected) {
            (Type::Int, Type::Float) => {
                self.frame.emit("cvtsi2sd xmm0, rax");
                self.frame.emit("movq rax, xmm0");
            }
            (Type::Float, Type::Int) => {
                self.frame.emit("movq xmm0, rax");
                self.frame.emit("cvttsd2si rax, xmm0");
            }
            _ => {}
        }
    }

    /// Move a general-purpose register holding a value of type `ty` into `xmm`
    /// as a double.
    pub(super) fn emit_to_double(&mut self, xmm: &str, register: &str, ty: &Type) {
        if ty.is_float() {
            self.frame.emit(format!("movq {}, {}", xmm, register));
        } else {
            self.frame.emit(format!("cvtsi2sd {}, {}", xmm, register));
        }
    }
}
