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

const INT_ARG_REGISTERS: [&str; 6] = ["rdi", "rsi", "rdx", "rcx", "r8", "r9"];
const FLOAT_ARG_REGISTERS: usize = 8;

/// Where the System-V calling convention places one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArgLocation {
    Register(&'static str),
    /// `xmm<n>`
    Xmm(usize),
    /// Index among the stack-passed arguments; the callee reads it at `[rbp + 16 + 8*k]`.
    Stack(usize),
}

/// Classify parameters in order: floats take `xmm0`-`xmm7`, everything else the
/// six integer registers, and the rest spill to the stack.
pub(crate) fn classify(params: &[Type]) -> Vec<ArgLocation> {
    let (mut ints, mut floats, mut stack) = (0, 0, 0);
    params
        .iter()
        .map(|ty| {
            if ty.is_float() && floats < FLOAT_ARG_REGISTERS {
                floats += 1;
                ArgLocation::Xmm(floats - 1)
            } else if !ty.is_float() && ints < INT_ARG_REGISTERS.len() {
                ints += 1;
                ArgLocation::Register(INT_ARG_REGISTERS[ints - 1])
            } else {
                stack += 1;
                ArgLocation::Stack(stack - 1)
            }
        })
        .collect()
}

impl Compiler<'_> {
    /// Copy incoming parameters into their frame slots.
    pub(super) fn bind_params(&mut self, func: &Function, info: &FunctionInfo) -> CodegenResult<()> {
        for (param, location) in func.params.iter().zip(classify(&info.params)) {
            let slot = self.frame.declare_local(&param.name, param.ty.node.clone());
            match location {
                ArgLocation::Register(register) => {
                    self.frame.emit(format!("mov {}, {}", slot.operand(), register));
                }
                ArgLocation::Xmm(n) => {
                    self.frame.emit(format!("movsd {}, xmm{}", slot.operand(), n));
                }
                ArgLocation::Stack(k) => {
                    self.frame
                        .emit(format!("mov rax, QWORD PTR [rbp + {}]", 16 + 8 * k));
                    self.frame.emit(format!("mov {}, rax", slot.operand()));
                }
            }
        }
        Ok(())
    }

    /// Arguments are evaluated left to right and parked on the stack. Stack
    /// arguments are then pushed again in calling order, register arguments
    /// are loaded from their parked copies, and everything is released after
    /// the call.
    pub(super) fn compile_call(&mut self, expr: &Expr, callee: &str, args: &[Expr]) -> CodegenResult<()> {
        let analysis = self.analysis;
        let label = analysis.call_targets.get(&expr.id).ok_or_else(|| {
            CodegenError::internal(format!("call to '{}' was never resolved", callee), expr.span)
        })?;
        let target = *self.targets.get(label.as_str()).ok_or_else(|| {
            CodegenError::internal(format!("no declaration labelled '{}'", label), expr.span)
        })?;
        if target.params.len() != args.len() {
            return Err(CodegenError::internal(
                format!("call to '{}' does not match its declaration", label),
                expr.span,
            ));
        }

        for (arg, param_ty) in args.iter().zip(&target.params) {
            self.compile_expr(arg)?;
            let arg_ty = self.type_of(arg)?;
            self.emit_conversion(&arg_ty, param_ty);
            self.frame.push_rax();
        }

        let locations = classify(&target.params);
        let stack_args: Vec<usize> = locations
            .iter()
            .enumerate()
            .filter(|(_, location)| matches!(location, ArgLocation::Stack(_)))
            .map(|(i, _)| i)
            .collect();

        // rsp must be 16-byte aligned at the call instruction.
        let padding = (self.frame.push_depth() + stack_args.len()) % 2;
        if padding == 1 {
            self.frame.emit("sub rsp, 8");
            self.frame.reserve(1);
        }

        // Parked argument i sits above everything pushed after it.
        let parked = |i: usize, pushed_since: usize| 8 * (pushed_since + padding + args.len() - 1 - i);
        for (already, &i) in stack_args.iter().rev().enumerate() {
            self.frame
                .emit(format!("push QWORD PTR [rsp + {}]", parked(i, already)));
            self.frame.reserve(1);
        }
        for (i, location) in locations.iter().enumerate() {
            let source = format!("QWORD PTR [rsp + {}]", parked(i, stack_args.len()));
            match location {
                ArgLocation::Register(register) => {
                    self.frame.emit(format!("mov {}, {}", register, source));
                }
                ArgLocation::Xmm(n) => self.frame.emit(format!("movsd xmm{}, {}", n, source)),
                ArgLocation::Stack(_) => {}
            }
        }

        self.frame.emit(format!("call {}", label));
        let words = args.len() + padding + stack_args.len();
        if words > 0 {
            self.frame.emit(format!("add rsp, {}", 8 * words));
            self.frame.release(words);
        }
        if target.ret.is_float() {
            self.frame.emit("movq rax, xmm0");
        }
        Ok(())
    }
}
