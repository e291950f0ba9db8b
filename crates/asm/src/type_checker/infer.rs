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
use ast::expr::ExprKind;
use ast::op::{BinOp, UnaryOp};

impl TypeChecker {
    // ─── Expression type inference ───────────────────────────────────────

    /// Infers the type of `expr` and records it for the code generator.
    /// Returns `None` if the type cannot be determined; the error has then
    /// already been reported by the node that found it.
    pub(super) fn infer(&mut self, expr: &Expr) -> Option<Type> {
        let ty = self.infer_kind(expr);
        self.analysis.expr_types.insert(expr.id, ty.clone());
        ty
    }

    fn infer_kind(&mut self, expr: &Expr) -> Option<Type> {
        match &expr.kind {
            ExprKind::Literal(literal) => Some(literal.ty()),

            ExprKind::Identifier(name) => match self.env.lookup_var(name) {
                Some(ty) => ty.clone(),
                None if self.overloads.contains_key(name) => {
                    self.error(
                        format!("function '{}' cannot be used as a value", name),
                        expr.span,
                    );
                    None
                }
                None => {
                    self.error(format!("undefined variable '{}'", name), expr.span);
                    None
                }
            },

            ExprKind::Binary { op, left, right } => {
                // Both sides are always visited so their nodes get types.
                let lt = self.infer(left);
                let rt = self.infer(right);
                self.infer_binary(*op, lt?, rt?, expr.span)
            }

            ExprKind::Unary { op, operand } => {
                let ot = self.infer(operand)?;
                self.infer_unary(*op, ot, expr.span)
            }

            ExprKind::Call { callee, args } => self.infer_call(expr.id, callee, args, expr.span),

            ExprKind::Assign { target, value } => {
                let value_ty = self.infer(value);
                let target_ty = match self.env.lookup_var(target) {
                    Some(ty) => ty.clone(),
                    None => {
                        self.error(
                            format!("assignment to undeclared variable '{}'", target),
                            expr.span,
                        );
                        return None;
                    }
                };
                let (value_ty, target_ty) = (value_ty?, target_ty?);
                if !value_ty.is_compatible(&target_ty) {
                    self.error(
                        format!(
                            "cannot assign {} to variable '{}' of type {}",
                            value_ty, target, target_ty
                        ),
                        value.span,
                    );
                    return None;
                }
                Some(target_ty)
            }
        }
    }

    fn infer_binary(&mut self, op: BinOp, lt: Type, rt: Type, span: Span) -> Option<Type> {
        match op {
            BinOp::Mod => {
                if lt == Type::Int && rt == Type::Int {
                    Some(Type::Int)
                } else {
                    self.error(
                        format!("'%' requires int operands, got {} and {}", lt, rt),
                        span,
                    );
                    None
                }
            }

            _ if op.is_arithmetic() => match lt.widen(&rt) {
                Some(result) => Some(result),
                None => {
                    self.error(format!("cannot apply '{}' to {} and {}", op, lt, rt), span);
                    None
                }
            },

            _ if op.is_ordering() => {
                if lt.is_numeric() && rt.is_numeric() {
                    Some(Type::Bool)
                } else {
                    self.error(
                        format!(
                            "ordering comparison '{}' requires numeric operands, got {} and {}",
                            op, lt, rt
                        ),
                        span,
                    );
                    None
                }
            }

            _ if op.is_equality() => {
                if lt.is_equatable() && rt.is_equatable() && lt.is_compatible(&rt) {
                    Some(Type::Bool)
                } else {
                    self.error(format!("cannot compare {} and {}", lt, rt), span);
                    None
                }
            }

            // and, or
            _ => {
                if lt == Type::Bool && rt == Type::Bool {
                    Some(Type::Bool)
                } else {
                    self.error(
                        format!("'{}' requires bool operands, got {} and {}", op, lt, rt),
                        span,
                    );
                    None
                }
            }
        }
    }

    fn infer_unary(&mut self, op: UnaryOp, ot: Type, span: Span) -> Option<Type> {
        match op {
            UnaryOp::Neg if ot.is_numeric() => Some(ot),
            UnaryOp::Neg => {
                self.error(format!("unary '-' requires a numeric operand, got {}", ot), span);
                None
            }
            UnaryOp::Not if ot == Type::Bool => Some(Type::Bool),
            UnaryOp::Not => {
                self.error(format!("'!' requires a bool operand, got {}", ot), span);
                None
            }
        }
    }

    // ─── Calls and overload resolution ───────────────────────────────────

    fn infer_call(&mut self, id: NodeId, callee: &str, args: &[Expr], span: Span) -> Option<Type> {
        let arg_types: Vec<Option<Type>> = args.iter().map(|arg| self.infer(arg)).collect();

        let candidates = match self.overloads.get(callee) {
            Some(candidates) => candidates.clone(),
            None => {
                let message = match self.env.lookup_var(callee) {
                    Some(_) => format!("'{}' is a variable, not a function", callee),
                    None => format!("unknown function '{}'", callee),
                };
                self.error(message, span);
                return None;
            }
        };
        let arg_types: Vec<Type> = arg_types.into_iter().collect::<Option<_>>()?;

        let viable: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&index| accepts(&self.analysis.functions[index], &arg_types))
            .collect();

        if viable.is_empty() {
            self.report_no_match(callee, &candidates, args, &arg_types, span);
            return None;
        }

        // Highest priority wins; a tie at the top is ambiguous.
        let best = viable
            .iter()
            .map(|&index| self.analysis.functions[index].rank())
            .max()
            .unwrap_or(0);
        let top: Vec<usize> = viable
            .into_iter()
            .filter(|&index| self.analysis.functions[index].rank() == best)
            .collect();
        if top.len() > 1 {
            self.error(
                format!(
                    "ambiguous call to '{}': {} declarations match with priority {}",
                    callee,
                    top.len(),
                    best
                ),
                span,
            );
            return None;
        }

        let target = &self.analysis.functions[top[0]];
        let (label, ret) = (target.label.clone(), target.ret.clone());
        log::trace!("call to '{}' resolved to {}", callee, label);
        self.analysis.call_targets.insert(id, label);
        Some(ret)
    }

    fn report_no_match(
        &mut self,
        callee: &str,
        candidates: &[usize],
        args: &[Expr],
        arg_types: &[Type],
        span: Span,
    ) {
        if let [only] = candidates {
            let params = self.analysis.functions[*only].params.clone();
            if params.len() != arg_types.len() {
                self.error(
                    format!(
                        "function '{}' expects {} argument(s), got {}",
                        callee,
                        params.len(),
                        arg_types.len()
                    ),
                    span,
                );
                return;
            }
            let mismatch = params
                .iter()
                .zip(arg_types)
                .position(|(param, arg)| !arg.is_compatible(param));
            if let Some(i) = mismatch {
                self.error(
                    format!(
                        "argument {} of '{}': expected {}, found {}",
                        i + 1,
                        callee,
                        params[i],
                        arg_types[i]
                    ),
                    args[i].span,
                );
                return;
            }
        }
        let shown: Vec<String> = arg_types.iter().map(|t| t.to_string()).collect();
        self.error(
            format!(
                "no declaration of '{}' accepts arguments ({})",
                callee,
                shown.join(", ")
            ),
            span,
        );
    }
}

fn accepts(func: &FunctionInfo, args: &[Type]) -> bool {
    func.params.len() == args.len()
        && func
            .params
            .iter()
            .zip(args)
            .all(|(param, arg)| arg.is_compatible(param))
}
