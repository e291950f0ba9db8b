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

pub mod compiler;
pub mod frame;
pub mod symbol;
pub mod type_checker;

#[cfg(test)]
mod tests;

pub use compiler::{CodegenError, Compiler};
pub use type_checker::{Analysis, TypeChecker};

use ast::{Diagnostic, Program};

/// Compile a parsed program to x86-64 assembly.
///
/// Two phases:
/// 1. The type checker annotates every expression and resolves every call.
/// 2. The code generator lowers each function that checked cleanly.
///
/// Returns the assembly only if neither phase reported anything. Otherwise all
/// diagnostics are returned, type errors first.
pub fn compile(program: &Program) -> Result<String, Vec<Diagnostic>> {
    let analysis = TypeChecker::new().check_program(program);
    let generated = Compiler::generate(program, &analysis);
    let mut diagnostics = analysis.diagnostics;
    match generated {
        Ok(assembly) if diagnostics.is_empty() => Ok(assembly),
        Ok(_) => Err(diagnostics),
        Err(err) => {
            diagnostics.push(err.into());
            Err(diagnostics)
        }
    }
}
