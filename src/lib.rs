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

//! `slangc`: lexing, parsing, type checking and x86-64 code generation for a
//! small statically typed language.

#[cfg(test)]
mod tests;

pub use ast::{Diagnostic, DiagnosticKind, Program};

/// The result of running the whole pipeline over one source file.
#[derive(Debug)]
pub struct Compilation {
    /// GNU `as` Intel-syntax assembly; present only if nothing was reported.
    pub assembly: Option<String>,
    /// Every diagnostic from every stage, in stage order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Compile `source` to assembly.
///
/// A program that failed to parse is still type checked, so one run reports
/// syntax and type problems together.
pub fn compile(source: &str) -> Compilation {
    let (program, mut diagnostics) = parser::parse(source);
    let assembly = match asm::compile(&program) {
        Ok(assembly) if diagnostics.is_empty() => Some(assembly),
        Ok(_) => None,
        Err(errors) => {
            diagnostics.extend(errors);
            None
        }
    };
    log::debug!("compilation finished with {} diagnostic(s)", diagnostics.len());
    Compilation {
        assembly,
        diagnostics,
    }
}
