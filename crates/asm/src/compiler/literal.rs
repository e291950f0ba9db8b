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
use ast::expr::Literal;
use std::fmt::Write;

impl Compiler<'_> {
    pub(super) fn compile_literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Int(n) => self.frame.emit(format!("mov rax, {}", n)),
            Literal::Float(x) => self.frame.emit(format!("mov rax, 0x{:x}", x.to_bits())),
            Literal::Str(s) => {
                let index = self.intern_string(s);
                self.frame.emit(format!("lea rax, [rip + str_{}]", index));
            }
            Literal::Char(c) => self.frame.emit(format!("mov rax, {}", u32::from(*c))),
            Literal::Bool(b) => self.frame.emit(format!("mov rax, {}", u8::from(*b))),
            Literal::Null => self.frame.emit("xor eax, eax"),
        }
    }

    /// Adds `s` to the pool and returns its index. Every occurrence gets its own entry.
    pub(super) fn intern_string(&mut self, s: &str) -> usize {
        self.strings.push(s.to_string());
        self.strings.len() - 1
    }

    /// String pool first, then one zero-initialized word per global.
    pub(super) fn data_section(&self) -> String {
        let mut out = String::new();
        for (index, s) in self.strings.iter().enumerate() {
            let _ = writeln!(out, "str_{}: .asciz \"{}\"", index, escape_asciz(s));
        }
        for (global, _) in &self.globals {
            let _ = writeln!(out, "{}: .quad 0", symbol::global(&global.name));
        }
        out
    }
}

/// Literal word for a scalar pattern or constant: ints as-is, floats as bits.
pub(super) fn literal_word(literal: &Literal) -> Option<i64> {
    match literal {
        Literal::Int(n) => Some(*n),
        Literal::Float(x) => Some(x.to_bits() as i64),
        Literal::Char(c) => Some(i64::from(u32::from(*c))),
        Literal::Bool(b) => Some(i64::from(*b)),
        Literal::Null => Some(0),
        Literal::Str(_) => None,
    }
}

/// Escapes UTF-8 bytes for a GNU `as` string directive.
pub(super) fn escape_asciz(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{:03o}", byte);
            }
        }
    }
    out
}
