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

use ast::types::Type;
use std::collections::HashMap;
use std::fmt::Write;

/// Where a value lives in the current stack frame: `[rbp - offset]`.
#[derive(Debug, Clone)]
pub struct Slot {
    pub offset: i64,
    pub ty: Type,
}

impl Slot {
    pub fn operand(&self) -> String {
        format!("QWORD PTR [rbp - {}]", self.offset)
    }
}

/// Context for compiling a single function body.
///
/// The frame size is only known once the whole body has been generated, so
/// instructions are buffered here. Call [`FunctionFrame::build`] afterwards to
/// prefix the prologue and produce the final text.
#[derive(Debug, Default)]
pub struct FunctionFrame {
    /// Innermost scope last. Every declaration gets a fresh slot, so shadowed
    /// bindings keep their storage.
    scopes: Vec<HashMap<String, Slot>>,
    /// Number of 8-byte slots allocated so far
    slot_count: i64,
    /// Values pushed onto the machine stack and not yet popped.
    push_depth: usize,
    /// Buffered instruction text
    body: String,
}

impl FunctionFrame {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
            ..Self::default()
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Declare a variable in the innermost scope and return its new slot.
    pub fn declare_local(&mut self, name: &str, ty: Type) -> Slot {
        let slot = self.alloc_temp(ty);
        self.bind(name, slot.clone());
        slot
    }

    /// Make an already allocated slot visible under `name` in the innermost scope.
    pub fn bind(&mut self, name: &str, slot: Slot) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), slot);
        }
    }

    /// An anonymous slot for values the generated code keeps across a loop or match.
    pub fn alloc_temp(&mut self, ty: Type) -> Slot {
        self.slot_count += 1;
        Slot {
            offset: self.slot_count * 8,
            ty,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Slot> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Emit one instruction into the buffered body.
    pub fn emit(&mut self, instr: impl AsRef<str>) {
        self.body.push_str("    ");
        self.body.push_str(instr.as_ref());
        self.body.push('\n');
    }

    pub fn emit_label(&mut self, label: &str) {
        self.body.push_str(label);
        self.body.push_str(":\n");
    }

    pub fn push_rax(&mut self) {
        self.emit("push rax");
        self.push_depth += 1;
    }

    pub fn pop(&mut self, register: &str) {
        self.emit(format!("pop {}", register));
        self.push_depth = self.push_depth.saturating_sub(1);
    }

    pub fn push_depth(&self) -> usize {
        self.push_depth
    }

    /// Record stack words released by an explicit `add rsp, ...`.
    pub fn release(&mut self, words: usize) {
        self.push_depth = self.push_depth.saturating_sub(words);
    }

    /// Record stack words reserved by an explicit push or `sub rsp, ...`.
    pub fn reserve(&mut self, words: usize) {
        self.push_depth += words;
    }

    pub fn emit_epilogue(&mut self) {
        self.emit("mov rsp, rbp");
        self.emit("pop rbp");
        self.emit("ret");
    }

    /// Frame size in bytes, rounded up to keep `rsp` 16-byte aligned.
    pub fn frame_size(&self) -> i64 {
        (self.slot_count * 8 + 15) / 16 * 16
    }

    /// Prefix the prologue and return the finished function text.
    pub fn build(self, label: &str) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, ".global {}", label);
        let _ = writeln!(out, "{}:", label);
        out.push_str("    push rbp\n");
        out.push_str("    mov rbp, rsp\n");
        let size = self.frame_size();
        if size > 0 {
            let _ = writeln!(out, "    sub rsp, {}", size);
        }
        out.push_str(&self.body);
        out
    }
}
