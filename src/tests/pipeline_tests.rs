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

use crate::{compile, Compilation, DiagnosticKind};

fn compile_ok(source: &str) -> String {
    match compile(source) {
        Compilation {
            assembly: Some(assembly),
            diagnostics,
        } if diagnostics.is_empty() => assembly,
        other => panic!("expected assembly, got {:?}", other.diagnostics),
    }
}

fn kinds(compilation: &Compilation) -> Vec<DiagnosticKind> {
    compilation.diagnostics.iter().map(|d| d.kind).collect()
}

#[test]
fn test_clean_program_compiles() {
    let compilation = compile("fn add(a: int, b: int) -> int { return a + b; }");
    assert!(compilation.is_success());
    let assembly = compilation.assembly.expect("assembly");
    assert!(assembly.contains(".global fn_add\nfn_add:\n"));
    assert!(assembly.contains("add rax, rcx"));
}

#[test]
fn test_type_error_reports_once_and_withholds_output() {
    let compilation = compile("fn bad() -> int { return \"x\"; }\nfn ok() -> int { return 1; }");
    assert_eq!(kinds(&compilation), vec![DiagnosticKind::Type]);
    assert!(compilation.assembly.is_none());
    assert_eq!(
        compilation.diagnostics[0].to_string(),
        "1:26: Type: incompatible return type: 'bad' returns int, found string"
    );
}

#[test]
fn test_unterminated_string_is_lexical() {
    let src = "fn f() -> int {\n    let s = \"abc\n    return 1;\n}\nfn g() -> int { return 2; }\n";
    let compilation = compile(src);
    let lexical = compilation
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::Lexical)
        .count();
    assert_eq!(lexical, 1);
    assert_eq!(compilation.diagnostics[0].line, 2);
    assert!(compilation.assembly.is_none());
}

#[test]
fn test_priority_resolution_end_to_end() {
    let src = "
fn pick(x: int) -> int priority 1 { return 1; }
fn pick(x: int) -> int priority 2 { return 2; }
fn main() -> int { return pick(5); }
";
    assert!(compile_ok(src).contains("call fn1_pick"));

    let tied = src.replace("priority 2", "priority 1");
    let compilation = compile(&tied);
    assert_eq!(kinds(&compilation), vec![DiagnosticKind::Type]);
    assert!(compilation.diagnostics[0].message.starts_with("ambiguous call"));
}

#[test]
fn test_syntax_and_type_errors_reported_together() {
    let src = "fn f() -> int { let a = ; return 1; }\nfn g() -> int { return true; }";
    let compilation = compile(src);
    assert_eq!(kinds(&compilation), vec![DiagnosticKind::Syntax, DiagnosticKind::Type]);
}

#[test]
fn test_full_program() {
    let src = r#"
let greeting: string = "hello";
let scale: float = 2;

fn square(x: float) -> float { return x * x; }
fn square(x: int) -> int priority 1 { return x * x; }

fn fib(n: int) -> int {
    if n < 2 { return n; }
    return fib(n - 1) + fib(n - 2);
}

fn main() -> int {
    let total = 0;
    for i in 0..10 {
        total = total + square(i);
    }
    match fib(10) {
        55 => { total = total + 1; }
        _ => {}
    }
    let area = square(scale);
    return total;
}
"#;
    let assembly = compile_ok(src);
    assert!(assembly.contains(".global fn0_square"));
    assert!(assembly.contains(".global fn1_square"));
    assert!(assembly.contains("call fn_fib"));
    assert!(assembly.contains("str_0: .asciz \"hello\""));
    assert!(assembly.contains("gv_greeting: .quad 0\ngv_scale: .quad 0\n"));
}
