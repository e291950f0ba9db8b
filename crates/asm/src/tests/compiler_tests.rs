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

use ast::expr::{Expr, ExprKind, Literal};
use ast::stmt::{Block, Stmt};
use ast::types::Type;
use ast::{Decl, DiagnosticKind, Function, NodeId, Program, Span, Spanned};

use crate::compiler::call::{classify, ArgLocation};
use crate::type_checker::TypeChecker;
use crate::{compile, Analysis, CodegenError, Compiler};

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn assemble(source: &str) -> String {
    let (program, diagnostics) = parser::parse(source);
    assert!(diagnostics.is_empty(), "unexpected parse diagnostics: {:?}", diagnostics);
    match compile(&program) {
        Ok(asm) => asm,
        Err(diagnostics) => panic!("expected assembly, got {:?}", diagnostics),
    }
}

/// Text of one function, from its label up to the next `.global` or the data section.
fn function_body<'a>(asm: &'a str, label: &str) -> &'a str {
    let start = asm
        .find(&format!("\n{}:\n", label))
        .unwrap_or_else(|| panic!("no label '{}' in:\n{}", label, asm));
    let rest = &asm[start + 1..];
    let end = rest
        .find(".global")
        .or_else(|| rest.find(".section .data"))
        .unwrap_or(rest.len());
    &rest[..end]
}

fn lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).collect()
}

/// Local labels defined anywhere in the output.
fn defined_labels(asm: &str) -> Vec<&str> {
    asm.lines()
        .filter(|line| line.starts_with(".L") && line.ends_with(':'))
        .map(|line| line.trim_end_matches(':'))
        .collect()
}

// ─── Program layout ───────────────────────────────────────────────────────────

#[test]
fn test_add_function_layout() {
    let asm = assemble("fn add(a: int, b: int) -> int { return a + b; }");
    assert!(asm.starts_with(".intel_syntax noprefix\n.section .text\n"));
    assert!(asm.contains(".global fn_add\nfn_add:\n"));
    let body = lines(function_body(&asm, "fn_add"));
    assert_eq!(
        &body[..6],
        &[
            "fn_add:",
            "push rbp",
            "mov rbp, rsp",
            "sub rsp, 16",
            "mov QWORD PTR [rbp - 8], rdi",
            "mov QWORD PTR [rbp - 16], rsi",
        ]
    );
    assert!(body.contains(&"add rax, rcx"));
    assert!(body.contains(&"ret"));
    assert!(asm.trim_end().ends_with(".section .data"));
}

#[test]
fn test_binary_evaluates_right_first() {
    let asm = assemble("fn f() -> int { return 7 - 2; }");
    let body = lines(function_body(&asm, "fn_f"));
    let start = body
        .iter()
        .position(|line| *line == "mov rax, 2")
        .expect("right operand first");
    assert_eq!(
        &body[start..start + 5],
        &["mov rax, 2", "push rax", "mov rax, 7", "pop rcx", "sub rax, rcx"]
    );
}

#[test]
fn test_division_and_modulo() {
    let asm = assemble("fn f(a: int, b: int) -> int { return a / b + a % b; }");
    let body = function_body(&asm, "fn_f");
    assert_eq!(body.matches("cqo\n    idiv rcx").count(), 2);
    assert!(body.contains("mov rax, rdx"));
}

#[test]
fn test_comparison_sets_flag() {
    let asm = assemble("fn f(a: int, b: int) -> bool { return a < b; }");
    let body = function_body(&asm, "fn_f");
    assert!(body.contains("cmp rax, rcx\n    setl al\n    movzx eax, al"));
}

#[test]
fn test_frame_is_16_byte_aligned() {
    let asm = assemble("fn f() -> int { let a = 1; let b = 2; let c = 3; return a + b + c; }");
    assert!(function_body(&asm, "fn_f").contains("sub rsp, 32"));

    let asm = assemble("fn g() -> int { return 0; }");
    assert!(!function_body(&asm, "fn_g").contains("sub rsp"));
}

// ─── Parameters and calls ─────────────────────────────────────────────────────

#[test]
fn test_classify_parameters() {
    let params = vec![Type::Float, Type::Int, Type::Bool, Type::Float];
    assert_eq!(
        classify(&params),
        vec![
            ArgLocation::Xmm(0),
            ArgLocation::Register("rdi"),
            ArgLocation::Register("rsi"),
            ArgLocation::Xmm(1),
        ]
    );

    let many = vec![Type::Int; 8];
    let locations = classify(&many);
    assert_eq!(locations[5], ArgLocation::Register("r9"));
    assert_eq!(locations[6], ArgLocation::Stack(0));
    assert_eq!(locations[7], ArgLocation::Stack(1));

    let floats = vec![Type::Float; 9];
    assert_eq!(classify(&floats)[8], ArgLocation::Stack(0));
}

#[test]
fn test_stack_parameters_beyond_sixth() {
    let src = "
fn sum(a: int, b: int, c: int, d: int, e: int, f: int, g: int, h: int) -> int {
    return g + h;
}
fn main() -> int { return sum(1, 2, 3, 4, 5, 6, 7, 8); }
";
    let asm = assemble(src);
    let callee = function_body(&asm, "fn_sum");
    assert!(callee.contains("mov QWORD PTR [rbp - 40], r8"));
    assert!(callee.contains("mov QWORD PTR [rbp - 48], r9"));
    assert!(callee.contains("mov rax, QWORD PTR [rbp + 16]\n    mov QWORD PTR [rbp - 56], rax"));
    assert!(callee.contains("mov rax, QWORD PTR [rbp + 24]\n    mov QWORD PTR [rbp - 64], rax"));

    let caller = lines(function_body(&asm, "main"));
    assert_eq!(caller.iter().filter(|line| **line == "push rax").count(), 8);
    // Eight parked words, no padding, then the two stack arguments: 7 is pushed
    // last so it sits at [rsp] on entry.
    assert!(caller.contains(&"push QWORD PTR [rsp + 0]"));
    assert!(caller.contains(&"push QWORD PTR [rsp + 16]"));
    assert!(caller.contains(&"mov rdi, QWORD PTR [rsp + 72]"));
    assert!(caller.contains(&"mov r9, QWORD PTR [rsp + 32]"));
    assert!(caller.contains(&"call fn_sum"));
    assert!(caller.contains(&"add rsp, 80"));
}

#[test]
fn test_call_pads_odd_stack_depth() {
    let src = "
fn id(x: int) -> int { return x; }
fn main() -> int { return id(1); }
";
    let asm = assemble(src);
    let caller = lines(function_body(&asm, "main"));
    let at = caller.iter().position(|line| *line == "call fn_id").expect("call");
    assert_eq!(
        &caller[at - 3..=at + 1],
        &[
            "push rax",
            "sub rsp, 8",
            "mov rdi, QWORD PTR [rsp + 8]",
            "call fn_id",
            "add rsp, 16",
        ]
    );
}

#[test]
fn test_float_call_uses_xmm() {
    let src = "
fn half(x: float) -> float { return x / 2; }
fn main() -> int { let h = half(3); return 0; }
";
    let asm = assemble(src);
    let callee = function_body(&asm, "fn_half");
    assert!(callee.contains("movsd QWORD PTR [rbp - 8], xmm0"));
    assert!(callee.contains("divsd xmm0, xmm1"));
    assert!(callee.contains("movq xmm0, rax\n    mov rsp, rbp"));

    let caller = function_body(&asm, "main");
    // The int argument is converted before it is passed.
    assert!(caller.contains("mov rax, 3\n    cvtsi2sd xmm0, rax\n    movq rax, xmm0\n    push rax"));
    assert!(caller.contains("movsd xmm0, QWORD PTR [rsp + 8]"));
    assert!(caller.contains("call fn_half\n    add rsp, 16\n    movq rax, xmm0"));
}

#[test]
fn test_priority_overload_call_label() {
    let src = "
fn pick(x: int) -> int priority 1 { return 1; }
fn pick(x: int) -> int priority 2 { return 2; }
fn main() -> int { return pick(5); }
";
    let asm = assemble(src);
    assert!(asm.contains(".global fn0_pick\nfn0_pick:"));
    assert!(asm.contains(".global fn1_pick\nfn1_pick:"));
    assert!(function_body(&asm, "main").contains("call fn1_pick"));
}

// ─── Floats ───────────────────────────────────────────────────────────────────

#[test]
fn test_mixed_operands_take_float_path() {
    let asm = assemble("fn f(a: int, b: float) -> float { return a + b; }");
    let body = function_body(&asm, "fn_f");
    assert!(body.contains("movsd QWORD PTR [rbp - 16], xmm0"));
    assert!(body.contains("cvtsi2sd xmm0, rax"));
    assert!(body.contains("movq xmm1, rcx"));
    assert!(body.contains("addsd xmm0, xmm1\n    movq rax, xmm0"));
}

#[test]
fn test_float_literal_bits() {
    let asm = assemble("fn f() -> float { return 1.5; }");
    assert!(function_body(&asm, "fn_f").contains("mov rax, 0x3ff8000000000000"));
}

#[test]
fn test_float_comparison_and_negation() {
    let asm = assemble("fn f(a: float) -> bool { return -a >= 0.5; }");
    let body = function_body(&asm, "fn_f");
    assert!(body.contains("comisd xmm0, xmm1\n    setae al"));
    assert!(body.contains("subsd xmm0, xmm1"));
}

#[test]
fn test_float_comparisons_are_false_for_nan() {
    let src = "
fn less(a: float, b: float) -> bool { return a < b; }
fn at_most(a: float, b: float) -> bool { return a <= b; }
fn same(a: float, b: float) -> bool { return a == b; }
fn differ(a: float, b: float) -> bool { return a != b; }
";
    let asm = assemble(src);
    let expected = [
        ("fn_less", "comisd xmm1, xmm0\n    seta al\n"),
        ("fn_at_most", "comisd xmm1, xmm0\n    setae al\n"),
        ("fn_same", "comisd xmm0, xmm1\n    sete al\n    setnp cl\n    and al, cl\n"),
        ("fn_differ", "comisd xmm0, xmm1\n    setne al\n    setp cl\n    or al, cl\n"),
    ];
    for (label, sequence) in expected {
        let body = function_body(&asm, label);
        assert!(body.contains(&format!("{}    movzx eax, al", sequence)), "{}", body);
    }
    assert!(!asm.contains("setb"));
}

#[test]
fn test_float_to_int_conversion() {
    let asm = assemble("fn f() -> int { let x: int = 2.5; return x; }");
    assert!(function_body(&asm, "fn_f").contains("cvttsd2si rax, xmm0"));
}

// ─── Literals and data ────────────────────────────────────────────────────────

#[test]
fn test_string_pool() {
    let src = r#"
fn greet() -> string { return "hi"; }
fn again() -> string { let a = "hi"; return "say \"yo\"\n"; }
"#;
    let asm = assemble(src);
    assert!(function_body(&asm, "fn_greet").contains("lea rax, [rip + str_0]"));
    assert!(function_body(&asm, "fn_again").contains("lea rax, [rip + str_2]"));
    let data = &asm[asm.find(".section .data").expect("data section")..];
    assert_eq!(
        lines(data),
        vec![
            ".section .data",
            "str_0: .asciz \"hi\"",
            "str_1: .asciz \"hi\"",
            "str_2: .asciz \"say \\\"yo\\\"\\n\"",
        ]
    );
}

#[test]
fn test_scalar_literals() {
    let asm = assemble("fn f() -> void { let a = 'A'; let b = true; let c = false; let d = null; }");
    let body = function_body(&asm, "fn_f");
    assert!(body.contains("mov rax, 65"));
    assert!(body.contains("mov rax, 1"));
    assert!(body.contains("mov rax, 0"));
    assert!(body.contains("xor eax, eax\n    mov QWORD PTR [rbp - 32], rax"));
}

#[test]
fn test_globals_initialized_in_main() {
    let src = "
let limit: int = 10;
let scale = 2.5;
fn main() -> int { return limit; }
";
    let asm = assemble(src);
    let main = function_body(&asm, "main");
    let first = main.find("mov QWORD PTR [rip + gv_limit], rax").expect("limit init");
    let second = main.find("mov QWORD PTR [rip + gv_scale], rax").expect("scale init");
    assert!(first < second);
    assert!(main.contains("mov rax, QWORD PTR [rip + gv_limit]"));
    assert!(asm.ends_with("gv_limit: .quad 0\ngv_scale: .quad 0\n"));
}

#[test]
fn test_global_initializer_ignores_main_parameters() {
    let src = "
let x: int = 5;
let g: int = x;
fn main(x: int) -> int { return g; }
";
    let asm = assemble(src);
    let main = function_body(&asm, "main");
    assert!(main.contains("mov rax, QWORD PTR [rip + gv_x]\n    mov QWORD PTR [rip + gv_g], rax"));
    // The parameter is still what `x` means inside the body.
    assert!(main.contains("mov QWORD PTR [rbp - 8], rdi"));
}

// ─── Symbols ──────────────────────────────────────────────────────────────────

#[test]
fn test_register_named_function_gets_prefixed_symbol() {
    let src = "
fn rcx() -> int { return 1; }
fn main() -> int { return rcx(); }
";
    let asm = assemble(src);
    assert!(asm.contains(".global fn_rcx\nfn_rcx:\n"));
    let main = lines(function_body(&asm, "main"));
    assert!(main.contains(&"call fn_rcx"));
    assert!(!main.contains(&"call rcx"));
}

#[test]
fn test_operator_keyword_names_get_prefixed_symbols() {
    let src = "
fn lt(a: int) -> int { return a; }
fn eq(a: int) -> int { return a; }
fn main() -> int { return lt(1) + eq(2); }
";
    let asm = assemble(src);
    assert!(asm.contains("\nfn_lt:\n"));
    assert!(asm.contains("\nfn_eq:\n"));
    assert!(!asm.contains("\nlt:\n"));
    assert!(!asm.contains("\neq:\n"));
}

#[test]
fn test_global_named_like_string_pool_entry() {
    let src = r#"
let str_0: int = 7;
fn main() -> int { let s = "hi"; return str_0; }
"#;
    let asm = assemble(src);
    assert!(asm.contains("str_0: .asciz \"hi\""));
    assert!(asm.contains("gv_str_0: .quad 0"));
    assert!(function_body(&asm, "main").contains("mov rax, QWORD PTR [rip + gv_str_0]"));
}

#[test]
fn test_overload_symbols_disjoint_from_single_functions() {
    let src = "
fn f__0() -> int { return 0; }
fn f(a: int) -> int priority 1 { return a; }
fn f(a: string) -> int priority 1 { return 1; }
";
    let asm = assemble(src);
    let defined: Vec<&str> = asm
        .lines()
        .filter_map(|line| line.strip_prefix(".global "))
        .collect();
    assert_eq!(defined, vec!["fn_f__0", "fn0_f", "fn1_f"]);
}

// ─── Control flow ─────────────────────────────────────────────────────────────

#[test]
fn test_if_else_lowering() {
    let src = "fn f(x: int) -> int { if x > 0 { return 1; } else { return 2; } return 3; }";
    let asm = assemble(src);
    let body = lines(function_body(&asm, "fn_f"));
    let je = body.iter().position(|line| *line == "je .L0").expect("je");
    assert_eq!(body[je - 1], "cmp rax, 0");
    let jmp = body.iter().position(|line| *line == "jmp .L1").expect("jmp");
    assert_eq!(body[jmp + 1], ".L0:");
    assert!(body.contains(&".L1:"));
}

#[test]
fn test_while_lowering() {
    let asm = assemble("fn f(n: int) -> int { let i = 0; while i < n { i = i + 1; } return i; }");
    let body = lines(function_body(&asm, "fn_f"));
    let start = body.iter().position(|line| *line == ".L0:").expect("loop start");
    assert!(body[start..].contains(&"je .L1"));
    let back = body.iter().position(|line| *line == "jmp .L0").expect("back edge");
    assert_eq!(body[back + 1], ".L1:");
}

#[test]
fn test_for_loop_lowering() {
    let asm = assemble("fn f(n: int) -> int { let t = 0; for i in 0..n { t = t + i; } return t; }");
    let body = function_body(&asm, "fn_f");
    // n at -8, t at -16, counter at -24, bound at -32
    assert!(body.contains("mov rax, 0\n    mov QWORD PTR [rbp - 24], rax"));
    assert!(body.contains("mov rax, QWORD PTR [rbp - 8]\n    mov QWORD PTR [rbp - 32], rax"));
    assert!(body.contains(
        ".L0:\n    mov rax, QWORD PTR [rbp - 24]\n    cmp rax, QWORD PTR [rbp - 32]\n    jge .L1\n"
    ));
    assert!(body.contains("add QWORD PTR [rbp - 24], 1\n    jmp .L0\n.L1:\n"));
}

#[test]
fn test_match_first_arm_wins() {
    let src = "
fn classify(x: int) -> int {
    match x {
        0 => { return 10; }
        0 => { return 20; }
        n => { return n; }
    }
    return 1;
}
";
    let asm = assemble(src);
    let body = lines(function_body(&asm, "fn_classify"));
    // Scrutinee slot follows the parameter.
    assert!(body.contains(&"mov QWORD PTR [rbp - 16], rax"));
    // Each literal arm falls through to the next arm's label on mismatch.
    let first = body.iter().position(|line| *line == "jne .L1").expect("first arm test");
    let second = body.iter().position(|line| *line == "jne .L2").expect("second arm test");
    assert!(first < second);
    assert!(body[first..second].contains(&"mov rax, 10"));
    assert!(body[first..second].contains(&"jmp .L0"));
    // The binding arm copies the scrutinee into its own slot.
    assert!(body.contains(&"mov QWORD PTR [rbp - 24], rax"));
    assert_eq!(body.last(), Some(&"ret"));
    assert!(body.contains(&".L0:"));
}

#[test]
fn test_match_tuple_reads_elements() {
    let src = "fn f(p: (int, int)) -> int { match p { (1, b) => { return b; } _ => { return 0; } } return 0; }";
    let asm = assemble(src);
    let body = function_body(&asm, "fn_f");
    assert!(body.contains("mov rax, QWORD PTR [rax + 0]"));
    assert!(body.contains("mov rax, QWORD PTR [rax + 8]"));
}

#[test]
fn test_short_circuit_logic() {
    let asm = assemble("fn f(a: bool, b: bool) -> bool { return a and b or not a; }");
    let body = lines(function_body(&asm, "fn_f"));
    assert!(body.contains(&"sete al"));
    assert!(body.iter().filter(|line| line.starts_with("je .L") || line.starts_with("jne .L")).count() >= 2);
}

#[test]
fn test_labels_unique_across_functions() {
    let src = "
fn a(x: int) -> int { if x > 0 { return 1; } return 0; }
fn b(x: int) -> int { while x > 0 { x = x - 1; } return x; }
fn c(x: int) -> int { for i in 0..x { x = x + 1; } return x; }
";
    let asm = assemble(src);
    let labels = defined_labels(&asm);
    assert_eq!(labels.len(), 6);
    let mut unique = labels.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), labels.len());
}

// ─── Partial output and failures ──────────────────────────────────────────────

#[test]
fn test_function_with_type_error_is_not_emitted() {
    let src = r#"
fn bad() -> int { return "x"; }
fn good() -> int { return 1; }
"#;
    let (program, _) = parser::parse(src);
    let analysis = TypeChecker::new().check_program(&program);
    assert_eq!(analysis.diagnostics.len(), 1);
    let asm = match Compiler::generate(&program, &analysis) {
        Ok(asm) => asm,
        Err(err) => panic!("expected assembly, got {:?}", err),
    };
    assert!(!asm.contains("fn_bad:"));
    assert!(asm.contains("fn_good:"));

    match compile(&program) {
        Err(diagnostics) => assert_eq!(diagnostics[0].kind, DiagnosticKind::Type),
        Ok(asm) => panic!("expected diagnostics, got {}", asm),
    }
}

fn program_with_return(value: Expr) -> Program {
    let func = Function {
        name: "f".to_string(),
        params: Vec::new(),
        return_type: Spanned::new(Type::Int, Span::default()),
        priority: None,
        body: Block {
            stmts: vec![Spanned::new(Stmt::Return(Some(value)), Span::default())],
            span: Span::default(),
        },
    };
    Program {
        decls: vec![Spanned::new(Decl::Function(func), Span::default())],
    }
}

fn literal(id: NodeId, n: i64) -> Expr {
    Expr::new(id, ExprKind::Literal(Literal::Int(n)), Span::new(0, 1, 3, 7))
}

#[test]
fn test_missing_type_is_internal_error() {
    let program = program_with_return(literal(0, 1));
    let mut analysis = TypeChecker::new().check_program(&program);
    analysis.expr_types.clear();
    match Compiler::generate(&program, &analysis) {
        Err(CodegenError::Internal { message, span }) => {
            assert!(message.starts_with("no type recorded"));
            assert_eq!((span.line, span.column), (3, 7));
        }
        other => panic!("expected Internal, got {:?}", other),
    }
}

#[test]
fn test_unresolved_call_is_internal_error() {
    let call = Expr::new(
        1,
        ExprKind::Call {
            callee: "f".to_string(),
            args: Vec::new(),
        },
        Span::default(),
    );
    let program = program_with_return(call);
    let mut analysis = TypeChecker::new().check_program(&program);
    assert!(analysis.is_clean());
    analysis.call_targets.clear();
    match Compiler::generate(&program, &analysis) {
        Err(CodegenError::Internal { message, .. }) => {
            assert_eq!(message, "call to 'f' was never resolved")
        }
        other => panic!("expected Internal, got {:?}", other),
    }
}

#[test]
fn test_mismatched_analysis_rejected() {
    let program = program_with_return(literal(0, 1));
    let analysis = Analysis::default();
    let diagnostic: ast::Diagnostic = match Compiler::generate(&program, &analysis) {
        Err(err) => err.into(),
        Ok(asm) => panic!("expected failure, got {}", asm),
    };
    assert_eq!(diagnostic.kind, DiagnosticKind::Internal);
    assert!(diagnostic.is_fatal());
}
