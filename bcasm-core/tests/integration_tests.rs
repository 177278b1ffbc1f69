//! 端到端测试：源码 -> 诊断 / 字节码

mod common;
use bcasm_core::compiler::unit::StaticData;
use bcasm_core::runtime::OpCode;
use bcasm_core::{MessageKind, NodeKind};
use common::{assemble, assemble_ok};

#[test]
fn test_label_then_jump_has_no_diagnostics() {
    let (chunk, _) = assemble_ok("lbl:\njmp lbl\n");
    assert!(!chunk.is_empty());
    assert_eq!(chunk.code[0], OpCode::Label as u8);
}

#[test]
fn test_jump_to_missing_label() {
    let out = assemble("jmp missing\n");
    assert_eq!(out.unit.errors().len(), 1);
    assert_eq!(
        out.unit.errors().errors()[0].kind,
        MessageKind::UndeclaredIdentifier
    );
    assert!(out.chunk.is_err());
}

#[test]
fn test_lone_cmp_terminates_with_diagnostics() {
    let out = assemble("cmp");
    assert!(out.unit.errors().len() >= 1);
    assert!(out.unit.errors().has_fatal_errors());
    assert!(out.chunk.is_err());
}

#[test]
fn test_interpolation_of_declared_name() {
    let (chunk, out) = assemble_ok("start:\njmp ${start}\n");
    assert_eq!(out.statics(), vec![StaticData::Label("start".into())]);
    // LABEL STATIC[0]; JMP STATIC[0]
    assert_eq!(&chunk.code[1..6], &chunk.code[7..12]);
}

#[test]
fn test_interpolation_of_undeclared_name() {
    let out = assemble("jmp ${nowhere}\n");
    assert_eq!(out.unit.errors().len(), 1);
    assert_eq!(
        out.unit.errors().count_of(MessageKind::UnresolvedIdentifier),
        1
    );
    assert!(out.chunk.is_err());
}

#[test]
fn test_hoisting_emits_declarations_first() {
    let (chunk, out) = assemble_ok("jmp tail\ncmp $0 $1\ntail:\n");
    let first = out.ast.statements()[0];
    assert!(matches!(out.ast.kind(first), NodeKind::LabelDecl { .. }));
    assert_eq!(chunk.code[0], OpCode::Label as u8);
    assert_eq!(chunk.code[6], OpCode::Jmp as u8);
    assert_eq!(chunk.code[12], OpCode::Cmp as u8);
}

#[test]
fn test_diagnostics_are_sorted_by_location() {
    let out = assemble("jmp zed\n\ncmp\njmp alpha\n");
    let lines: Vec<usize> = out.unit.errors().iter().map(|e| e.line()).collect();
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_many_errors_are_all_reported() {
    let source = "jmp\nje\njne\njg\njge\n";
    let out = assemble(source);
    assert_eq!(out.unit.errors().count_of(MessageKind::UnexpectedEol), 5);
}

#[test]
fn test_comments_and_blank_lines() {
    let (chunk, _) = assemble_ok(
        "; header comment\n\n// another\nloop: /* inline */\n    jmp loop ; back\n",
    );
    assert_eq!(chunk.len(), 13);
}

#[test]
fn test_unicode_source() {
    let (_, out) = assemble_ok("cmp \"héllo 世界\" 0x10\n");
    assert_eq!(
        out.statics(),
        vec![StaticData::String("héllo 世界".into()), StaticData::Integer(16)]
    );
}

#[test]
fn test_oversized_directive_is_a_diagnostic() {
    let source = format!(".data{}\n", " 1".repeat(256));
    let out = assemble(&source);
    assert_eq!(out.unit.errors().count_of(MessageKind::IllegalExpression), 1);
    assert!(matches!(
        out.chunk,
        Err(bcasm_core::CompileError::FatalDiagnostics(1))
    ));

    let source = format!(".data{}\n", " 1".repeat(255));
    let (chunk, _) = assemble_ok(&source);
    // 255 x LOAD_INT (op + location + i64) precede the directive
    let at = 255 * 14;
    assert_eq!(chunk.code[at], OpCode::Directive as u8);
    assert_eq!(chunk.code[at + 9], 255);
}
