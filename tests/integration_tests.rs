//! 端到端测试：源码 -> 字节码字节

mod common;
use bcasm::{AssembleError, LimitConfig, MessageKind, OpCode, Phase, RunConfig, StaticData};
use common::{assemble, assemble_with, diagnostics};

#[test]
fn test_minimal_program_bytes() {
    let out = assemble("lbl:\njmp lbl\n").unwrap();
    assert_eq!(
        out.chunk.as_bytes(),
        &[0x20, 1, 0, 0, 0, 0, 0x40, 1, 0, 0, 0, 0, 0xF0]
    );
}

#[test]
fn test_empty_source_is_just_halt() {
    let out = assemble("").unwrap();
    assert_eq!(out.chunk.as_bytes(), &[OpCode::Halt as u8]);
    assert!(out.statics.is_empty());
}

#[test]
fn test_conditional_loop() {
    let source = r#"
.entry main
main:
    cmp $0 10
    jge done
    jne main
done:
"#;
    let out = assemble(source).unwrap();
    assert_eq!(
        out.statics,
        vec![
            StaticData::Label("main".into()),
            StaticData::Label("done".into()),
            StaticData::Integer(10),
        ]
    );
    let text = out.chunk.disassemble_to_string("main");
    for op in ["DIRECTIVE", "LABEL", "LOAD_INT", "CMP", "JGE", "JNE", "HALT"] {
        assert!(text.contains(op), "missing {op} in\n{text}");
    }
}

#[test]
fn test_directive_body_is_kept() {
    let out = assemble(".data { \"x\" 1 }\n").unwrap();
    let bytes = out.chunk.as_bytes();
    assert_eq!(bytes[0], OpCode::Directive as u8);
    // name "data", then zero arguments
    assert_eq!(&bytes[1..9], &[4, 0, 0, 0, b'd', b'a', b't', b'a']);
    assert_eq!(bytes[9], 0);
}

#[test]
fn test_error_output_format() {
    let lines = diagnostics("jmp missing\n");
    assert_eq!(
        lines,
        vec!["main.asm:1:5: error: undeclared identifier 'missing'".to_string()]
    );
}

#[test]
fn test_every_broken_line_is_reported() {
    let err = assemble("cmp $1\n@\njmp nope\nje\n").unwrap_err();
    let AssembleError::Diagnostics(list) = &err else {
        panic!("expected diagnostics");
    };
    let kinds: Vec<MessageKind> = list.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            MessageKind::UnexpectedEol,
            MessageKind::UnexpectedToken,
            MessageKind::UndeclaredIdentifier,
            MessageKind::UnexpectedEol,
        ]
    );
    assert_eq!(err.phase(), Phase::Parser);
}

#[test]
fn test_max_diagnostics_limits_reports() {
    let config = RunConfig {
        limits: LimitConfig { max_diagnostics: 2 },
        ..RunConfig::default()
    };
    let err = assemble_with("jmp a\njmp b\njmp c\n", &config).unwrap_err();
    assert_eq!(err.count(), 3);
    assert_eq!(err.to_reports(config.limits.max_diagnostics).len(), 2);
}

#[test]
fn test_json_report() {
    let err = assemble("jmp \"text\"\n").unwrap_err();
    let json = err.to_report().to_json().unwrap();
    assert!(json.contains("\"kind\":\"illegal_expression\""));
    assert!(json.contains("\"phase\":\"analyzer\""));
}
