//! 测试辅助工具
//!
//! 提供端到端测试的辅助函数

#![allow(dead_code)]

use bcasm_core::compiler::analyzer::Analyzer;
use bcasm_core::compiler::lexer::tokenize;
use bcasm_core::compiler::parser::Parser;
use bcasm_core::compiler::unit::{CompilationUnit, StaticData};
use bcasm_core::{AstSequence, BytecodeChunk, CompileError, Compiler, CompilerConfig, SourceFile};

/// 一次完整汇编的结果
pub struct Assembled {
    pub ast: AstSequence,
    pub unit: CompilationUnit,
    pub chunk: Result<BytecodeChunk, CompileError>,
}

impl Assembled {
    pub fn statics(&self) -> Vec<StaticData> {
        self.unit.storage().borrow().statics().to_vec()
    }

    pub fn diagnostics(&self) -> Vec<String> {
        self.unit.errors().iter().map(|e| e.to_string()).collect()
    }
}

/// 汇编源码（完整流程：词法 + 语法 + 语义 + 生成）
///
/// 诊断先按位置排序，和对外 API 的行为一致。
pub fn assemble(code: &str) -> Assembled {
    let mut unit = CompilationUnit::new();
    let tokens = tokenize(&SourceFile::from_text("test.asm", code));
    let mut ast = Parser::new(tokens, &mut unit).parse();
    Analyzer::new(&mut unit).analyze(&mut ast);
    unit.errors_mut().sort_errors();
    let chunk = Compiler::new(&unit, &CompilerConfig::default()).compile(&mut ast, &unit);
    Assembled { ast, unit, chunk }
}

/// 汇编并断言成功
pub fn assemble_ok(code: &str) -> (BytecodeChunk, Assembled) {
    let mut out = assemble(code);
    assert!(
        out.unit.errors().is_empty(),
        "Unexpected diagnostics:\n{}",
        out.unit.errors()
    );
    let chunk = std::mem::replace(&mut out.chunk, Err(CompileError::FatalDiagnostics(0)));
    let chunk = chunk.unwrap_or_else(|e| panic!("Failed to emit: {e}"));
    (chunk, out)
}
