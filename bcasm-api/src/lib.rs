//! Bcasm API - Assembly orchestration layer
//!
//! Provides unified compile interface, including:
//! - Pipeline orchestration (lex, parse, analyze, emit)
//! - Configuration abstraction (RunConfig)
//! - Unified error handling (AssembleError)
//!
//! For CLI convenience, this crate provides a global singleton API.
//! For library use, prefer the explicit `compile_with_config(source, &config)` API.

use tracing::{debug, info, warn};

use bcasm_core::compiler::analyzer::Analyzer;
use bcasm_core::compiler::lexer::tokenize;
use bcasm_core::compiler::parser::Parser;
use bcasm_core::{CompilationUnit, Compiler, SourceFile};

// Re-export config
pub mod config;
pub use config::{config as get_config, init as init_config, is_initialized, RunConfig};

// Re-export config types from bcasm_config
pub use bcasm_config::{CompilerConfig, LimitConfig, LogLevel, Phase, ProjectConfig};

// Re-export error and types
pub mod error;
pub mod types;
pub use error::{phase_of, AssembleError, ErrorReport};
pub use types::CompileOutput;

// Re-export core types
pub use bcasm_config;
pub use bcasm_core::compiler::unit::StaticData;
pub use bcasm_core::{BytecodeChunk, CompilerError, ErrorList};

/// Compile with explicit configuration
///
/// This is the recommended API for library users. Diagnostics are sorted by
/// location before they are returned.
pub fn compile_with_config(
    source: &SourceFile,
    config: &RunConfig,
) -> Result<CompileOutput, AssembleError> {
    info!(target: "bcasm::compiler", file = %source.filename(), bytes = source.len(),
        "Starting assembly");

    let tokens = tokenize(source);
    let mut unit = CompilationUnit::new();
    let mut ast = Parser::new(tokens, &mut unit).parse();
    Analyzer::new(&mut unit).analyze(&mut ast);
    unit.errors_mut().sort_errors();

    if unit.errors().has_fatal_errors() {
        warn!(target: "bcasm::compiler", diagnostics = unit.errors().len(),
            "Assembly failed");
        return Err(AssembleError::Diagnostics(unit.take_errors()));
    }

    if config.compiler.optimize {
        ast.optimize();
    }

    let chunk = Compiler::new(&unit, &config.compiler).compile(&mut ast, &unit)?;

    if config.dump_bytecode {
        chunk.disassemble(source.filename());
    }

    let statics = unit.storage().borrow().statics().to_vec();
    debug!(target: "bcasm::compiler", code_bytes = chunk.len(), statics = statics.len(),
        "Assembly completed");

    Ok(CompileOutput {
        chunk,
        statics,
        warnings: unit.take_errors(),
    })
}

// ==================== Global config API ====================

/// Compile source text (uses global config)
pub fn compile(source: &str) -> Result<CompileOutput, AssembleError> {
    compile_with_config(&SourceFile::from_text("<input>", source), get_config())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &str) -> SourceFile {
        SourceFile::from_text("test.asm", text)
    }

    #[test]
    fn test_compile_with_explicit_config() {
        let out = compile_with_config(&source("lbl:\njmp lbl\n"), &RunConfig::default()).unwrap();
        assert!(!out.chunk.is_empty());
        assert_eq!(out.statics, vec![StaticData::Label("lbl".into())]);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_compile_reports_sorted_diagnostics() {
        let err = compile_with_config(&source("jmp b\ncmp\njmp a\n"), &RunConfig::default())
            .unwrap_err();
        let AssembleError::Diagnostics(list) = &err else {
            panic!("expected diagnostics, got {err:?}");
        };
        let lines: Vec<usize> = list.iter().map(|e| e.line()).collect();
        assert_eq!(lines, vec![1, 2, 2, 3]);
        assert_eq!(err.phase(), Phase::Analyzer);
    }

    #[test]
    fn test_compile_without_debug_info() {
        let config = RunConfig {
            compiler: CompilerConfig {
                emit_debug_info: false,
                optimize: true,
            },
            ..RunConfig::default()
        };
        let out = compile_with_config(&source("cmp $1 42\n"), &config).unwrap();
        assert!(out.chunk.lines.is_empty());
        assert_eq!(out.statics, vec![StaticData::Integer(42)]);
    }

    #[test]
    fn test_compile_uses_global_config() {
        let out = compile("jmp %3\n").unwrap();
        assert_eq!(out.chunk.len(), 7);
    }
}
