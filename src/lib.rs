//! Bcasm - A bytecode assembler
//!
//! Turns a small line-oriented assembly language (labels, directives, jumps,
//! compares, register and local operands, `${...}` interpolation) into a
//! compact bytecode chunk.
//!
//! # Architecture
//!
//! ```text
//! bcasm-config/  - Pure configuration data
//! bcasm-core/    - Lexer, parser, analyzer, emitter (no IO)
//! bcasm-api/     - Pipeline orchestration and error reports
//! bcasm-cli/     - Command line shell
//! ```
//!
//! # Quick Start
//!
//! ```
//! use bcasm::{compile_with_config, RunConfig, SourceFile};
//!
//! let source = SourceFile::from_text("main.asm", "loop:\n    jmp loop\n");
//! let output = compile_with_config(&source, &RunConfig::default()).unwrap();
//! assert!(!output.chunk.is_empty());
//! ```

pub use bcasm_api::{
    compile, compile_with_config, get_config, init_config, is_initialized, phase_of,
    AssembleError, CompileOutput, CompilerConfig, ErrorReport, LimitConfig, LogLevel, Phase,
    ProjectConfig, RunConfig, StaticData,
};
pub use bcasm_core::runtime::OpCode;
pub use bcasm_core::{
    BytecodeChunk, CompilerError, DataStoreLocation, ErrorLevel, ErrorList, MessageKind, ObjLoc,
    SourceFile, SourceLocation,
};

pub use bcasm_api;
pub use bcasm_core;
