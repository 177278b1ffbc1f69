//! Bcasm Core - Assembler front end (pure logic, no IO)
//!
//! Contains the lexer, token stream, parser, analyzer and bytecode emitter.
//! Only operates on in-memory data structures, no file IO or terminal output.
//!
//! Configuration is passed explicitly via parameters, not via global state.

pub mod compiler;
pub mod kit;
pub mod runtime;

// Re-export common types
pub use compiler::ast::{AstSequence, NodeId, NodeKind};
pub use compiler::error::{CompilerError, ErrorLevel, ErrorList, MessageKind};
pub use compiler::unit::CompilationUnit;
pub use kit::lexer::{SourceFile, SourceLocation, Token, TokenStream};
pub use runtime::bytecode::chunk::BytecodeChunk;
pub use runtime::compiler::{CompileError, Compiler, DataStoreLocation, ObjLoc};

// Re-export config types from bcasm-config
pub use bcasm_config::{CompilerConfig, LimitConfig, Phase};
