//! 字节码生成：操作码、字节码块、发射器

pub mod bytecode;
pub mod compiler;

pub use bytecode::{chunk::BytecodeChunk, OpCode};
pub use compiler::{CompileError, Compiler, DataStoreLocation, ObjLoc};
