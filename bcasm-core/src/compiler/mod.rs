//! 编译器前端：记号类别、诊断、编译单元、AST、语法分析与语义分析

pub mod analyzer;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod unit;

pub use analyzer::Analyzer;
pub use parser::Parser;
