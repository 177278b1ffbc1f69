//! 汇编语言的记号定义

pub mod token_kind;

pub use crate::kit::lexer::lexer::tokenize;
pub use token_kind::TokenClass;
