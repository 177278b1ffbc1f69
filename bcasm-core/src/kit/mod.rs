//! 通用工具：字符流、词法分析、记号流

pub mod lexer;
