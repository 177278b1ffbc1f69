//! Assembler lexer
//!
//! 设计目标：
//! - O(n) 单遍扫描，每个字符只看一次
//! - 尽力而为：非法输入也产生记号，由语法分析报告
//! - 精准位置追踪：每个记号携带 文件/行/列

pub mod core;
pub mod lexer;
pub mod scanner;
pub mod token_stream;

pub use self::core::{CharStream, SourceFile, SourceLocation, SourcePosition};
pub use lexer::Lexer;
pub use scanner::Token;
pub use token_stream::{TokenStream, TokenStreamInfo};
