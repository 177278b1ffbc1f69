//! 字节码生成错误
//!
//! 这些是内部失败，不是用户源码的诊断。

use crate::kit::lexer::SourceLocation;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// 诊断列表中有致命错误，拒绝生成
    #[error("refusing to emit bytecode: {0} fatal diagnostic(s) reported")]
    FatalDiagnostics(usize),

    /// 对象位置只能写一次
    #[error("object location of node #{node} is already assigned")]
    LocationReassigned { node: usize },

    /// 标识符在生成阶段仍未解析
    #[error("{location}: unresolved reference '{name}'")]
    UnresolvedReference {
        name: String,
        location: SourceLocation,
    },

    /// 伪指令参数个数超出 u8
    #[error("{location}: directive '{name}' has {count} arguments (max 255)")]
    TooManyArguments {
        name: String,
        count: usize,
        location: SourceLocation,
    },

    /// 节点不是可定位的表达式
    #[error("{location}: node #{node} has no object location")]
    NotAnOperand {
        node: usize,
        location: SourceLocation,
    },
}
