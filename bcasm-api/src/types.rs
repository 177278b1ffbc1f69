//! API 类型定义
//!
//! 编译的输入输出类型。

use bcasm_core::compiler::unit::StaticData;
use bcasm_core::{BytecodeChunk, ErrorList};

/// 编译输出
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// 字节码块（以 HALT 结尾）
    pub chunk: BytecodeChunk,
    /// 静态数据区，下标即静态槽位
    pub statics: Vec<StaticData>,
    /// 非致命诊断
    pub warnings: ErrorList,
}
