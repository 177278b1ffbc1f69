//! 测试辅助工具
//!
//! 提供端到端测试的辅助函数

#![allow(dead_code)]

use bcasm::{compile_with_config, AssembleError, CompileOutput, RunConfig, SourceFile};

/// 用默认配置汇编源码
pub fn assemble(code: &str) -> Result<CompileOutput, AssembleError> {
    assemble_with(code, &RunConfig::default())
}

pub fn assemble_with(code: &str, config: &RunConfig) -> Result<CompileOutput, AssembleError> {
    compile_with_config(&SourceFile::from_text("main.asm", code), config)
}

/// 汇编失败时返回诊断的文本形式（每条一行）
pub fn diagnostics(code: &str) -> Vec<String> {
    match assemble(code) {
        Ok(_) => Vec::new(),
        Err(AssembleError::Diagnostics(list)) => list.iter().map(|e| e.to_string()).collect(),
        Err(e) => vec![e.to_string()],
    }
}
