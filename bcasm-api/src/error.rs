//! API 错误类型
//!
//! 提供统一的错误类型和结构化错误报告。

use bcasm_config::Phase;
use bcasm_core::{CompileError, CompilerError, ErrorList, MessageKind, SourceLocation};
use serde::Serialize;
use thiserror::Error;

/// 汇编错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    /// 源码诊断（已按位置排序，至少一条致命）
    #[error("{0}")]
    Diagnostics(ErrorList),

    /// 字节码生成失败
    #[error("Compiler error: {0}")]
    Compiler(#[from] CompileError),
}

/// 诊断类别所属的阶段
pub fn phase_of(kind: MessageKind) -> Phase {
    match kind {
        MessageKind::UndeclaredIdentifier | MessageKind::IllegalExpression => Phase::Analyzer,
        MessageKind::ExpectedIdentifier
        | MessageKind::ExpectedToken
        | MessageKind::ExpectedEndOfStatement
        | MessageKind::UnexpectedEof
        | MessageKind::UnexpectedEol
        | MessageKind::UnexpectedToken
        | MessageKind::UnresolvedIdentifier => Phase::Parser,
    }
}

fn compile_error_location(e: &CompileError) -> Option<&SourceLocation> {
    match e {
        CompileError::UnresolvedReference { location, .. }
        | CompileError::TooManyArguments { location, .. }
        | CompileError::NotAnOperand { location, .. } => Some(location),
        CompileError::FatalDiagnostics(_) | CompileError::LocationReassigned { .. } => None,
    }
}

impl AssembleError {
    /// 第一条诊断（按位置排序后）
    fn first_diagnostic(&self) -> Option<&CompilerError> {
        match self {
            AssembleError::Diagnostics(list) => list.errors().first(),
            AssembleError::Compiler(_) => None,
        }
    }

    fn location(&self) -> Option<&SourceLocation> {
        match self {
            AssembleError::Diagnostics(_) => self.first_diagnostic().map(|e| &e.location),
            AssembleError::Compiler(e) => compile_error_location(e),
        }
    }

    /// 获取错误行号（如果有）
    pub fn line(&self) -> Option<usize> {
        self.location().map(|l| l.line)
    }

    /// 获取错误列号（如果有）
    pub fn column(&self) -> Option<usize> {
        self.location().map(|l| l.column)
    }

    /// 获取错误阶段
    pub fn phase(&self) -> Phase {
        match self.first_diagnostic() {
            Some(e) => phase_of(e.kind),
            None => Phase::Compiler,
        }
    }

    /// 诊断条数（生成错误记为 1）
    pub fn count(&self) -> usize {
        match self {
            AssembleError::Diagnostics(list) => list.len(),
            AssembleError::Compiler(_) => 1,
        }
    }

    /// 转换为结构化错误报告（只取第一条）
    pub fn to_report(&self) -> ErrorReport {
        match self {
            AssembleError::Diagnostics(list) => match list.errors().first() {
                Some(e) => ErrorReport::from_diagnostic(e),
                None => ErrorReport {
                    phase: Phase::Compiler.as_str(),
                    file: None,
                    line: None,
                    column: None,
                    level: "error",
                    kind: "Diagnostics".to_string(),
                    message: "no diagnostics recorded".to_string(),
                },
            },
            AssembleError::Compiler(e) => ErrorReport::from_compile_error(e),
        }
    }

    /// 每条诊断一份报告
    ///
    /// `limit` 为 0 时不截断。
    pub fn to_reports(&self, limit: usize) -> Vec<ErrorReport> {
        let take = if limit == 0 { usize::MAX } else { limit };
        match self {
            AssembleError::Diagnostics(list) => list
                .iter()
                .take(take)
                .map(ErrorReport::from_diagnostic)
                .collect(),
            AssembleError::Compiler(e) => vec![ErrorReport::from_compile_error(e)],
        }
    }
}

/// 结构化错误报告
///
/// 上层应用（CLI、编辑器插件）可以根据自己的需求格式化，或直接序列化为 JSON。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// 错误阶段: parser, analyzer, compiler
    pub phase: &'static str,
    /// 源文件名（如果有）
    pub file: Option<String>,
    /// 错误行号（1-based，如果有）
    pub line: Option<usize>,
    /// 错误列号（1-based，如果有）
    pub column: Option<usize>,
    /// 诊断级别
    pub level: &'static str,
    /// 错误类型（可用于程序化处理）
    pub kind: String,
    /// 人类可读的错误消息
    pub message: String,
}

impl ErrorReport {
    pub fn from_diagnostic(e: &CompilerError) -> Self {
        Self {
            phase: phase_of(e.kind).as_str(),
            file: Some(e.location.file.to_string()),
            line: Some(e.line()),
            column: Some(e.column()),
            level: e.level.as_str(),
            kind: e.kind.name().to_string(),
            message: e.message(),
        }
    }

    pub fn from_compile_error(e: &CompileError) -> Self {
        let location = compile_error_location(e);
        Self {
            phase: Phase::Compiler.as_str(),
            file: location.map(|l| l.file.to_string()),
            line: location.map(|l| l.line),
            column: location.map(|l| l.column),
            level: "error",
            kind: "CompileError".to_string(),
            message: e.to_string(),
        }
    }

    /// 转换为 JSON 格式
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// 简洁格式（适合终端）
    pub fn to_short(&self) -> String {
        format!("{}: {}", self.phase, self.message)
    }
}

impl std::fmt::Display for ErrorReport {
    /// 默认的 CLI 友好格式
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.file, self.line, self.column) {
            (Some(file), Some(line), Some(col)) => {
                write!(f, "{}:{}:{}: {}: {}", file, line, col, self.level, self.message)
            }
            _ => write!(f, "[{}] {}: {}", self.phase, self.level, self.message),
        }
    }
}
