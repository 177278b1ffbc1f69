//! 编译诊断
//!
//! 用户源码的问题一律记为诊断追加到 `ErrorList`，从不通过 panic 或
//! `Err` 中断流水线。只有 `Error` 及以上级别会阻止字节码生成。

use crate::kit::lexer::SourceLocation;
use std::fmt;
use std::io;

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
    Fatal,
}

impl ErrorLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorLevel::Info => "info",
            ErrorLevel::Warning => "warning",
            ErrorLevel::Error => "error",
            ErrorLevel::Fatal => "fatal",
        }
    }

    /// 是否阻止生成字节码
    pub fn is_fatal(&self) -> bool {
        *self >= ErrorLevel::Error
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 诊断消息类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    ExpectedIdentifier,
    /// 上下文为期望的记号类别名
    ExpectedToken,
    ExpectedEndOfStatement,
    UnexpectedEof,
    UnexpectedEol,
    /// 上下文为记号的值
    UnexpectedToken,
    /// 插值内的名字查找失败
    UnresolvedIdentifier,
    /// 语义分析时名字查找失败
    UndeclaredIdentifier,
    IllegalExpression,
}

impl MessageKind {
    pub fn name(&self) -> &'static str {
        match self {
            MessageKind::ExpectedIdentifier => "expected_identifier",
            MessageKind::ExpectedToken => "expected_token",
            MessageKind::ExpectedEndOfStatement => "expected_end_of_statement",
            MessageKind::UnexpectedEof => "unexpected_eof",
            MessageKind::UnexpectedEol => "unexpected_eol",
            MessageKind::UnexpectedToken => "unexpected_token",
            MessageKind::UnresolvedIdentifier => "unresolved_identifier",
            MessageKind::UndeclaredIdentifier => "undeclared_identifier",
            MessageKind::IllegalExpression => "illegal_expression",
        }
    }

    fn message(&self, context: Option<&str>) -> String {
        let ctx = context.unwrap_or("");
        match self {
            MessageKind::ExpectedIdentifier => "expected an identifier".to_string(),
            MessageKind::ExpectedToken => format!("expected token of type '{ctx}'"),
            MessageKind::ExpectedEndOfStatement => "expected end of statement".to_string(),
            MessageKind::UnexpectedEof => "unexpected end of file".to_string(),
            MessageKind::UnexpectedEol => "unexpected end of line".to_string(),
            MessageKind::UnexpectedToken => format!("unexpected token '{ctx}'"),
            MessageKind::UnresolvedIdentifier => {
                format!("could not resolve identifier '{ctx}' in interpolation")
            }
            MessageKind::UndeclaredIdentifier => format!("undeclared identifier '{ctx}'"),
            MessageKind::IllegalExpression => match context {
                Some(ctx) => format!("illegal expression: {ctx}"),
                None => "illegal expression".to_string(),
            },
        }
    }
}

/// 单条诊断
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerError {
    pub level: ErrorLevel,
    pub kind: MessageKind,
    pub location: SourceLocation,
    pub context: Option<String>,
}

impl CompilerError {
    pub fn new(
        level: ErrorLevel,
        kind: MessageKind,
        location: SourceLocation,
        context: Option<String>,
    ) -> Self {
        Self {
            level,
            kind,
            location,
            context,
        }
    }

    /// `Error` 级别诊断
    pub fn error(kind: MessageKind, location: SourceLocation) -> Self {
        Self::new(ErrorLevel::Error, kind, location, None)
    }

    /// 带上下文的 `Error` 级别诊断
    pub fn error_with(
        kind: MessageKind,
        location: SourceLocation,
        context: impl Into<String>,
    ) -> Self {
        Self::new(ErrorLevel::Error, kind, location, Some(context.into()))
    }

    pub fn message(&self) -> String {
        self.kind.message(self.context.as_deref())
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.level, self.message())
    }
}

impl std::error::Error for CompilerError {}

/// 诊断列表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList {
    errors: Vec<CompilerError>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: CompilerError) {
        self.errors.push(error);
    }

    /// 合并另一个列表（子编译单元的诊断）
    pub fn extend(&mut self, other: ErrorList) {
        self.errors.extend(other.errors);
    }

    pub fn errors(&self) -> &[CompilerError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// 按位置稳定排序（文件、行、列），同一位置保持追加顺序
    pub fn sort_errors(&mut self) {
        self.errors.sort_by(|a, b| a.location.cmp(&b.location));
    }

    /// 是否存在阻止字节码生成的诊断
    pub fn has_fatal_errors(&self) -> bool {
        self.errors.iter().any(|e| e.level.is_fatal())
    }

    /// 阻止字节码生成的诊断数量
    pub fn fatal_count(&self) -> usize {
        self.errors.iter().filter(|e| e.level.is_fatal()).count()
    }

    pub fn count_of(&self, kind: MessageKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }

    /// 每条诊断一行写出
    pub fn write_output<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for error in &self.errors {
            writeln!(out, "{}", error)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompilerError> {
        self.errors.iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a CompilerError;
    type IntoIter = std::slice::Iter<'a, CompilerError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: usize, column: usize) -> SourceLocation {
        SourceLocation::new("t.asm", line, column)
    }

    #[test]
    fn test_display_format() {
        let e = CompilerError::error_with(MessageKind::UndeclaredIdentifier, at(3, 5), "foo");
        assert_eq!(e.to_string(), "t.asm:3:5: error: undeclared identifier 'foo'");
        let e = CompilerError::error_with(MessageKind::ExpectedToken, at(1, 1), "}");
        assert_eq!(e.message(), "expected token of type '}'");
    }

    #[test]
    fn test_fatal_levels() {
        let mut list = ErrorList::new();
        list.add(CompilerError::new(
            ErrorLevel::Warning,
            MessageKind::IllegalExpression,
            at(1, 1),
            None,
        ));
        assert!(!list.has_fatal_errors());
        list.add(CompilerError::error(MessageKind::UnexpectedEof, at(2, 1)));
        assert!(list.has_fatal_errors());
        assert_eq!(list.fatal_count(), 1);
        assert!(ErrorLevel::Fatal.is_fatal());
        assert!(!ErrorLevel::Info.is_fatal());
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        let mut list = ErrorList::new();
        list.add(CompilerError::error(MessageKind::UnexpectedEol, at(4, 1)));
        list.add(CompilerError::error_with(MessageKind::UnexpectedToken, at(2, 3), "a"));
        list.add(CompilerError::error_with(MessageKind::UnexpectedToken, at(2, 3), "b"));
        list.add(CompilerError::error(MessageKind::UnexpectedEof, at(1, 9)));
        list.sort_errors();
        let lines: Vec<usize> = list.iter().map(|e| e.line()).collect();
        assert_eq!(lines, vec![1, 2, 2, 4]);
        // equal locations keep insertion order
        assert_eq!(list.errors()[1].context.as_deref(), Some("a"));
        assert_eq!(list.errors()[2].context.as_deref(), Some("b"));

        let once = list.clone();
        list.sort_errors();
        assert_eq!(list, once);
    }

    #[test]
    fn test_write_output() {
        let mut list = ErrorList::new();
        list.add(CompilerError::error(MessageKind::ExpectedEndOfStatement, at(1, 4)));
        list.add(CompilerError::error(MessageKind::ExpectedIdentifier, at(2, 1)));
        let mut buf = Vec::new();
        list.write_output(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("t.asm:1:4: error: expected end of statement"));
        assert_eq!(text, list.to_string());
    }

    #[test]
    fn test_extend_and_count() {
        let mut a = ErrorList::new();
        let mut b = ErrorList::new();
        b.add(CompilerError::error(MessageKind::UnresolvedIdentifier, at(1, 1)));
        a.extend(b);
        assert_eq!(a.len(), 1);
        assert_eq!(a.count_of(MessageKind::UnresolvedIdentifier), 1);
        assert_eq!(a.count_of(MessageKind::UnexpectedEof), 0);
    }
}
