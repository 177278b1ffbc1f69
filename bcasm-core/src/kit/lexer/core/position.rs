//! 源代码位置追踪
//!
//! - `SourcePosition`: 扫描时的游标（行、列、字节偏移）
//! - `SourceLocation`: 记号与诊断携带的位置（文件、行、列），可排序

use std::fmt;
use std::sync::Arc;

/// 扫描游标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    /// 行号，1-based
    pub line: usize,
    /// 列号，1-based，Unicode码点计数
    pub column: usize,
    /// 字节偏移，0-based，UTF-8编码
    pub byte_offset: usize,
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::start()
    }
}

impl SourcePosition {
    pub fn new(line: usize, column: usize, byte_offset: usize) -> Self {
        Self {
            line,
            column,
            byte_offset,
        }
    }

    /// 文件起始位置
    pub fn start() -> Self {
        Self {
            line: 1,
            column: 1,
            byte_offset: 0,
        }
    }

    /// 前进一个字符
    pub fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.byte_offset += c.len_utf8();
    }
}

/// 源码位置：文件名 + 行 + 列
///
/// 字段顺序即排序顺序（文件、行、列），诊断排序依赖这一点。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub file: Arc<str>,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<Arc<str>>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// 由扫描游标生成位置
    pub fn from_position(file: &Arc<str>, pos: SourcePosition) -> Self {
        Self {
            file: Arc::clone(file),
            line: pos.line,
            column: pos.column,
        }
    }

    /// 同一文件内向右偏移若干列
    pub fn shifted(&self, columns: usize) -> Self {
        Self {
            file: Arc::clone(&self.file),
            line: self.line,
            column: self.column + columns,
        }
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::new("<unknown>", 1, 1)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_start() {
        let pos = SourcePosition::start();
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 1);
        assert_eq!(pos.byte_offset, 0);
    }

    #[test]
    fn test_position_advance_newline() {
        let mut pos = SourcePosition::start();
        pos.advance('a');
        pos.advance('\n');
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 1);
        assert_eq!(pos.byte_offset, 2);
    }

    #[test]
    fn test_position_advance_cjk() {
        let mut pos = SourcePosition::start();
        // CJK字符：3字节UTF-8，1列
        pos.advance('中');
        assert_eq!(pos.column, 2);
        assert_eq!(pos.byte_offset, 3);
    }

    #[test]
    fn test_location_ordering() {
        let a = SourceLocation::new("a.asm", 2, 9);
        let b = SourceLocation::new("a.asm", 3, 1);
        let c = SourceLocation::new("a.asm", 3, 4);
        let d = SourceLocation::new("b.asm", 1, 1);
        let mut v = vec![d.clone(), c.clone(), a.clone(), b.clone()];
        v.sort();
        assert_eq!(v, vec![a, b, c, d]);
    }

    #[test]
    fn test_location_display() {
        let loc = SourceLocation::new("main.asm", 4, 7);
        assert_eq!(loc.to_string(), "main.asm:4:7");
        assert_eq!(loc.shifted(2).column, 9);
    }
}
