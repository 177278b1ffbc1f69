//! 记号结构与字符分类辅助函数

use super::core::SourceLocation;
use crate::compiler::lexer::token_kind::TokenClass;
use std::fmt;

/// 记号：类别 + 值 + 位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub class: TokenClass,
    pub value: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(class: TokenClass, value: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            class,
            value: value.into(),
            location,
        }
    }

    pub fn is(&self, class: TokenClass) -> bool {
        self.class == class
    }

    /// 还原为可重新扫描的源码片段
    pub fn repr(&self) -> String {
        match self.class {
            TokenClass::String => format!("\"{}\"", escape_string(&self.value)),
            TokenClass::Directive => format!(".{}", self.value),
            TokenClass::Label => format!("{}:", self.value),
            TokenClass::Register => format!("${}", self.value),
            TokenClass::Local => format!("%{}", self.value),
            TokenClass::Interpolation => format!("${{{}}}", self.value),
            TokenClass::Newline => "\n".to_string(),
            TokenClass::Identifier | TokenClass::Integer | TokenClass::Unknown => {
                self.value.clone()
            }
            TokenClass::OpenBrace
            | TokenClass::CloseBrace
            | TokenClass::OpenParenth
            | TokenClass::CloseParenth
            | TokenClass::OpenBracket
            | TokenClass::CloseBracket
            | TokenClass::Comma => self.class.name().to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            TokenClass::Newline => write!(f, "{}(\\n)", self.class),
            _ => write!(f, "{}({})", self.class, self.value),
        }
    }
}

/// 检查字符是否可以作为标识符开头
#[inline]
pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// 检查字符是否可以作为标识符的一部分
#[inline]
pub fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// 行内空白（换行是记号，不算空白）
#[inline]
pub fn is_inline_whitespace(c: char) -> bool {
    c != '\n' && c.is_whitespace()
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out
}
