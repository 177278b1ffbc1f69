//! Assembler 记号类别

use std::fmt;

/// 记号类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// 指令助记符或名字
    Identifier,
    /// 十进制或十六进制整数
    Integer,
    /// 字符串字面量（值为转义后的内容）
    String,
    /// `.name`
    Directive,
    /// `name:`
    Label,
    /// `$N`
    Register,
    /// `%N`
    Local,
    /// `${ ... }`，值为原始内文
    Interpolation,
    Newline,
    OpenBrace,
    CloseBrace,
    OpenParenth,
    CloseParenth,
    OpenBracket,
    CloseBracket,
    Comma,
    /// 无法识别的单个字符
    Unknown,
}

impl TokenClass {
    /// 诊断信息中使用的类别名
    pub fn name(&self) -> &'static str {
        match self {
            TokenClass::Identifier => "identifier",
            TokenClass::Integer => "integer",
            TokenClass::String => "string",
            TokenClass::Directive => "directive",
            TokenClass::Label => "label",
            TokenClass::Register => "register",
            TokenClass::Local => "local",
            TokenClass::Interpolation => "interpolation",
            TokenClass::Newline => "newline",
            TokenClass::OpenBrace => "{",
            TokenClass::CloseBrace => "}",
            TokenClass::OpenParenth => "(",
            TokenClass::CloseParenth => ")",
            TokenClass::OpenBracket => "[",
            TokenClass::CloseBracket => "]",
            TokenClass::Comma => ",",
            TokenClass::Unknown => "unknown",
        }
    }

    /// 单字符标点的类别
    pub fn punctuation(c: char) -> Option<TokenClass> {
        match c {
            '{' => Some(TokenClass::OpenBrace),
            '}' => Some(TokenClass::CloseBrace),
            '(' => Some(TokenClass::OpenParenth),
            ')' => Some(TokenClass::CloseParenth),
            '[' => Some(TokenClass::OpenBracket),
            ']' => Some(TokenClass::CloseBracket),
            ',' => Some(TokenClass::Comma),
            _ => None,
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_lookup() {
        assert_eq!(TokenClass::punctuation('{'), Some(TokenClass::OpenBrace));
        assert_eq!(TokenClass::punctuation(']'), Some(TokenClass::CloseBracket));
        assert_eq!(TokenClass::punctuation('a'), None);
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(TokenClass::Identifier.to_string(), "identifier");
        assert_eq!(TokenClass::CloseBrace.to_string(), "}");
    }
}
