//! 汇编源码词法分析器
//!
//! 单遍扫描字符流，把记号追加到 `TokenStream`。扫描是尽力而为的：
//! 未终止的字符串、非法转义或不认识的字符都会产生记号而不是失败，
//! 由语法分析阶段报告诊断。

use super::core::{CharStream, SourceFile, SourceLocation, SourcePosition};
use super::scanner::{is_identifier_continue, is_identifier_start, is_inline_whitespace, Token};
use super::token_stream::TokenStream;
use crate::compiler::lexer::token_kind::TokenClass;
use tracing::{debug, trace, warn};

/// 词法分析器
pub struct Lexer {
    stream: CharStream,
    /// 当前记号起始位置
    token_start: SourceLocation,
}

impl Lexer {
    /// 创建新的词法分析器，位置从 1:1 开始
    pub fn new(source: &SourceFile) -> Self {
        let stream = CharStream::new(source);
        let token_start = stream.location();
        Self {
            stream,
            token_start,
        }
    }

    /// 从指定位置开始计数
    ///
    /// 插值内文重新扫描时使用，记号位置指回原文件。
    pub fn starting_at(source: &SourceFile, location: &SourceLocation) -> Self {
        let start = SourcePosition::new(location.line, location.column, 0);
        let stream = CharStream::starting_at(source, start);
        let token_start = stream.location();
        Self {
            stream,
            token_start,
        }
    }

    /// 扫描整个源文件，记号追加到 `tokens`
    pub fn analyze(&mut self, tokens: &mut TokenStream) {
        let before = tokens.len();
        while let Some(token) = self.next_token() {
            trace!(target: "bcasm::lexer", token = %token, line = token.location.line,
                column = token.location.column, "Scanned token");
            tokens.push(token);
        }
        debug!(target: "bcasm::lexer", file = %tokens.info().filename,
            count = tokens.len() - before, "Lexing finished");
    }

    /// 扫描下一个记号，源码结束时返回 `None`
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();
        self.token_start = self.stream.location();

        let c = self.stream.peek(0)?;

        // 根据首字符分发
        let token = match c {
            '\n' => {
                self.stream.advance();
                self.make(TokenClass::Newline, "\n")
            }
            '"' | '\'' => self.scan_string(c),
            '0'..='9' => self.scan_number(),
            '.' => self.scan_directive(),
            '$' => self.scan_dollar(),
            '%' => self.scan_data_location(TokenClass::Local),
            c if is_identifier_start(c) => self.scan_identifier_or_label(),
            c => {
                self.stream.advance();
                match TokenClass::punctuation(c) {
                    Some(class) => self.make(class, c.to_string()),
                    None => {
                        debug!(target: "bcasm::lexer", ch = %c.escape_debug(),
                            line = self.token_start.line, "Unrecognized character");
                        self.make(TokenClass::Unknown, c.to_string())
                    }
                }
            }
        };
        Some(token)
    }

    fn make(&self, class: TokenClass, value: impl Into<String>) -> Token {
        Token::new(class, value, self.token_start.clone())
    }

    /// 跳过行内空白和注释（换行保留为记号）
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.stream.peek(0) {
                Some(c) if is_inline_whitespace(c) => {
                    self.stream.advance();
                }
                Some(';') => self.skip_line_comment(),
                Some('/') => match self.stream.peek(1) {
                    Some('/') => self.skip_line_comment(),
                    Some('*') => self.skip_block_comment(),
                    _ => break,
                },
                _ => break,
            }
        }
    }

    /// 跳过单行注释，停在换行之前
    fn skip_line_comment(&mut self) {
        while let Some(c) = self.stream.peek(0) {
            if c == '\n' {
                break;
            }
            self.stream.advance();
        }
    }

    /// 跳过多行注释
    fn skip_block_comment(&mut self) {
        self.stream.advance(); // '/'
        self.stream.advance(); // '*'
        loop {
            match (self.stream.peek(0), self.stream.peek(1)) {
                (Some('*'), Some('/')) => {
                    self.stream.advance();
                    self.stream.advance();
                    return;
                }
                (Some(_), _) => {
                    self.stream.advance();
                }
                (None, _) => {
                    warn!(target: "bcasm::lexer", line = self.token_start.line,
                        "Unterminated block comment");
                    return;
                }
            }
        }
    }

    /// 扫描字符串字面量，值为转义后的内容
    fn scan_string(&mut self, quote: char) -> Token {
        self.stream.advance(); // 开头引号
        let mut value = String::new();

        loop {
            match self.stream.peek(0) {
                Some(c) if c == quote => {
                    self.stream.advance();
                    break;
                }
                Some('\\') => {
                    self.stream.advance();
                    if let Some(c) = self.read_escape_code() {
                        value.push(c);
                    }
                }
                Some('\n') | None => {
                    warn!(target: "bcasm::lexer", line = self.token_start.line,
                        column = self.token_start.column, "Unterminated string literal");
                    break;
                }
                Some(c) => {
                    value.push(c);
                    self.stream.advance();
                }
            }
        }

        self.make(TokenClass::String, value)
    }

    /// 读取 `\` 之后的转义序列
    fn read_escape_code(&mut self) -> Option<char> {
        let c = self.stream.advance()?;
        let escaped = match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'x' => {
                let mut code = 0u32;
                let mut digits = 0;
                while digits < 2 {
                    match self.stream.peek(0).and_then(|d| d.to_digit(16)) {
                        Some(d) => {
                            code = code * 16 + d;
                            digits += 1;
                            self.stream.advance();
                        }
                        None => break,
                    }
                }
                if digits == 0 {
                    warn!(target: "bcasm::lexer", line = self.token_start.line,
                        "Malformed \\x escape");
                    return Some('x');
                }
                char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
            }
            'u' if self.stream.peek(0) == Some('{') => {
                self.stream.advance();
                let mut code = 0u32;
                while let Some(d) = self.stream.peek(0).and_then(|d| d.to_digit(16)) {
                    code = code.saturating_mul(16).saturating_add(d);
                    self.stream.advance();
                }
                if self.stream.advance_if(|c| c == '}').is_none() {
                    warn!(target: "bcasm::lexer", line = self.token_start.line,
                        "Unterminated \\u{{...}} escape");
                }
                char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
            }
            // 未知转义保留原样
            other => other,
        };
        Some(escaped)
    }

    /// 扫描整数：十进制或 `0x` 十六进制
    fn scan_number(&mut self) -> Token {
        let is_hex = self.stream.peek(0) == Some('0')
            && matches!(self.stream.peek(1), Some('x') | Some('X'))
            && self.stream.peek(2).is_some_and(|c| c.is_ascii_hexdigit());

        if is_hex {
            return self.scan_hex_number();
        }

        let mut value = String::new();
        while let Some(c) = self.stream.advance_if(|c| c.is_ascii_digit()) {
            value.push(c);
        }
        self.make(TokenClass::Integer, value)
    }

    fn scan_hex_number(&mut self) -> Token {
        self.stream.advance(); // '0'
        self.stream.advance(); // 'x'
        let mut digits = String::new();
        while let Some(c) = self.stream.advance_if(|c| c.is_ascii_hexdigit()) {
            digits.push(c);
        }

        // 十六进制按 64 位补码解释，值统一为十进制文本
        let value = match u64::from_str_radix(&digits, 16) {
            Ok(v) => (v as i64).to_string(),
            Err(_) => {
                warn!(target: "bcasm::lexer", literal = %digits, "Hex literal out of range");
                format!("0x{}", digits)
            }
        };
        self.make(TokenClass::Integer, value)
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.stream.advance_if(is_identifier_continue) {
            word.push(c);
        }
        word
    }

    /// 标识符；紧跟 `:` 时为标签声明
    fn scan_identifier_or_label(&mut self) -> Token {
        let word = self.read_word();
        if self.stream.advance_if(|c| c == ':').is_some() {
            return self.make(TokenClass::Label, word);
        }
        self.make(TokenClass::Identifier, word)
    }

    /// `.name` 伪指令
    fn scan_directive(&mut self) -> Token {
        self.stream.advance(); // '.'
        if self.stream.peek(0).is_some_and(is_identifier_start) {
            let word = self.read_word();
            return self.make(TokenClass::Directive, word);
        }
        self.make(TokenClass::Unknown, ".")
    }

    /// `${` 开始插值，`$N` 是寄存器
    fn scan_dollar(&mut self) -> Token {
        if self.stream.peek(1) == Some('{') {
            return self.scan_interpolation();
        }
        self.scan_data_location(TokenClass::Register)
    }

    /// `$N` / `%N`：标记符后跟十进制索引
    fn scan_data_location(&mut self, class: TokenClass) -> Token {
        let marker = self.stream.advance().unwrap_or('?');
        if !self.stream.peek(0).is_some_and(|c| c.is_ascii_digit()) {
            return self.make(TokenClass::Unknown, marker.to_string());
        }
        let mut index = String::new();
        while let Some(c) = self.stream.advance_if(|c| c.is_ascii_digit()) {
            index.push(c);
        }
        self.make(class, index)
    }

    /// `${ ... }`：保留原始内文，花括号按层数配对
    fn scan_interpolation(&mut self) -> Token {
        self.stream.advance(); // '$'
        self.stream.advance(); // '{'
        let mut body = String::new();
        let mut depth = 1usize;

        loop {
            match self.stream.advance() {
                Some('{') => {
                    depth += 1;
                    body.push('{');
                }
                Some('}') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    body.push('}');
                }
                Some(c) => body.push(c),
                None => {
                    warn!(target: "bcasm::lexer", line = self.token_start.line,
                        column = self.token_start.column, "Unterminated interpolation");
                    break;
                }
            }
        }

        self.make(TokenClass::Interpolation, body)
    }
}

/// 便捷函数：扫描整个源文件
pub fn tokenize(source: &SourceFile) -> TokenStream {
    let mut tokens = TokenStream::for_file(source.filename());
    Lexer::new(source).analyze(&mut tokens);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        tokenize(&SourceFile::from_text("test.asm", input))
            .tokens()
            .to_vec()
    }

    fn classes(input: &str) -> Vec<TokenClass> {
        lex(input).into_iter().map(|t| t.class).collect()
    }

    #[test]
    fn test_empty_source() {
        assert!(lex("").is_empty());
        assert!(lex("   \t  ").is_empty());
    }

    #[test]
    fn test_label_and_jump() {
        let tokens = lex("lbl:\njmp lbl\n");
        let got: Vec<(TokenClass, &str)> =
            tokens.iter().map(|t| (t.class, t.value.as_str())).collect();
        assert_eq!(
            got,
            vec![
                (TokenClass::Label, "lbl"),
                (TokenClass::Newline, "\n"),
                (TokenClass::Identifier, "jmp"),
                (TokenClass::Identifier, "lbl"),
                (TokenClass::Newline, "\n"),
            ]
        );
    }

    #[test]
    fn test_directive() {
        let tokens = lex(".data 1 \"x\" { a b }");
        assert_eq!(tokens[0].class, TokenClass::Directive);
        assert_eq!(tokens[0].value, "data");
        assert_eq!(
            classes(".data 1 \"x\" { a b }"),
            vec![
                TokenClass::Directive,
                TokenClass::Integer,
                TokenClass::String,
                TokenClass::OpenBrace,
                TokenClass::Identifier,
                TokenClass::Identifier,
                TokenClass::CloseBrace,
            ]
        );
    }

    #[test]
    fn test_register_and_local() {
        let tokens = lex("$3 %3");
        assert_eq!(tokens[0].class, TokenClass::Register);
        assert_eq!(tokens[0].value, "3");
        assert_eq!(tokens[1].class, TokenClass::Local);
        assert_eq!(tokens[1].value, "3");
    }

    #[test]
    fn test_bare_markers_are_unknown() {
        assert_eq!(classes("$ %x ."), vec![
            TokenClass::Unknown,
            TokenClass::Unknown,
            TokenClass::Identifier,
            TokenClass::Unknown,
        ]);
    }

    #[test]
    fn test_numbers() {
        let tokens = lex("42 0x1F 0xFFFFFFFFFFFFFFFF 0x");
        assert_eq!(tokens[0].value, "42");
        assert_eq!(tokens[1].value, "31");
        assert_eq!(tokens[2].value, "-1");
        // "0x" without digits is the integer 0 followed by identifier x
        assert_eq!(tokens[3].class, TokenClass::Integer);
        assert_eq!(tokens[3].value, "0");
        assert_eq!(tokens[4].class, TokenClass::Identifier);
    }

    #[test]
    fn test_string_escapes() {
        let tokens = lex(r#""a\n\t\x41\u{4E2D}\q" 'it\'s'"#);
        assert_eq!(tokens[0].value, "a\n\tA中q");
        assert_eq!(tokens[1].value, "it's");
    }

    #[test]
    fn test_malformed_escapes_are_best_effort() {
        let tokens = lex(r#""\u{41" "\xZ""#);
        assert_eq!(tokens[0].class, TokenClass::String);
        assert_eq!(tokens[0].value, "A");
        assert_eq!(tokens[1].value, "xZ");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_unterminated_string_is_best_effort() {
        let tokens = lex("\"abc\njmp");
        assert_eq!(tokens[0].class, TokenClass::String);
        assert_eq!(tokens[0].value, "abc");
        assert_eq!(tokens[1].class, TokenClass::Newline);
        assert_eq!(tokens[2].value, "jmp");
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            classes("jmp a ; trailing\n// whole line\n/* block\n */ cmp"),
            vec![
                TokenClass::Identifier,
                TokenClass::Identifier,
                TokenClass::Newline,
                TokenClass::Newline,
                TokenClass::Identifier,
            ]
        );
    }

    #[test]
    fn test_interpolation_keeps_raw_body() {
        let tokens = lex("jmp ${ target {x} }\n");
        assert_eq!(tokens[1].class, TokenClass::Interpolation);
        assert_eq!(tokens[1].value, " target {x} ");
        assert_eq!(tokens[2].class, TokenClass::Newline);
    }

    #[test]
    fn test_unterminated_interpolation() {
        let tokens = lex("${abc");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].class, TokenClass::Interpolation);
        assert_eq!(tokens[0].value, "abc");
    }

    #[test]
    fn test_position_tracking() {
        let tokens = lex("a:\n  jmp a");
        assert_eq!((tokens[0].location.line, tokens[0].location.column), (1, 1));
        assert_eq!((tokens[2].location.line, tokens[2].location.column), (2, 3));
        assert_eq!((tokens[3].location.line, tokens[3].location.column), (2, 7));
        assert_eq!(&*tokens[3].location.file, "test.asm");
    }

    #[test]
    fn test_starting_at_location() {
        let src = SourceFile::from_text("main.asm", " name");
        let mut ts = TokenStream::for_file(src.filename());
        Lexer::starting_at(&src, &SourceLocation::new("main.asm", 5, 10)).analyze(&mut ts);
        let tok = &ts.tokens()[0];
        assert_eq!((tok.location.line, tok.location.column), (5, 11));
    }

    #[test]
    fn test_unknown_character() {
        let tokens = lex("@");
        assert_eq!(tokens[0].class, TokenClass::Unknown);
        assert_eq!(tokens[0].value, "@");
    }
}
