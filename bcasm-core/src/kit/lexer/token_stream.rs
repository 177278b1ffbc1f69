//! 记号流：带读游标的有序记号序列

use super::scanner::Token;
use std::sync::Arc;

/// 记号流来源信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStreamInfo {
    pub filename: Arc<str>,
}

/// 记号流
///
/// 游标只会前进，除非显式 `rewind` / `reset_position`。越界读取返回 `None`。
#[derive(Debug, Clone)]
pub struct TokenStream {
    info: TokenStreamInfo,
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    pub fn new(info: TokenStreamInfo) -> Self {
        Self {
            info,
            tokens: Vec::new(),
            position: 0,
        }
    }

    pub fn for_file(filename: &Arc<str>) -> Self {
        Self::new(TokenStreamInfo {
            filename: Arc::clone(filename),
        })
    }

    pub fn info(&self) -> &TokenStreamInfo {
        &self.info
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// 预读游标之后第 `offset` 个记号
    pub fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.position + offset)
    }

    /// 返回当前记号并前进
    pub fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned()?;
        self.position += 1;
        Some(token)
    }

    /// 游标未到末尾
    pub fn has_next(&self) -> bool {
        self.position < self.tokens.len()
    }

    /// 游标后退 `n` 个位置（不会越过起点）
    pub fn rewind(&mut self, n: usize) {
        self.position = self.position.saturating_sub(n);
    }

    /// 最后一个记号
    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_eof(&self) -> bool {
        !self.has_next()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn reset_position(&mut self) {
        self.position = 0;
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}
