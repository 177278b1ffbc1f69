//! 字符流抽象
//!
//! 将源文件字节解码为Unicode字符流，支持预读和位置追踪。

use super::position::{SourceLocation, SourcePosition};
use super::source::SourceFile;
use std::sync::Arc;

/// 字符流
///
/// 解码在构造时一次完成，之后的 `peek`/`advance` 都是 O(1)。
#[derive(Debug, Clone)]
pub struct CharStream {
    chars: Vec<char>,
    index: usize,
    position: SourcePosition,
    filename: Arc<str>,
}

impl CharStream {
    /// 从源文件创建，位置从 1:1 开始
    pub fn new(source: &SourceFile) -> Self {
        Self::starting_at(source, SourcePosition::start())
    }

    /// 从指定位置开始计数（插值子串重新扫描时使用）
    pub fn starting_at(source: &SourceFile, start: SourcePosition) -> Self {
        Self {
            chars: source.text().chars().collect(),
            index: 0,
            position: start,
            filename: Arc::clone(source.filename()),
        }
    }

    /// 预读第 `offset` 个字符（0 为当前字符）
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    /// 消费当前字符
    pub fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.index).copied()?;
        self.index += 1;
        self.position.advance(c);
        Some(c)
    }

    /// 当前字符满足条件时消费它
    pub fn advance_if(&mut self, pred: impl FnOnce(char) -> bool) -> Option<char> {
        match self.peek(0) {
            Some(c) if pred(c) => self.advance(),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.index >= self.chars.len()
    }

    pub fn position(&self) -> SourcePosition {
        self.position
    }

    /// 当前位置（带文件名）
    pub fn location(&self) -> SourceLocation {
        SourceLocation::from_position(&self.filename, self.position)
    }

    pub fn filename(&self) -> &Arc<str> {
        &self.filename
    }
}
