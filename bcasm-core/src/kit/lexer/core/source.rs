//! 源文件缓冲区

use std::sync::Arc;

/// 一份待汇编的源文件：文件名 + 原始字节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    filename: Arc<str>,
    bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(filename: impl Into<Arc<str>>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// 从字符串创建（测试和插值子解析常用）
    pub fn from_text(filename: impl Into<Arc<str>>, text: &str) -> Self {
        Self::new(filename, text.as_bytes().to_vec())
    }

    pub fn filename(&self) -> &Arc<str> {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 以文本形式读取，非法 UTF-8 字节替换为 U+FFFD
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}
