//! 字节码块实现

use super::OpCode;
use crate::runtime::compiler::ObjLoc;
use std::fmt::Write as _;
use tracing::debug;

/// 字节码块
///
/// 只追加的字节缓冲区。开启行号信息时 `lines` 与 `code` 一一对应。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BytecodeChunk {
    /// 指令字节码
    pub code: Vec<u8>,
    /// 行号信息
    pub lines: Vec<usize>,
    track_lines: bool,
}

impl BytecodeChunk {
    /// 创建新的字节码块（记录行号）
    pub fn new() -> Self {
        Self {
            code: Vec::new(),
            lines: Vec::new(),
            track_lines: true,
        }
    }

    /// 不记录行号的字节码块
    pub fn without_line_info() -> Self {
        Self {
            track_lines: false,
            ..Self::new()
        }
    }

    fn write_bytes(&mut self, bytes: &[u8], line: usize) {
        self.code.extend_from_slice(bytes);
        if self.track_lines {
            self.lines.extend(std::iter::repeat(line).take(bytes.len()));
        }
    }

    /// 写入操作码
    pub fn write_op(&mut self, op: OpCode, line: usize) {
        self.write_bytes(&[op as u8], line);
    }

    pub fn write_u8(&mut self, value: u8, line: usize) {
        self.write_bytes(&[value], line);
    }

    /// 小端 u32
    pub fn write_u32(&mut self, value: u32, line: usize) {
        self.write_bytes(&value.to_le_bytes(), line);
    }

    /// 小端 i64
    pub fn write_i64(&mut self, value: i64, line: usize) {
        self.write_bytes(&value.to_le_bytes(), line);
    }

    /// u32 长度前缀 + UTF-8 字节
    pub fn write_str(&mut self, value: &str, line: usize) {
        self.write_u32(value.len() as u32, line);
        self.write_bytes(value.as_bytes(), line);
    }

    pub fn write_location(&mut self, loc: ObjLoc, line: usize) {
        self.write_bytes(&loc.encode(), line);
    }

    /// 当前写入偏移
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.code
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.code
    }

    pub fn line_at(&self, offset: usize) -> Option<usize> {
        self.lines.get(offset).copied()
    }

    /// 反汇编到日志
    pub fn disassemble(&self, name: &str) {
        for line in self.disassemble_to_string(name).lines() {
            debug!(target: "bcasm::compiler", "{}", line);
        }
    }

    /// 反汇编为文本，每条指令一行
    pub fn disassemble_to_string(&self, name: &str) -> String {
        let mut out = format!("== {} ==\n", name);
        let mut offset = 0;
        while offset < self.code.len() {
            let (text, next) = self.disassemble_instruction(offset);
            let line_info = match (self.line_at(offset), offset.checked_sub(1)) {
                (Some(line), Some(prev)) if self.line_at(prev) == Some(line) => "   | ".to_string(),
                (Some(line), _) => format!("{:4} ", line),
                (None, _) => String::new(),
            };
            let _ = writeln!(out, "{:04} {}{}", offset, line_info, text);
            offset = next;
        }
        out
    }

    /// 反汇编单条指令，返回文本和下一条指令的偏移
    fn disassemble_instruction(&self, offset: usize) -> (String, usize) {
        let op = OpCode::from(self.code[offset]);
        let mut reader = Reader {
            code: &self.code,
            pos: offset + 1,
        };

        let operands = match op {
            OpCode::LoadInt => reader
                .location()
                .zip(reader.i64())
                .map(|(loc, v)| format!("{} {}", loc, v)),
            OpCode::LoadString => reader
                .location()
                .zip(reader.str())
                .map(|(loc, s)| format!("{} {:?}", loc, s)),
            OpCode::Label => reader.location().map(|loc| loc.to_string()),
            OpCode::Directive => reader.directive(),
            OpCode::Jmp | OpCode::Je | OpCode::Jne | OpCode::Jg | OpCode::Jge => {
                reader.location().map(|loc| loc.to_string())
            }
            OpCode::Cmp => reader
                .location()
                .zip(reader.location())
                .map(|(l, r)| format!("{} {}", l, r)),
            OpCode::Halt => Some(String::new()),
            OpCode::Invalid => Some(format!("0x{:02X}", self.code[offset])),
        };

        match operands {
            Some(ops) if ops.is_empty() => (op.name().to_string(), reader.pos),
            Some(ops) => (format!("{:<12} {}", op.name(), ops), reader.pos),
            None => (format!("{:<12} <truncated>", op.name()), self.code.len()),
        }
    }
}

/// 反汇编用的游标
struct Reader<'a> {
    code: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take(&mut self, n: usize) -> Option<&[u8]> {
        let bytes = self.code.get(self.pos..self.pos + n)?;
        self.pos += n;
        Some(bytes)
    }

    fn u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    fn u32(&mut self) -> Option<u32> {
        self.take(4)?.try_into().ok().map(u32::from_le_bytes)
    }

    fn i64(&mut self) -> Option<i64> {
        self.take(8)?.try_into().ok().map(i64::from_le_bytes)
    }

    fn str(&mut self) -> Option<String> {
        let len = self.u32()? as usize;
        self.take(len)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    fn location(&mut self) -> Option<ObjLoc> {
        ObjLoc::decode(self.take(ObjLoc::ENCODED_SIZE)?)
    }

    fn directive(&mut self) -> Option<String> {
        let name = self.str()?;
        let count = self.u8()?;
        let mut out = format!(".{}", name);
        for _ in 0..count {
            let loc = self.location()?;
            let _ = write!(out, " {}", loc);
        }
        let body = self.str()?;
        if !body.is_empty() {
            let _ = write!(out, " {{ {}}}", body);
        }
        Some(out)
    }
}
