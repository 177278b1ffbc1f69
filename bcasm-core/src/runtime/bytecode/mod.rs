//! 字节码定义

pub mod chunk;

/// 操作码定义
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    // ===== 静态数据 (0x10-0x1F) =====
    /// 位置 + i64
    LoadInt = 0x10,
    /// 位置 + u32 长度 + UTF-8 字节
    LoadString = 0x11,

    // ===== 标签与伪指令 =====
    /// 位置
    Label = 0x20,
    /// 名字 + u8 参数个数 + 参数位置 + 正文
    Directive = 0x30,

    // ===== 跳转 (0x40-0x44)，操作数均为目标位置 =====
    Jmp = 0x40,
    Je,
    Jne,
    Jg,
    Jge,

    // ===== 比较 =====
    /// 左位置 + 右位置
    Cmp = 0x50,

    /// 程序结束
    Halt = 0xF0,
    Invalid = 0xFF,
}

impl OpCode {
    /// 获取操作码名称
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::LoadInt => "LOAD_INT",
            OpCode::LoadString => "LOAD_STRING",
            OpCode::Label => "LABEL",
            OpCode::Directive => "DIRECTIVE",
            OpCode::Jmp => "JMP",
            OpCode::Je => "JE",
            OpCode::Jne => "JNE",
            OpCode::Jg => "JG",
            OpCode::Jge => "JGE",
            OpCode::Cmp => "CMP",
            OpCode::Halt => "HALT",
            OpCode::Invalid => "INVALID",
        }
    }

    /// 固定长度操作数的字节数；变长指令返回 `None`
    pub fn operand_size(&self) -> Option<usize> {
        const LOC: usize = crate::runtime::compiler::ObjLoc::ENCODED_SIZE;
        match self {
            OpCode::LoadInt => Some(LOC + 8),
            OpCode::LoadString | OpCode::Directive => None,
            OpCode::Label
            | OpCode::Jmp
            | OpCode::Je
            | OpCode::Jne
            | OpCode::Jg
            | OpCode::Jge => Some(LOC),
            OpCode::Cmp => Some(LOC * 2),
            OpCode::Halt | OpCode::Invalid => Some(0),
        }
    }

    pub fn is_jump(&self) -> bool {
        matches!(
            self,
            OpCode::Jmp | OpCode::Je | OpCode::Jne | OpCode::Jg | OpCode::Jge
        )
    }
}

impl From<u8> for OpCode {
    fn from(value: u8) -> Self {
        match value {
            0x10 => OpCode::LoadInt,
            0x11 => OpCode::LoadString,
            0x20 => OpCode::Label,
            0x30 => OpCode::Directive,
            0x40 => OpCode::Jmp,
            0x41 => OpCode::Je,
            0x42 => OpCode::Jne,
            0x43 => OpCode::Jg,
            0x44 => OpCode::Jge,
            0x50 => OpCode::Cmp,
            0xF0 => OpCode::Halt,
            _ => OpCode::Invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_name() {
        assert_eq!(OpCode::LoadInt.name(), "LOAD_INT");
        assert_eq!(OpCode::Jge.name(), "JGE");
    }

    #[test]
    fn test_opcode_bytes() {
        assert_eq!(OpCode::Je as u8, 0x41);
        assert_eq!(OpCode::Jge as u8, 0x44);
        assert_eq!(OpCode::from(0x44), OpCode::Jge);
        assert_eq!(OpCode::from(0x00), OpCode::Invalid);
        assert_eq!(OpCode::from(OpCode::Halt as u8), OpCode::Halt);
    }

    #[test]
    fn test_operand_size() {
        assert_eq!(OpCode::Halt.operand_size(), Some(0));
        assert_eq!(OpCode::Jmp.operand_size(), Some(5));
        assert_eq!(OpCode::Cmp.operand_size(), Some(10));
        assert_eq!(OpCode::LoadInt.operand_size(), Some(13));
        assert_eq!(OpCode::LoadString.operand_size(), None);
        assert!(OpCode::Jne.is_jump());
        assert!(!OpCode::Cmp.is_jump());
    }
}
