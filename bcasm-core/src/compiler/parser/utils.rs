use crate::compiler::ast::JumpMode;

/// 比较指令助记符
pub const COMPARE_MNEMONIC: &str = "cmp";

/// 伪指令参数个数上限（字节码中以 u8 编码）
pub const MAX_DIRECTIVE_ARGUMENTS: usize = u8::MAX as usize;

/// 跳转助记符表
pub fn jump_mode_for(mnemonic: &str) -> Option<JumpMode> {
    match mnemonic {
        "jmp" => Some(JumpMode::Always),
        "je" => Some(JumpMode::IfEqual),
        "jne" => Some(JumpMode::IfNotEqual),
        "jg" => Some(JumpMode::IfGreater),
        "jge" => Some(JumpMode::IfGreaterOrEqual),
        _ => None,
    }
}
