//! AST 节点定义

use crate::kit::lexer::SourceLocation;
use crate::runtime::compiler::{DataStoreLocation, ObjLoc};
use std::fmt;

/// 节点在 `AstSequence` 中的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 跳转条件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JumpMode {
    /// 无条件跳转
    Always,
    IfEqual,
    IfNotEqual,
    IfGreater,
    IfGreaterOrEqual,
}

impl JumpMode {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            JumpMode::Always => "jmp",
            JumpMode::IfEqual => "je",
            JumpMode::IfNotEqual => "jne",
            JumpMode::IfGreater => "jg",
            JumpMode::IfGreaterOrEqual => "jge",
        }
    }
}

/// 节点种类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// `.name args... { body }`
    Directive {
        name: String,
        arguments: Vec<NodeId>,
        body: String,
    },
    /// `name:`，指向它声明的 `Label` 表达式
    LabelDecl { name: String, label: NodeId },
    /// 标签本身（被跳转引用的表达式）
    Label { name: String },
    /// 名字引用，语义分析后 `binding` 指向被引用的节点
    Identifier {
        name: String,
        binding: Option<NodeId>,
    },
    IntegerLiteral(i64),
    StringLiteral(String),
    /// `$N` / `%N`
    DataLocation {
        index: u32,
        store: DataStoreLocation,
    },
    Jump { target: NodeId, mode: JumpMode },
    Compare { left: NodeId, right: NodeId },
}

impl NodeKind {
    /// 语句在 AST 中提前到所有普通语句之前
    pub fn is_hoisted(&self) -> bool {
        matches!(self, NodeKind::Directive { .. } | NodeKind::LabelDecl { .. })
    }

    /// 可作为操作数的表达式节点
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::Label { .. }
                | NodeKind::Identifier { .. }
                | NodeKind::IntegerLiteral(_)
                | NodeKind::StringLiteral(_)
                | NodeKind::DataLocation { .. }
        )
    }

    /// 直接子节点
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Directive { arguments, .. } => arguments.clone(),
            NodeKind::LabelDecl { label, .. } => vec![*label],
            NodeKind::Jump { target, .. } => vec![*target],
            NodeKind::Compare { left, right } => vec![*left, *right],
            NodeKind::Label { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::IntegerLiteral(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::DataLocation { .. } => Vec::new(),
        }
    }
}

/// AST 节点
///
/// `obj_loc` 由生成阶段写入，且只写一次。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    pub kind: NodeKind,
    pub location: SourceLocation,
    pub(crate) obj_loc: Option<ObjLoc>,
}

impl AstNode {
    pub fn new(kind: NodeKind, location: SourceLocation) -> Self {
        Self {
            kind,
            location,
            obj_loc: None,
        }
    }

    pub fn obj_loc(&self) -> Option<ObjLoc> {
        self.obj_loc
    }
}
