//! AST 节点仓库
//!
//! 所有节点存放在 `AstSequence` 的数组里，节点之间用 `NodeId` 互相引用，
//! 标签、标识符解析结果等交叉引用都是下标而不是指针。
//! 顶层语句列表按 “提前语句在前，其余在后” 的顺序保存。

pub mod node;

pub use node::{AstNode, JumpMode, NodeId, NodeKind};

use crate::kit::lexer::SourceLocation;
use crate::runtime::compiler::{CompileError, DataStoreLocation, ObjLoc};
use tracing::trace;

/// AST：节点仓库 + 顶层语句顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AstSequence {
    nodes: Vec<AstNode>,
    statements: Vec<NodeId>,
}

impl AstSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增节点，返回它的下标
    pub fn push(&mut self, kind: NodeKind, location: SourceLocation) -> NodeId {
        self.nodes.push(AstNode::new(kind, location));
        NodeId::new(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut AstNode {
        &mut self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&AstNode> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn add_statement(&mut self, id: NodeId) {
        self.statements.push(id);
    }

    /// 顶层语句（提前语句在前）
    pub fn statements(&self) -> &[NodeId] {
        &self.statements
    }

    /// 节点总数
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn obj_loc(&self, id: NodeId) -> Option<ObjLoc> {
        self.node(id).obj_loc
    }

    /// 写入节点的对象位置，已写过则拒绝
    pub fn assign_location(&mut self, id: NodeId, loc: ObjLoc) -> Result<(), CompileError> {
        let node = self.node_mut(id);
        if node.obj_loc.is_some() {
            return Err(CompileError::LocationReassigned { node: id.index() });
        }
        node.obj_loc = Some(loc);
        Ok(())
    }

    /// 深拷贝子树到新节点
    ///
    /// 拷贝出的节点不带对象位置，标识符也不带解析结果。
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let location = self.node(id).location.clone();
        let kind = match self.kind(id).clone() {
            NodeKind::Directive {
                name,
                arguments,
                body,
            } => NodeKind::Directive {
                name,
                arguments: arguments
                    .into_iter()
                    .map(|arg| self.clone_subtree(arg))
                    .collect(),
                body,
            },
            NodeKind::LabelDecl { name, label } => NodeKind::LabelDecl {
                name,
                label: self.clone_subtree(label),
            },
            NodeKind::Label { name } => NodeKind::Label { name },
            NodeKind::Identifier { name, .. } => NodeKind::Identifier {
                name,
                binding: None,
            },
            NodeKind::IntegerLiteral(value) => NodeKind::IntegerLiteral(value),
            NodeKind::StringLiteral(value) => NodeKind::StringLiteral(value),
            NodeKind::DataLocation { index, store } => NodeKind::DataLocation { index, store },
            NodeKind::Jump { target, mode } => NodeKind::Jump {
                target: self.clone_subtree(target),
                mode,
            },
            NodeKind::Compare { left, right } => NodeKind::Compare {
                left: self.clone_subtree(left),
                right: self.clone_subtree(right),
            },
        };
        self.push(kind, location)
    }

    /// 一层解引用：已解析的标识符得到它绑定的节点，其余节点得到自身
    pub fn value_of(&self, id: NodeId) -> NodeId {
        match self.kind(id) {
            NodeKind::Identifier {
                binding: Some(target),
                ..
            } => *target,
            NodeKind::LabelDecl { label, .. } => *label,
            _ => id,
        }
    }

    /// 反复解引用直到不动点；遇到环返回 `None`
    pub fn deep_value_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        for _ in 0..=self.nodes.len() {
            let next = self.value_of(current);
            if next == current {
                return Some(current);
            }
            current = next;
        }
        None
    }

    /// 优化钩子
    ///
    /// 目前不改写任何节点，只遍历一遍。
    pub fn optimize(&mut self) {
        for id in self.statements.clone() {
            self.optimize_node(id);
        }
    }

    fn optimize_node(&mut self, id: NodeId) {
        match self.kind(id).clone() {
            NodeKind::Directive { arguments, .. } => {
                for arg in arguments {
                    self.optimize_node(arg);
                }
            }
            NodeKind::LabelDecl { label, .. } => self.optimize_node(label),
            NodeKind::Jump { target, .. } => self.optimize_node(target),
            NodeKind::Compare { left, right } => {
                self.optimize_node(left);
                self.optimize_node(right);
            }
            NodeKind::Label { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::IntegerLiteral(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::DataLocation { .. } => {
                trace!(target: "bcasm::compiler", node = %id, "Nothing to optimize");
            }
        }
    }

    /// 节点的文本形式
    pub fn describe(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Directive {
                name,
                arguments,
                body,
            } => {
                let mut out = format!(".{}", name);
                for arg in arguments {
                    out.push(' ');
                    out.push_str(&self.describe(*arg));
                }
                if !body.is_empty() {
                    out.push_str(&format!(" {{ {}}}", body));
                }
                out
            }
            NodeKind::LabelDecl { name, .. } => format!("{}:", name),
            NodeKind::Label { name } => name.clone(),
            NodeKind::Identifier { name, .. } => name.clone(),
            NodeKind::IntegerLiteral(value) => value.to_string(),
            NodeKind::StringLiteral(value) => format!("{:?}", value),
            NodeKind::DataLocation { index, store } => match store {
                DataStoreLocation::Register => format!("${}", index),
                DataStoreLocation::Local => format!("%{}", index),
                other => format!("{}[{}]", other.name(), index),
            },
            NodeKind::Jump { target, mode } => {
                format!("{} {}", mode.mnemonic(), self.describe(*target))
            }
            NodeKind::Compare { left, right } => {
                format!("cmp {} {}", self.describe(*left), self.describe(*right))
            }
        }
    }

    /// 整个程序的文本形式，每条语句一行
    pub fn dump(&self) -> String {
        self.statements
            .iter()
            .map(|id| self.describe(*id))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
