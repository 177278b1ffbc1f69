//! 作用域符号表
//!
//! 作用域保存在数组里，`ScopeId` 是下标，父作用域用下标引用。
//! 查找沿父链向上，写入只落在指定作用域。父子编译单元共用同一张表，
//! 子单元只在自己的作用域里写入，外层绑定不会被复制。

use crate::compiler::ast::NodeId;
use std::collections::HashMap;

/// 作用域下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
struct Scope {
    parent: Option<ScopeId>,
    bindings: HashMap<String, NodeId>,
}

/// 符号表：名字 -> AST 节点
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// 只含根作用域的符号表
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// 新建子作用域
    pub fn push_child(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope {
            parent: Some(parent),
            bindings: HashMap::new(),
        });
        ScopeId(self.scopes.len() - 1)
    }

    /// 弹出最后创建的作用域；只对没有后继的非根作用域生效
    pub fn pop_scope(&mut self, scope: ScopeId) -> bool {
        let is_last = scope.0 + 1 == self.scopes.len();
        if scope.0 == 0 || !is_last {
            return false;
        }
        self.scopes.pop();
        true
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.get(scope.0).and_then(|s| s.parent)
    }

    /// 在 `scope` 中绑定名字，返回被覆盖的旧绑定（后写者胜出）
    pub fn set(&mut self, scope: ScopeId, name: impl Into<String>, node: NodeId) -> Option<NodeId> {
        self.scopes
            .get_mut(scope.0)
            .and_then(|s| s.bindings.insert(name.into(), node))
    }

    /// 沿父链查找
    pub fn get(&self, scope: ScopeId, name: &str) -> Option<NodeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scopes.get(id.0)?;
            if let Some(node) = s.bindings.get(name) {
                return Some(*node);
            }
            current = s.parent;
        }
        None
    }

    /// 只查 `scope` 本身
    pub fn get_local(&self, scope: ScopeId, name: &str) -> Option<NodeId> {
        self.scopes.get(scope.0)?.bindings.get(name).copied()
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut table = SymbolTable::new();
        let root = table.root();
        assert_eq!(table.set(root, "a", NodeId::new(1)), None);
        assert_eq!(table.get(root, "a"), Some(NodeId::new(1)));
        assert_eq!(table.get(root, "b"), None);
    }

    #[test]
    fn test_last_writer_wins() {
        let mut table = SymbolTable::new();
        let root = table.root();
        table.set(root, "a", NodeId::new(1));
        assert_eq!(table.set(root, "a", NodeId::new(2)), Some(NodeId::new(1)));
        assert_eq!(table.get(root, "a"), Some(NodeId::new(2)));
    }

    #[test]
    fn test_child_lookup_walks_parent() {
        let mut table = SymbolTable::new();
        let root = table.root();
        table.set(root, "outer", NodeId::new(1));
        let child = table.push_child(root);
        table.set(child, "inner", NodeId::new(2));

        assert_eq!(table.get(child, "outer"), Some(NodeId::new(1)));
        assert_eq!(table.get(child, "inner"), Some(NodeId::new(2)));
        assert_eq!(table.get(root, "inner"), None);
        assert_eq!(table.get_local(child, "outer"), None);
        assert_eq!(table.parent(child), Some(root));
        assert_eq!(table.parent(root), None);
    }

    #[test]
    fn test_child_shadows_parent() {
        let mut table = SymbolTable::new();
        let root = table.root();
        table.set(root, "x", NodeId::new(1));
        let child = table.push_child(root);
        table.set(child, "x", NodeId::new(9));
        assert_eq!(table.get(child, "x"), Some(NodeId::new(9)));
        assert_eq!(table.get(root, "x"), Some(NodeId::new(1)));
    }

    #[test]
    fn test_pop_scope() {
        let mut table = SymbolTable::new();
        let root = table.root();
        let first = table.push_child(root);
        let second = table.push_child(first);
        assert!(!table.pop_scope(first));
        assert!(!table.pop_scope(root));
        assert!(table.pop_scope(second));
        assert!(table.pop_scope(first));
        assert_eq!(table.scope_count(), 1);
    }

    #[test]
    fn test_clone_is_isolated() {
        let mut parent = SymbolTable::new();
        let root = parent.root();
        parent.set(root, "x", NodeId::new(1));

        let mut copy = parent.clone();
        let child = copy.push_child(root);
        copy.set(child, "y", NodeId::new(2));
        copy.set(root, "x", NodeId::new(3));

        assert_eq!(parent.get(root, "x"), Some(NodeId::new(1)));
        assert_eq!(parent.scope_count(), 1);
        assert_eq!(copy.get(child, "x"), Some(NodeId::new(3)));
    }
}
