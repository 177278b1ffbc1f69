//! 编译单元
//!
//! 一次编译调用的全部可变状态：诊断列表、符号表、当前作用域、
//! 共享的静态数据分配器。插值子解析通过 `child` 得到子单元。

pub mod scope;
pub mod storage;

use crate::compiler::ast::NodeId;
use crate::compiler::error::{CompilerError, ErrorList};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

pub use scope::{ScopeId, SymbolTable};
pub use storage::{DataStorage, StaticData};

/// 编译单元
#[derive(Debug)]
pub struct CompilationUnit {
    errors: ErrorList,
    symbols: Rc<RefCell<SymbolTable>>,
    scope: ScopeId,
    storage: Rc<RefCell<DataStorage>>,
    variable_mode: bool,
}

impl Default for CompilationUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilationUnit {
    /// 新建根编译单元（独立的静态数据区）
    pub fn new() -> Self {
        Self::with_storage(Rc::new(RefCell::new(DataStorage::new())))
    }

    pub fn with_storage(storage: Rc<RefCell<DataStorage>>) -> Self {
        let symbols = SymbolTable::new();
        let scope = symbols.root();
        let symbols = Rc::new(RefCell::new(symbols));
        Self {
            errors: ErrorList::new(),
            symbols,
            scope,
            storage,
            variable_mode: false,
        }
    }

    /// 子编译单元
    ///
    /// 与父单元共用符号表，在其上新建一个子作用域；静态数据区同样共享，
    /// 诊断列表独立（用 `absorb_child` 合并回父单元）。
    pub fn child(&self) -> CompilationUnit {
        let scope = self.symbols.borrow_mut().push_child(self.scope);
        Self {
            errors: ErrorList::new(),
            symbols: Rc::clone(&self.symbols),
            scope,
            storage: Rc::clone(&self.storage),
            variable_mode: self.variable_mode,
        }
    }

    /// 合并子单元的诊断并弹出它的作用域
    pub fn absorb_child(&mut self, mut child: CompilationUnit) {
        self.errors.extend(child.take_errors());
        self.symbols.borrow_mut().pop_scope(child.scope);
    }

    pub fn errors(&self) -> &ErrorList {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ErrorList {
        &mut self.errors
    }

    pub fn add_error(&mut self, error: CompilerError) {
        self.errors.add(error);
    }

    /// 取走诊断列表，原处留空
    pub fn take_errors(&mut self) -> ErrorList {
        std::mem::take(&mut self.errors)
    }

    pub fn symbols(&self) -> Ref<'_, SymbolTable> {
        self.symbols.borrow()
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// 在当前作用域绑定名字
    pub fn bind(&mut self, name: impl Into<String>, node: NodeId) -> Option<NodeId> {
        self.symbols.borrow_mut().set(self.scope, name, node)
    }

    /// 从当前作用域沿父链查找
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.symbols.borrow().get(self.scope, name)
    }

    pub fn storage(&self) -> &Rc<RefCell<DataStorage>> {
        &self.storage
    }

    pub fn variable_mode(&self) -> bool {
        self.variable_mode
    }

    pub fn set_variable_mode(&mut self, enabled: bool) {
        self.variable_mode = enabled;
    }
}
