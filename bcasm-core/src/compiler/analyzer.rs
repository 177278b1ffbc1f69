//! 语义分析
//!
//! 按顺序访问每条顶层语句：标签声明写入符号表，标识符通过作用域链解析，
//! 解析失败记为诊断。单条语句失败不影响其余语句的检查。

use crate::compiler::ast::{AstSequence, NodeId, NodeKind};
use crate::compiler::error::{CompilerError, MessageKind};
use crate::compiler::unit::CompilationUnit;
use tracing::{debug, trace};

pub struct Analyzer<'a> {
    unit: &'a mut CompilationUnit,
}

impl<'a> Analyzer<'a> {
    pub fn new(unit: &'a mut CompilationUnit) -> Self {
        Self { unit }
    }

    /// 分析整个 AST，返回本次新增的诊断数
    pub fn analyze(&mut self, ast: &mut AstSequence) -> usize {
        let before = self.unit.errors().len();
        for id in ast.statements().to_vec() {
            self.visit(ast, id);
        }
        let added = self.unit.errors().len() - before;
        debug!(target: "bcasm::analyzer", statements = ast.statements().len(),
            diagnostics = added, "Analysis finished");
        added
    }

    fn visit(&mut self, ast: &mut AstSequence, id: NodeId) {
        match ast.kind(id).clone() {
            NodeKind::Directive { arguments, .. } => {
                for arg in arguments {
                    self.visit(ast, arg);
                }
            }
            NodeKind::LabelDecl { name, label } => {
                // later declarations of the same name overwrite earlier ones
                self.unit.bind(name, label);
            }
            NodeKind::Identifier { name, .. } => self.resolve_identifier(ast, id, &name),
            NodeKind::Jump { target, .. } => {
                self.visit(ast, target);
                self.check_jump_target(ast, target);
            }
            NodeKind::Compare { left, right } => {
                self.visit(ast, left);
                self.visit(ast, right);
            }
            NodeKind::Label { .. }
            | NodeKind::IntegerLiteral(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::DataLocation { .. } => {}
        }
    }

    fn resolve_identifier(&mut self, ast: &mut AstSequence, id: NodeId, name: &str) {
        match self.unit.lookup(name) {
            Some(target) => {
                trace!(target: "bcasm::analyzer", name, node = %target, "Resolved identifier");
                if let NodeKind::Identifier { binding, .. } = &mut ast.node_mut(id).kind {
                    *binding = Some(target);
                }
            }
            None => {
                let location = ast.node(id).location.clone();
                self.unit.add_error(CompilerError::error_with(
                    MessageKind::UndeclaredIdentifier,
                    location,
                    name,
                ));
            }
        }
    }

    /// 跳转目标不能是字符串字面量
    fn check_jump_target(&mut self, ast: &AstSequence, target: NodeId) {
        let Some(resolved) = ast.deep_value_of(target) else {
            return;
        };
        if let NodeKind::StringLiteral(value) = ast.kind(resolved) {
            self.unit.add_error(CompilerError::error_with(
                MessageKind::IllegalExpression,
                ast.node(target).location.clone(),
                format!("cannot jump to string literal {:?}", value),
            ));
        }
    }
}
