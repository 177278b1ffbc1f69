//! 字节码生成器
//!
//! 遍历语义分析后的 AST，为每个表达式分配对象位置并写出指令。
//! 编译单元里有致命诊断时拒绝生成。

pub mod error;
pub mod location;

pub use error::CompileError;
pub use location::{DataStoreLocation, ObjLoc};

use crate::compiler::ast::{AstSequence, JumpMode, NodeId, NodeKind};
use crate::compiler::unit::{CompilationUnit, DataStorage, StaticData};
use crate::runtime::bytecode::chunk::BytecodeChunk;
use crate::runtime::bytecode::OpCode;
use bcasm_config::CompilerConfig;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};

/// 字节码生成器
pub struct Compiler {
    chunk: BytecodeChunk,
    storage: Rc<RefCell<DataStorage>>,
    last_line: usize,
}

impl Compiler {
    pub fn new(unit: &CompilationUnit, config: &CompilerConfig) -> Self {
        let chunk = if config.emit_debug_info {
            BytecodeChunk::new()
        } else {
            BytecodeChunk::without_line_info()
        };
        Self {
            chunk,
            storage: Rc::clone(unit.storage()),
            last_line: 1,
        }
    }

    /// 生成整个程序，末尾追加 `HALT`
    pub fn compile(
        mut self,
        ast: &mut AstSequence,
        unit: &CompilationUnit,
    ) -> Result<BytecodeChunk, CompileError> {
        if unit.errors().has_fatal_errors() {
            return Err(CompileError::FatalDiagnostics(unit.errors().fatal_count()));
        }

        debug!(target: "bcasm::compiler", statements = ast.statements().len(), "Emitting bytecode");
        for id in ast.statements().to_vec() {
            // a node shared by several statements is emitted once
            if ast.obj_loc(id).is_some() {
                continue;
            }
            self.build(ast, id)?;
        }
        self.chunk.write_op(OpCode::Halt, self.last_line);

        debug!(target: "bcasm::compiler", bytes = self.chunk.len(),
            statics = self.storage.borrow().len(), "Bytecode emitted");
        Ok(self.chunk)
    }

    /// 返回表达式的对象位置，尚未生成时先生成
    fn ensure_location(&mut self, ast: &mut AstSequence, id: NodeId) -> Result<ObjLoc, CompileError> {
        if let Some(loc) = ast.obj_loc(id) {
            return Ok(loc);
        }
        self.build(ast, id)?;
        ast.obj_loc(id).ok_or_else(|| CompileError::NotAnOperand {
            node: id.index(),
            location: ast.node(id).location.clone(),
        })
    }

    fn alloc_static(&mut self, data: StaticData) -> ObjLoc {
        ObjLoc::static_slot(self.storage.borrow_mut().alloc_static(data))
    }

    fn build(&mut self, ast: &mut AstSequence, id: NodeId) -> Result<(), CompileError> {
        let line = ast.node(id).location.line;
        self.last_line = line;
        trace!(target: "bcasm::compiler", node = %id, source = %ast.describe(id), "Building node");

        match ast.kind(id).clone() {
            NodeKind::Directive {
                name,
                arguments,
                body,
            } => {
                let count = u8::try_from(arguments.len()).map_err(|_| {
                    CompileError::TooManyArguments {
                        name: name.clone(),
                        count: arguments.len(),
                        location: ast.node(id).location.clone(),
                    }
                })?;
                let mut locations = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    locations.push(self.ensure_location(ast, arg)?);
                }
                self.chunk.write_op(OpCode::Directive, line);
                self.chunk.write_str(&name, line);
                self.chunk.write_u8(count, line);
                for loc in locations {
                    self.chunk.write_location(loc, line);
                }
                self.chunk.write_str(&body, line);
            }
            NodeKind::LabelDecl { label, .. } => {
                self.ensure_location(ast, label)?;
            }
            NodeKind::Label { name } => {
                let loc = self.alloc_static(StaticData::Label(name));
                ast.assign_location(id, loc)?;
                self.chunk.write_op(OpCode::Label, line);
                self.chunk.write_location(loc, line);
            }
            NodeKind::Identifier { name, binding } => {
                let target = binding.ok_or_else(|| CompileError::UnresolvedReference {
                    name,
                    location: ast.node(id).location.clone(),
                })?;
                let loc = self.ensure_location(ast, target)?;
                ast.assign_location(id, loc)?;
            }
            NodeKind::IntegerLiteral(value) => {
                let loc = self.alloc_static(StaticData::Integer(value));
                ast.assign_location(id, loc)?;
                self.chunk.write_op(OpCode::LoadInt, line);
                self.chunk.write_location(loc, line);
                self.chunk.write_i64(value, line);
            }
            NodeKind::StringLiteral(value) => {
                let loc = self.alloc_static(StaticData::String(value.clone()));
                ast.assign_location(id, loc)?;
                self.chunk.write_op(OpCode::LoadString, line);
                self.chunk.write_location(loc, line);
                self.chunk.write_str(&value, line);
            }
            NodeKind::DataLocation { index, store } => {
                ast.assign_location(id, ObjLoc::new(index, store))?;
            }
            NodeKind::Jump { target, mode } => {
                let loc = self.ensure_location(ast, target)?;
                self.chunk.write_op(jump_opcode(mode), line);
                self.chunk.write_location(loc, line);
            }
            NodeKind::Compare { left, right } => {
                let left = self.ensure_location(ast, left)?;
                let right = self.ensure_location(ast, right)?;
                self.chunk.write_op(OpCode::Cmp, line);
                self.chunk.write_location(left, line);
                self.chunk.write_location(right, line);
            }
        }
        Ok(())
    }
}

fn jump_opcode(mode: JumpMode) -> OpCode {
    match mode {
        JumpMode::Always => OpCode::Jmp,
        JumpMode::IfEqual => OpCode::Je,
        JumpMode::IfNotEqual => OpCode::Jne,
        JumpMode::IfGreater => OpCode::Jg,
        JumpMode::IfGreaterOrEqual => OpCode::Jge,
    }
}
