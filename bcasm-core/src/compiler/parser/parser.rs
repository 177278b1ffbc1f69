//! 递归下降语法分析器
//!
//! 语句以换行结束。出错时记录诊断并继续：单个坏记号跳过一个，
//! 整条语句失败则丢弃到行尾。伪指令和标签声明提前到普通语句之前。

use super::utils::{jump_mode_for, COMPARE_MNEMONIC, MAX_DIRECTIVE_ARGUMENTS};
use crate::compiler::ast::{AstSequence, NodeId, NodeKind};
use crate::compiler::error::{CompilerError, ErrorLevel, MessageKind};
use crate::compiler::lexer::token_kind::TokenClass;
use crate::compiler::unit::CompilationUnit;
use crate::kit::lexer::{Lexer, SourceFile, SourceLocation, Token, TokenStream};
use crate::runtime::compiler::DataStoreLocation;
use std::sync::Arc;
use tracing::{debug, trace};

pub struct Parser<'a> {
    tokens: TokenStream,
    unit: &'a mut CompilationUnit,
    ast: AstSequence,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: TokenStream, unit: &'a mut CompilationUnit) -> Self {
        Self {
            tokens,
            unit,
            ast: AstSequence::new(),
        }
    }

    /// 解析整个记号流
    pub fn parse(mut self) -> AstSequence {
        debug!(target: "bcasm::parser", file = %self.tokens.info().filename,
            tokens = self.tokens.len(), "Parsing started");

        let mut hoisted = Vec::new();
        let mut others = Vec::new();

        loop {
            self.skip_statement_terminators();
            if !self.tokens.has_next() {
                break;
            }

            let start = self.tokens.position();
            match self.parse_statement() {
                Some(id) if self.ast.kind(id).is_hoisted() => hoisted.push(id),
                Some(id) => others.push(id),
                None => self.synchronize(start),
            }
        }

        debug!(target: "bcasm::parser", hoisted = hoisted.len(), statements = others.len(),
            diagnostics = self.unit.errors().len(), "Parsing finished");

        for id in hoisted.into_iter().chain(others) {
            self.ast.add_statement(id);
        }
        self.ast
    }

    // ==================== 记号辅助 ====================

    fn check(&self, class: TokenClass) -> bool {
        self.tokens.peek(0).is_some_and(|t| t.is(class))
    }

    /// 匹配并消费指定类别的记号
    fn match_token(&mut self, class: TokenClass) -> Option<Token> {
        if self.check(class) {
            self.tokens.next()
        } else {
            None
        }
    }

    /// 期望指定类别的记号，否则记录诊断
    fn expect(&mut self, class: TokenClass) -> Option<Token> {
        if let Some(token) = self.match_token(class) {
            return Some(token);
        }
        match class {
            TokenClass::Identifier => self.error_here(MessageKind::ExpectedIdentifier, None),
            _ => self.error_here(MessageKind::ExpectedToken, Some(class.name().to_string())),
        }
        None
    }

    /// 当前位置：流已读完时取最后一个记号，否则取下一个记号
    fn current_location(&self) -> SourceLocation {
        if !self.tokens.is_empty() && !self.tokens.has_next() {
            if let Some(last) = self.tokens.last() {
                return last.location.clone();
            }
        }
        match self.tokens.peek(0) {
            Some(token) => token.location.clone(),
            None => SourceLocation::new(Arc::clone(&self.tokens.info().filename), 1, 1),
        }
    }

    fn error_at(&mut self, kind: MessageKind, location: SourceLocation, context: Option<String>) {
        trace!(target: "bcasm::parser", kind = kind.name(), line = location.line,
            column = location.column, "Reporting diagnostic");
        self.unit
            .add_error(CompilerError::new(ErrorLevel::Error, kind, location, context));
    }

    fn error_here(&mut self, kind: MessageKind, context: Option<String>) {
        let location = self.current_location();
        self.error_at(kind, location, context);
    }

    fn skip_statement_terminators(&mut self) {
        while self.match_token(TokenClass::Newline).is_some() {}
    }

    /// 语句失败后丢弃到行尾，至少前进一个记号
    fn synchronize(&mut self, start: usize) {
        if self.tokens.position() == start {
            self.tokens.next();
        }
        let ended_on_newline = self
            .tokens
            .position()
            .checked_sub(1)
            .and_then(|i| self.tokens.tokens().get(i))
            .is_some_and(|t| t.is(TokenClass::Newline));
        if ended_on_newline {
            return;
        }
        while let Some(token) = self.tokens.peek(0) {
            if token.is(TokenClass::Newline) {
                break;
            }
            self.tokens.next();
        }
    }

    /// 语句后必须是换行；否则报告一次并丢弃到换行之后
    fn expect_end_of_statement(&mut self) {
        if self.match_token(TokenClass::Newline).is_some() {
            return;
        }
        self.error_here(MessageKind::ExpectedEndOfStatement, None);
        while let Some(token) = self.tokens.next() {
            if token.is(TokenClass::Newline) {
                break;
            }
        }
    }

    // ==================== 语句 ====================

    fn parse_statement(&mut self) -> Option<NodeId> {
        let class = self.tokens.peek(0)?.class;
        let result = match class {
            TokenClass::Directive => self.parse_directive(),
            TokenClass::Label => self.parse_label(),
            TokenClass::Identifier => self.parse_command(),
            _ => self.parse_expression(),
        };

        if let Some(id) = result {
            trace!(target: "bcasm::parser", statement = %self.ast.describe(id), "Parsed statement");
            if self.tokens.has_next() {
                self.expect_end_of_statement();
            }
        }
        result
    }

    /// `.name arg* { body }?`
    fn parse_directive(&mut self) -> Option<NodeId> {
        let token = self.tokens.next()?;

        let mut arguments = Vec::new();
        while let Some(next) = self.tokens.peek(0) {
            if next.is(TokenClass::Newline) || next.is(TokenClass::OpenBrace) {
                break;
            }
            match self.parse_term() {
                Some(arg) => arguments.push(arg),
                None => break,
            }
        }

        if arguments.len() > MAX_DIRECTIVE_ARGUMENTS {
            self.error_at(
                MessageKind::IllegalExpression,
                token.location.clone(),
                Some(format!(
                    "directive '.{}' has {} arguments (max {})",
                    token.value,
                    arguments.len(),
                    MAX_DIRECTIVE_ARGUMENTS
                )),
            );
        }

        let mut body = String::new();
        if self.match_token(TokenClass::OpenBrace).is_some() {
            let mut depth = 1usize;
            loop {
                let Some(inner) = self.tokens.next() else {
                    self.error_here(
                        MessageKind::ExpectedToken,
                        Some(TokenClass::CloseBrace.name().to_string()),
                    );
                    break;
                };
                match inner.class {
                    TokenClass::OpenBrace => depth += 1,
                    TokenClass::CloseBrace => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                body.push_str(&inner.repr());
                body.push(' ');
            }
        }

        debug!(target: "bcasm::parser", name = %token.value, args = arguments.len(),
            "Parsed directive");
        Some(self.ast.push(
            NodeKind::Directive {
                name: token.value,
                arguments,
                body,
            },
            token.location,
        ))
    }

    /// `name:` 声明标签并立即绑定到当前作用域
    fn parse_label(&mut self) -> Option<NodeId> {
        let token = self.tokens.next()?;
        let label = self.ast.push(
            NodeKind::Label {
                name: token.value.clone(),
            },
            token.location.clone(),
        );
        if let Some(previous) = self.unit.bind(token.value.clone(), label) {
            debug!(target: "bcasm::parser", name = %token.value, previous = %previous,
                "Label redeclared, last declaration wins");
        }
        Some(self.ast.push(
            NodeKind::LabelDecl {
                name: token.value,
                label,
            },
            token.location,
        ))
    }

    /// 跳转、比较；其他标识符按普通表达式重新解析
    fn parse_command(&mut self) -> Option<NodeId> {
        let token = self.tokens.next()?;

        if let Some(mode) = jump_mode_for(&token.value) {
            let target = self.parse_operand()?;
            return Some(self.ast.push(NodeKind::Jump { target, mode }, token.location));
        }

        if token.value == COMPARE_MNEMONIC {
            let left = self.parse_operand();
            let right = self.parse_operand();
            let (left, right) = (left?, right?);
            return Some(self.ast.push(NodeKind::Compare { left, right }, token.location));
        }

        trace!(target: "bcasm::parser", name = %token.value, "Not a mnemonic, reading identifier");
        self.tokens.rewind(1);
        self.parse_identifier()
    }

    /// 必需的操作数：语句已结束时报告缺失，不消费换行
    fn parse_operand(&mut self) -> Option<NodeId> {
        let next = self.tokens.peek(0).map(|t| (t.class, t.location.clone()));
        match next {
            None => {
                self.error_here(MessageKind::UnexpectedEof, None);
                None
            }
            Some((TokenClass::Newline, location)) => {
                self.error_at(MessageKind::UnexpectedEol, location, None);
                None
            }
            Some(_) => self.parse_expression(),
        }
    }

    // ==================== 表达式 ====================

    fn parse_expression(&mut self) -> Option<NodeId> {
        self.parse_term()
    }

    fn parse_term(&mut self) -> Option<NodeId> {
        let Some(token) = self.tokens.peek(0).cloned() else {
            self.error_here(MessageKind::UnexpectedEof, None);
            return None;
        };

        match token.class {
            TokenClass::Identifier => self.parse_identifier(),
            TokenClass::Integer => self.parse_integer_literal(),
            TokenClass::String => self.parse_string_literal(),
            TokenClass::Interpolation => self.parse_interpolation(),
            TokenClass::Register => self.parse_data_location(DataStoreLocation::Register),
            TokenClass::Local => self.parse_data_location(DataStoreLocation::Local),
            TokenClass::Newline => {
                self.error_at(MessageKind::UnexpectedEol, token.location, None);
                self.tokens.next();
                None
            }
            _ => {
                let value = token.repr();
                self.error_at(MessageKind::UnexpectedToken, token.location, Some(value));
                self.tokens.next();
                None
            }
        }
    }

    fn parse_identifier(&mut self) -> Option<NodeId> {
        let token = self.expect(TokenClass::Identifier)?;
        Some(self.ast.push(
            NodeKind::Identifier {
                name: token.value,
                binding: None,
            },
            token.location,
        ))
    }

    fn parse_integer_literal(&mut self) -> Option<NodeId> {
        let token = self.tokens.next()?;
        match token.value.parse::<i64>() {
            Ok(value) => Some(self.ast.push(NodeKind::IntegerLiteral(value), token.location)),
            Err(_) => {
                self.error_at(
                    MessageKind::IllegalExpression,
                    token.location,
                    Some(format!("integer literal '{}' out of range", token.value)),
                );
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Option<NodeId> {
        let token = self.tokens.next()?;
        Some(self.ast.push(NodeKind::StringLiteral(token.value), token.location))
    }

    fn parse_data_location(&mut self, store: DataStoreLocation) -> Option<NodeId> {
        let token = self.tokens.next()?;
        match token.value.parse::<u32>() {
            Ok(index) => Some(self.ast.push(NodeKind::DataLocation { index, store }, token.location)),
            Err(_) => {
                self.error_at(
                    MessageKind::IllegalExpression,
                    token.location,
                    Some(format!("{} index '{}' out of range", store.name(), token.value)),
                );
                None
            }
        }
    }

    /// `${ name }`：在子编译单元中重新扫描内文，返回第一个能解析的名字绑定的节点
    ///
    /// 子单元的诊断合并回当前单元。不做完整的子语法分析。
    fn parse_interpolation(&mut self) -> Option<NodeId> {
        let token = self.tokens.next()?;
        let source = SourceFile::from_text(Arc::clone(&token.location.file), &token.value);
        let mut child = self.unit.child();

        let mut inner_tokens = TokenStream::for_file(source.filename());
        // body starts right after "${"
        Lexer::starting_at(&source, &token.location.shifted(2)).analyze(&mut inner_tokens);

        if inner_tokens.is_empty() {
            child.add_error(CompilerError::error(
                MessageKind::ExpectedIdentifier,
                token.location.clone(),
            ));
        }

        let mut resolved = None;
        while let Some(inner) = inner_tokens.next() {
            match inner.class {
                TokenClass::Identifier => match child.lookup(&inner.value) {
                    Some(node) => {
                        resolved = Some(node);
                        break;
                    }
                    None => child.add_error(CompilerError::error_with(
                        MessageKind::UnresolvedIdentifier,
                        inner.location,
                        inner.value,
                    )),
                },
                _ => child.add_error(CompilerError::error(
                    MessageKind::ExpectedIdentifier,
                    inner.location,
                )),
            }
        }

        debug!(target: "bcasm::parser", body = %token.value, resolved = resolved.is_some(),
            "Evaluated interpolation");
        self.unit.absorb_child(child);
        resolved
    }
}
