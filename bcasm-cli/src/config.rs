//! CLI 配置
//!
//! 包含 CLI 特有的配置：分阶段日志级别

use bcasm_config::{LogLevel, Phase};
use tracing::level_filters::LevelFilter;

/// CLI 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: LevelFilter,
    pub lexer: Option<LevelFilter>,
    pub parser: Option<LevelFilter>,
    pub analyzer: Option<LevelFilter>,
    pub compiler: Option<LevelFilter>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from_level(LogLevel::default())
    }
}

impl LogConfig {
    /// Every phase at the same level
    pub fn from_level(level: LogLevel) -> Self {
        Self {
            global: to_filter(level),
            lexer: None,
            parser: None,
            analyzer: None,
            compiler: None,
        }
    }

    /// Get log level for a specific phase
    pub fn level_for(&self, phase: Phase) -> LevelFilter {
        let specific = match phase {
            Phase::Lexer => self.lexer,
            Phase::Parser => self.parser,
            Phase::Analyzer => self.analyzer,
            Phase::Compiler => self.compiler,
        };
        specific.unwrap_or(self.global)
    }
}

pub fn to_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Silent => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}
