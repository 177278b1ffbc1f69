//! Bcasm Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all bcasm crates.

use serde::Deserialize;

/// Configuration for compiler behavior
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Whether the emitted chunk keeps a per-byte line table
    pub emit_debug_info: bool,
    /// Whether the (currently no-op) optimization hook runs before emission
    pub optimize: bool,
}

/// Configuration for diagnostic limits
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum number of diagnostics rendered in a report (0 = unlimited)
    pub max_diagnostics: usize,
}

/// Pipeline phase enum for phase-specific configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Lexer,
    Parser,
    Analyzer,
    Compiler,
}

impl Phase {
    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Lexer => "lexer",
            Phase::Parser => "parser",
            Phase::Analyzer => "analyzer",
            Phase::Compiler => "compiler",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> String {
        format!("bcasm::{}", self.as_str())
    }

    /// All phases in pipeline order
    pub fn all() -> [Phase; 4] {
        [Phase::Lexer, Phase::Parser, Phase::Analyzer, Phase::Compiler]
    }
}

/// Log verbosity as written in project files
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Silent,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse a level name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "silent" | "off" => Some(LogLevel::Silent),
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Silent => "silent",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Optional JSON project file (`bcasm.json`)
///
/// Every field is optional; command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Source file to assemble
    pub entry: Option<String>,
    /// Output path for the bytecode
    pub output: Option<String>,
    /// Compiler options
    pub compiler: CompilerConfig,
    /// Diagnostic limits
    pub limits: LimitConfig,
    /// Log level name
    pub log_level: Option<LogLevel>,
    /// Print the disassembly after a successful compile
    pub dump_bytecode: bool,
}

impl ProjectConfig {
    /// Parse a project file from JSON text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            emit_debug_info: true,
            optimize: false,
        }
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self { max_diagnostics: 0 }
    }
}
