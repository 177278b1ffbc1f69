//! API 层配置
//!
//! 包含编译配置 RunConfig 和全局单例（供 CLI 使用）

use bcasm_config::{CompilerConfig, LimitConfig};
use once_cell::sync::OnceCell;

/// Assembly configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Whether to dump bytecode after compilation
    pub dump_bytecode: bool,
    /// Compiler configuration
    pub compiler: CompilerConfig,
    /// Diagnostic limits
    pub limits: LimitConfig,
}

impl RunConfig {
    /// Build from a project file, keeping its compiler and limit sections
    pub fn from_project(project: &bcasm_config::ProjectConfig) -> Self {
        Self {
            dump_bytecode: project.dump_bytecode,
            compiler: project.compiler.clone(),
            limits: project.limits.clone(),
        }
    }
}

// Global config singleton for CLI convenience
static GLOBAL_CONFIG: OnceCell<RunConfig> = OnceCell::new();

/// Initialize global configuration
///
/// Returns the rejected config if one was already installed.
pub fn init(config: RunConfig) -> Result<(), RunConfig> {
    GLOBAL_CONFIG.set(config)
}

/// Get global config reference
///
/// Falls back to `RunConfig::default()` when `init` was never called.
pub fn config() -> &'static RunConfig {
    GLOBAL_CONFIG.get_or_init(RunConfig::default)
}

/// Check if config is initialized
pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}
