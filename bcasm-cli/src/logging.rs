//! CLI 日志系统初始化
//!
//! 基于 `tracing-subscriber` 实现分阶段日志控制。日志写到 stderr，
//! stdout 留给诊断输出和反汇编。

use crate::config::LogConfig;
use bcasm_config::Phase;
use std::io;
use std::sync::Mutex;
use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::{
    filter::Targets,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::{SubscriberInitExt, TryInitError},
    Layer,
};

/// 日志输出格式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// 彩色格式化（开发使用）
    Pretty,
    /// 紧凑格式
    #[default]
    Compact,
    /// JSON 格式（工具集成）
    Json,
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("cannot open log file: {0}")]
    File(#[from] io::Error),

    #[error("{0}")]
    Init(#[from] TryInitError),
}

/// 每个阶段一个目标
fn build_targets(log_config: &LogConfig) -> Targets {
    Phase::all()
        .into_iter()
        .fold(Targets::new().with_default(log_config.global), |targets, phase| {
            targets.with_target(phase.target(), log_config.level_for(phase))
        })
        .with_target("bcasm::cli", log_config.global)
}

/// 使用指定格式和日志配置初始化日志系统
pub fn init_with_file<P: AsRef<std::path::Path>>(
    log_config: &LogConfig,
    format: LogFormat,
    file: Option<P>,
) -> Result<(), LoggingError> {
    let targets = build_targets(log_config);

    // If file specified, output to both console and file
    if let Some(path) = file {
        let file_handle = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        let console_layer = create_format_layer(format, io::stderr, true).with_filter(targets.clone());
        let file_layer =
            create_format_layer(format, Mutex::new(file_handle), false).with_filter(targets);

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .try_init()?;
    } else {
        let console_layer = create_format_layer(format, io::stderr, true).with_filter(targets);
        tracing_subscriber::registry().with(console_layer).try_init()?;
    }
    Ok(())
}

/// Create formatter layer based on format
fn create_format_layer<S, W>(
    format: LogFormat,
    make_writer: W,
    ansi: bool,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_ansi(ansi)
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(ansi)
            .with_target(false)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcasm_config::LogLevel;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_targets_follow_phase_levels() {
        let cfg = LogConfig {
            analyzer: Some(LevelFilter::TRACE),
            ..LogConfig::from_level(LogLevel::Error)
        };
        let targets = build_targets(&cfg);
        assert!(targets.would_enable("bcasm::analyzer", &tracing::Level::TRACE));
        assert!(!targets.would_enable("bcasm::parser", &tracing::Level::WARN));
        assert!(targets.would_enable("bcasm::cli", &tracing::Level::ERROR));
    }

    #[test]
    fn test_silent_disables_everything() {
        let targets = build_targets(&LogConfig::from_level(LogLevel::Silent));
        assert!(!targets.would_enable("bcasm::lexer", &tracing::Level::ERROR));
        assert!(!targets.would_enable("other", &tracing::Level::ERROR));
    }
}
