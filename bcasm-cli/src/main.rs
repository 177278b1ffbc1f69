//! Bcasm CLI - Command line interface
//!
//! Assembles one source file into a bytecode file. Settings come from the
//! command line, optionally layered over a JSON project file.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;
use tracing::{debug, info, warn};

mod config;
mod logging;
mod platform;

use crate::config::LogConfig;
use crate::logging::{init_with_file, LogFormat, LoggingError};
use crate::platform::print_error_with_source;
use bcasm_api::{compile_with_config, init_config, LogLevel, ProjectConfig, RunConfig};
use bcasm_core::SourceFile;

#[derive(Parser, Debug)]
#[command(name = "bcasm", about = "Bytecode assembler", version)]
struct Cli {
    /// Source file to assemble
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Source file to assemble (overrides INPUT)
    #[arg(short = 'c', long = "compile", value_name = "FILE")]
    compile: Option<PathBuf>,

    /// Output path (default: input with a `.bin` extension)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON project file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the disassembly after a successful compile
    #[arg(long)]
    dump_bytecode: bool,

    /// silent, error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL", value_parser = parse_log_level)]
    log_level: Option<LogLevel>,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Also append logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("no input file (pass INPUT, -c <FILE>, or set \"entry\" in the project file)")]
    MissingInput,

    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid project file '{}': {source}", .path.display())]
    Project {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to initialise logging: {0}")]
    Logging(#[from] LoggingError),
}

fn parse_log_level(s: &str) -> Result<LogLevel, String> {
    LogLevel::parse(s).ok_or_else(|| format!("unknown log level '{}'", s))
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Everything after argument parsing; returns the exit status
fn run(cli: Cli) -> Result<i32, CliError> {
    let (project, project_dir) = match &cli.config {
        Some(path) => (read_project(path)?, base_dir(path)),
        None => (ProjectConfig::default(), PathBuf::from(".")),
    };

    let level = cli.log_level.or(project.log_level).unwrap_or_default();
    init_with_file(&LogConfig::from_level(level), cli.log_format, cli.log_file.as_ref())?;

    let input = resolve_input(&cli, &project, &project_dir).ok_or(CliError::MissingInput)?;
    let output = resolve_output(&cli, &project, &project_dir, &input);

    let mut run_config = RunConfig::from_project(&project);
    run_config.dump_bytecode |= cli.dump_bytecode;
    if init_config(run_config.clone()).is_err() {
        warn!(target: "bcasm::cli", "Global config already initialized");
    }

    let bytes = std::fs::read(&input).map_err(|source| CliError::Read {
        path: input.clone(),
        source,
    })?;
    let source = SourceFile::new(input.display().to_string(), bytes);
    info!(target: "bcasm::cli", input = %input.display(), output = %output.display(), "Assembling");

    match compile_with_config(&source, &run_config) {
        Ok(compiled) => {
            for warning in &compiled.warnings {
                println!("{}", warning);
            }
            if run_config.dump_bytecode {
                print!("{}", compiled.chunk.disassemble_to_string(&input.display().to_string()));
            }
            std::fs::write(&output, compiled.chunk.as_bytes()).map_err(|source| {
                CliError::Write {
                    path: output.clone(),
                    source,
                }
            })?;
            info!(target: "bcasm::cli", bytes = compiled.chunk.len(), "Wrote {}", output.display());
            Ok(0)
        }
        Err(e) => {
            debug!(target: "bcasm::cli", phase = e.phase().as_str(), count = e.count(), "Assembly failed");
            print_error_with_source(&e, &source.text(), run_config.limits.max_diagnostics);
            Ok(1)
        }
    }
}

/// Read and parse the JSON project file
fn read_project(path: &Path) -> Result<ProjectConfig, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ProjectConfig::from_json(&content).map_err(|source| CliError::Project {
        path: path.to_path_buf(),
        source,
    })
}

/// Directory that project-relative paths resolve against
fn base_dir(project_path: &Path) -> PathBuf {
    match project_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `-c` wins over INPUT, which wins over the project's `entry`
fn resolve_input(cli: &Cli, project: &ProjectConfig, project_dir: &Path) -> Option<PathBuf> {
    cli.compile
        .clone()
        .or_else(|| cli.input.clone())
        .or_else(|| project.entry.as_ref().map(|entry| project_dir.join(entry)))
}

fn resolve_output(cli: &Cli, project: &ProjectConfig, project_dir: &Path, input: &Path) -> PathBuf {
    cli.output
        .clone()
        .or_else(|| project.output.as_ref().map(|out| project_dir.join(out)))
        .unwrap_or_else(|| input.with_extension("bin"))
}
