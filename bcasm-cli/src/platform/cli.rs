//! CLI 格式化输出
//!
//! 提供命令行友好的错误显示和源码上下文打印。

use bcasm_api::AssembleError;
use std::fmt::Write as _;

/// 错误行前后显示的上下文行数
const CONTEXT_LINES: usize = 2;

/// 打印错误并显示源代码上下文
///
/// 诊断按位置排序逐行写到 stdout，源码上下文写到 stderr。
/// `limit` 为 0 时不截断。
pub fn print_error_with_source(e: &AssembleError, source: &str, limit: usize) {
    let reports = e.to_reports(limit);
    for report in &reports {
        println!("{}", report);
    }
    if reports.len() < e.count() {
        println!("... {} more diagnostic(s) suppressed", e.count() - reports.len());
    }

    for report in &reports {
        if let (Some(line), Some(col)) = (report.line, report.column) {
            eprint!("{}", render_source_context(source, line, col));
        }
    }
}

/// 渲染源代码上下文（显示错误行前后几行，并用 `^` 标出列）
pub fn render_source_context(source: &str, error_line: usize, error_col: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let total_lines = lines.len();
    let mut out = String::new();

    if error_line == 0 || error_line > total_lines {
        return out;
    }

    let start_line = error_line.saturating_sub(CONTEXT_LINES).max(1);
    let end_line = (error_line + CONTEXT_LINES).min(total_lines);
    let width = end_line.to_string().len();
    let separator = "-".repeat(width + 1);

    let _ = writeln!(out, "{}|--", separator);
    for line_idx in start_line..=end_line {
        let _ = writeln!(out, "{:>width$} | {}", line_idx, lines[line_idx - 1]);
        if line_idx == error_line {
            let marker = " ".repeat(error_col.saturating_sub(1));
            let _ = writeln!(out, "{:width$} | {}^", "", marker);
        }
    }
    let _ = writeln!(out, "{}|--", separator);
    out
}
