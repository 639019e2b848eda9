//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;
use serde_json::Value;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// How responses are written to the terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON document
    #[default]
    Json,
    /// Human-readable summary
    Text,
}

/// Fields holding byte counts.
const SIZE_FIELDS: [&str; 3] = ["file_size_bytes", "original_size", "size_bytes"];

/// Write a response document. Returns `false` when it carries an error.
pub fn render(response: &Value, format: OutputFormat) -> bool {
    let failed = response.get("error").is_some();
    match format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string());
            println!("{text}");
        }
        OutputFormat::Text if failed => Status::error(&error_line(response)),
        OutputFormat::Text => {
            let title = response
                .get("output_path")
                .or_else(|| response.get("path"))
                .and_then(Value::as_str)
                .unwrap_or("done");
            Status::success(title);
            for line in text_lines(response) {
                println!("  {line}");
            }
        }
    }
    !failed
}

fn error_line(response: &Value) -> String {
    let message = response["error"].as_str().unwrap_or("unknown error");
    match response.get("code").and_then(Value::as_str) {
        Some(code) => format!("{message} [{code}]"),
        None => message.to_string(),
    }
}

/// `key: value` lines for every reported field.
fn text_lines(response: &Value) -> Vec<String> {
    let Some(fields) = response.as_object() else {
        return Vec::new();
    };

    fields
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "success" | "output_path" | "path"))
        .map(|(key, value)| format!("{}: {}", key.dimmed(), field_text(key, value)))
        .collect()
}

fn field_text(key: &str, value: &Value) -> String {
    match value {
        Value::Number(n) if SIZE_FIELDS.contains(&key) => {
            n.as_u64().map(format_size).unwrap_or_else(|| n.to_string())
        }
        Value::Object(map) => match (map.get("width"), map.get("height")) {
            (Some(w), Some(h)) => format!("{w}x{h}"),
            _ => value.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Format a file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
