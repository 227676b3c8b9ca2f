use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Structured log events for one critique submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    SubmissionStarted {
        mode: String,
        model: String,
    },
    MediaEncoded {
        name: String,
        mime_type: String,
        bytes: usize,
    },
    RequestSent {
        model: String,
        temperature: f64,
        media_parts: usize,
        instruction_len: usize,
    },
    ResponseReceived {
        response_len: usize,
        duration_secs: f64,
    },
    /// Business-rule violations tolerated in the decoded response
    ResponseInconsistent {
        issues: Vec<String>,
    },
    CritiqueRendered {
        is_instrumental: bool,
        final_score: Option<f64>,
        document_len: usize,
    },
    SubmissionFailed {
        kind: String,
        detail: String,
    },
    SubmissionFinished {
        success: bool,
        duration_secs: f64,
    },
}

impl LogEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for submission events - console output plus optional JSONL file
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
        })
    }

    pub fn log(&self, event: &LogEvent) {
        // File output is always JSON
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.with_timestamp();
                let _ = writeln!(file, "{}", json);
            }
        }

        match self.format {
            LogFormat::Json => self.log_json(event),
            LogFormat::Pretty => self.log_pretty(event),
            LogFormat::Compact => self.log_compact(event),
        }
    }

    fn log_json(&self, event: &LogEvent) {
        if let Ok(json) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{}", json);
        }
    }

    fn log_pretty(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        match event {
            LogEvent::SubmissionStarted { mode, model } => {
                let _ = writeln!(stderr);
                let _ = writeln!(
                    stderr,
                    "{} {} {}",
                    "▶".bright_cyan(),
                    "CRITIQUE".bright_cyan().bold(),
                    format!("({}, {})", mode, model).dimmed()
                );
            }
            LogEvent::MediaEncoded {
                name,
                mime_type,
                bytes,
            } => {
                let _ = writeln!(
                    stderr,
                    "    {} {} {}",
                    "♪".dimmed(),
                    name,
                    format!("{}, {}", mime_type, Self::human_bytes(*bytes)).dimmed()
                );
            }
            LogEvent::RequestSent { .. } => {
                let _ = writeln!(
                    stderr,
                    "    {} {}",
                    "…".dimmed(),
                    "Waiting for critique".dimmed()
                );
            }
            LogEvent::ResponseReceived { duration_secs, .. } => {
                let _ = writeln!(
                    stderr,
                    "    {} Response received ({:.1}s)",
                    "✓".bright_green(),
                    duration_secs
                );
            }
            LogEvent::ResponseInconsistent { issues } => {
                for issue in issues {
                    let _ = writeln!(stderr, "    {} {}", "⚠".bright_yellow(), issue.yellow());
                }
            }
            LogEvent::CritiqueRendered {
                is_instrumental,
                final_score,
                ..
            } => {
                let verdict = match (is_instrumental, final_score) {
                    (true, _) => "Instrumental".to_string(),
                    (false, Some(score)) => format!("Final score {}/100", score),
                    (false, None) => "No lyrical score".to_string(),
                };
                let _ = writeln!(stderr, "    {} {}", "✓".bright_green(), verdict.bold());
            }
            LogEvent::SubmissionFailed { kind, detail } => {
                let _ = writeln!(
                    stderr,
                    "    {} {}: {}",
                    "✗".bright_red(),
                    kind.bright_red().bold(),
                    detail.bright_red()
                );
            }
            LogEvent::SubmissionFinished { .. } => {
                let _ = writeln!(stderr);
            }
        }
    }

    fn log_compact(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        let msg = match event {
            LogEvent::SubmissionStarted { mode, model } => {
                format!("[{}] submit:start {} {}", timestamp, mode, model)
            }
            LogEvent::MediaEncoded {
                mime_type, bytes, ..
            } => format!("[{}] media:{} {}b", timestamp, mime_type, bytes),
            LogEvent::RequestSent {
                model, temperature, ..
            } => format!("[{}] request:{} t={}", timestamp, model, temperature),
            LogEvent::ResponseReceived {
                response_len,
                duration_secs,
            } => format!(
                "[{}] response:{}b {:.1}s",
                timestamp, response_len, duration_secs
            ),
            LogEvent::ResponseInconsistent { issues } => {
                format!("[{}] inconsistent:{}", timestamp, issues.join("; "))
            }
            LogEvent::CritiqueRendered {
                is_instrumental,
                final_score,
                ..
            } => format!(
                "[{}] rendered instrumental={} score={}",
                timestamp,
                is_instrumental,
                final_score.map(|s| s.to_string()).unwrap_or_else(|| "-".into())
            ),
            LogEvent::SubmissionFailed { kind, detail } => {
                format!("[{}] error:{}:{}", timestamp, kind, detail)
            }
            LogEvent::SubmissionFinished {
                success,
                duration_secs,
            } => format!(
                "[{}] submit:done ok={} {:.1}s",
                timestamp, success, duration_secs
            ),
        };
        let _ = writeln!(stderr, "{}", msg);
    }

    fn human_bytes(bytes: usize) -> String {
        const MIB: f64 = 1024.0 * 1024.0;
        if bytes as f64 >= MIB {
            format!("{:.1} MiB", bytes as f64 / MIB)
        } else {
            format!("{:.0} KiB", bytes as f64 / 1024.0)
        }
    }
}
