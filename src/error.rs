use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0}")]
    InputValidation(String),

    #[error("Failed to parse ffprobe output: {message}")]
    ProbeParse { message: String, raw: String },

    #[error("Command '{command}' failed with {}", describe_code(.code))]
    ExternalProcess { command: String, code: Option<i32> },

    #[error("Failed to run '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Filesystem error at {}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Required binary '{name}' was not found")]
    MissingBinary { name: String },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl ToolError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ToolError::InputValidation(message.into())
    }

    pub fn probe_parse(message: impl Into<String>, raw: impl Into<String>) -> Self {
        ToolError::ProbeParse {
            message: message.into(),
            raw: raw.into(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ToolError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Captured process output attached to the error, if any.
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            ToolError::ProbeParse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
