//! Two small ffmpeg front-ends: a chapter splitter and a concatenator.
//!
//! Neither touches media data itself. They build argument lists, run
//! `ffprobe`/`ffmpeg` one process at a time and report the outcome.

pub mod common;
pub mod concat;
pub mod error;
pub mod ffmpeg;
pub mod split;
pub mod ui;

pub use error::ToolError;

/// Print an error and its causes, plus any captured tool output.
pub fn report_error(err: &anyhow::Error) {
    use crate::ui::prelude::*;

    emit(Level::Error, "error", &format!("Error: {err:#}"), None);
    if let Some(raw) = err.downcast_ref::<ToolError>().and_then(ToolError::raw_output) {
        emit(
            Level::Error,
            "error.raw_output",
            &format!("Captured output:\n{}", raw.trim_end()),
            None,
        );
    }
}
