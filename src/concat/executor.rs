use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_json::json;

use crate::common::config::ToolConfig;
use crate::error::ToolError;
use crate::ffmpeg::{FfmpegInvocation, FfmpegRunOptions, FfmpegRunner};
use crate::ui::prelude::*;

use super::planner::ConcatPlan;

/// Concat demuxer play-list, one `file '<path>'` directive per input.
///
/// A `'` inside a path closes the quote, escapes the apostrophe and reopens it,
/// which is the quoting the demuxer understands. Paths are written as raw bytes.
pub fn build_playlist(inputs: &[PathBuf]) -> Vec<u8> {
    let mut playlist = Vec::new();
    for input in inputs {
        playlist.extend_from_slice(b"file '");
        for &byte in path_bytes(input).iter() {
            if byte == b'\'' {
                playlist.extend_from_slice(br"'\''");
            } else {
                playlist.push(byte);
            }
        }
        playlist.extend_from_slice(b"'\n");
    }
    playlist
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

/// ffmpeg arguments reading the play-list from stdin and copying every stream.
pub fn build_concat_args(output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-hide_banner",
        "-loglevel",
        "warning",
        "-stats",
        "-y",
        "-f",
        "concat",
        "-safe",
        "0",
        "-i",
        "-",
        "-map",
        "0",
        "-c",
        "copy",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(output.as_os_str().to_owned());
    args
}

pub fn run_concat(
    plan: &ConcatPlan,
    runner: &dyn FfmpegRunner,
    config: &ToolConfig,
) -> Result<(), ToolError> {
    let playlist = build_playlist(&plan.inputs);
    let program = config.ffmpeg_binary()?;
    let invocation =
        FfmpegInvocation::new(program, build_concat_args(&plan.output)).with_stdin(playlist);

    emit(
        Level::Info,
        "concat.run.command",
        &format!("Command: {}", invocation.command_line()),
        Some(json!({ "args": invocation.display_args() })),
    );
    if let Some(playlist) = &invocation.stdin {
        let text = String::from_utf8_lossy(playlist);
        emit(Level::Debug, "concat.run.playlist", text.trim_end(), None);
    }
    if config.dry_run {
        return Ok(());
    }

    let start = Instant::now();
    runner.run(&invocation, FfmpegRunOptions::default())?;
    let elapsed = start.elapsed().as_secs_f64();

    emit(
        Level::Info,
        "concat.run.done",
        &format!("File concatenation completed in {elapsed:.2} seconds."),
        Some(json!({ "seconds": elapsed, "output": plan.output.display().to_string() })),
    );
    Ok(())
}
