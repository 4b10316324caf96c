use std::ffi::OsString;
use std::path::Path;
use std::time::Instant;

use serde_json::json;

use crate::common::config::ToolConfig;
use crate::error::ToolError;
use crate::ffmpeg::{FfmpegInvocation, FfmpegRunOptions, FfmpegRunner};
use crate::ui::prelude::*;

use super::planner::ExtractionJob;

/// Stream-copy one chapter out of `input`.
///
/// The seek is placed before `-i` (keyframe seek): fast, but cuts land on the
/// nearest keyframe instead of the exact chapter start. Only the first video and
/// first audio stream are kept.
pub fn build_extract_args(job: &ExtractionJob, input: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "warning", "-stats", "-y", "-ss"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(job.start_time.clone().into());
    args.push("-i".into());
    args.push(input.as_os_str().to_owned());
    args.extend(
        ["-map", "0:v:0", "-map", "0:a:0", "-c", "copy", "-t"]
            .into_iter()
            .map(OsString::from),
    );
    args.push(job.duration().to_string().into());
    args.push(job.output_path.as_os_str().to_owned());
    args
}

/// Run one ffmpeg process per job, in order, stopping at the first failure.
pub fn extract_chapters(
    jobs: &[ExtractionJob],
    input: &Path,
    runner: &dyn FfmpegRunner,
    config: &ToolConfig,
) -> Result<(), ToolError> {
    let program = config.ffmpeg_binary()?;

    for job in jobs {
        let invocation = FfmpegInvocation::new(&program, build_extract_args(job, input));
        emit(
            Level::Info,
            "split.extract.command",
            &format!("Command: {}", invocation.command_line()),
            Some(json!({ "index": job.index, "args": invocation.display_args() })),
        );
        if config.dry_run {
            continue;
        }

        let start = Instant::now();
        runner.run(
            &invocation,
            FfmpegRunOptions::new(Some(job.duration()), config.progress),
        )?;
        let elapsed = start.elapsed().as_secs_f64();

        emit(
            Level::Info,
            "split.extract.done",
            &format!("Chapter {} extracted in {elapsed:.2} seconds.", job.index),
            Some(json!({ "index": job.index, "seconds": elapsed })),
        );
    }

    Ok(())
}
