use anyhow::Result;
use serde_json::json;

use crate::common::config::ToolConfig;
use crate::error::ToolError;
use crate::ffmpeg::{FfmpegRunner, SystemFfmpegRunner};
use crate::ui::prelude::*;

use super::cli::SplitArgs;
use super::extractor::extract_chapters;
use super::planner::{ChapterFilter, OutputLayout, ensure_output_dir, plan_chapters};
use super::probe::{ChapterSource, FfprobeChapterSource};

/// What a split run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitSummary {
    pub probed: usize,
    pub extracted: usize,
}

pub fn handle_split(args: &SplitArgs, config: &ToolConfig) -> Result<SplitSummary> {
    let source = FfprobeChapterSource::new(config.ffprobe_binary()?);
    let summary = split_file(args, config, &source, &SystemFfmpegRunner)?;
    Ok(summary)
}

/// Probe, plan and extract. The output directory is only created once there is
/// at least one chapter to write, and never on a dry run.
pub fn split_file(
    args: &SplitArgs,
    config: &ToolConfig,
    source: &dyn ChapterSource,
    runner: &dyn FfmpegRunner,
) -> Result<SplitSummary, ToolError> {
    // exists() rather than is_file(): character devices and named pipes are
    // valid ffprobe inputs
    if !args.file.exists() {
        return Err(ToolError::invalid(format!(
            "{} does not exist.",
            args.file.display()
        )));
    }

    let chapters = source.chapters(&args.file)?;
    let filter = ChapterFilter::from(args.chapters.clone());
    for index in filter.missing(chapters.len()) {
        emit(
            Level::Warn,
            "split.plan.missing",
            &format!(
                "Chapter {index} was requested but the file only has {} chapters",
                chapters.len()
            ),
            None,
        );
    }

    let layout = OutputLayout::for_input(&args.file, args.force_extension.as_deref());
    let jobs = plan_chapters(&chapters, &filter, &layout)?;

    if jobs.is_empty() {
        emit(
            Level::Warn,
            "split.plan.empty",
            "No chapters selected for extraction.",
            Some(json!({ "probed": chapters.len() })),
        );
        return Ok(SplitSummary {
            probed: chapters.len(),
            extracted: 0,
        });
    }

    if !config.dry_run {
        ensure_output_dir(&layout)?;
    }
    extract_chapters(&jobs, &args.file, runner, config)?;

    Ok(SplitSummary {
        probed: chapters.len(),
        extracted: jobs.len(),
    })
}
