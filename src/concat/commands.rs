use anyhow::Result;
use serde_json::json;

use crate::common::config::ToolConfig;
use crate::error::ToolError;
use crate::ffmpeg::{FfmpegRunner, SystemFfmpegRunner};
use crate::ui::prelude::*;

use super::cli::ConcatArgs;
use super::executor::run_concat;
use super::planner::{ConcatPlan, plan_concat};

pub fn handle_concat(args: &ConcatArgs, config: &ToolConfig) -> Result<ConcatPlan> {
    let plan = concat_files(args, config, &SystemFfmpegRunner)?;
    Ok(plan)
}

/// Validate inputs, then run a single ffmpeg concat. Nothing is spawned when
/// validation fails.
pub fn concat_files(
    args: &ConcatArgs,
    config: &ToolConfig,
    runner: &dyn FfmpegRunner,
) -> Result<ConcatPlan, ToolError> {
    let plan = plan_concat(&args.files, args.output.as_deref())?;

    emit(
        Level::Info,
        "concat.plan.count",
        &format!("Concatenating {} files...", plan.inputs.len()),
        Some(json!({ "count": plan.inputs.len() })),
    );
    emit(
        Level::Info,
        "concat.plan.output",
        &format!("Outputting to: {}", plan.output.display()),
        Some(json!({ "output": plan.output.display().to_string() })),
    );

    run_concat(&plan, runner, config)?;
    Ok(plan)
}
