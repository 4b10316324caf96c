use clap::Parser;
use serde_json::json;

use ffmpeg_tools::concat::{ConcatArgs, handle_concat};
use ffmpeg_tools::ui::prelude::*;

fn main() {
    let args = ConcatArgs::parse();
    let config = args.global.init();

    match handle_concat(&args, &config) {
        Ok(plan) => emit(
            Level::Success,
            "concat.done",
            "Successfully concatenated all input files.",
            Some(json!({ "output": plan.output.display().to_string(), "inputs": plan.inputs.len() })),
        ),
        Err(err) => {
            ffmpeg_tools::report_error(&err);
            emit(Level::Error, "concat.failed", "Some error occurred.", None);
            std::process::exit(1);
        }
    }
}
