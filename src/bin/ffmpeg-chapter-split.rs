use clap::Parser;
use serde_json::json;

use ffmpeg_tools::split::{SplitArgs, handle_split};
use ffmpeg_tools::ui::prelude::*;

fn main() {
    let args = SplitArgs::parse();
    let config = args.global.init();

    match handle_split(&args, &config) {
        Ok(summary) => emit(
            Level::Success,
            "split.done",
            "Conversion done.",
            Some(json!({ "probed": summary.probed, "extracted": summary.extracted })),
        ),
        Err(err) => {
            ffmpeg_tools::report_error(&err);
            emit(Level::Error, "split.failed", "Some error occurred.", None);
            std::process::exit(1);
        }
    }
}
