use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::common::config::GlobalArgs;

/// Extract the chapters of a media file into separate files using ffmpeg
///
/// Output goes to `<dir>/<name>/<number> - <title>.<ext>` next to the input.
/// Existing files are overwritten without asking.
#[derive(Parser, Debug, Clone)]
#[command(name = "ffmpeg-chapter-split", author, version, about, long_about = None)]
pub struct SplitArgs {
    /// Input media file
    #[arg(short = 'f', long = "file", value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Force output to the given extension, e.g. 'mp4' or 'mov'
    #[arg(long, value_name = "EXT")]
    pub force_extension: Option<String>,

    /// Chapters to extract as a comma separated list of numbers starting at 1
    /// (default: all)
    #[arg(
        short = 'c',
        long,
        value_name = "LIST",
        value_delimiter = ',',
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub chapters: Option<Vec<u32>>,

    #[command(flatten)]
    pub global: GlobalArgs,
}
