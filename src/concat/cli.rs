use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::common::config::GlobalArgs;

/// Concatenate media files with ffmpeg's concat demuxer
///
/// Inputs are joined in natural filename order (`clip2` before `clip10`),
/// regardless of the order they are given in.
#[derive(Parser, Debug, Clone)]
#[command(name = "ffmpeg-concat", author, version, about, long_about = None)]
pub struct ConcatArgs {
    /// Output file; defaults to `<common prefix>.concat.<ext>`
    #[arg(short = 'o', long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Files to concatenate
    #[arg(value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub global: GlobalArgs,
}
