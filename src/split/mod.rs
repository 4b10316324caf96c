//! Chapter splitter: probe chapters with ffprobe, then stream-copy each
//! selected chapter into its own file.

pub mod cli;
pub mod commands;
pub mod extractor;
pub mod planner;
pub mod probe;

pub use cli::SplitArgs;
pub use commands::{SplitSummary, handle_split, split_file};
