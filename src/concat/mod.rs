//! Concatenator: join media files in natural filename order with ffmpeg's
//! concat demuxer, feeding the play-list through stdin.

pub mod cli;
pub mod commands;
pub mod executor;
pub mod planner;

pub use cli::ConcatArgs;
pub use commands::{concat_files, handle_concat};
