use clap::{Args, ValueHint};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::common::deps::{FFMPEG, FFPROBE};
use crate::error::ToolError;
use crate::ui::{self, OutputFormat};

/// Flags shared by both tools.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// ffmpeg binary to run (name on PATH or explicit path)
    #[arg(long, default_value = "ffmpeg", value_hint = ValueHint::CommandName)]
    pub ffmpeg: PathBuf,

    /// ffprobe binary to run (name on PATH or explicit path)
    #[arg(long, default_value = "ffprobe", value_hint = ValueHint::CommandName)]
    pub ffprobe: PathBuf,

    /// Output format for status messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Show debug messages (raw probe output, generated play-lists)
    #[arg(short, long)]
    pub debug: bool,

    /// Echo every line ffmpeg writes to stderr instead of a progress bar
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the ffmpeg commands without running them
    #[arg(long)]
    pub dry_run: bool,
}

/// Resolved settings handed down to the planners and executors.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub verbose: bool,
    pub dry_run: bool,
    pub progress: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from(FFMPEG.name),
            ffprobe: PathBuf::from(FFPROBE.name),
            verbose: false,
            dry_run: false,
            progress: false,
        }
    }
}

impl GlobalArgs {
    /// Configure the ui renderer and turn the flags into a [`ToolConfig`].
    pub fn init(&self) -> ToolConfig {
        let color = !self.no_color && std::io::stdout().is_terminal();
        ui::init(self.format, color);
        ui::set_debug_mode(self.debug);

        ToolConfig {
            ffmpeg: self.ffmpeg.clone(),
            ffprobe: self.ffprobe.clone(),
            verbose: self.verbose,
            dry_run: self.dry_run,
            progress: self.format == OutputFormat::Text
                && !self.verbose
                && std::io::stderr().is_terminal(),
        }
    }
}

impl ToolConfig {
    /// Locate ffmpeg. Dry runs never spawn it, so the configured name is kept as-is.
    pub fn ffmpeg_binary(&self) -> Result<PathBuf, ToolError> {
        if self.dry_run {
            return Ok(self.ffmpeg.clone());
        }
        FFMPEG.resolve(&self.ffmpeg)
    }

    pub fn ffprobe_binary(&self) -> Result<PathBuf, ToolError> {
        FFPROBE.resolve(&self.ffprobe)
    }
}
