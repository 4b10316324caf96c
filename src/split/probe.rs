use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::json;

use crate::error::ToolError;
use crate::ui::prelude::*;

/// A chapter exactly as ffprobe reports it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawChapter {
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub tags: ChapterTags,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChapterTags {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    chapters: Vec<RawChapter>,
}

/// Where chapter lists come from.
pub trait ChapterSource {
    fn chapters(&self, input: &Path) -> Result<Vec<RawChapter>, ToolError>;
}

/// Reads chapters by running `ffprobe -show_chapters` in JSON mode.
#[derive(Debug, Clone)]
pub struct FfprobeChapterSource {
    program: PathBuf,
}

impl FfprobeChapterSource {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(input: &Path) -> Vec<OsString> {
        vec![
            "-i".into(),
            input.as_os_str().to_owned(),
            "-v".into(),
            "quiet".into(),
            "-print_format".into(),
            "json".into(),
            "-show_chapters".into(),
        ]
    }
}

impl ChapterSource for FfprobeChapterSource {
    fn chapters(&self, input: &Path) -> Result<Vec<RawChapter>, ToolError> {
        // Some ffprobe builds write the JSON document to stderr, so both
        // streams are captured together.
        let output = duct::cmd(self.program.as_os_str(), Self::args(input))
            .stderr_to_stdout()
            .stdout_capture()
            .unchecked()
            .run()
            .map_err(|source| ToolError::Spawn {
                command: format!("{} -show_chapters", self.program.display()),
                source,
            })?;

        // ffprobe can exit non-zero while still printing a valid chapter list
        // for read-only queries; only unparsable output is fatal.
        if !output.status.success() {
            emit(
                Level::Debug,
                "split.probe.exit_status",
                &format!(
                    "ffprobe exited with status {:?}, parsing its output anyway",
                    output.status.code()
                ),
                None,
            );
        }

        let chapters = parse_probe_output(&output.stdout)?;
        emit(
            Level::Info,
            "split.probe.loaded",
            &format!("Loaded {} chapters from media file.", chapters.len()),
            Some(json!({ "count": chapters.len(), "input": input.display().to_string() })),
        );
        Ok(chapters)
    }
}

pub fn parse_probe_output(bytes: &[u8]) -> Result<Vec<RawChapter>, ToolError> {
    let raw = String::from_utf8_lossy(bytes);
    emit(Level::Debug, "split.probe.raw", raw.trim(), None);
    serde_json::from_str::<ProbeOutput>(&raw)
        .map(|output| output.chapters)
        .map_err(|err| ToolError::probe_parse(err.to_string(), raw.into_owned()))
}
