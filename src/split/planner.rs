//! Turning a probed chapter list into extraction jobs.
//!
//! Planning is pure: it decides which chapters to extract and where each one
//! goes. Creating the output directory is a separate step, [`ensure_output_dir`],
//! which callers run only once the plan is known to be non-empty.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::common::paths;
use crate::error::ToolError;
use crate::ui::prelude::*;

use super::probe::RawChapter;

/// Characters replaced with `_` in chapter titles.
const UNSAFE_TITLE_CHARS: &[char] = &['"', '%', '/', '<', '>', '^', '|', '?', '\\'];

/// Which 1-based chapter numbers to extract. No filter, or an empty one,
/// keeps every chapter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChapterFilter(Option<BTreeSet<u32>>);

impl ChapterFilter {
    pub fn all() -> Self {
        Self(None)
    }

    pub fn only(indices: impl IntoIterator<Item = u32>) -> Self {
        Self(Some(indices.into_iter().collect()))
    }

    pub fn includes(&self, index: u32) -> bool {
        match &self.0 {
            Some(set) if !set.is_empty() => set.contains(&index),
            _ => true,
        }
    }

    /// Requested chapter numbers beyond `count`.
    pub fn missing(&self, count: usize) -> Vec<u32> {
        self.0
            .iter()
            .flatten()
            .copied()
            .filter(|&index| index as usize > count)
            .collect()
    }
}

impl From<Option<Vec<u32>>> for ChapterFilter {
    fn from(indices: Option<Vec<u32>>) -> Self {
        match indices {
            Some(indices) => Self::only(indices),
            None => Self::all(),
        }
    }
}

/// Output directory and extension derived from the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    pub dir: PathBuf,
    pub extension: String,
}

impl OutputLayout {
    /// `<dir of input>/<input stem>/`, keeping the input's extension unless one
    /// is forced.
    pub fn for_input(input: &Path, force_extension: Option<&str>) -> Self {
        let dir = paths::parent_dir(input).join(paths::file_stem_string(input));
        let extension = match force_extension {
            Some(ext) => format!(".{}", ext.trim_start_matches('.')),
            None => paths::dotted_extension(input),
        };
        Self { dir, extension }
    }

    pub fn chapter_path(&self, index: u32, title: &str) -> PathBuf {
        self.dir
            .join(format!("{index} - {}{}", sanitize_title(title), self.extension))
    }
}

/// A chapter selected for extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionJob {
    pub index: u32,
    /// Start time as reported by ffprobe, passed through unchanged to `-ss`.
    pub start_time: String,
    pub end_time: String,
    pub title: String,
    pub output_path: PathBuf,
    start: f64,
    end: f64,
}

impl ExtractionJob {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Make a chapter title usable as a file name.
///
/// `/` becomes `:` first; the remaining unsafe characters become `_`.
pub fn sanitize_title(title: &str) -> String {
    title.replace('/', ":").replace(UNSAFE_TITLE_CHARS, "_")
}

fn parse_time(value: &str, field: &str, index: u32) -> Result<f64, ToolError> {
    value.trim().parse::<f64>().map_err(|_| {
        ToolError::probe_parse(
            format!("chapter {index} has a non-numeric {field} '{value}'"),
            value,
        )
    })
}

pub fn plan_chapters(
    chapters: &[RawChapter],
    filter: &ChapterFilter,
    layout: &OutputLayout,
) -> Result<Vec<ExtractionJob>, ToolError> {
    let mut jobs = Vec::new();

    for (position, chapter) in chapters.iter().enumerate() {
        let index = position as u32 + 1;
        if !filter.includes(index) {
            emit(
                Level::Info,
                "split.plan.skip",
                &format!("Skipping chapter {index}"),
                None,
            );
            continue;
        }

        let title = chapter.tags.title.clone().ok_or_else(|| {
            ToolError::probe_parse(
                format!("chapter {index} has no title tag"),
                format!("{chapter:?}"),
            )
        })?;
        let start = parse_time(&chapter.start_time, "start_time", index)?;
        let end = parse_time(&chapter.end_time, "end_time", index)?;
        let output_path = layout.chapter_path(index, &title);

        emit(
            Level::Info,
            "split.plan.add",
            &format!(
                "Added chapter {index} for extraction. From {} to {} into {}",
                chapter.start_time,
                chapter.end_time,
                output_path.display()
            ),
            Some(json!({
                "index": index,
                "start_time": chapter.start_time,
                "end_time": chapter.end_time,
                "output": output_path.display().to_string(),
            })),
        );

        jobs.push(ExtractionJob {
            index,
            start_time: chapter.start_time.clone(),
            end_time: chapter.end_time.clone(),
            title,
            output_path,
            start,
            end,
        });
    }

    Ok(jobs)
}

pub fn ensure_output_dir(layout: &OutputLayout) -> Result<(), ToolError> {
    paths::ensure_dir(&layout.dir)
}
