//! Ordering the inputs and naming the output of a concatenation.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::common::paths;
use crate::error::ToolError;

/// Used when the inputs do not agree on an extension.
pub const DEFAULT_EXTENSION: &str = ".mkv";

/// Inputs in playback order plus the resolved output file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatPlan {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
}

/// Validate the inputs and decide the order and output path.
///
/// Existence is checked here and not again before ffmpeg opens the files.
pub fn plan_concat(
    files: &[PathBuf],
    explicit_output: Option<&Path>,
) -> Result<ConcatPlan, ToolError> {
    if files.is_empty() {
        return Err(ToolError::invalid("No input files given."));
    }
    if let Some(missing) = files.iter().find(|file| !file.exists()) {
        return Err(ToolError::invalid(format!(
            "{} does not exist.",
            missing.display()
        )));
    }

    let output = match explicit_output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(files),
    };

    // Stable sort: inputs that compare equal keep their command-line order.
    let mut keyed: Vec<(String, &PathBuf)> = files
        .iter()
        .map(|file| (paths::file_stem_string(file), file))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| natural_cmp(a, b));
    let inputs = keyed.into_iter().map(|(_, file)| file.clone()).collect();

    Ok(ConcatPlan { inputs, output })
}

/// `<longest common prefix>.concat<ext>`, where `<ext>` is the inputs' shared
/// (lower-cased) extension or [`DEFAULT_EXTENSION`].
pub fn default_output_path(files: &[PathBuf]) -> PathBuf {
    let extensions: BTreeSet<String> = files
        .iter()
        .map(|file| paths::dotted_extension(file).to_lowercase())
        .collect();
    let extension = match extensions.len() {
        1 => extensions.into_iter().next().unwrap_or_default(),
        _ => DEFAULT_EXTENSION.to_string(),
    };

    let names: Vec<String> = files
        .iter()
        .map(|file| file.to_string_lossy().into_owned())
        .collect();
    PathBuf::from(format!("{}.concat{extension}", common_prefix(&names)))
}

/// Character-wise longest common prefix.
fn common_prefix(strings: &[String]) -> String {
    let Some((first, rest)) = strings.split_first() else {
        return String::new();
    };
    let mut len = first.len();
    for other in rest {
        len = first
            .char_indices()
            .zip(other.chars())
            .find(|((_, a), b)| a != b)
            .map_or(len.min(other.len()), |((idx, _), _)| idx.min(len));
    }
    first[..len].to_string()
}

/// Natural sort comparison: digit runs compare by value ("2" < "10"), other
/// runs compare case-insensitively.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let parts_a = split_numeric(a);
    let parts_b = split_numeric(b);

    for (pa, pb) in parts_a.iter().zip(parts_b.iter()) {
        let ord = if is_digit_run(pa) && is_digit_run(pb) {
            cmp_digit_runs(pa, pb)
        } else {
            pa.to_lowercase().cmp(&pb.to_lowercase())
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    parts_a.len().cmp(&parts_b.len())
}

fn is_digit_run(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit())
}

/// Compare two digit runs by value without parsing, so runs of any length work.
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Split a string into alternating runs of ASCII digits and everything else.
fn split_numeric(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_digits = None;

    for (idx, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                parts.push(&s[start..idx]);
                start = idx;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }

    if start < s.len() {
        parts.push(&s[start..]);
    }
    parts
}
