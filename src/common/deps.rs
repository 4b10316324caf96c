//! External binaries the tools drive.
//!
//! Both tools only orchestrate `ffmpeg`/`ffprobe`; nothing is spawned before the
//! binary has been located, so a missing install is reported up front instead of
//! as a spawn failure halfway through a run.

use std::path::{Path, PathBuf};

use crate::error::ToolError;

#[derive(Debug)]
pub struct Dependency {
    pub name: &'static str,
    pub description: Option<&'static str>,
}

pub static FFMPEG: Dependency = Dependency {
    name: "ffmpeg",
    description: Some("media processing tool"),
};

pub static FFPROBE: Dependency = Dependency {
    name: "ffprobe",
    description: Some("media metadata tool"),
};

impl Dependency {
    /// Locate the binary at `configured`. A bare name is searched on `PATH`,
    /// anything with a separator is checked as a path.
    pub fn resolve(&self, configured: &Path) -> Result<PathBuf, ToolError> {
        which::which(configured).map_err(|_| ToolError::MissingBinary {
            name: match self.description {
                Some(desc) => format!("{} ({} {desc})", configured.display(), self.name),
                None => configured.display().to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_reported_by_name() {
        let err = FFMPEG
            .resolve(Path::new("definitely-not-a-real-ffmpeg-binary"))
            .unwrap_err();
        match err {
            ToolError::MissingBinary { name } => {
                assert!(name.starts_with("definitely-not-a-real-ffmpeg-binary"));
                assert!(name.contains("ffmpeg media processing tool"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn absolute_executable_path_resolves() {
        let resolved = FFPROBE.resolve(Path::new("/bin/sh")).unwrap();
        assert!(resolved.ends_with("sh"));
    }
}
