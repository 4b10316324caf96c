use anyhow::Result;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory holding media stand-ins and fake ffmpeg/ffprobe scripts.
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create an (empty) input file.
    pub fn media_file(&self, name: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        fs::write(&path, b"")?;
        Ok(path)
    }

    /// Fake ffmpeg that appends its arguments (one per line, then `---`) to
    /// `ffmpeg-args.log` and its stdin to `ffmpeg-stdin.log`.
    pub fn fake_ffmpeg(&self) -> Result<PathBuf> {
        let dir = self.path().display();
        let script = format!(
            "#!/bin/sh\n\
             for arg in \"$@\"; do printf '%s\\n' \"$arg\"; done >> '{dir}/ffmpeg-args.log'\n\
             echo --- >> '{dir}/ffmpeg-args.log'\n\
             cat >> '{dir}/ffmpeg-stdin.log'\n\
             exit 0\n"
        );
        self.script("ffmpeg", &script)
    }

    pub fn failing_ffmpeg(&self) -> Result<PathBuf> {
        self.script(
            "ffmpeg-broken",
            "#!/bin/sh\necho 'out.mkv: Permission denied' >&2\nexit 1\n",
        )
    }

    /// Fake ffprobe printing `json` on stderr and exiting non-zero, the way
    /// some ffprobe builds behave.
    pub fn fake_ffprobe(&self, json: &str) -> Result<PathBuf> {
        let script = format!("#!/bin/sh\ncat >&2 <<'JSON'\n{json}\nJSON\nexit 1\n");
        self.script("ffprobe", &script)
    }

    pub fn ffmpeg_calls(&self) -> Result<Vec<Vec<String>>> {
        let log = self.path().join("ffmpeg-args.log");
        if !log.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(log)?;
        Ok(content
            .split_terminator("---\n")
            .map(|call| call.lines().map(str::to_string).collect())
            .collect())
    }

    pub fn ffmpeg_stdin(&self) -> Result<String> {
        Ok(fs::read_to_string(self.path().join("ffmpeg-stdin.log"))?)
    }

    fn script(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        fs::write(&path, content)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }
}
