//! Running ffmpeg.
//!
//! Planners build an [`FfmpegInvocation`]; an [`FfmpegRunner`] executes it. The
//! system runner blocks until the process exits, with no timeout.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::ToolError;
use crate::ui::prelude::*;

/// One ffmpeg process: program, arguments and optional bytes piped to stdin.
///
/// Arguments stay `OsString` so file names that are not UTF-8 reach ffmpeg
/// unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct FfmpegInvocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub stdin: Option<Vec<u8>>,
}

impl FfmpegInvocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
            stdin: None,
        }
    }

    pub fn with_stdin(mut self, input: Vec<u8>) -> Self {
        self.stdin = Some(input);
        self
    }

    /// Arguments converted lossily to UTF-8, for display only.
    pub fn display_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    /// Shell-quoted command line for display and error messages.
    pub fn command_line(&self) -> String {
        let program = self.program.to_string_lossy().into_owned();
        std::iter::once(program)
            .chain(self.display_args())
            .map(|word| shell_words::quote(&word).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default)]
pub struct FfmpegRunOptions {
    /// Expected output duration in seconds, used to size the progress bar.
    pub total_duration: Option<f64>,
    pub show_progress: bool,
}

impl FfmpegRunOptions {
    pub fn new(total_duration: Option<f64>, show_progress: bool) -> Self {
        Self {
            total_duration,
            show_progress,
        }
    }
}

pub trait FfmpegRunner {
    fn run(
        &self,
        invocation: &FfmpegInvocation,
        options: FfmpegRunOptions,
    ) -> Result<(), ToolError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFfmpegRunner;

impl FfmpegRunner for SystemFfmpegRunner {
    fn run(
        &self,
        invocation: &FfmpegInvocation,
        options: FfmpegRunOptions,
    ) -> Result<(), ToolError> {
        let command_line = invocation.command_line();
        let progress_duration = options
            .total_duration
            .filter(|_| options.show_progress && invocation.stdin.is_none());

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        command.stdin(if invocation.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        if progress_duration.is_some() {
            command.stderr(Stdio::piped());
        }

        let mut child = command.spawn().map_err(|source| ToolError::Spawn {
            command: command_line.clone(),
            source,
        })?;

        let write_result = match &invocation.stdin {
            Some(input) => feed_stdin(&mut child, input),
            None => Ok(()),
        };

        let mut diagnostics = Vec::new();
        let read_result = match (child.stderr.take(), progress_duration) {
            (Some(stderr), Some(duration)) => {
                let pb = progress_bar(duration);
                let result = read_ffmpeg_stderr(stderr, &pb, &mut diagnostics);
                pb.finish_and_clear();
                result
            }
            _ => Ok(()),
        };

        let status = wait(&mut child, &command_line)?;
        report_diagnostics(&diagnostics);
        check_status(status, &command_line)?;

        write_result
            .and(read_result)
            .map_err(|source| ToolError::Spawn {
                command: command_line,
                source,
            })
    }
}

/// Write `input` to the child's stdin and close it. The handle is dropped on
/// every path so ffmpeg always sees EOF before we wait on it.
fn feed_stdin(child: &mut Child, input: &[u8]) -> std::io::Result<()> {
    let Some(mut stdin) = child.stdin.take() else {
        return Ok(());
    };
    let result = stdin
        .write_all(input)
        .and_then(|_| stdin.flush());
    drop(stdin);
    result
}

fn wait(child: &mut Child, command_line: &str) -> Result<ExitStatus, ToolError> {
    child.wait().map_err(|source| ToolError::Spawn {
        command: command_line.to_string(),
        source,
    })
}

/// Non-stats stderr lines hidden behind the progress bar. ffmpeg runs at
/// `-loglevel warning`, so these are warnings or errors either way.
fn report_diagnostics(lines: &[String]) {
    for line in lines {
        emit(Level::Warn, "ffmpeg.stderr", line, None);
    }
}

fn check_status(status: ExitStatus, command_line: &str) -> Result<(), ToolError> {
    if status.success() {
        return Ok(());
    }
    Err(ToolError::ExternalProcess {
        command: command_line.to_string(),
        code: status.code(),
    })
}

fn progress_bar(duration: f64) -> ProgressBar {
    let pb = ProgressBar::new((duration * 1000.0) as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent:>3}% ({eta}) {msg}",
    ) {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏ "));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("copying");
    pb
}

fn read_ffmpeg_stderr<R: Read>(
    mut stderr: R,
    pb: &ProgressBar,
    error_lines: &mut Vec<String>,
) -> std::io::Result<()> {
    let mut buffer = [0u8; 4096];
    let mut accumulated = String::new();

    loop {
        let bytes_read = stderr.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        accumulated.push_str(&String::from_utf8_lossy(&buffer[..bytes_read]));

        // -stats rewrites its line with '\r', so both terminators end a line
        while let Some(pos) = accumulated.find(['\r', '\n']) {
            let line: String = accumulated.drain(..=pos).collect();
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }
            if let Some(progress) = parse_ffmpeg_progress(line) {
                pb.set_position((progress * 1000.0) as u64);
                if let Some(speed) = parse_ffmpeg_speed(line) {
                    pb.set_message(speed);
                }
            } else if !line.contains("time=") {
                error_lines.push(line.to_string());
            }
        }
    }

    Ok(())
}

fn parse_ffmpeg_progress(line: &str) -> Option<f64> {
    let time_start = line.find("time=")?;
    let time_str = line[time_start + 5..].trim_start();
    let time_end = time_str.find(' ').unwrap_or(time_str.len());
    parse_time_to_seconds(&time_str[..time_end])
}

fn parse_time_to_seconds(time_str: &str) -> Option<f64> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let hours: f64 = parts[0].parse().ok()?;
    let minutes: f64 = parts[1].parse().ok()?;
    let seconds: f64 = parts[2].parse().ok()?;

    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

fn parse_ffmpeg_speed(line: &str) -> Option<String> {
    let speed_start = line.find("speed=")?;
    let speed_str = line[speed_start + 6..].trim_start();
    let speed_end = speed_str.find('x')?;
    Some(speed_str[..=speed_end].to_string())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_quotes_words_with_spaces() {
        let invocation = FfmpegInvocation::new(
            "ffmpeg",
            vec!["-i".into(), "/media/my show.mkv".into()],
        );
        assert_eq!(invocation.command_line(), "ffmpeg -i '/media/my show.mkv'");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_arguments_are_kept_as_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"caf\xe9.mkv");
        let invocation = FfmpegInvocation::new("ffmpeg", vec!["-i".into(), name.to_os_string()]);
        assert_eq!(invocation.args[1].as_bytes(), b"caf\xe9.mkv");
        assert_eq!(invocation.display_args()[1], "caf\u{fffd}.mkv");
    }

    #[test]
    fn parses_stats_line() {
        let line = "frame=  120 fps=0.0 q=-1.0 size=    1024kB time=00:01:02.50 bitrate=134.2kbits/s speed=  31x";
        assert_eq!(parse_ffmpeg_progress(line), Some(62.5));
        assert_eq!(parse_ffmpeg_speed(line).as_deref(), Some("31x"));
    }

    #[test]
    fn non_stats_line_has_no_progress() {
        assert_eq!(parse_ffmpeg_progress("Error opening input file"), None);
        assert_eq!(parse_time_to_seconds("N/A"), None);
    }

    #[test]
    fn stderr_reader_splits_carriage_returns_and_collects_errors() {
        let input = "size=1kB time=00:00:01.00 speed=2x\rsize=2kB time=00:00:02.00 speed=2x\r\nout.mkv: Permission denied\n";
        let pb = ProgressBar::hidden();
        pb.set_length(10_000);
        let mut errors = Vec::new();
        read_ffmpeg_stderr(input.as_bytes(), &pb, &mut errors).unwrap();
        assert_eq!(pb.position(), 2000);
        assert_eq!(errors, vec!["out.mkv: Permission denied".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    #[serial_test::serial(spawn)]
    fn system_runner_pipes_stdin_and_reports_exit_code() {
        let temp = tempfile::tempdir().unwrap();
        let captured = temp.path().join("stdin.txt");
        let script = format!("cat > '{}'; exit 3", captured.display());
        let invocation = FfmpegInvocation::new("/bin/sh", vec!["-c".into(), script.into()])
            .with_stdin(b"file 'a.mp4'\n".to_vec());

        let err = SystemFfmpegRunner
            .run(&invocation, FfmpegRunOptions::default())
            .unwrap_err();

        assert!(matches!(err, ToolError::ExternalProcess { code: Some(3), .. }));
        assert_eq!(std::fs::read_to_string(&captured).unwrap(), "file 'a.mp4'\n");
    }

    #[cfg(unix)]
    #[test]
    #[serial_test::serial(spawn)]
    fn system_runner_succeeds_on_zero_exit() {
        let invocation = FfmpegInvocation::new("/bin/sh", vec!["-c".into(), "true".into()]);
        SystemFfmpegRunner
            .run(&invocation, FfmpegRunOptions::new(Some(1.0), false))
            .unwrap();
    }

    #[cfg(unix)]
    #[test]
    #[serial_test::serial(spawn)]
    fn stderr_diagnostics_do_not_fail_a_successful_run() {
        let script = "echo 'size=1kB time=00:00:00.50 speed=1x' >&2; echo 'Non-monotonous DTS' >&2";
        let invocation = FfmpegInvocation::new("/bin/sh", vec!["-c".into(), script.into()]);
        let options = FfmpegRunOptions::new(Some(1.0), true);
        SystemFfmpegRunner.run(&invocation, options).unwrap();
    }

    #[test]
    #[serial_test::serial(spawn)]
    fn spawn_failure_is_reported() {
        let invocation = FfmpegInvocation::new("/nonexistent/ffmpeg", Vec::new());
        let err = SystemFfmpegRunner
            .run(&invocation, FfmpegRunOptions::default())
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }
}
