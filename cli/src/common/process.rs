//! # BldRS Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! This module is the single execution primitive every pipeline step shares.
//! It launches an external command, streams the child's combined stdout +
//! stderr line-by-line to the logger (and optionally to a file), optionally
//! accumulates the output, and returns the exit status. One generic runner
//! with a uniform (status, optional-text) contract lets configure, build,
//! test, coverage and benchmark steps differ only in the command they
//! construct, while long-running builds stay visible in real time instead of
//! blocking silently.
//!
//! ## Architecture
//!
//! - `CommandSpec`: the command as ordered tokens — a mandatory program plus
//!   arguments; non-empty by construction and immutable once built.
//! - `ExecContext`: where and how to run — working directory, optional
//!   environment overlay, capture flag, optional output file path.
//! - `RunOutcome`: a tagged result, either `Exited(status)` or
//!   `ExitedWithOutput { status, output }`, chosen by the capture flag, so a
//!   call site never has to guess which shape it got back.
//! - `run`: the blocking runner itself.
//!
//! The child's stderr is redirected into the same anonymous pipe as its
//! stdout, preserving arrival order. The read loop only concludes the run
//! when a read yields no data AND a non-blocking status poll confirms the
//! child has exited; checking in that order prevents a race where lines
//! written just before exit would be dropped. Lines are decoded lossily —
//! malformed byte sequences are substituted, never fatal to the run.
//!
//! A child that exits non-zero is a normal, expected outcome returned as
//! data; only failure to acquire the child at all (program not found,
//! permission denied) propagates as an error. There is no timeout and no
//! cancellation: a hung child blocks the runner indefinitely.
//!
//! ## Examples
//!
//! ```rust
//! let spec = CommandSpec::new("cmake").arg("--build").arg(".");
//! let ctx = ExecContext::new(&build_dir).capture_output(true);
//!
//! match process::run(&spec, &ctx)? {
//!     RunOutcome::ExitedWithOutput { status: 0, output } => println!("{output}"),
//!     outcome => eprintln!("build failed with status {}", outcome.status()),
//! }
//! ```
//!
use crate::common::platform;
use crate::core::error::{BldrsError, Result};
use anyhow::Context;
use std::{
    collections::HashMap,
    fmt,
    fs::File,
    io::{BufRead, BufReader, Write},
    path::PathBuf,
    process::{Command, ExitStatus, Stdio},
};
use tracing::info;

/// # Command Specification (`CommandSpec`)
///
/// An ordered sequence of string tokens: the program name followed by its
/// arguments. Always holds at least one token (the program is mandatory at
/// construction), and is immutable once built — the orchestrator constructs
/// a fresh one per step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    /// Create a specification for `program` with no arguments yet.
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument token.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several argument tokens in order.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The program token.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The argument tokens, in order (program excluded).
    pub fn arg_tokens(&self) -> &[String] {
        &self.args
    }

    /// All tokens in order, program first.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }
}

impl fmt::Display for CommandSpec {
    /// The full command line, tokens joined by single spaces (for banners).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens().collect::<Vec<_>>().join(" "))
    }
}

/// # Execution Context (`ExecContext`)
///
/// Where and how a command runs: the working directory (must exist), an
/// optional environment overlay applied on top of the inherited environment,
/// whether to collect the combined output into a string, and an optional
/// file path the output is streamed to line-by-line.
#[derive(Debug, Clone)]
pub struct ExecContext {
    working_dir: PathBuf,
    env: Option<HashMap<String, String>>,
    capture: bool,
    output_file: Option<PathBuf>,
}

impl ExecContext {
    /// Context running in `working_dir`, inheriting the full parent
    /// environment, collecting nothing, writing no file.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        ExecContext {
            working_dir: working_dir.into(),
            env: None,
            capture: false,
            output_file: None,
        }
    }

    /// Overlay environment variables on top of the inherited environment.
    pub fn env(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    /// Request the combined output to be accumulated and returned.
    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    /// Stream the combined output to `path` (created/truncated up front,
    /// appended line-by-line as output arrives, closed before `run` returns).
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }
}

/// # Execution Result (`RunOutcome`)
///
/// Tagged result of [`run`]: callers that requested capture receive
/// `ExitedWithOutput`, everyone else `Exited`. The status is always
/// determinate; its meaning (0 = success) is the external tool's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The child exited; output was streamed but not collected.
    Exited(i32),
    /// The child exited and its combined output was collected.
    ExitedWithOutput { status: i32, output: String },
}

impl RunOutcome {
    /// The child's exit status.
    pub fn status(&self) -> i32 {
        match self {
            RunOutcome::Exited(status) => *status,
            RunOutcome::ExitedWithOutput { status, .. } => *status,
        }
    }

    /// Whether the child exited with status zero.
    pub fn success(&self) -> bool {
        self.status() == 0
    }

    /// The collected output, if collection was requested.
    pub fn output(&self) -> Option<&str> {
        match self {
            RunOutcome::Exited(_) => None,
            RunOutcome::ExitedWithOutput { output, .. } => Some(output),
        }
    }
}

/// # Run an External Command (`run`)
///
/// Launches `spec` in the context `ctx`, streams its combined stdout+stderr
/// line-by-line to the logger at info level (and to the output file and/or
/// capture accumulator when requested), and returns the exit status once the
/// child has terminated.
///
/// On Windows the command is invoked through `cmd /C` so the platform's
/// command resolution applies; on POSIX hosts it is invoked directly,
/// without shell interpretation of the tokens.
///
/// ## Errors
///
/// - `BldrsError::FileSystem` if the working directory does not exist
///   (checked before any child is spawned).
/// - `BldrsError::Launch` if the child process could not be created.
/// - I/O errors from the output file or the pipe.
///
/// A non-zero child exit status is NOT an error; inspect the returned
/// [`RunOutcome`].
pub fn run(spec: &CommandSpec, ctx: &ExecContext) -> Result<RunOutcome> {
    if !ctx.working_dir.is_dir() {
        anyhow::bail!(BldrsError::FileSystem(format!(
            "Working directory does not exist: {}",
            ctx.working_dir.display()
        )));
    }

    // Python-based child tools (gcovr among them) buffer their output unless
    // told otherwise; force line-by-line interleaving before spawning.
    std::env::set_var("PYTHONUNBUFFERED", "1");

    info!("####################################### <run> #######################################");
    info!("Working Directory: {}", ctx.working_dir.display());
    info!("Command: {}", spec);

    // Scoped acquisition: the handle lives in this frame, so it is closed on
    // every exit path, including early `?` returns and abnormal child exits.
    let mut output_file = match &ctx.output_file {
        Some(path) => Some(File::create(path).with_context(|| {
            format!("Failed to create output file {}", path.display())
        })?),
        None => None,
    };

    // One anonymous pipe carries both streams; stderr is interleaved into
    // stdout in arrival order.
    let (reader, writer) = std::io::pipe().context("Failed to create output pipe")?;
    let stderr_writer = writer
        .try_clone()
        .context("Failed to clone pipe writer for stderr")?;

    let mut child = {
        let mut cmd = build_command(spec);
        cmd.current_dir(&ctx.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(writer))
            .stderr(Stdio::from(stderr_writer));
        if let Some(env) = &ctx.env {
            cmd.envs(env);
        }
        cmd.spawn().map_err(|source| BldrsError::Launch {
            program: spec.program().to_string(),
            source,
        })?
        // `cmd` drops here, closing the parent-side pipe writers; without
        // that, the read loop would never observe end-of-stream.
    };

    info!("-------------------------------------- <output> -------------------------------------");

    let mut reader = BufReader::new(reader);
    let mut collected = String::new();
    let mut buf: Vec<u8> = Vec::new();
    let status: ExitStatus = loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .context("Failed to read child output")?;
        if n == 0 {
            // No data available: conclude the run only once the non-blocking
            // poll confirms the child is gone. Read-then-poll in this order
            // so trailing lines written just before exit are never dropped.
            match child.try_wait().context("Failed to poll child status")? {
                Some(status) => break status,
                None => {
                    // The child can close its output descriptors and keep
                    // running; back off briefly between polls instead of
                    // spinning on a permanent end-of-stream.
                    std::thread::sleep(std::time::Duration::from_millis(10));
                    continue;
                }
            }
        }
        // Permissive decoding: malformed sequences are substituted, never fatal.
        let line = String::from_utf8_lossy(&buf);
        if let Some(file) = output_file.as_mut() {
            // Written immediately, not buffered to end-of-run.
            file.write_all(line.as_bytes())
                .context("Failed to write child output to file")?;
        }
        if ctx.capture {
            collected.push_str(&line);
        }
        info!("{}", line.trim_end_matches(['\n', '\r']));
    };

    if let Some(file) = output_file.as_mut() {
        file.flush().context("Failed to flush output file")?;
    }
    drop(output_file); // closed before the result is produced

    let code = exit_code(status);
    info!("-------------------------------------- </output> ------------------------------------");
    info!("Return code: {}", code);
    info!("####################################### </run> ######################################");

    if ctx.capture {
        Ok(RunOutcome::ExitedWithOutput {
            status: code,
            output: collected,
        })
    } else {
        Ok(RunOutcome::Exited(code))
    }
}

/// Build the `std::process::Command` for a spec. On the Windows family the
/// command goes through the platform shell (`cmd /C`); elsewhere it is
/// invoked directly, avoiding shell-metacharacter interpretation.
fn build_command(spec: &CommandSpec) -> Command {
    if platform::current().windows {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C");
        cmd.args(spec.tokens());
        cmd
    } else {
        let mut cmd = Command::new(spec.program());
        cmd.args(spec.arg_tokens());
        cmd
    }
}

/// Coerce an `ExitStatus` into a determinate integer. Signal deaths on Unix
/// become `128 + signal`; anything else without a code becomes -1.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn here() -> PathBuf {
        std::env::current_dir().unwrap()
    }

    #[test]
    fn test_command_spec_display_joins_tokens() {
        let spec = CommandSpec::new("cmake")
            .arg("--build")
            .arg(".")
            .args(["--config", "Debug"]);
        assert_eq!(spec.to_string(), "cmake --build . --config Debug");
        assert_eq!(spec.tokens().count(), 5);
    }

    #[test]
    fn test_missing_working_directory_fails_before_spawn() {
        let spec = CommandSpec::new("definitely_not_a_real_binary_xyz");
        let ctx = ExecContext::new("/definitely/not/a/real/working/dir");
        let err = run(&spec, &ctx).unwrap_err();
        // The working-directory check fires first, so this is a filesystem
        // error, not a launch failure.
        assert!(err.to_string().contains("Working directory"));
    }

    #[test]
    fn test_nonexistent_program_is_a_launch_fault() {
        let spec = CommandSpec::new("definitely_not_a_real_binary_xyz");
        let ctx = ExecContext::new(here());
        let err = run(&spec, &ctx).unwrap_err();
        let launch = err.downcast_ref::<BldrsError>();
        assert!(matches!(launch, Some(BldrsError::Launch { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_echo_hello_captured() {
        let spec = CommandSpec::new("echo").arg("hello");
        let ctx = ExecContext::new(here()).capture_output(true);
        let outcome = run(&spec, &ctx).unwrap();
        assert_eq!(outcome.status(), 0);
        assert!(outcome.success());
        assert_eq!(outcome.output(), Some("hello\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_status_only_when_capture_not_requested() {
        let spec = CommandSpec::new("echo").arg("hello");
        let ctx = ExecContext::new(here());
        let outcome = run(&spec, &ctx).unwrap();
        assert_eq!(outcome, RunOutcome::Exited(0));
        assert!(outcome.output().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_status_is_returned_not_raised() {
        let spec = CommandSpec::new("sh").args(["-c", "echo failing; exit 3"]);
        let ctx = ExecContext::new(here()).capture_output(true);
        let outcome = run(&spec, &ctx).unwrap();
        assert_eq!(outcome.status(), 3);
        assert!(!outcome.success());
        assert_eq!(outcome.output(), Some("failing\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_stderr_interleaved_into_combined_stream() {
        let spec = CommandSpec::new("sh").args(["-c", "echo out; echo err 1>&2"]);
        let ctx = ExecContext::new(here()).capture_output(true);
        let outcome = run(&spec, &ctx).unwrap();
        assert_eq!(outcome.status(), 0);
        let output = outcome.output().unwrap();
        assert!(output.contains("out\n"));
        assert!(output.contains("err\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_output_file_matches_captured_text() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("step.log");
        let spec = CommandSpec::new("sh").args(["-c", "echo one; echo two"]);
        let ctx = ExecContext::new(here())
            .capture_output(true)
            .output_file(&log_path);
        let outcome = run(&spec, &ctx).unwrap();
        assert_eq!(outcome.status(), 0);
        // The handle is closed before `run` returns, so the file is
        // immediately readable and flush-complete.
        let written = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(Some(written.as_str()), outcome.output());
        assert_eq!(written, "one\ntwo\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_output_file_created_even_when_child_produces_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("empty.log");
        let spec = CommandSpec::new("true");
        let ctx = ExecContext::new(here()).output_file(&log_path);
        let outcome = run(&spec, &ctx).unwrap();
        assert_eq!(outcome.status(), 0);
        assert!(log_path.exists());
        assert_eq!(std::fs::read_to_string(&log_path).unwrap(), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_environment_overlay_reaches_child() {
        let mut env = HashMap::new();
        env.insert("BLDRS_TEST_MARKER".to_string(), "forty-two".to_string());
        let spec = CommandSpec::new("sh").args(["-c", "echo $BLDRS_TEST_MARKER"]);
        let ctx = ExecContext::new(here()).env(env).capture_output(true);
        let outcome = run(&spec, &ctx).unwrap();
        assert_eq!(outcome.output(), Some("forty-two\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_trailing_lines_before_exit_are_not_dropped() {
        // Many short lines right before exit exercise the read-then-poll
        // ordering at end of stream.
        let spec = CommandSpec::new("sh").args(["-c", "for i in 1 2 3 4 5; do echo line$i; done"]);
        let ctx = ExecContext::new(here()).capture_output(true);
        let outcome = run(&spec, &ctx).unwrap();
        assert_eq!(
            outcome.output(),
            Some("line1\nline2\nline3\nline4\nline5\n")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_signal_death_coerces_to_128_plus_signal() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("killed.log");
        let spec = CommandSpec::new("sh").args(["-c", "echo partial; kill -TERM $$"]);
        let ctx = ExecContext::new(here()).output_file(&log_path);
        let outcome = run(&spec, &ctx).unwrap();
        assert_eq!(outcome.status(), 128 + 15);
        // The output file is closed and flush-complete even though the child
        // died mid-stream.
        assert_eq!(std::fs::read_to_string(&log_path).unwrap(), "partial\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_child_closing_its_output_early_still_waits_for_exit() {
        // End-of-stream with a live child: the loop must keep polling until
        // the real exit status is available, not conclude at the first
        // empty read.
        let spec =
            CommandSpec::new("sh").args(["-c", "echo early; exec >&- 2>&-; sleep 0.3; exit 7"]);
        let ctx = ExecContext::new(here()).capture_output(true);
        let outcome = run(&spec, &ctx).unwrap();
        assert_eq!(outcome.status(), 7);
        assert_eq!(outcome.output(), Some("early\n"));
    }
}
