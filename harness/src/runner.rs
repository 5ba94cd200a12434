//! Isolated execution of a single example through an external toolchain.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::config::{CheckConfig, DEFAULT_TOOLCHAIN};
use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Something that can run a single source file and report its exit status.
pub trait Toolchain {
    /// File suffix the toolchain recognizes as source code.
    fn source_suffix(&self) -> &str {
        ".go"
    }

    /// Run `path` to completion with `args` and return its exit status.
    ///
    /// A nonzero status is the example's own failure. `Err` means the
    /// toolchain itself could not do its job.
    fn run_file(&self, path: &Path, args: &[String]) -> Result<i32>;
}

impl<T: Toolchain + ?Sized> Toolchain for &T {
    fn source_suffix(&self) -> &str {
        (**self).source_suffix()
    }

    fn run_file(&self, path: &Path, args: &[String]) -> Result<i32> {
        (**self).run_file(path, args)
    }
}

/// Runs examples with `go run <file> [args...]`.
///
/// With a timeout the toolchain is started in its own process group so the
/// compiled example, a child of `go`, is killed together with it.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl GoToolchain {
    pub fn new() -> Self {
        GoToolchain {
            program: PathBuf::from(DEFAULT_TOOLCHAIN),
            timeout: None,
        }
    }

    pub fn from_config(config: &CheckConfig) -> Self {
        GoToolchain {
            program: config.toolchain.clone(),
            timeout: config.timeout,
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl Toolchain for GoToolchain {
    fn run_file(&self, path: &Path, args: &[String]) -> Result<i32> {
        tracing::debug!(
            program = %self.program.display(),
            file = %path.display(),
            ?args,
            "running example"
        );

        let mut command = Command::new(&self.program);
        command
            .arg("run")
            .arg(path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            if self.timeout.is_some() {
                command.process_group(0);
            }
        }

        let mut child = command.spawn().map_err(|source| Error::Launch {
            program: self.program_name(),
            source,
        })?;

        let waited = match self.timeout {
            None => child.wait().map(Some),
            Some(limit) => wait_with_timeout(&mut child, limit),
        };
        let status = waited.map_err(|source| Error::Wait {
            program: self.program_name(),
            source,
        })?;

        match status {
            Some(status) => Ok(exit_code(status)),
            None => {
                let limit = self.timeout.unwrap_or_default();
                tracing::warn!(file = %path.display(), ?limit, "example timed out, killed");
                Err(Error::Timeout(limit))
            }
        }
    }
}

/// Poll `child` until it exits or `timeout` elapses. Returns `None` if the
/// child had to be killed.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            kill_process_group(child);
            child.wait()?;
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// Kill `child` and everything it started. The child leads its own group.
#[cfg(unix)]
fn kill_process_group(child: &mut Child) {
    let pgid = child.id() as libc::pid_t;
    // An unreaped child keeps the group id reserved, so this cannot hit a
    // foreign group.
    let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if rc != 0 {
        tracing::debug!(
            err = %std::io::Error::last_os_error(),
            "group kill failed, killing child only"
        );
        let _ = child.kill();
    }
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) {
    let _ = child.kill();
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Writes each example to a fresh temporary file and runs it with a toolchain.
pub struct Runner<T> {
    toolchain: T,
    keep_sources: bool,
}

impl<T: Toolchain> Runner<T> {
    pub fn new(toolchain: T) -> Self {
        Runner {
            toolchain,
            keep_sources: false,
        }
    }

    /// Leave the temporary source files on disk after each run.
    pub fn keep_sources(mut self, keep: bool) -> Self {
        self.keep_sources = keep;
        self
    }

    /// Run `source` once with `args`.
    ///
    /// Unless sources are kept, the temporary file is removed on every return
    /// path, including errors.
    pub fn run(&self, source: &str, args: &[String]) -> Result<i32> {
        let mut file = tempfile::Builder::new()
            .prefix("docex-")
            .suffix(self.toolchain.source_suffix())
            .tempfile()
            .map_err(Error::TempFile)?;

        file.write_all(source.as_bytes()).map_err(Error::TempFile)?;
        file.flush().map_err(Error::TempFile)?;
        file.as_file().sync_all().map_err(Error::TempFile)?;

        let status = self.toolchain.run_file(file.path(), args);

        if self.keep_sources {
            let (_, path) = file.keep().map_err(|e| Error::TempFile(e.error))?;
            tracing::info!(path = %path.display(), "kept example source");
        }
        status
    }
}

/// Run `source` once with no arguments, removing its temporary file afterwards.
pub fn run_example<T: Toolchain + ?Sized>(toolchain: &T, source: &str) -> Result<i32> {
    Runner::new(toolchain).run(source, &[])
}
