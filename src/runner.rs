//! Time-bounded execution of external tools.
//!
//! Every external program (probes and conversions alike) goes through the
//! [`Runner`] trait so the orchestration can be exercised without pandoc or
//! weasyprint installed. [`SystemRunner`] is the real implementation: it
//! captures stdout/stderr, waits up to the invocation's timeout and kills the
//! child if it overruns.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;
use wait_timeout::ChildExt;

/// How long a probe may take before the capability is treated as missing.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a full conversion may take.
pub const CONVERSION_TIMEOUT: Duration = Duration::from_secs(60);

/// A single external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
    pub current_dir: Option<PathBuf>,
    pub timeout: Duration,
}

impl Invocation {
    pub fn new<S: Into<String>>(program: S) -> Invocation {
        Invocation {
            program: program.into(),
            args: Vec::default(),
            current_dir: None,
            timeout: PROBE_TIMEOUT,
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Invocation {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir<P: AsRef<Path>>(mut self, dir: P) -> Invocation {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Invocation {
        self.timeout = timeout;
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// What a finished process left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// The text to surface when the process failed.
    ///
    /// Standard error is returned untouched; only when the tool wrote nothing
    /// there is a synthetic message built from the exit code.
    pub fn failure_message(&self, program: &str) -> String {
        if !self.stderr.trim().is_empty() {
            return self.stderr.clone();
        }
        match self.code {
            Some(code) => format!("{program} exited with status {code}"),
            None => format!("{program} was terminated by a signal"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} timed out after {}s", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },
    #[error("failed while waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

pub trait Runner {
    fn run(&self, invocation: &Invocation) -> Result<RunOutput, RunError>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunOutput, RunError> {
        log::debug!("running `{invocation}`");

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| RunError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        // pipes are drained off-thread so a chatty child can't block on a full buffer
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match child.wait_timeout(invocation.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                log::warn!(
                    "`{}` killed after {}s",
                    invocation.program,
                    invocation.timeout.as_secs()
                );
                // readers are left detached; a grandchild may still hold the pipes
                return Err(RunError::TimedOut {
                    program: invocation.program.clone(),
                    timeout: invocation.timeout,
                });
            }
            Err(source) => {
                let _ = child.kill();
                return Err(RunError::Wait {
                    program: invocation.program.clone(),
                    source,
                });
            }
        };

        let output = RunOutput {
            code: status.code(),
            stdout: collect(stdout),
            stderr: collect(stderr),
        };
        log::debug!(
            "`{}` exited with {:?} ({} bytes on stdout)",
            invocation.program,
            output.code,
            output.stdout.len()
        );
        Ok(output)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = pipe.read_to_end(&mut buffer);
            buffer
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

/// A scripted stand-in for external tools.
#[cfg(test)]
pub mod fake {
    use super::*;
    use std::cell::RefCell;

    type Handler = Box<dyn Fn(&Invocation) -> Result<RunOutput, RunError>>;

    pub struct FakeRunner {
        handler: Handler,
        calls: RefCell<Vec<Invocation>>,
    }

    impl FakeRunner {
        pub fn new<F>(handler: F) -> FakeRunner
        where
            F: Fn(&Invocation) -> Result<RunOutput, RunError> + 'static,
        {
            FakeRunner {
                handler: Box::new(handler),
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<Invocation> {
            self.calls.borrow().clone()
        }

        /// Each recorded call as `program first-arg`, which is enough to tell
        /// probes from conversions.
        pub fn summary(&self) -> Vec<String> {
            self.calls
                .borrow()
                .iter()
                .map(|c| match c.args.first() {
                    Some(first) => format!("{} {}", c.program, first.to_string_lossy()),
                    None => c.program.clone(),
                })
                .collect()
        }
    }

    impl Runner for FakeRunner {
        fn run(&self, invocation: &Invocation) -> Result<RunOutput, RunError> {
            self.calls.borrow_mut().push(invocation.clone());
            (self.handler)(invocation)
        }
    }

    pub fn succeeded() -> Result<RunOutput, RunError> {
        Ok(RunOutput {
            code: Some(0),
            ..RunOutput::default()
        })
    }

    pub fn failed(code: i32, stderr: &str) -> Result<RunOutput, RunError> {
        Ok(RunOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        })
    }

    pub fn not_installed(invocation: &Invocation) -> Result<RunOutput, RunError> {
        Err(RunError::Spawn {
            program: invocation.program.clone(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }
}
