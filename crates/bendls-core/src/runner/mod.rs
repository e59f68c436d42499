//! External command runner
//!
//! Runs a process with the merged environment, shows progress for the
//! duration of the call and captures stdout/stderr. Every invocation yields
//! exactly one result.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::environment::{build_environment, EnvironmentMap};
use crate::error::CommandError;
use crate::host::ProgressReporter;

/// A command to execute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Applied on top of the process and server environments
    pub env_additions: EnvironmentMap,
    pub title: Option<String>,
    pub cancellable: bool,
}

impl CommandSpec {
    #[must_use]
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Title of the progress indicator
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Allow the user to cancel through the progress indicator
    #[must_use]
    pub fn cancellable(mut self, cancellable: bool) -> Self {
        self.cancellable = cancellable;
        self
    }

    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_additions.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Human readable command line used in logs and errors
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Raw outcome of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Default completion mapping: trimmed stdout on success, failure otherwise
///
/// # Errors
/// Returns [`CommandError::Exited`] for a non-zero exit.
pub fn default_completion(command: &str, output: CommandOutput) -> Result<String, CommandError> {
    if output.success() {
        Ok(output.stdout.trim().to_string())
    } else {
        Err(CommandError::Exited {
            command: command.to_string(),
            code: output.code,
            stderr: output.stderr,
            stdout: output.stdout,
        })
    }
}

/// Runs external commands with the server environment applied
pub struct CommandRunner<'a> {
    server_env: &'a EnvironmentMap,
    progress: &'a dyn ProgressReporter,
}

impl<'a> CommandRunner<'a> {
    #[must_use]
    pub fn new(server_env: &'a EnvironmentMap, progress: &'a dyn ProgressReporter) -> Self {
        Self {
            server_env,
            progress,
        }
    }

    /// Run a command and return its trimmed stdout
    ///
    /// # Errors
    /// Returns an error if the process cannot be spawned, exits non-zero or
    /// is cancelled.
    pub async fn run(&self, spec: &CommandSpec) -> Result<String, CommandError> {
        self.run_with(spec, default_completion).await
    }

    /// Run a command and let `handler` decide success or failure
    ///
    /// Failed exits are logged before `handler` sees them.
    ///
    /// # Errors
    /// Returns spawn, I/O and cancellation errors, or whatever `handler` returns.
    pub async fn run_with<T, F>(&self, spec: &CommandSpec, handler: F) -> Result<T, CommandError>
    where
        F: FnOnce(&str, CommandOutput) -> Result<T, CommandError>,
    {
        let command_line = spec.command_line();
        let title = spec.title.clone().unwrap_or_else(|| command_line.clone());

        let token = self.progress.begin(&title, spec.cancellable);
        let result = self.execute(spec, &command_line, &token).await;
        self.progress.end(&title);

        let output = result?;
        if !output.success() {
            error!(
                "Error executing '{}' with error code {:?}",
                command_line, output.code
            );
            error!("stderr: {}", output.stderr);
            if !output.stdout.is_empty() {
                error!("stdout: {}", output.stdout);
            }
        }

        handler(&command_line, output)
    }

    async fn execute(
        &self,
        spec: &CommandSpec,
        command_line: &str,
        token: &CancellationToken,
    ) -> Result<CommandOutput, CommandError> {
        let env = build_environment(self.server_env, &spec.env_additions);
        let cwd = spec
            .cwd
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        info!("Executing '{}' in cwd '{}'", command_line, cwd);

        let mut command = Command::new(program_for(&spec.program, &env));
        command
            .args(&spec.args)
            .env_clear()
            .envs(&env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| {
            error!("Error executing '{}': {}", command_line, source);
            CommandError::Spawn {
                command: command_line.to_string(),
                source,
            }
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let outcome = tokio::select! {
            collected = async {
                tokio::join!(child.wait(), read_pipe(stdout), read_pipe(stderr))
            } => Some(collected),
            () = token.cancelled() => None,
        };

        let Some((status, stdout, stderr)) = outcome else {
            warn!("User canceled the execution of '{}'", command_line);
            if let Err(e) = child.start_kill() {
                warn!("Failed to terminate '{}': {}", command_line, e);
            }
            return Err(CommandError::Cancelled {
                command: command_line.to_string(),
            });
        };

        let io_err = |source| CommandError::Io {
            command: command_line.to_string(),
            source,
        };
        let status: ExitStatus = status.map_err(io_err)?;
        info!("Execution of '{}' terminated with {}", command_line, status);

        Ok(CommandOutput {
            code: status.code(),
            stdout: stdout.map_err(io_err)?,
            stderr: stderr.map_err(io_err)?,
        })
    }
}

async fn read_pipe<R>(pipe: Option<R>) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Scripts need their extension spelled out on Windows
#[cfg(windows)]
fn program_for(program: &str, env: &EnvironmentMap) -> OsString {
    let Ok(cwd) = std::env::current_dir() else {
        return OsString::from(program);
    };
    match which::which_in(program, env.get("PATH"), cwd) {
        Ok(resolved) => resolved.into_os_string(),
        Err(e) => {
            tracing::debug!("Failed to resolve {}: {}. Using original path", program, e);
            OsString::from(program)
        }
    }
}

#[cfg(not(windows))]
fn program_for(program: &str, _env: &EnvironmentMap) -> OsString {
    OsString::from(program)
}
