//! Supervisor: starts, stops and restarts the language server process

use std::collections::HashMap;
use std::process::{ExitStatus, Stdio};

use crate::error::SupervisorError;

/// Log level handed to the server in each launch mode
const RUN_LOG_LEVEL: &str = "info";
const DEBUG_LOG_LEVEL: &str = "debug";

/// How to spawn the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub command: String,
    pub args: Vec<String>,
    /// Applied on top of the inherited process environment
    pub env: HashMap<String, String>,
}

/// Which launch specification to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchMode {
    #[default]
    Run,
    Debug,
}

/// Launch specifications for the run and debug modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    pub run: LaunchSpec,
    pub debug: LaunchSpec,
}

impl ServerOptions {
    /// Same command in both modes, differing only in `RUST_LOG`
    #[must_use]
    pub fn for_command(command: impl Into<String>) -> Self {
        let command = command.into();
        let spec = |level: &str| LaunchSpec {
            command: command.clone(),
            args: Vec::new(),
            env: HashMap::from([("RUST_LOG".to_string(), level.to_string())]),
        };
        Self {
            run: spec(RUN_LOG_LEVEL),
            debug: spec(DEBUG_LOG_LEVEL),
        }
    }

    #[must_use]
    pub fn spec(&self, mode: LaunchMode) -> &LaunchSpec {
        match mode {
            LaunchMode::Run => &self.run,
            LaunchMode::Debug => &self.debug,
        }
    }
}

/// Owns the running language server, if any
pub struct ServerSupervisor {
    options: ServerOptions,
    mode: LaunchMode,
    child: Option<async_process::Child>,
    /// Pipe stdio instead of inheriting it
    piped: bool,
}

impl ServerSupervisor {
    #[must_use]
    pub fn new(options: ServerOptions, mode: LaunchMode) -> Self {
        Self {
            options,
            mode,
            child: None,
            piped: false,
        }
    }

    /// Detach the server from this process's stdio
    #[must_use]
    pub fn with_piped_stdio(mut self) -> Self {
        self.piped = true;
        self
    }

    #[must_use]
    pub fn options(&self) -> &ServerOptions {
        &self.options
    }

    /// Process id of the running server
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(async_process::Child::id)
    }

    /// Whether a server process is alive
    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut().map(async_process::Child::try_status) {
            Some(Ok(None)) => true,
            Some(Ok(Some(status))) => {
                tracing::info!("Language server exited with {}", status);
                self.child = None;
                false
            }
            Some(Err(e)) => {
                tracing::warn!("Could not query language server status: {}", e);
                false
            }
            None => false,
        }
    }

    /// Start the server; a running server is left alone
    ///
    /// # Errors
    /// Returns an error if the process cannot be spawned.
    pub fn start(&mut self) -> Result<(), SupervisorError> {
        if self.is_running() {
            return Ok(());
        }

        let spec = self.options.spec(self.mode);
        tracing::info!("Starting the language server: {}", spec.command);

        let stdio = |piped: bool| if piped { Stdio::piped() } else { Stdio::inherit() };
        let child = async_process::Command::new(&spec.command)
            .args(&spec.args)
            .envs(&spec.env)
            .stdin(stdio(self.piped))
            .stdout(stdio(self.piped))
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SupervisorError::Start {
                command: spec.command.clone(),
                source,
            })?;

        self.child = Some(child);
        Ok(())
    }

    /// Stop the server and wait for it to exit
    ///
    /// # Errors
    /// Returns an error if the process cannot be killed.
    pub async fn stop(&mut self) -> Result<(), SupervisorError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        tracing::info!("Stopping the language server.");
        if let Err(e) = child.kill() {
            // Already exited
            if e.kind() != std::io::ErrorKind::InvalidInput {
                return Err(SupervisorError::Stop(e));
            }
        }
        let status = child.status().await.map_err(SupervisorError::Stop)?;
        tracing::debug!("Language server stopped with {}", status);
        Ok(())
    }

    /// Stop a running server, then start it again
    ///
    /// # Errors
    /// Returns an error if stopping or starting fails.
    pub async fn restart(&mut self) -> Result<(), SupervisorError> {
        if self.is_running() {
            self.stop().await?;
        }
        self.start()
    }

    /// Wait for the server to exit on its own
    ///
    /// # Errors
    /// Returns [`SupervisorError::NotRunning`] if no server was started.
    pub async fn wait(&mut self) -> Result<ExitStatus, SupervisorError> {
        let child = self.child.as_mut().ok_or(SupervisorError::NotRunning)?;
        let status = child.status().await.map_err(SupervisorError::Stop)?;
        self.child = None;
        Ok(status)
    }
}

#[cfg(test)]
mod tests;
