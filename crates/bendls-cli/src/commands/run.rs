//! Run command: launch the language server and supervise it
//!
//! The server keeps this process's stdio. `SIGHUP` restarts it, Ctrl-C stops
//! it, and the command exits when the server does.

use std::process::ExitStatus;

use anyhow::{bail, Result};
use bendls_core::supervisor::{LaunchMode, ServerSupervisor};
use bendls_core::{activate, env_override, SupervisorError};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::CliContext;

enum Event {
    Exited(Result<ExitStatus, SupervisorError>),
    Restart,
    Stop,
}

/// Run the language server until it exits or is interrupted
///
/// # Errors
/// Returns an error if resolution fails, the server cannot be started, or it
/// exits unsuccessfully.
pub async fn run(
    context: &CliContext,
    mode: LaunchMode,
    interrupt: &CancellationToken,
) -> Result<()> {
    let options = activate(&context.resolver(), env_override()).await?;
    let mut supervisor = ServerSupervisor::new(options, mode);
    supervisor.start()?;

    let mut restarts = RestartSignal::new()?;
    loop {
        let event = tokio::select! {
            status = supervisor.wait() => Event::Exited(status),
            () = restarts.recv() => Event::Restart,
            () = interrupt.cancelled() => Event::Stop,
        };

        match event {
            Event::Exited(status) => {
                let status = status?;
                info!("Language server exited with {}", status);
                if !status.success() {
                    bail!("The language server exited with {status}");
                }
                return Ok(());
            }
            Event::Restart => {
                info!("Restarting the language server");
                supervisor.restart().await?;
            }
            Event::Stop => {
                supervisor.stop().await?;
                return Ok(());
            }
        }
    }
}

#[cfg(unix)]
struct RestartSignal(tokio::signal::unix::Signal);

#[cfg(unix)]
impl RestartSignal {
    fn new() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self(signal(SignalKind::hangup())?))
    }

    async fn recv(&mut self) {
        if self.0.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}

/// No restart signal outside unix
#[cfg(not(unix))]
struct RestartSignal;

#[cfg(not(unix))]
impl RestartSignal {
    #[allow(clippy::unnecessary_wraps)]
    fn new() -> std::io::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) {
        std::future::pending::<()>().await;
    }
}
