use bendls_core::host::ProgressReporter;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Reports progress as log lines
///
/// Cancellable steps get a child of the interrupt token, so Ctrl-C aborts
/// the running command.
#[derive(Debug, Clone)]
pub struct TerminalProgress {
    interrupt: CancellationToken,
}

impl TerminalProgress {
    #[must_use]
    pub fn new(interrupt: CancellationToken) -> Self {
        Self { interrupt }
    }
}

impl ProgressReporter for TerminalProgress {
    fn begin(&self, title: &str, cancellable: bool) -> CancellationToken {
        if cancellable {
            info!("{} (press Ctrl-C to cancel)", title);
            self.interrupt.child_token()
        } else {
            info!("{}", title);
            CancellationToken::new()
        }
    }

    fn end(&self, title: &str) {
        debug!("Done: {}", title);
    }
}
