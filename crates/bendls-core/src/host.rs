//! Host surfaces: prompts, notifications and progress
//!
//! Front-ends implement these; the resolver only sees decision-affecting
//! return values.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Modal prompts and notices
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Present `options` and return the selected one, or `None` if dismissed
    async fn choose(&self, message: &str, options: &[&str], modal: bool) -> Option<String>;

    /// Show a non-blocking warning notice
    fn warn(&self, message: &str);
}

/// Progress indicator shown for the duration of an external command
pub trait ProgressReporter: Send + Sync {
    /// Show a progress indicator; the returned token fires if the user cancels
    fn begin(&self, title: &str, cancellable: bool) -> CancellationToken;

    /// Remove the indicator started with `title`
    fn end(&self, title: &str);
}

/// Progress reporter that displays nothing and never cancels
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn begin(&self, title: &str, _cancellable: bool) -> CancellationToken {
        tracing::debug!("{}", title);
        CancellationToken::new()
    }

    fn end(&self, _title: &str) {}
}
