//! Terminal implementations of the host surfaces

mod progress;
mod prompter;

pub use progress::TerminalProgress;
pub use prompter::{parse_selection, prompts_enabled, read_answer, TerminalPrompter};
