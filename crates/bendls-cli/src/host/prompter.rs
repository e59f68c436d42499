use std::io::IsTerminal;

use async_trait::async_trait;
use bendls_core::host::Prompter;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Asks on stderr and reads the answer from stdin
///
/// Answers are only read when stdin is a terminal. Under `bendls run` stdin
/// belongs to the language client, so every prompt is dismissed instead.
#[derive(Debug, Clone)]
pub struct TerminalPrompter {
    interactive: bool,
    interrupt: CancellationToken,
}

impl TerminalPrompter {
    #[must_use]
    pub fn new(interactive: bool, interrupt: CancellationToken) -> Self {
        Self {
            interactive,
            interrupt,
        }
    }

    /// Prompter for this process, interactive only on a terminal
    #[must_use]
    pub fn for_stdin(non_interactive: bool, interrupt: CancellationToken) -> Self {
        let stdin_is_terminal = std::io::stdin().is_terminal();
        if !non_interactive && !stdin_is_terminal {
            debug!("stdin is not a terminal; prompts will be dismissed");
        }
        Self::new(prompts_enabled(non_interactive, stdin_is_terminal), interrupt)
    }

    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Prompts need a terminal and must not be switched off
#[must_use]
pub fn prompts_enabled(non_interactive: bool, stdin_is_terminal: bool) -> bool {
    !non_interactive && stdin_is_terminal
}

/// Map an answer to one of `options`, by 1-based number or by exact text
///
/// Anything else, including a blank line, counts as a dismissal.
#[must_use]
pub fn parse_selection(input: &str, options: &[&str]) -> Option<String> {
    let answer = input.trim();
    if answer.is_empty() {
        return None;
    }

    if let Ok(index) = answer.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| options.get(i))
            .map(|option| (*option).to_string());
    }

    options
        .iter()
        .find(|option| **option == answer)
        .map(|option| (*option).to_string())
}

/// Read one answer line; an interrupt dismisses the prompt
pub async fn read_answer<R>(
    reader: &mut R,
    options: &[&str],
    interrupt: &CancellationToken,
) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    if interrupt.is_cancelled() {
        return None;
    }

    let mut line = String::new();
    let read = tokio::select! {
        read = reader.read_line(&mut line) => read,
        () = interrupt.cancelled() => {
            info!("Prompt interrupted");
            return None;
        }
    };

    match read {
        Ok(0) => None,
        Ok(_) => parse_selection(&line, options),
        Err(e) => {
            warn!("Could not read an answer: {}", e);
            None
        }
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn choose(&self, message: &str, options: &[&str], modal: bool) -> Option<String> {
        if !self.interactive {
            info!("Dismissed prompt: {}", message);
            return None;
        }

        eprintln!();
        eprintln!("{message}");
        for (i, option) in options.iter().enumerate() {
            eprintln!("  {}) {}", i + 1, option);
        }
        if modal {
            eprint!("Select an option: ");
        } else {
            eprint!("Select an option (leave blank to skip): ");
        }

        let mut stdin = BufReader::new(tokio::io::stdin());
        read_answer(&mut stdin, options, &self.interrupt).await
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}
