//! Stop requests from the operator.
//!
//! # Responsibilities
//! - Ctrl+C (SIGINT) stops the server
//! - A line reading `exit` on standard input stops the server
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Closed stdin is not a stop request; only Ctrl+C remains

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::lifecycle::Shutdown;

/// Keyword that stops the server when typed on the console.
pub const EXIT_COMMAND: &str = "exit";

/// Wait for a stop request, then trigger `shutdown`.
pub async fn wait_for_stop(shutdown: Shutdown) {
    let stdin = BufReader::new(tokio::io::stdin());

    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => tracing::info!("Ctrl+C received"),
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C"),
        },
        _ = exit_command(stdin) => tracing::info!("Exit command received"),
    }

    shutdown.trigger();
}

/// Resolve once a line equal to [`EXIT_COMMAND`] is read. Never resolves if
/// the input ends first.
pub async fn exit_command<R>(input: R)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().eq_ignore_ascii_case(EXIT_COMMAND) => return,
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Console input unavailable");
                break;
            }
        }
    }
    std::future::pending::<()>().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn exit_line_resolves() {
        let input: &[u8] = b"status\n  EXIT \nignored\n";
        tokio::time::timeout(Duration::from_secs(1), exit_command(input))
            .await
            .expect("exit line should stop");
    }

    #[tokio::test]
    async fn end_of_input_does_not_resolve() {
        let input: &[u8] = b"quit\n";
        let waited = tokio::time::timeout(Duration::from_millis(50), exit_command(input)).await;
        assert!(waited.is_err());
    }
}
