//! Racing the interactive session against Ctrl-C.

use std::future::Future;
use std::io;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INTERRUPTED: u8 = 130;

#[derive(Debug)]
pub enum Outcome {
    /// The session ran to completion or failed on its own.
    Finished(anyhow::Result<()>),
    /// The user pressed Ctrl-C while the session was still running.
    Interrupted,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Finished(Ok(())) => 0,
            Outcome::Finished(Err(_)) => EXIT_FAILURE,
            Outcome::Interrupted => EXIT_INTERRUPTED,
        }
    }
}

/// Drives `session` until it finishes or `interrupt` resolves.
///
/// Only a delivered signal counts as an interrupt. A listener that fails to
/// install is a fatal error, since Ctrl-C could no longer stop the session.
pub async fn race_interrupt<S, I>(session: S, interrupt: I) -> Outcome
where
    S: Future<Output = anyhow::Result<()>>,
    I: Future<Output = io::Result<()>>,
{
    tokio::select! {
        result = session => Outcome::Finished(result),
        signal = interrupt => match signal {
            Ok(()) => Outcome::Interrupted,
            Err(err) => Outcome::Finished(Err(
                anyhow::Error::new(err).context("Failed to listen for Ctrl-C"),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future;

    #[tokio::test]
    async fn signal_interrupts_a_pending_session() {
        let outcome = race_interrupt(future::pending(), async { Ok::<(), io::Error>(()) }).await;
        assert!(matches!(outcome, Outcome::Interrupted));
        assert_eq!(outcome.exit_code(), 130);
    }

    #[tokio::test]
    async fn failed_listener_is_fatal() {
        let outcome = race_interrupt(future::pending(), async {
            Err::<(), _>(io::Error::other("no signal driver"))
        })
        .await;
        assert_eq!(outcome.exit_code(), 1);
        let Outcome::Finished(Err(err)) = outcome else {
            panic!("expected a fatal error, got {outcome:?}");
        };
        let message = format!("{err:#}");
        assert!(message.starts_with("Failed to listen for Ctrl-C"));
        assert!(message.contains("no signal driver"));
    }

    #[tokio::test]
    async fn finished_sessions_map_to_their_exit_codes() {
        let done = race_interrupt(async { Ok::<(), anyhow::Error>(()) }, future::pending()).await;
        assert_eq!(done.exit_code(), 0);

        let failed =
            race_interrupt(async { Err::<(), _>(anyhow::anyhow!("503")) }, future::pending()).await;
        assert_eq!(failed.exit_code(), 1);
    }
}
