//! Timestamped interactive transcript on stdin/stdout.

use std::io::{self, BufRead, BufReader, Write};
use std::thread;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::ConsoleError;

/// Elapsed time as `HH:MM:SS`. Hours do not wrap.
pub fn elapsed_stamp(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Prefixes every line with the time elapsed since the process started.
#[derive(Debug, Clone, Copy)]
pub struct Transcript {
    start: Instant,
}

impl Transcript {
    pub fn new(start: Instant) -> Self {
        Self { start }
    }

    pub fn stamp(&self, text: &str) -> String {
        format!("[{}] {}", elapsed_stamp(self.start.elapsed()), text)
    }

    pub fn print(&self, text: &str) {
        println!("{}", self.stamp(text));
    }
}

/// Line-oriented user interaction.
#[async_trait]
pub trait Prompter: Send {
    /// Shows `prompt` and returns the user's reply, trimmed.
    async fn ask_line(&mut self, prompt: &str) -> Result<String, ConsoleError>;

    /// Shows one transcript line.
    fn say(&mut self, text: &str);
}

/// Lines read on a dedicated OS thread and handed over through a channel.
///
/// A blocking read parked on that thread never holds up the runtime, so
/// dropping the receiver (or returning from `main`) is enough to stop waiting.
pub struct LineFeed {
    lines: mpsc::Receiver<io::Result<String>>,
}

impl LineFeed {
    pub fn spawn<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        thread::spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        });
        Self { lines: rx }
    }

    pub fn stdin() -> Self {
        Self::spawn(BufReader::new(io::stdin()))
    }

    /// The next line, or `None` once the reader hits end of input.
    pub async fn next_line(&mut self) -> Result<Option<String>, ConsoleError> {
        match self.lines.recv().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(err)) => Err(err.into()),
            None => Ok(None),
        }
    }
}

/// Stdin/stdout prompter. Waiting on a reply can be cancelled by an interrupt.
pub struct ConsolePrompter {
    transcript: Transcript,
    feed: LineFeed,
}

impl ConsolePrompter {
    pub fn new(transcript: Transcript) -> Self {
        Self::with_feed(transcript, LineFeed::stdin())
    }

    pub fn with_feed(transcript: Transcript, feed: LineFeed) -> Self {
        Self { transcript, feed }
    }
}

#[async_trait]
impl Prompter for ConsolePrompter {
    async fn ask_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        print!("{}", self.transcript.stamp(prompt));
        io::stdout().flush().ok();
        match self.feed.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(ConsoleError::InputClosed),
        }
    }

    fn say(&mut self, text: &str) {
        self.transcript.print(text);
    }
}
