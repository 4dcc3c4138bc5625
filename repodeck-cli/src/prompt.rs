//! Line-based prompts
//!
//! Reads answers one line at a time from any buffered async reader, so the
//! console and the confirmation prompts can share stdin.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Prompt reading from the process's stdin
pub type StdinPrompt = Prompt<BufReader<Stdin>>;

/// Shared line reader
pub struct Prompt<R> {
    lines: Mutex<Lines<R>>,
}

impl StdinPrompt {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
        }
    }

    /// Next input line with surrounding whitespace removed; `None` at end of input
    ///
    /// Cancel safe: dropping the future loses no input.
    pub async fn next_line(&self) -> Result<Option<String>> {
        let mut lines = self.lines.lock().await;
        let line = lines.next_line().await.context("Failed to read input")?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    /// Prints `question` and reads the answer
    pub async fn ask(&self, question: &str) -> Result<Option<String>> {
        print!("{} ", question);
        std::io::stdout().flush().context("Failed to flush stdout")?;
        self.next_line().await
    }

    /// Asks a yes/no question; anything but an explicit yes is a no
    pub async fn confirm(&self, question: &str) -> Result<bool> {
        let answer = self.ask(&format!("{} [y/N]", question)).await?;
        Ok(answer.as_deref().is_some_and(is_affirmative))
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
}
