pub mod chat;
pub mod quiz;

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Shared line reader over stdin; one instance per session so the chat and
/// quiz loops never compete for buffered input.
pub type InputLines = Lines<BufReader<Stdin>>;

pub fn input_lines() -> InputLines {
    BufReader::new(tokio::io::stdin()).lines()
}

fn prompt(text: &str) -> Result<()> {
    print!("{text}");
    std::io::stdout().flush()?;
    Ok(())
}
