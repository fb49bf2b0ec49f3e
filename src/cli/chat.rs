use crate::cli::{prompt, InputLines};
use crate::domain::transcript::Transcript;
use crate::services::ServiceError;
use crate::state::AppState;
use anyhow::Result;

const PLACEHOLDER: &str = "Thinking...";
const SERVER_ERROR_TEXT: &str = "Server error.";
const TRANSPORT_ERROR_TEXT: &str = "Connection error. Is backend running?";

/// Chat session loop. Each submission resolves fully before the next line
/// is read, so there is never more than one request in flight.
pub async fn run(state: &AppState, lines: &mut InputLines) -> Result<()> {
    println!("Cognovoid — a calm rational companion.");
    println!("Type a message, /quiz to check your mental state, /quit to leave.");

    let mut transcript = Transcript::new();

    loop {
        prompt("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/quiz" => {
                crate::cli::quiz::run(state, lines).await?;
                println!("Back to chat. Type /quit to leave.");
                continue;
            }
            _ => {}
        }

        // Blank input: no transcript entry, no request.
        let Some((message, pending)) = transcript.submit(&line, PLACEHOLDER) else {
            continue;
        };

        println!("{PLACEHOLDER}");
        let text = match state.chat.send(&message).await {
            Ok(reply) => reply,
            Err(err @ ServiceError::Server { .. }) => {
                tracing::warn!(error = %err, "chat request rejected by backend");
                SERVER_ERROR_TEXT.to_string()
            }
            Err(err @ ServiceError::Transport(_)) => {
                tracing::warn!(error = %err, "chat request did not reach backend");
                TRANSPORT_ERROR_TEXT.to_string()
            }
        };
        transcript.resolve(pending, &text)?;
        println!("cognovoid: {text}");
    }

    Ok(())
}
