use crate::cli::{prompt, InputLines};
use crate::domain::quiz::{AnswerValue, Constraint, Question, QuizRun, Step};
use crate::services::ServiceError;
use crate::state::AppState;
use crate::store::QUIZ_RESULT_KEY;
use anyhow::Result;

/// Quiz session loop: prompts, validates input against the question's
/// constraint (the sequencer only ever sees valid values), and hands the
/// finalized answer map to the store and the prediction service.
pub async fn run(state: &AppState, lines: &mut InputLines) -> Result<()> {
    println!();
    println!("Mental state check. Answer each question; 'back' returns to the previous one, 'quit' abandons the quiz.");

    let mut run = QuizRun::new();

    while let Some(question) = run.current().cloned() {
        show_question(&run, &question);
        prompt("answer> ")?;
        let Some(line) = lines.next_line().await? else {
            println!("Quiz abandoned.");
            return Ok(());
        };
        let input = line.trim();

        match input {
            "" => continue,
            "back" => {
                if !run.back() {
                    println!("Already at the first question.");
                }
                continue;
            }
            "quit" | "exit" => {
                println!("Quiz abandoned.");
                return Ok(());
            }
            _ => {}
        }

        let Some(value) = parse_answer(&question, input) else {
            println!("Please enter {}.", question.constraint.describe());
            continue;
        };

        if let Step::Completed(answers) = run.answer(value) {
            println!();
            println!("Quiz completed. Your mental data has been recorded.");
            finish(state, &answers).await;
            return Ok(());
        }
    }

    Ok(())
}

fn show_question(run: &QuizRun, question: &Question) {
    let (position, total) = run.progress();
    println!();
    println!("Question {position} of {total}: {}", question.text);
    if let Some(hint) = question.hint {
        println!("  ({hint})");
    }
    println!("  [{}]", question.constraint.describe());
    if let Some(previous) = run.recorded(question.key) {
        println!("  previous answer: {previous}");
    }
}

/// Parses and validates one line of input. `None` means re-prompt.
fn parse_answer(question: &Question, input: &str) -> Option<AnswerValue> {
    match question.constraint {
        Constraint::Scale { .. } => {
            let value = AnswerValue::Number(input.parse().ok()?);
            question.constraint.fits(&value).then_some(value)
        }
        Constraint::OneOf(options) => options
            .iter()
            .find(|o| o.eq_ignore_ascii_case(input))
            .map(|o| AnswerValue::Choice(o.to_string())),
    }
}

async fn finish(state: &AppState, answers: &crate::domain::quiz::AnswerMap) {
    // Hand-off for the results view; prediction still runs if this fails.
    match serde_json::to_value(answers) {
        Ok(value) => {
            if let Err(err) = state.store.put(QUIZ_RESULT_KEY, &value) {
                tracing::warn!(error = %err, "could not persist quiz result");
            }
        }
        Err(err) => tracing::warn!(error = %err, "could not serialize quiz result"),
    }

    println!("Analyzing your state...");
    match state.prediction.predict(answers).await {
        Ok(prediction) => {
            println!("Result: {}", prediction.state);
            println!("{}", prediction.message);
            if let Some(score) = prediction.risk_score {
                println!("Risk score: {score}/100");
            }
            for tip in &prediction.extra_guidance {
                println!("- {tip}");
            }
        }
        Err(ServiceError::Server { status, detail }) => {
            tracing::warn!(?status, %detail, "prediction rejected by backend");
            println!("Error: {detail}");
        }
        Err(err @ ServiceError::Transport(_)) => {
            tracing::warn!(error = %err, "prediction request did not reach backend");
            println!("Network error. Could not reach backend.");
        }
    }
}
