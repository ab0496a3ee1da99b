mod config;
mod errors;
mod intake;
mod interviewer;
mod llm_client;
mod observer;
mod session;

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::intake::build_profile;
use crate::interviewer::Interviewer;
use crate::llm_client::{CompletionService, LlmClient};
use crate::observer::Observer;
use crate::session::SessionLog;

/// Fallback introduction when the operator just presses Enter.
const SAMPLE_INTRO: &str =
    "I am a Python developer with 3 years of experience, worked with Django, Flask, PostgreSQL";

/// Answers that end the session. Presentation-layer concern only.
const STOP_WORDS: &[&str] = &["stop", "quit", "exit", "done"];

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (errors out on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting interview session v{}", env!("CARGO_PKG_VERSION"));

    let llm: Arc<dyn CompletionService> =
        Arc::new(LlmClient::new(config.anthropic_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("Enter candidate information, or press Enter for a sample.");
    let intro = match read_line(&mut input).await? {
        Some(line) if !line.is_empty() => line,
        _ => SAMPLE_INTRO.to_string(),
    };

    let profile = Arc::new(build_profile(None, Some(&intro), llm.as_ref()).await?);
    println!("\nInterviewing {}", profile.display_name());
    println!("Position: {}, level: {}", profile.position, profile.grade);
    println!("\nType the candidate's answers. Type 'stop' to finish.");

    let log = SessionLog::new(profile.display_name());
    let observer = Arc::new(Observer::new(llm.clone(), profile.clone()));
    let mut interviewer = Interviewer::new(observer, log);

    let mut turns_completed = 0u32;
    loop {
        let question = interviewer.ask_question().await?;
        println!("\n[Interviewer]: {question}");

        let answer = loop {
            match read_line(&mut input).await? {
                Some(line) if !line.is_empty() => break Some(line),
                Some(_) => println!("(please enter an answer, or 'stop' to finish)"),
                None => break None,
            }
        };
        let Some(answer) = answer else {
            info!("input closed, ending the interview");
            break;
        };
        if STOP_WORDS.contains(&answer.to_lowercase().as_str()) {
            break;
        }

        let evaluation = interviewer.process_answer(&answer).await?;
        debug!(
            "turn scored: correctness={} completeness={} relevance={}",
            evaluation.correctness, evaluation.completeness, evaluation.relevance
        );

        // Candidates sometimes ask back; acknowledge and move on.
        if answer.ends_with('?') {
            println!("\n[Interviewer]: Good question — let's come back to it later and continue.");
        }

        turns_completed += 1;
        if config.max_turns > 0 && turns_completed >= config.max_turns {
            info!("reached the configured turn limit ({})", config.max_turns);
            break;
        }
    }

    println!("\nINTERVIEW COMPLETE");

    let report = interviewer.conclude().await?;
    println!("\n{report}");

    interviewer.log().save(&config.log_path)?;
    println!("\nSession log saved to {}", config.log_path);

    Ok(())
}

/// Reads one trimmed line from stdin; `None` on EOF.
async fn read_line(input: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>> {
    print!("> ");
    use std::io::Write;
    std::io::stdout().flush()?;
    Ok(input.next_line().await?.map(|l| l.trim().to_string()))
}
