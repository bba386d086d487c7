//! event-chat - terminal client for event Q&A sessions
//!
//! Opens a chat session for one event on the event backend, then sends each
//! line typed on stdin to the query service and prints the answers.

mod client;
mod transcript;

use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use chat_session::{ChatController, ChatError, InitRequest, NoSpeech};
use clap::Parser;
use colored::Colorize;
use shared::{ServiceConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{spawn_local, JoinHandle, LocalSet};
use tracing_subscriber::EnvFilter;

use client::ReqwestTransport;

#[derive(Parser)]
#[command(name = "event-chat")]
#[command(about = "Ask questions about an event from the terminal", long_about = None)]
struct Cli {
    /// Event backend URL
    #[arg(long, env = "EVENT_CHAT_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Query service URL
    #[arg(long, env = "EVENT_CHAT_QUERY_URL", default_value = "http://localhost:8001")]
    query_url: String,

    /// Event backend token
    #[arg(short, long, env = "EVENT_CHAT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Event to chat about
    #[arg(short, long, env = "EVENT_CHAT_EVENT_ID")]
    event_id: Option<String>,

    /// Label shown for the chat
    #[arg(long)]
    event_name: Option<String>,

    /// Per-request timeout
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,
}

/// One line of user input
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Ask(&'a str),
    Voice,
    Help,
    Quit,
    Empty,
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => Command::Empty,
            "/quit" | "/exit" => Command::Quit,
            "/help" => Command::Help,
            "/voice" => Command::Voice,
            text => Command::Ask(text),
        }
    }
}

fn print_help() {
    println!("{}", "Type a question and press Enter.".bold());
    println!("  /voice  toggle dictation");
    println!("  /help   show this help");
    println!("  /quit   leave the chat");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // The controller is !Send; keep everything on this thread.
    LocalSet::new().run_until(run(cli)).await
}

async fn run(cli: Cli) -> Result<()> {
    let config = ServiceConfig::new(cli.api_url, cli.query_url)
        .with_timeout(Duration::from_secs(cli.timeout_secs.max(1)));
    let transport = ReqwestTransport::new(config).context("Failed to create HTTP client")?;
    let controller = Rc::new(ChatController::new(transport, NoSpeech));
    transcript::attach(&controller);

    let request = InitRequest::new(cli.event_id, cli.token).with_label(cli.event_name);
    match controller.initialize(request).await {
        Ok(session) => {
            println!(
                "{} {} {}",
                "Connected to".green(),
                session.label.bold(),
                format!("(ID: {})", session.short_id()).dimmed()
            );
        }
        Err(ChatError::Precondition(reason)) => {
            anyhow::bail!("Cannot start chat: {} (see --token and --event-id)", reason);
        }
        Err(e) => {
            controller.teardown();
            return Err(e).context("Failed to start chat");
        }
    }
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Option<JoinHandle<()>> = None;

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Empty => {}
            Command::Help => print_help(),
            Command::Quit => {
                controller.teardown();
                return Ok(());
            }
            Command::Voice => {
                let outcome = controller.toggle_dictation().await;
                tracing::debug!(?outcome, "Dictation toggled");
            }
            Command::Ask(text) => {
                controller.set_input(text);
                let controller = controller.clone();
                in_flight = Some(spawn_local(async move {
                    match controller.send().await {
                        Ok(outcome) => tracing::debug!(?outcome, "Exchange finished"),
                        Err(reason) => println!("{} {}", "!".yellow().bold(), reason),
                    }
                }));
            }
        }
    }

    // Input closed: let the last answer arrive before leaving.
    if let Some(handle) = in_flight {
        let _ = handle.await;
    }
    controller.teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("  "), Command::Empty);
        assert_eq!(Command::parse("/quit"), Command::Quit);
        assert_eq!(Command::parse("/exit\n"), Command::Quit);
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("/voice"), Command::Voice);
        assert_eq!(
            Command::parse("  When does it start? "),
            Command::Ask("When does it start?")
        );
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["event-chat", "--event-id", "12"]).unwrap();
        assert_eq!(cli.event_id.as_deref(), Some("12"));
        assert_eq!(cli.timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }
}
