use qna_core::agent::{Orchestrator, TaskObserver};
use qna_core::model::CompletionProvider;
use std::io::Write;
use thiserror::Error;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StdioError {
    #[error("stdin/stdout I/O error: {0}")]
    Io(#[from] std::io::Error),
}

enum LoopControl {
    Continue,
    Exit,
}

/// Prints executor progress between the prompt and the answer.
pub struct StdoutObserver;

impl TaskObserver for StdoutObserver {
    fn on_fetching_document(&self, uri: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "[fetching document {uri}]");
    }

    fn on_calling_tool(&self, name: &str, arguments: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "[calling tool {name} {arguments}]");
    }
}

pub async fn run<P: CompletionProvider>(
    orchestrator: &mut Orchestrator<P>,
) -> Result<(), StdioError> {
    let mut stdout = io::stdout();
    let stdin = BufReader::new(io::stdin());
    let mut lines = stdin.lines();

    let persona = orchestrator
        .executor()
        .persona()
        .map(|persona| persona.name.clone());
    print_banner(&mut stdout, persona.as_deref()).await?;

    loop {
        prompt(&mut stdout).await?;
        let line = match lines.next_line().await? {
            Some(line) => line,
            None => {
                write_line(&mut stdout, "\nInput closed. Goodbye.").await?;
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if input.starts_with('/') || input.eq_ignore_ascii_case("quit") {
            match handle_command(input, orchestrator, &mut stdout).await? {
                LoopControl::Continue => continue,
                LoopControl::Exit => break,
            }
        } else {
            handle_query(input, orchestrator, &mut stdout).await?;
        }
    }

    stdout.flush().await?;
    Ok(())
}

async fn handle_command<P: CompletionProvider>(
    input: &str,
    orchestrator: &mut Orchestrator<P>,
    stdout: &mut io::Stdout,
) -> Result<LoopControl, StdioError> {
    let name = input
        .trim_start_matches('/')
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    debug!(command = %name, "Processing STDIO command");

    match name.as_str() {
        "help" | "?" => {
            print_help(stdout).await?;
        }
        "exit" | "quit" | "q" => {
            write_line(stdout, "Goodbye.").await?;
            return Ok(LoopControl::Exit);
        }
        "reset" | "clear" => {
            orchestrator.reset();
            write_line(stdout, "Conversation cleared. Starting a new session.").await?;
        }
        "intent" => {
            let line = match orchestrator.active_intent() {
                Some(intent) => format!("Active intent: {intent}"),
                None => "No active intent. Your next message will be classified.".to_string(),
            };
            write_line(stdout, &line).await?;
        }
        other => {
            write_line(
                stdout,
                &format!("Unknown command '/{other}'. Type /help for the list of commands."),
            )
            .await?;
        }
    }
    Ok(LoopControl::Continue)
}

async fn handle_query<P: CompletionProvider>(
    input: &str,
    orchestrator: &mut Orchestrator<P>,
    stdout: &mut io::Stdout,
) -> Result<(), StdioError> {
    match orchestrator.handle_query(input).await {
        Ok(reply) => write_line(stdout, &reply).await?,
        Err(err) => {
            warn!(error = %err, "Query failed");
            write_line(stdout, &err.user_message()).await?;
        }
    }
    write_line(stdout, "").await?;
    Ok(())
}

async fn print_banner(stdout: &mut io::Stdout, persona: Option<&str>) -> io::Result<()> {
    let banner = match persona {
        Some(name) => format!("QnA assistant ready. You are talking to {name}."),
        None => "QnA assistant ready.".to_string(),
    };
    write_line(stdout, &banner).await?;
    write_line(stdout, "Type a question and press Enter. Use /help for commands.").await?;
    Ok(())
}

async fn print_help(stdout: &mut io::Stdout) -> io::Result<()> {
    write_line(stdout, "\nAvailable commands:").await?;
    write_line(stdout, "  /help      Show this help").await?;
    write_line(stdout, "  /intent    Show the active intent").await?;
    write_line(stdout, "  /reset     Forget the active intent and conversation").await?;
    write_line(stdout, "  /exit      Quit (also: quit)").await?;
    write_line(stdout, "").await?;
    Ok(())
}

async fn prompt(stdout: &mut io::Stdout) -> io::Result<()> {
    stdout.write_all(b"you> ").await?;
    stdout.flush().await
}

async fn write_line(stdout: &mut io::Stdout, line: &str) -> io::Result<()> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}
