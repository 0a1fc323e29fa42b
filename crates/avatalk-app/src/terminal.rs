//! Line-oriented front-end: slash commands drive the session, any other
//! line is submitted to the avatar.

use avatalk_common::{EndReason, NoticeLevel, UiEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::orchestrator::Orchestrator;

const HELP: &str = "\
Commands:
  /start    open an avatar session
  /end      close the session
  /voice    start or stop voice chat
  /status   show session state
  /help     show this help
  /quit     end the session and exit
Anything else is sent to the avatar.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    End,
    Voice,
    Status,
    Help,
    Quit,
    Say(String),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let Some(name) = trimmed.strip_prefix('/') else {
        return Ok(Some(Command::Say(trimmed.to_string())));
    };
    let command = match name.to_ascii_lowercase().as_str() {
        "start" => Command::Start,
        "end" | "stop" => Command::End,
        "voice" => Command::Voice,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '/{other}', try /help")),
    };
    Ok(Some(command))
}

/// One output line for a UI event, if it is worth showing.
pub fn render(event: &UiEvent) -> Option<String> {
    let line = match event {
        UiEvent::PhaseChanged(phase) => format!("[{phase}]"),
        UiEvent::SessionStarted { session_id } => format!("session {session_id} started"),
        UiEvent::SessionEnded { reason } => match reason {
            EndReason::UserRequested => "session ended".to_string(),
            EndReason::ProviderDisconnected => "session ended by the provider".to_string(),
            EndReason::StartFailed => "session could not start".to_string(),
        },
        UiEvent::StreamReady { url } => format!("avatar stream ready at {url}"),
        UiEvent::Reply { text } => format!("avatar: {text}"),
        UiEvent::VoiceChat { active } => {
            format!("voice chat {}", if *active { "on" } else { "off" })
        }
        UiEvent::Notice { level, message } => {
            let label = match level {
                NoticeLevel::Info => "info",
                NoticeLevel::Warning => "warning",
                NoticeLevel::Error => "error",
            };
            format!("{label}: {message}")
        }
        UiEvent::StreamCleared | UiEvent::Unknown => return None,
    };
    Some(line)
}

fn status_line(orch: &Orchestrator) -> String {
    let controls = orch.controls();
    let mut available = Vec::new();
    if controls.start_enabled {
        available.push("/start");
    }
    if controls.end_enabled {
        available.push("/end");
    }
    if controls.voice_toggle_enabled {
        available.push("/voice");
    }
    let pending = orch.pending_input();
    format!(
        "phase={} mode={:?} generation={} session={} stream={} voice={} pending={:?} available=[{}] ({})",
        orch.phase(),
        orch.mode(),
        orch.generation(),
        orch.session_id().as_deref().unwrap_or("-"),
        orch.stream_url().as_deref().unwrap_or("-"),
        if orch.voice_active() { "on" } else { "off" },
        if controls.speak_enabled { pending.as_str() } else { "-" },
        available.join(" "),
        controls.voice_label(),
    )
}

/// Read commands from stdin until `/quit` or end of input.
pub async fn run(orch: Orchestrator) -> std::io::Result<()> {
    let mut events = orch.bus().subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(line) = render(&event) {
                        println!("{line}");
                    }
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "UI events dropped"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Status => println!("{}", status_line(&orch)),
            command => {
                let orch = orch.clone();
                tokio::spawn(async move { dispatch(&orch, command).await });
            }
        }
    }

    orch.shutdown().await;
    printer.abort();
    Ok(())
}

async fn dispatch(orch: &Orchestrator, command: Command) {
    // Failures are already published as notices.
    let result = match command {
        Command::Start => orch.start().await,
        Command::End => {
            orch.end().await;
            Ok(())
        }
        Command::Voice => orch.toggle_voice().await,
        Command::Say(text) => orch.submit_text(text).await,
        Command::Status | Command::Help | Command::Quit => Ok(()),
    };
    if let Err(e) = result {
        debug!(error = %e, "command failed");
    }
}
