//! Line-oriented console commands that stand in for the browser's input and
//! media events on a headless kiosk.

use screensaver_core::InputKind;
use shared::domain::ScreensaverTimeout;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Input(InputKind),
    VideoEnded,
    VideoError(String),
    Timeout(ScreensaverTimeout),
    Off,
    Status,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("missing argument for {0}")]
    MissingArgument(&'static str),
}

pub fn parse_command(line: &str) -> Result<ConsoleCommand, ConsoleError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "" => return Err(ConsoleError::Empty),
        "key" | "keydown" => ConsoleCommand::Input(InputKind::KeyPress),
        "click" => ConsoleCommand::Input(InputKind::PointerClick),
        "move" | "mousemove" => ConsoleCommand::Input(InputKind::PointerMove),
        "ended" => ConsoleCommand::VideoEnded,
        "error" => {
            let reason = if rest.is_empty() { "media error" } else { rest };
            ConsoleCommand::VideoError(reason.to_string())
        }
        "timeout" => {
            if rest.is_empty() {
                return Err(ConsoleError::MissingArgument("timeout"));
            }
            let timeout = ScreensaverTimeout::parse(rest).unwrap_or_else(|err| {
                warn!(error = %err, "kiosk: invalid timeout, screensaver disabled");
                ScreensaverTimeout::DISABLED
            });
            ConsoleCommand::Timeout(timeout)
        }
        "off" => ConsoleCommand::Off,
        "status" => ConsoleCommand::Status,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(ConsoleError::Unknown(other.to_string())),
    };
    Ok(command)
}
