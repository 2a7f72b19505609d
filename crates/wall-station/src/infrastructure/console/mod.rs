//! Line-oriented event loop: the terminal front end of the station.
//!
//! A barcode scanner in keyboard-wedge mode "types" the code and presses
//! Enter, so reading stdin line by line is all a station needs.  Lines that
//! start with `:` are commands; anything else (including a blank line) is a
//! scan.
//!
//! ```text
//! :import orders.csv     replace the wall with the orders in the file
//! :show                  print the wall snapshot
//! :sample test.csv       write the reference order file
//! :config                print the running configuration
//! :help                  list commands
//! :quit                  stop the loop
//! QR007                  scan
//! ```
//!
//! Each line produces exactly one JSON [`CommandResult`] line on the writer.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use super::ui_bridge::{self, AppState, CommandResult};

/// Text returned by `:help`.
pub const HELP_TEXT: &str = "\
:import <PATH>  import an order file onto the wall
:show           show the wall
:sample <PATH>  write the sample order file
:config         show the running configuration
:help           show this help
:quit           stop
<code>          scan an order code or order ID";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationCommand {
    Import(PathBuf),
    Show,
    Sample(PathBuf),
    Config,
    Help,
    Quit,
    Scan(String),
    /// A `:`-prefixed line that is not a known command, or lacks its argument.
    Unknown(String),
}

impl StationCommand {
    /// Parses one line of input.  Trailing `\r` and surrounding whitespace
    /// are ignored for commands; scans keep the raw text for the use case to
    /// trim.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix(':') else {
            return Self::Scan(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match (name, arg.is_empty()) {
            ("import", false) => Self::Import(PathBuf::from(arg)),
            ("sample", false) => Self::Sample(PathBuf::from(arg)),
            ("show", true) => Self::Show,
            ("config", true) => Self::Config,
            ("help", true) => Self::Help,
            ("quit", true) | ("exit", true) => Self::Quit,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }
}

/// Runs the loop until `:quit` or end of input and returns the number of
/// lines handled.
///
/// # Errors
///
/// Returns an I/O error if reading a line or writing a response fails.
pub async fn run_event_loop<R, W>(
    state: Arc<AppState>,
    reader: R,
    mut writer: W,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        let command = StationCommand::parse(&line);
        debug!(?command, "station input");
        handled += 1;

        match command {
            StationCommand::Quit => {
                write_json(&mut writer, &CommandResult::ok("bye")).await?;
                break;
            }
            StationCommand::Import(path) => {
                let result = ui_bridge::import_csv(Arc::clone(&state), path).await;
                write_json(&mut writer, &result).await?;
            }
            StationCommand::Show => {
                let result = ui_bridge::get_wall(Arc::clone(&state)).await;
                write_json(&mut writer, &result).await?;
            }
            StationCommand::Sample(path) => {
                let result = ui_bridge::generate_sample(path).await;
                write_json(&mut writer, &result).await?;
            }
            StationCommand::Config => {
                let result = ui_bridge::get_config(Arc::clone(&state)).await;
                write_json(&mut writer, &result).await?;
            }
            StationCommand::Help => {
                write_json(&mut writer, &CommandResult::ok(HELP_TEXT)).await?;
            }
            StationCommand::Scan(code) => {
                let result = ui_bridge::confirm_scan(Arc::clone(&state), code).await;
                write_json(&mut writer, &result).await?;
            }
            StationCommand::Unknown(text) => {
                let result: CommandResult<()> =
                    CommandResult::err("unknown_command", format!("未知命令: {text}"));
                write_json(&mut writer, &result).await?;
            }
        }
    }

    info!(handled, "event loop stopped");
    Ok(handled)
}

async fn write_json<W, T>(writer: &mut W, value: &T) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line = serde_json::to_string(value).map_err(std::io::Error::other)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
