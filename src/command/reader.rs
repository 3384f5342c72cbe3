//! Console thread
//!
//! Reading stdin blocks, and a blocked read can't be told to stop. So the
//! blocking read happens on a detached helper thread that forwards each
//! line over a channel; the console thread waits on that channel with a
//! timeout and checks the run flag between waits. Shutdown never has to
//! wait for one more line of input.

use std::io::{BufRead, BufReader, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};

use super::{CommandSlot, ConsoleParser, ConsoleStep, HELP_TEXT};

/// Result of waiting for a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    Line(String),
    /// Nothing arrived within the timeout
    Timeout,
    /// Input is closed (EOF or read error); no more lines will come
    Closed,
}

/// Lines from a blocking source, readable with a timeout
pub struct LineReader {
    receiver: Receiver<String>,
}

impl LineReader {
    /// Create from a receiver
    fn from_receiver(receiver: Receiver<String>) -> Self {
        Self { receiver }
    }

    /// Start forwarding lines from `source` on a background thread.
    ///
    /// The thread is detached: it ends at EOF, and otherwise lives until
    /// the process exits.
    pub fn spawn<R>(source: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (sender, receiver) = channel();

        thread::spawn(move || {
            for line in source.lines() {
                match line {
                    Ok(line) => {
                        if sender.send(line).is_err() {
                            // Console thread is gone
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Console read failed: {}", e);
                        break;
                    }
                }
            }
        });

        Self::from_receiver(receiver)
    }

    /// Lines typed on stdin
    pub fn stdin() -> Self {
        Self::spawn(BufReader::new(std::io::stdin()))
    }

    /// Wait up to `timeout` for the next line
    pub fn next_line(&self, timeout: Duration) -> LineEvent {
        match self.receiver.recv_timeout(timeout) {
            Ok(line) => LineEvent::Line(line),
            Err(RecvTimeoutError::Timeout) => LineEvent::Timeout,
            Err(RecvTimeoutError::Disconnected) => LineEvent::Closed,
        }
    }
}

/// Console loop: read lines, parse, hand complete commands to the slot.
///
/// Returns when `running` is cleared or the input closes. Never touches
/// world state.
pub fn run_console<W: Write>(
    lines: &LineReader,
    slot: &CommandSlot,
    running: &AtomicBool,
    poll_interval: Duration,
    out: &mut W,
) {
    let mut parser = ConsoleParser::new();

    while running.load(Ordering::Acquire) {
        let line = match lines.next_line(poll_interval) {
            LineEvent::Line(line) => line,
            LineEvent::Timeout => continue,
            LineEvent::Closed => {
                if parser.is_prompting() {
                    info!("Console input closed mid-command, command dropped");
                } else {
                    info!("Console input closed");
                }
                break;
            }
        };

        // Output errors only mean the terminal went away; keep accepting input
        match parser.feed(&line) {
            ConsoleStep::Idle => {}
            ConsoleStep::Prompt(prompt) => {
                let _ = write!(out, "{}", prompt);
                let _ = out.flush();
            }
            ConsoleStep::Help => {
                let _ = writeln!(out, "{}", HELP_TEXT);
            }
            ConsoleStep::Command(payload) => {
                debug!("Console command ready: {}", payload.name());
                if let Some(dropped) = slot.write(payload) {
                    debug!("Replaced unconsumed command: {}", dropped.name());
                }
            }
        }
    }
}

/// Spawn the console thread reading stdin
pub fn spawn_console(
    slot: Arc<CommandSlot>,
    running: Arc<AtomicBool>,
    poll_interval: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let lines = LineReader::stdin();
        let mut out = std::io::stdout();
        run_console(&lines, &slot, &running, poll_interval, &mut out);
        debug!("Console thread finished");
    })
}
