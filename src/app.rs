//! Application state
//!
//! Everything the tick loop owns, bundled in one place: the dispatcher
//! (and through it the world), the brush, and this side of the console
//! handoff. Only the mailbox and the run flag are shared with the console
//! thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{error, info, warn};

use crate::command::{spawn_console, CommandSlot};
use crate::config::EditorConfig;
use crate::editor::{Brush, Dispatch, Dispatcher, KeyState, MouseState};

pub struct AppState {
    pub config: EditorConfig,
    pub dispatcher: Dispatcher,
    pub brush: Brush,
    slot: Arc<CommandSlot>,
    running: Arc<AtomicBool>,
    console: Option<JoinHandle<()>>,
}

impl AppState {
    pub fn new(config: EditorConfig, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            dispatcher,
            brush: Brush::new(),
            slot: Arc::new(CommandSlot::new()),
            running: Arc::new(AtomicBool::new(true)),
            console: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start reading console commands from stdin
    pub fn start_console(&mut self) {
        if self.console.is_some() {
            return;
        }
        let poll = Duration::from_millis(self.config.console_poll_ms.max(1));
        self.console = Some(spawn_console(Arc::clone(&self.slot), Arc::clone(&self.running), poll));
        info!("Console ready, type 'help' for commands");
    }

    /// One tick: pointer/key edits first, then at most one console command.
    ///
    /// Returns false once the editor should stop.
    pub fn tick(&mut self, mouse: &MouseState, keys: &KeyState) -> bool {
        self.brush.handle_keys(keys);
        let edits = self.brush.handle_mouse(
            mouse,
            self.dispatcher.grids(),
            self.dispatcher.cell_size(),
        );
        for edit in edits {
            self.dispatcher.apply(edit);
        }

        if self.dispatcher.tick(&self.slot) == Dispatch::Quit {
            self.running.store(false, Ordering::Release);
        }
        self.is_running()
    }

    /// Stop the console thread and write the map to the default file
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);

        if let Some(console) = self.console.take() {
            if console.join().is_err() {
                warn!("Console thread panicked");
            }
        }
        if self.slot.is_pending() {
            warn!("Exiting with an unapplied console command");
        }

        let map_file = self.config.default_map_file.clone();
        if let Err(e) = self.dispatcher.save_grids(&map_file) {
            error!("Failed to save {} on exit: {}", map_file, e);
        }
    }
}
