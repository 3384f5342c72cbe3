//! Single-item command mailbox
//!
//! The console thread writes, the tick loop drains. There is no queue: a
//! second write before the next drain replaces the first (last write wins).
//! The whole payload sits behind one mutex, so the tick loop can never see
//! a variant with another variant's arguments.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::CommandPayload;

/// Overwrite-on-write, capacity-one mailbox for [`CommandPayload`]s
#[derive(Debug, Default)]
pub struct CommandSlot {
    pending: Mutex<Option<CommandPayload>>,
}

impl CommandSlot {
    pub fn new() -> Self {
        Self::default()
    }

    // The payload is replaced in one assignment, so a panic elsewhere while
    // the lock was held cannot leave it half-written.
    fn lock(&self) -> MutexGuard<'_, Option<CommandPayload>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand a payload to the tick loop.
    ///
    /// Returns the payload it displaced, if the previous one was never
    /// drained.
    pub fn write(&self, payload: CommandPayload) -> Option<CommandPayload> {
        self.lock().replace(payload)
    }

    /// Take the pending payload, leaving the slot empty
    pub fn try_drain(&self) -> Option<CommandPayload> {
        self.lock().take()
    }

    /// Whether a payload is waiting
    pub fn is_pending(&self) -> bool {
        self.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn save(name: &str) -> CommandPayload {
        CommandPayload::Save { file_name: name.into() }
    }

    #[test]
    fn test_write_then_drain() {
        let slot = CommandSlot::new();
        assert_eq!(slot.write(save("a.dat")), None);
        assert!(slot.is_pending());

        assert_eq!(slot.try_drain(), Some(save("a.dat")));
        assert_eq!(slot.try_drain(), None);
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_last_write_wins() {
        let slot = CommandSlot::new();
        slot.write(save("first.dat"));
        let displaced = slot.write(CommandPayload::Unload { width: 4, height: 4 });

        assert_eq!(displaced, Some(save("first.dat")));
        assert_eq!(slot.try_drain(), Some(CommandPayload::Unload { width: 4, height: 4 }));
        assert_eq!(slot.try_drain(), None);
    }

    #[test]
    fn test_drain_empty() {
        let slot = CommandSlot::new();
        assert_eq!(slot.try_drain(), None);
    }

    #[test]
    fn test_cross_thread_handoff() {
        let slot = Arc::new(CommandSlot::new());
        let producer = {
            let slot = Arc::clone(&slot);
            thread::spawn(move || {
                for i in 0..100 {
                    slot.write(save(&format!("{}.dat", i)));
                }
            })
        };

        // Every payload seen is a complete one from the producer
        let mut seen = Vec::new();
        while !producer.is_finished() || slot.is_pending() {
            if let Some(payload) = slot.try_drain() {
                seen.push(payload);
            }
        }
        producer.join().unwrap();

        assert!(!seen.is_empty());
        assert!(seen.len() <= 100);
        assert!(seen.iter().all(|p| matches!(p, CommandPayload::Save { .. })));
        assert_eq!(seen.last(), Some(&save("99.dat")));
    }
}
