//! Deferred actions keyed to the session tick counter.
//!
//! Settle hints, spawn delays and recovery spawns all go through this queue
//! instead of free-running timers: `clear` cancels everything at once, so a
//! restarted session can never observe an action aimed at a previous
//! session's pieces.

use crate::api::types::BodyId;

/// What a deferred entry does when it comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueAction {
    /// Spawn the next piece.
    SpawnNext,
    /// Reduce simulation activity for a settled piece.
    SettlePiece(BodyId),
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    due_tick: u64,
    action: DueAction,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn schedule(&mut self, now: u64, delay_ticks: u32, action: DueAction) {
        self.entries.push(Entry {
            due_tick: now + delay_ticks as u64,
            action,
        });
    }

    /// Move every entry due at or before `now` into `out`, earliest first.
    pub fn drain_due(&mut self, now: u64, out: &mut Vec<DueAction>) {
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|e| {
            if e.due_tick <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|e| e.due_tick);
        out.extend(due.into_iter().map(|e| e.action));
    }

    /// Drop entries that reference a removed piece.
    pub fn cancel_piece(&mut self, id: BodyId) {
        self.entries
            .retain(|e| e.action != DueAction::SettlePiece(id));
    }

    /// Whether a spawn is already queued. Guards against double-scheduling.
    pub fn has_pending_spawn(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.action == DueAction::SpawnNext)
    }

    /// Cancel everything. Called on restart.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
