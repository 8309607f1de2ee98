use crate::table::PlayerId;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// What expired: which timer kind, for which player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Grace,
    Removal,
}

#[derive(Debug, Clone, Copy)]
pub struct TimerExpired {
    pub player_id: PlayerId,
    pub kind: TimerKind,
}

/// One player's live grace/removal timers. Either may be absent; firing one
/// doesn't cancel the other unless the caller does so explicitly (the hub
/// cancels the grace timer itself when it starts the removal timer).
#[derive(Default)]
struct Entry {
    grace: Option<JoinHandle<()>>,
    removal: Option<JoinHandle<()>>,
}

/// Disconnect/reconnect timer registry, per player-id. Expiry is posted back
/// into the hub's serialized event loop via `events` rather than acted on
/// directly from the timer's own task, so all table mutation still happens
/// on the single game-loop context.
pub struct ConnectionTimers {
    entries: HashMap<PlayerId, Entry>,
    events: UnboundedSender<TimerExpired>,
}

impl ConnectionTimers {
    pub fn new(events: UnboundedSender<TimerExpired>) -> Self {
        Self {
            entries: HashMap::new(),
            events,
        }
    }

    pub fn start_grace(&mut self, player_id: PlayerId, duration: Duration) {
        self.start(player_id, duration, TimerKind::Grace);
    }

    pub fn start_removal(&mut self, player_id: PlayerId, duration: Duration) {
        self.start(player_id, duration, TimerKind::Removal);
    }

    fn start(&mut self, player_id: PlayerId, duration: Duration, kind: TimerKind) {
        let tx = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = tx.send(TimerExpired { player_id, kind });
        });
        let entry = self.entries.entry(player_id).or_default();
        let slot = match kind {
            TimerKind::Grace => &mut entry.grace,
            TimerKind::Removal => &mut entry.removal,
        };
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    /// Cancels both of a player's timers and drops their entry. A no-op if
    /// the timer already fired.
    pub fn cancel(&mut self, player_id: PlayerId) {
        if let Some(entry) = self.entries.remove(&player_id) {
            if let Some(h) = entry.grace {
                h.abort();
            }
            if let Some(h) = entry.removal {
                h.abort();
            }
        }
    }

    pub fn has_active(&self, player_id: PlayerId) -> bool {
        self.entries.contains_key(&player_id)
    }
}

impl Drop for ConnectionTimers {
    fn drop(&mut self) {
        for entry in self.entries.values() {
            if let Some(h) = &entry.grace {
                h.abort();
            }
            if let Some(h) = &entry.removal {
                h.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn grace_timer_fires_and_posts_expiry() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut timers = ConnectionTimers::new(tx);
        let id = PlayerId::default();
        timers.start_grace(id, Duration::from_millis(10));
        assert!(timers.has_active(id));
        let expired = rx.recv().await.unwrap();
        assert_eq!(expired.player_id, id);
        assert_eq!(expired.kind, TimerKind::Grace);
    }

    #[tokio::test]
    async fn cancel_before_firing_suppresses_the_event() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut timers = ConnectionTimers::new(tx);
        let id = PlayerId::default();
        timers.start_removal(id, Duration::from_millis(50));
        timers.cancel(id);
        assert!(!timers.has_active(id));
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn restarting_a_timer_resets_its_deadline() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut timers = ConnectionTimers::new(tx);
        let id = PlayerId::default();
        timers.start_grace(id, Duration::from_millis(200));
        timers.start_grace(id, Duration::from_millis(10));
        let expired = rx.recv().await.unwrap();
        assert_eq!(expired.kind, TimerKind::Grace);
    }
}
