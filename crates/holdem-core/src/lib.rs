//! Shared identifiers, table constants, and process-level plumbing for the
//! heads-up hold'em server and its bot client.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Chip amounts, always raw units (never big-blind multiples).
pub type Chips = i64;
/// Seat index around the table (0 or 1 in heads-up).
pub type Seat = usize;

/// Generic id wrapper providing compile-time separation between entity kinds
/// that all happen to be backed by a UUID.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Reinterpret this id as belonging to a different entity kind, keeping
    /// the same underlying UUID. Used when a player id is temporarily
    /// handled as a connection id during the handshake.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self::from(uuid::Uuid::deserialize(deserializer)?))
    }
}

// ============================================================================
// TABLE CONSTANTS
// ============================================================================
pub const SMALL_BLIND: Chips = 2;
pub const BIG_BLIND: Chips = 4;
pub const STARTING_STACK: Chips = 100 * BIG_BLIND;
pub const TOP_UP_THRESHOLD: Chips = 5 * BIG_BLIND;
pub const TOP_UP_TARGET: Chips = 100 * BIG_BLIND;

pub const ACTION_TIMEOUT_MS: u64 = 30_000;
pub const PING_INTERVAL_MS: u64 = 30_000;
pub const PONG_TIMEOUT_MS: u64 = 10_000;
pub const GRACE_MS: u64 = 30_000;
pub const REMOVAL_MS: u64 = 60_000;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================

/// Initialize dual logging (terminal + file) with a timestamped log file.
/// Creates `logs/` and writes DEBUG to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn init_logging() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register a Ctrl+C handler that requests graceful shutdown: the hub
/// observes `shutdown_requested()` between hands and closes out cleanly
/// rather than dying mid-frame.
#[cfg(feature = "server")]
static SHUTDOWN: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

#[cfg(feature = "server")]
pub fn install_shutdown_handler() {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupt received, shutting down");
            SHUTDOWN.store(true, std::sync::atomic::Ordering::Relaxed);
        }
    });
}

#[cfg(feature = "server")]
pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(std::sync::atomic::Ordering::Relaxed)
}

#[cfg(not(feature = "server"))]
pub fn shutdown_requested() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Player;
    struct Table;

    #[test]
    fn ids_of_different_kinds_do_not_collide_by_type() {
        let p: ID<Player> = ID::default();
        let t: ID<Table> = p.cast();
        assert_eq!(uuid::Uuid::from(p), uuid::Uuid::from(t));
    }

    #[test]
    fn ids_round_trip_through_uuid() {
        let id: ID<Player> = ID::default();
        let raw: uuid::Uuid = id.into();
        let back: ID<Player> = ID::from(raw);
        assert_eq!(id, back);
    }
}
