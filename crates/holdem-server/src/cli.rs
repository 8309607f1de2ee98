use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Port to bind the WebSocket entrypoint on.
    #[arg(long, default_value_t = 8080, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Milliseconds a seated player has to act before being auto-folded.
    #[arg(long, default_value_t = holdem_core::ACTION_TIMEOUT_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub action_timeout: u64,

    /// Milliseconds a disconnected player is held in place before removal.
    #[arg(long, default_value_t = holdem_core::GRACE_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub disconnect_grace_time: u64,

    /// Legacy alias for `--disconnect-grace-time`, expressed in seconds.
    #[arg(long, conflicts_with = "disconnect_grace_time", value_parser = clap::value_parser!(u64).range(1..))]
    pub ample_time: Option<u64>,

    /// Milliseconds after the grace period before a disconnected player is removed.
    #[arg(long, default_value_t = holdem_core::REMOVAL_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub removal_timeout: u64,
}

impl Cli {
    pub fn grace_ms(&self) -> u64 {
        match self.ample_time {
            Some(seconds) => seconds * 1000,
            None => self.disconnect_grace_time,
        }
    }
}
