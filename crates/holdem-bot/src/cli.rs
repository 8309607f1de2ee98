use clap::Parser;
use rand::Rng;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// WebSocket URL of the server's entrypoint.
    #[arg(long, default_value = "ws://127.0.0.1:8080/enter")]
    pub url: String,

    /// Display name to join with; defaults to a generated guest name.
    #[arg(long)]
    pub name: Option<String>,
}

impl Cli {
    pub fn player_name(&self) -> String {
        self.name.clone().unwrap_or_else(generate_guest_name)
    }
}

fn generate_guest_name() -> String {
    let suffix: u16 = rand::rng().random_range(0..10_000);
    format!("guest-{suffix:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_entrypoint() {
        let cli = Cli::try_parse_from(["holdem-bot"]).unwrap();
        assert_eq!(cli.url, "ws://127.0.0.1:8080/enter");
        assert!(cli.player_name().starts_with("guest-"));
    }

    #[test]
    fn explicit_name_is_used_verbatim() {
        let cli = Cli::try_parse_from(["holdem-bot", "--name", "Shark"]).unwrap();
        assert_eq!(cli.player_name(), "Shark");
    }

    #[test]
    fn help_exits_cleanly() {
        let err = Cli::try_parse_from(["holdem-bot", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
