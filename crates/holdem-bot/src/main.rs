mod cli;

use clap::Parser;
use cli::Cli;
use futures::{SinkExt, StreamExt};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    holdem_core::init_logging();

    let name = cli.player_name();
    let (socket, _) = tokio_tungstenite::connect_async(&cli.url).await?;
    let (mut write, mut read) = socket.split();
    log::info!("connected to {} as {}", cli.url, name);

    write
        .send(Message::Text(json!({"type": "join", "payload": {"name": name}}).to_string()))
        .await?;

    while let Some(frame) = read.next().await {
        let frame = frame?;
        let Message::Text(text) = frame else {
            continue;
        };
        log::debug!("<- {text}");
        let Ok(value) = serde_json::from_str::<Value>(&text) else {
            log::warn!("received malformed frame: {text}");
            continue;
        };
        if value["type"] == "action_request" {
            let reply = decide(&value["payload"]);
            log::debug!("-> {reply}");
            write.send(Message::Text(reply.to_string())).await?;
        }
    }

    log::info!("connection closed");
    Ok(())
}

/// Chooses uniformly at random among the offered actions, bounding a raise's
/// amount between `min_raise` and `max_raise` when that action is picked.
fn decide(payload: &Value) -> Value {
    let mut rng = rand::rng();
    let hand_id = payload["hand_id"].clone();
    let possible_actions = payload["possible_actions"]
        .as_array()
        .map(|a| a.iter().filter_map(|v| v.as_str()).collect::<Vec<_>>())
        .unwrap_or_default();
    let call_amount = payload["call_amount"].as_i64().unwrap_or(0);
    let min_raise = payload["min_raise"].as_i64().unwrap_or(0);
    let max_raise = payload["max_raise"].as_i64().unwrap_or(min_raise);

    let action = possible_actions.choose(&mut rng).copied().unwrap_or("fold");
    let amount = match action {
        "call" => call_amount,
        "raise" if max_raise > min_raise => rng.random_range(min_raise..=max_raise),
        "raise" => min_raise,
        _ => 0,
    };

    json!({
        "type": "action",
        "payload": {
            "hand_id": hand_id,
            "action": action,
            "amount": amount,
        }
    })
}
