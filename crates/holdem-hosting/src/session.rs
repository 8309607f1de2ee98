use actix_ws::{Message, MessageStream, Session};
use futures::StreamExt;
use holdem_core::{PING_INTERVAL_MS, PONG_TIMEOUT_MS};
use holdem_gameroom::{ClientMessage, Hub, ServerMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// Bridges one accepted WebSocket connection to the hub: a reader that
/// forwards frames into `Hub::dispatch`, a writer drained from an
/// enqueue-and-serialize outbox, and a heartbeat that pings on an interval
/// and disconnects the peer if no pong arrives within the timeout.
pub async fn run(hub: Arc<Mutex<Hub>>, mut session: Session, mut stream: MessageStream) {
    let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel::<ServerMessage>();
    let player_id = hub.lock().await.connect(outbox_tx);
    log::info!("[session {player_id}] connected");

    let mut heartbeat = tokio::time::interval(Duration::from_millis(PING_INTERVAL_MS));
    heartbeat.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut pong_deadline: Option<tokio::time::Instant> = None;

    loop {
        let pong_timeout = async {
            match pong_deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => futures::future::pending().await,
            }
        };

        tokio::select! {
            biased;

            outbound = outbox_rx.recv() => match outbound {
                Some(message) => {
                    log::debug!("[session {player_id}] -> {}", message.to_json());
                    if session.text(message.to_json()).await.is_err() {
                        break;
                    }
                }
                None => break,
            },

            inbound = stream.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    log::debug!("[session {player_id}] <- {text}");
                    handle_text(&hub, player_id, &text).await;
                }
                Some(Ok(Message::Ping(bytes))) => {
                    if session.pong(&bytes).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Pong(_))) => {
                    pong_deadline = None;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    log::warn!("[session {player_id}] read error: {e}");
                    break;
                }
                _ => {}
            },

            _ = heartbeat.tick() => {
                if session.ping(b"").await.is_err() {
                    break;
                }
                pong_deadline = Some(tokio::time::Instant::now() + Duration::from_millis(PONG_TIMEOUT_MS));
            }

            () = pong_timeout, if pong_deadline.is_some() => {
                log::warn!("[session {player_id}] pong timeout, disconnecting");
                break;
            }
        }
    }

    hub.lock().await.on_disconnect(player_id);
    let _ = session.close(None).await;
    log::info!("[session {player_id}] closed");
}

async fn handle_text(hub: &Arc<Mutex<Hub>>, player_id: holdem_gameroom::PlayerId, text: &str) {
    match ClientMessage::decode(text) {
        Ok(message) => hub.lock().await.dispatch(player_id, message),
        Err(e) => {
            log::debug!("[session {player_id}] {:?}: {}", e.code(), e.message());
            hub.lock()
                .await
                .dispatch_error(player_id, e.code(), e.message());
        }
    }
}
