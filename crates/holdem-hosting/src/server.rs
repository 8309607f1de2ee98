use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use holdem_gameroom::{Hub, HubConfig};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub port: u16,
    pub hub: HubConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            hub: HubConfig::default(),
        }
    }
}

struct AppState {
    hub: Arc<Mutex<Hub>>,
}

/// Binds and runs the heads-up server. The single `Hub` is shared behind a
/// `tokio::sync::Mutex` (the coarse-mutex option from the concurrency
/// model): every connection's dispatch call serializes through it, so game
/// state only ever mutates from one place at a time.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let (timer_tx, mut timer_rx) = tokio::sync::mpsc::unbounded_channel();
    let hub = Arc::new(Mutex::new(Hub::with_config(timer_tx, config.hub)));

    let timer_hub = hub.clone();
    tokio::spawn(async move {
        while let Some(event) = timer_rx.recv().await {
            timer_hub.lock().await.on_timer_expired(event);
        }
    });

    let state = web::Data::new(AppState { hub });
    log::info!("starting heads-up server on port {}", config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(state.clone())
            .route("/enter", web::get().to(enter))
    })
    .workers(4)
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}

async fn enter(state: web::Data<AppState>, body: web::Payload, req: HttpRequest) -> impl Responder {
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => {
            let hub = state.hub.clone();
            actix_web::rt::spawn(crate::session::run(hub, session, stream));
            response
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}
