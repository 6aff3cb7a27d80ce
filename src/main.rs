use axum::{
  extract::State,
  http::{Method, StatusCode},
  response::IntoResponse,
  routing::{get, post},
  Json, Router,
};
use serde::Deserialize;
use std::env;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

mod game;
mod protocol;
mod shared;
mod transport;

use game::constants::GAME_CHANNEL;
use game::registry::Registry;
use shared::token::{sign_channel_token, ChannelClaims};
use transport::centrifugo::CentrifugoClient;

#[derive(Clone)]
struct AppState {
  registry: Arc<Registry>,
  hmac_secret: String,
}

#[derive(Debug, Deserialize)]
struct JoinGameRequest {
  #[serde(rename = "playerId")]
  player_id: String,
}

#[derive(Debug, Deserialize)]
struct DirectionChangeRequest {
  #[serde(rename = "playerId")]
  player_id: String,
  direction: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let centrifugo_url =
    env::var("CENTRIFUGO_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
  let api_key = env::var("CENTRIFUGO_API_KEY").unwrap_or_default();
  let hmac_secret = env::var("CENTRIFUGO_HMAC_SECRET").unwrap_or_default();

  let broadcast = Arc::new(CentrifugoClient::new(&centrifugo_url, api_key));
  let registry = Arc::new(Registry::new(broadcast));

  let state = Arc::new(AppState {
    registry: registry.clone(),
    hmac_secret,
  });

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET, Method::POST])
    .allow_headers(Any);

  let app: Router = Router::new()
    .route("/join", post(join_game))
    .route("/leave", post(leave_game))
    .route("/direction", post(change_direction))
    .route("/token", get(token))
    .route("/test", get(test))
    .layer(cors)
    .with_state(state);

  let port: u16 = env::var("PORT")
    .ok()
    .and_then(|value| value.parse().ok())
    .unwrap_or(8080);
  let address = format!("0.0.0.0:{port}");
  tracing::info!("listening on {address}");

  let listener = tokio::net::TcpListener::bind(&address).await?;
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal(registry))
    .await?;

  Ok(())
}

async fn shutdown_signal(registry: Arc<Registry>) {
  let _ = tokio::signal::ctrl_c().await;
  registry.shutdown().await;
}

async fn join_game(
  State(state): State<Arc<AppState>>,
  Json(request): Json<JoinGameRequest>,
) -> StatusCode {
  state.registry.join(&request.player_id).await;
  StatusCode::NO_CONTENT
}

async fn leave_game(
  State(state): State<Arc<AppState>>,
  Json(request): Json<JoinGameRequest>,
) -> StatusCode {
  state.registry.leave(&request.player_id).await;
  StatusCode::NO_CONTENT
}

async fn change_direction(
  State(state): State<Arc<AppState>>,
  Json(request): Json<DirectionChangeRequest>,
) -> StatusCode {
  if let Some(direction) = request.direction.as_deref() {
    state
      .registry
      .change_direction(&request.player_id, direction)
      .await;
  }
  StatusCode::NO_CONTENT
}

async fn token(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let claims = ChannelClaims {
    sub: GAME_CHANNEL.to_string(),
    channels: vec![GAME_CHANNEL.to_string()],
  };
  match sign_channel_token(&claims, &state.hmac_secret) {
    Ok(token) => (StatusCode::OK, token).into_response(),
    Err(error) => {
      tracing::warn!(?error, "failed to sign channel token");
      StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
  }
}

async fn test() -> &'static str {
  "Server is working"
}
