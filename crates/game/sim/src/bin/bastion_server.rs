//! Bastion server — hosts one defense match and serves it to a browser
//! viewer: observation frames stream out over SSE, player input comes in
//! over HTTP POST, and the viewer page is served as static files.

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use bastion_server::{GameServer, MatchError, MatchStatus, ServerConfig, SessionToken, SubmitError};
use bastion_sim::{DefenseAction, DefenseConfig, DefenseGame};
use bastion_types::{InputCommand, MatchStatusView, StatusFrame};
use clap::Parser;
use std::{convert::Infallible, path::PathBuf, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::RwLock};
use tokio_stream::StreamExt;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bastion-server")]
#[command(about = "Waypoint tower-defense match server")]
struct Args {
    /// Port for the web server
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Static files directory (browser viewer)
    #[arg(long, default_value = "web")]
    static_dir: PathBuf,

    /// Match seed
    #[arg(long, default_value = "0")]
    seed: u64,
}

/// Broadcast fan-out for the state stream: one poll task feeds any number of
/// SSE subscribers.
struct StateStream {
    tx: tokio::sync::broadcast::Sender<String>,
    _task: tokio::task::JoinHandle<()>,
}

struct AppState {
    server: Arc<GameServer<DefenseGame>>,
    match_id: u64,
    player_session: SessionToken,
    stream: Arc<RwLock<Option<StateStream>>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let server = Arc::new(GameServer::<DefenseGame>::new(ServerConfig::default()));
    let match_id = server.create_match(DefenseConfig::default(), args.seed).await?;
    let (player_session, _player) = server.join_match(match_id).await?;
    tracing::info!("match {} running", match_id);

    if !args.static_dir.exists() {
        tracing::warn!(
            "Static directory {:?} does not exist; only the API routes will respond.",
            args.static_dir
        );
    }

    let state = Arc::new(AppState {
        server,
        match_id,
        player_session,
        stream: Arc::new(RwLock::new(None)),
    });

    let app = Router::new()
        .route("/api/stream", get(stream_state))
        .route("/api/input", post(submit_input))
        .fallback_service(ServeDir::new(&args.static_dir).append_index_html_on_directories(true))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = TcpListener::bind(("0.0.0.0", args.port)).await?;
    tracing::info!("web server: http://0.0.0.0:{}", args.port);
    axum::serve(listener, app).await?;

    Ok(())
}

/// SSE endpoint: streams status frames for the match to all subscribers.
async fn stream_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rx = {
        let mut lock = state.stream.write().await;

        // The poll task stops when the last subscriber disconnects; restart
        // it if a new subscriber arrives after that.
        let existing_alive = lock
            .as_ref()
            .map(|entry| !entry._task.is_finished())
            .unwrap_or(false);

        if existing_alive {
            let entry = lock.as_ref().unwrap();
            tracing::info!(
                "state SSE: new subscriber (receivers: {})",
                entry.tx.receiver_count() + 1
            );
            entry.tx.subscribe()
        } else {
            let (tx, rx) = tokio::sync::broadcast::channel::<String>(16);

            let session = match state.server.spectate_match(state.match_id).await {
                Ok(token) => token,
                Err(e) => {
                    tracing::error!("failed to open a spectator session: {}", e);
                    return (StatusCode::BAD_GATEWAY, format!("failed to spectate: {}", e))
                        .into_response();
                }
            };

            let poll_tx = tx.clone();
            let poll_state = state.clone();
            let task = tokio::spawn(async move {
                poll_state_loop(poll_state, session, poll_tx).await;
            });

            *lock = Some(StateStream {
                tx: tx.clone(),
                _task: task,
            });

            tracing::info!("state SSE: first subscriber, started polling");
            rx
        }
    };

    let stream = tokio_stream::wrappers::BroadcastStream::new(rx).map(|result| match result {
        Ok(json) => Ok::<_, Infallible>(Event::default().data(json)),
        Err(_) => Ok(Event::default().data("{\"error\": \"stream lagged\"}")),
    });

    Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response()
}

/// Player input: convert the wire command into a game action scheduled for
/// the next tick.
async fn submit_input(
    State(state): State<Arc<AppState>>,
    Json(command): Json<InputCommand>,
) -> impl IntoResponse {
    let action = match command {
        InputCommand::PointerMoved { x, y } => DefenseAction::PointerMoved { x, y },
        InputCommand::PlaceBuilding => DefenseAction::PlaceBuilding,
    };

    let tick = match state.server.current_tick(state.match_id).await {
        Ok(tick) => tick,
        Err(e) => return (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    };

    match state
        .server
        .submit_action(state.match_id, state.player_session, action, tick + 1)
        .await
    {
        Ok((action_id, scheduled_tick)) => Json(serde_json::json!({
            "action_id": action_id,
            "tick": scheduled_tick,
        }))
        .into_response(),
        Err(SubmitError::Terminated) => {
            (StatusCode::CONFLICT, "match is over".to_string()).into_response()
        }
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

/// Polls the match state every 50 ms and broadcasts it to all subscribers.
async fn poll_state_loop(
    state: Arc<AppState>,
    session: SessionToken,
    tx: tokio::sync::broadcast::Sender<String>,
) {
    let mut interval = tokio::time::interval(Duration::from_millis(50));

    loop {
        interval.tick().await;

        if tx.receiver_count() == 0 {
            tracing::info!("state SSE: no subscribers, stopping poll loop");
            break;
        }

        let status = match state.server.match_status(state.match_id).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("state SSE: status failed: {}", e);
                if matches!(e, MatchError::NotFound) {
                    break;
                }
                continue;
            }
        };

        match state.server.observe(state.match_id, session).await {
            Ok(observation) => {
                let frame = StatusFrame {
                    status: status_view(status),
                    observation,
                };
                let json = serde_json::to_string(&frame)
                    .unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e));
                let _ = tx.send(json);
            }
            Err(e) => {
                tracing::warn!("state SSE: observe failed: {}", e);
                let _ = tx.send(format!(r#"{{"error": "{}"}}"#, e));
                if matches!(e, MatchError::NotFound) {
                    break;
                }
            }
        }
    }

    *state.stream.write().await = None;
    let _ = state.server.leave_match(state.match_id, session).await;
    tracing::info!("state SSE: cleaned up stream entry");
}

fn status_view(status: MatchStatus) -> MatchStatusView {
    match status {
        MatchStatus::WaitingForPlayer => MatchStatusView::Waiting,
        MatchStatus::Running => MatchStatusView::Running,
        MatchStatus::Finished(outcome) => MatchStatusView::Finished {
            outcome: format!("{:?}", outcome),
        },
        MatchStatus::Terminated => MatchStatusView::Terminated,
    }
}
