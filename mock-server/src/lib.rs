use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

/// A connected player as reported by the console.
#[derive(Clone, Debug, Serialize)]
pub struct Player {
    pub player_id: String,
    pub name: String,
    pub level: u32,
}

pub struct ServerState {
    token: String,
    players: RwLock<HashMap<String, Player>>,
    broadcast: RwLock<Option<String>>,
}

pub type AppState = Arc<ServerState>;

/// Success envelope: `{"result": ..., "failed": false}`.
pub fn ok(result: Value) -> Json<Value> {
    Json(json!({ "result": result, "failed": false }))
}

/// Logical failure envelope, delivered with HTTP 200.
pub fn fail(error: &str) -> Json<Value> {
    Json(json!({ "failed": true, "error": error }))
}

fn seed_players() -> HashMap<String, Player> {
    [
        Player {
            player_id: "76561198000000001".to_string(),
            name: "Ada".to_string(),
            level: 42,
        },
        Player {
            player_id: "76561198000000002".to_string(),
            name: "Grace".to_string(),
            level: 87,
        },
    ]
    .into_iter()
    .map(|p| (p.player_id.clone(), p))
    .collect()
}

pub fn app(token: &str) -> Router {
    let state: AppState = Arc::new(ServerState {
        token: token.to_string(),
        players: RwLock::new(seed_players()),
        broadcast: RwLock::new(None),
    });

    let api = Router::new()
        .route("/get_status", get(get_status))
        .route("/get_players", get(get_players))
        .route("/get_player_info", get(get_player_info))
        .route("/get_logs", get(get_logs))
        .route("/set_broadcast", post(set_broadcast))
        .route("/kick_player", post(kick_player))
        .route("/run_command", get(run_command_query).post(run_command_body))
        .route("/version", get(version))
        .route("/boom", get(boom))
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state);

    Router::new().nest("/api", api)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", state.token);
    let supplied = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if supplied != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid or missing token" })),
        )
            .into_response();
    }
    next.run(request).await
}

async fn get_status(State(state): State<AppState>) -> Json<Value> {
    let players = state.players.read().await;
    let broadcast = state.broadcast.read().await;
    info!(player_count = players.len(), "status requested");
    ok(json!({
        "name": "mock console",
        "map": "foy_warfare",
        "player_count": players.len(),
        "broadcast": *broadcast,
    }))
}

async fn get_players(State(state): State<AppState>) -> Json<Value> {
    let players = state.players.read().await;
    let mut list: Vec<&Player> = players.values().collect();
    list.sort_by(|a, b| a.player_id.cmp(&b.player_id));
    ok(json!(list))
}

async fn get_player_info(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let Some(player_id) = query.get("player_id") else {
        return fail("player_id required");
    };
    let players = state.players.read().await;
    match players.get(player_id) {
        Some(player) => ok(json!(player)),
        None => fail("player not found"),
    }
}

async fn get_logs(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let lines = [
        json!({ "action": "CONNECTED", "player": "Ada" }),
        json!({ "action": "KILL", "player": "Grace" }),
        json!({ "action": "CHAT", "player": "Ada" }),
    ];

    let mut selected: Vec<Value> = lines
        .iter()
        .filter(|line| match query.get("filter_action") {
            Some(action) => line["action"].as_str() == Some(action.as_str()),
            None => true,
        })
        .cloned()
        .collect();
    if let Some(limit) = query.get("limit").and_then(|l| l.parse::<usize>().ok()) {
        selected.truncate(limit);
    }
    ok(json!(selected))
}

async fn set_broadcast(State(state): State<AppState>, Json(body): Json<Value>) -> Json<Value> {
    let Some(message) = body.get("message").and_then(Value::as_str) else {
        return fail("message required");
    };
    *state.broadcast.write().await = Some(message.to_string());
    info!(message, "broadcast set");
    ok(json!("SUCCESS"))
}

async fn kick_player(State(state): State<AppState>, Json(body): Json<Value>) -> Json<Value> {
    let Some(player_id) = body.get("player_id").and_then(Value::as_str) else {
        return fail("player_id required");
    };
    let mut players = state.players.write().await;
    match players.remove(player_id) {
        Some(player) => {
            info!(player = %player.name, "player kicked");
            ok(json!("SUCCESS"))
        }
        None => fail("player not found"),
    }
}

async fn run_command_query(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    ok(json!(query))
}

async fn run_command_body(Json(body): Json<Value>) -> Json<Value> {
    ok(body)
}

async fn version() -> &'static str {
    "v11.2.1"
}

async fn boom() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_wraps_result() {
        let Json(value) = ok(json!([1, 2]));
        assert_eq!(value["result"], json!([1, 2]));
        assert_eq!(value["failed"], json!(false));
    }

    #[test]
    fn fail_envelope_carries_error() {
        let Json(value) = fail("player not found");
        assert_eq!(value["failed"], json!(true));
        assert_eq!(value["error"], "player not found");
    }

    #[test]
    fn player_serializes_to_json() {
        let player = Player {
            player_id: "1".to_string(),
            name: "Ada".to_string(),
            level: 42,
        };
        let value = serde_json::to_value(&player).unwrap();
        assert_eq!(value["player_id"], "1");
        assert_eq!(value["name"], "Ada");
        assert_eq!(value["level"], 42);
    }

    #[test]
    fn seed_contains_two_players() {
        let players = seed_players();
        assert_eq!(players.len(), 2);
        assert!(players.contains_key("76561198000000001"));
    }
}
