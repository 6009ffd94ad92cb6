//! Mock upstream for the blueprint graph endpoint.
//!
//! Serves one static JSON document, read once at start, at
//! `GET /action-blueprint-graph`. `OPTIONS` on any path answers a CORS
//! preflight with 204; everything else is a JSON 404.
//!
//! ```bash
//! PORT=4000 GRAPH_DATA_PATH=data/graph.json cargo run --bin mock-server --features mock-server
//! curl http://localhost:4000/action-blueprint-graph
//! ```

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_DATA_PATH: &str = "data/graph.json";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let data_path =
        std::env::var("GRAPH_DATA_PATH").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());

    let graph = match load_graph(&data_path) {
        Ok(graph) => graph,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let app = Router::new()
        .route(
            "/action-blueprint-graph",
            get(graph_handler).options(preflight).fallback(fallback),
        )
        .fallback(fallback)
        .with_state(Arc::new(graph));

    let addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Could not bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Mock backend running at http://localhost:{}", port);
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn load_graph(path: &str) -> Result<Value, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Could not read graph data '{}': {}", path, e))?;
    serde_json::from_str(&content).map_err(|e| format!("Graph data '{}' is not JSON: {}", path, e))
}

async fn graph_handler(State(graph): State<Arc<Value>>) -> Response {
    with_cors(Json(graph.as_ref().clone()).into_response())
}

// Set by hand rather than with `tower_http::cors::CorsLayer`: any `OPTIONS`,
// with or without preflight request headers, must get a bare 204.
async fn preflight() -> Response {
    let mut response = with_cors(StatusCode::NO_CONTENT.into_response());
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,OPTIONS"),
    );
    response
}

async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        return preflight().await;
    }
    with_cors((StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" }))).into_response())
}

fn with_cors(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}
