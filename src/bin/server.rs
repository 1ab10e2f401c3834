use std::time::Instant;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tile_solver::solver::Solver;
use tile_solver::types::{Board, Outcome, Piece, Placement, Puzzle};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct SolveRequest {
    board: Board,
    pieces: Vec<Piece>,
}

#[derive(Serialize)]
struct SolveResponse {
    solved: bool,
    board: Board,
    placements: Vec<Placement>,
    nodes: u64,
    elapsed_ms: u128,
}

fn run(puzzle: Puzzle) -> Result<Json<SolveResponse>, (StatusCode, String)> {
    let board = puzzle.board;
    let start = Instant::now();
    let (outcome, stats) = Solver::new(puzzle)
        .solve_with_stats()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let elapsed_ms = start.elapsed().as_millis();

    let (solved, placements) = match outcome {
        Outcome::Solved(solution) => (true, solution.placements),
        Outcome::Unsolvable => (false, vec![]),
    };

    Ok(Json(SolveResponse {
        solved,
        board,
        placements,
        nodes: stats.nodes,
        elapsed_ms,
    }))
}

async fn solve(
    Json(req): Json<SolveRequest>,
) -> Result<Json<SolveResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /solve"
    );

    // The search is CPU bound; keep it off the async workers.
    tokio::task::spawn_blocking(move || run(Puzzle::new(req.board, req.pieces)))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
}

async fn calibron() -> Result<Json<SolveResponse>, (StatusCode, String)> {
    tokio::task::spawn_blocking(|| run(Puzzle::calibron12()))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
}

fn app() -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/solve", post(solve))
        .route("/calibron", get(calibron))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(serve());
}

async fn serve() {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app()).await.unwrap();
}
