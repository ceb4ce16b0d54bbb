use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use mazegen::config::Params;

const MAX_SIDE: usize = 128;

#[derive(Deserialize)]
struct GenerateRequest {
    seed: Option<u64>,
    width: Option<usize>,
    height: Option<usize>,
    spacing: Option<usize>,
}

#[derive(Serialize)]
struct GenerateResponse {
    layers: Vec<Layer>,
    timings: Vec<TimingEntry>,
    width: usize,
    height: usize,
    generation_steps: usize,
    solving_steps: usize,
    paced_ms: f64,
}

#[derive(Serialize)]
struct Layer {
    name: String,
    data_url: String,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

fn encode_png(rgba: &[u8], w: usize, h: usize) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder.write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    Ok(format!("data:image/png;base64,{}", b64))
}

fn generate(req: GenerateRequest) -> anyhow::Result<GenerateResponse> {
    let seed = req.seed.unwrap_or(42);
    // Keep the returned images small; the cell cap itself lives in `Params`.
    let width = req.width.unwrap_or(64).min(MAX_SIDE);
    let height = req.height.unwrap_or(64).min(MAX_SIDE);

    let defaults = Params::default();
    let params = Params {
        spacing: req.spacing.unwrap_or(defaults.spacing),
        ..defaults
    };
    let (run, timings) = mazegen::run(seed, width, height, &params)?;

    let layers = vec![
        Layer {
            name: "maze".into(),
            data_url: encode_png(&run.maze_rgba, width, height)?,
        },
        Layer {
            name: "solution".into(),
            data_url: encode_png(&run.solution_rgba, width, height)?,
        },
    ];

    let timing_entries = timings
        .iter()
        .map(|t| TimingEntry {
            name: t.name.to_string(),
            ms: t.ms,
        })
        .collect();

    Ok(GenerateResponse {
        layers,
        timings: timing_entries,
        width,
        height,
        generation_steps: run.generation_steps,
        solving_steps: run.solving_steps,
        paced_ms: run.paced.as_secs_f64() * 1000.0,
    })
}

async fn generate_handler(
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, (StatusCode, String)> {
    let response = tokio::task::spawn_blocking(move || generate(req))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    match response {
        Ok(r) => Ok(Json(r)),
        Err(e) => {
            warn!("generate failed: {:#}", e);
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let frontend = ServeDir::new("frontend");

    let app = Router::new()
        .route("/api/generate", post(generate_handler))
        .fallback_service(frontend);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("mazegen server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
