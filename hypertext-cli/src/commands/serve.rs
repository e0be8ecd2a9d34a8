//! Preview server command implementation.

use super::build::{build_with_config, load_config};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use hypertext_core::{BuildReport, Config, OsFs, PreviewHandler, PreviewRequest, PreviewResponse};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
struct AppState {
    handler: Arc<PreviewHandler<OsFs>>,
}

/// Build once, then serve the output directory until interrupted
pub async fn serve_site(config_path: &Path, port: Option<u16>, watch: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let report = build_with_config(&config)?;
    tracing::info!("Built {} pages", report.pages.len());

    // Kept alive for the lifetime of the server
    let _watcher = if watch {
        Some(watch_sources(config.clone())?)
    } else {
        None
    };

    let handler = PreviewHandler::new(OsFs, config.output_dir());
    tracing::debug!("Serving files from {:?}", handler.output_root());
    let app = router(handler);

    let addr = format!("{}:{}", config.server.host, port.unwrap_or(config.server.port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Starting preview server on http://{}", addr);
    println!("\nServing at http://{}", addr);
    println!("   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

pub fn router(handler: PreviewHandler<OsFs>) -> Router {
    let state = AppState {
        handler: Arc::new(handler),
    };

    Router::new()
        .route("/", get(serve_path))
        .route("/{*path}", get(serve_path))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn serve_path(State(state): State<AppState>, uri: Uri) -> Response {
    let path = match urlencoding::decode(uri.path()) {
        Ok(path) => path.into_owned(),
        Err(err) => {
            tracing::debug!("Undecodable path {:?}: {}", uri.path(), err);
            return to_response(state.handler.not_found());
        }
    };

    let handler = state.handler.clone();
    let result =
        tokio::task::spawn_blocking(move || handler.handle(&PreviewRequest::new(path))).await;

    match result {
        Ok(response) => to_response(response),
        Err(e) => {
            tracing::error!("Preview task panicked: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn to_response(response: PreviewResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, response.content_type)],
        response.body,
    )
        .into_response()
}

/// Rebuild the site whenever a source directory changes
fn watch_sources(config: Config) -> Result<RecommendedWatcher> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = tx.send(res);
        },
        notify::Config::default(),
    )
    .context("Failed to initialize file watcher")?;

    for dir in config.source_dirs() {
        if !dir.is_dir() {
            tracing::debug!("Not watching missing directory {:?}", dir);
            continue;
        }
        watcher
            .watch(&dir, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {:?}", dir))?;
        tracing::info!("Watching {:?}", dir);
    }

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                Ok(_ev) => {
                    // Collapse bursts into one rebuild
                    while rx.try_recv().is_ok() {}
                    tracing::info!("Change detected, rebuilding site...");
                    let res = tokio::task::spawn_blocking({
                        let config = config.clone();
                        move || rebuild_swapped(&config)
                    })
                    .await;

                    match res {
                        Ok(Ok(report)) => {
                            tracing::info!("Rebuild complete ({} pages)", report.pages.len())
                        }
                        Ok(Err(e)) => {
                            tracing::error!("Rebuild failed, still serving the last build: {:?}", e)
                        }
                        Err(e) => tracing::error!("Rebuild task panicked: {}", e),
                    }
                }
                Err(err) => tracing::warn!("Watcher error: {}", err),
            }
        }
    });

    Ok(watcher)
}

/// Build into a hidden sibling of the output root, then swap it into place.
///
/// The live output is only touched once the new build has succeeded, so a
/// failed rebuild leaves the previous snapshot being served. Requests landing
/// between the two renames can still miss.
fn rebuild_swapped(config: &Config) -> Result<BuildReport> {
    let output = config.output_dir();

    let mut staged = config.clone();
    staged.paths.output = sibling_path(&config.paths.output, "staging");
    let staging = staged.output_dir();

    let report = match build_with_config(&staged) {
        Ok(report) => report,
        Err(e) => {
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }
    };

    let retired = sibling_path(&output, "old");
    if retired.exists() {
        fs::remove_dir_all(&retired).with_context(|| format!("Failed to remove {:?}", retired))?;
    }
    if output.exists() {
        fs::rename(&output, &retired)
            .with_context(|| format!("Failed to move {:?} aside", output))?;
    }
    fs::rename(&staging, &output)
        .with_context(|| format!("Failed to move {:?} into place", staging))?;
    if retired.exists() {
        fs::remove_dir_all(&retired).with_context(|| format!("Failed to remove {:?}", retired))?;
    }

    Ok(report)
}

/// `public` -> `.public.<suffix>` in the same directory
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("output"));
    path.with_file_name(format!(".{name}.{suffix}"))
}
