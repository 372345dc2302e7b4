//! HTTP Server for the EDI ingestion API.
//!
//! Provides REST endpoints for EDI upload and parsing. Document lifecycle
//! beyond `validated` / `error` (sending to partners, status logs) is handled
//! by downstream collaborators.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Health check                         |
//! | GET    | `/api/segments`   | Segment dictionary                   |
//! | POST   | `/api/parse`      | Upload an EDI file (multipart)       |
//! | POST   | `/api/parse/text` | Parse EDI text sent as JSON          |
//! | GET    | `/api/logs`       | SSE stream for real-time logs        |

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, log_info_indent, log_success, log_warning, LOG_BROADCASTER};
use super::types::{ParseResponse, SegmentInfo, TextParseRequest};
use crate::config::{check_extension, IngestConfig};
use crate::error::{ServerError, ServerResult};
use crate::models::ParsedDocument;
use crate::pipeline::{parse_bytes, parse_with, ParseOptions};

/// Multipart framing allowance on top of the file size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared, read-only server state.
#[derive(Clone)]
pub struct AppState {
    config: Arc<IngestConfig>,
    options: Arc<ParseOptions>,
}

impl AppState {
    pub fn new(config: IngestConfig) -> Self {
        let options = config.parse_options();
        Self {
            config: Arc::new(config),
            options: Arc::new(options),
        }
    }
}

/// Build the application router.
pub fn router(config: IngestConfig) -> Router {
    // Permissive CORS for the dashboard
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let body_limit = config.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/segments", get(segments))
        .route("/api/parse", post(upload_edi))
        .route("/api/parse/text", post(parse_text))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(AppState::new(config))
}

/// Start the HTTP server
pub async fn start_server(config: IngestConfig) -> ServerResult<()> {
    let port = config.port;
    let profile = config.profile;
    let app = router(config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, %profile, "EDI ingest server listening");
    tracing::info!("POST /api/parse       - Upload EDI file");
    tracing::info!("POST /api/parse/text  - Parse EDI text");
    tracing::info!("GET  /api/logs        - SSE log stream");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "edi-ingest",
        "version": env!("CARGO_PKG_VERSION"),
        "profile": state.config.profile,
        "separators": state.config.separators.to_string(),
        "endpoints": {
            "upload": "POST /api/parse",
            "text": "POST /api/parse/text",
            "segments": "GET /api/segments",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// Segment dictionary listing
async fn segments(State(state): State<AppState>) -> Json<Vec<SegmentInfo>> {
    let list = state
        .options
        .dictionary()
        .iter()
        .map(|(tag, description)| SegmentInfo {
            tag: tag.to_string(),
            description: description.to_string(),
        })
        .collect();
    Json(list)
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload EDI endpoint
async fn upload_edi(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ServerResult<Json<ParseResponse>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Read error: {}", e)))?
                    .to_vec(),
            );
        }
    }

    let bytes = file_data.ok_or_else(|| bad_request("No file provided"))?;
    let file_name = file_name.unwrap_or_else(|| "upload.edi".to_string());

    check_upload(&state, &file_name, bytes.len())?;

    log_info(format!("📄 New upload: {} ({} bytes)", file_name, bytes.len()));
    let doc = parse_bytes(&bytes, &file_name, &state.options);
    log_outcome(&doc);

    Ok(Json(ParseResponse::from(doc)))
}

/// Parse text endpoint
async fn parse_text(
    State(state): State<AppState>,
    Json(request): Json<TextParseRequest>,
) -> ServerResult<Json<ParseResponse>> {
    check_upload(&state, &request.file_name, request.content.len())?;

    log_info(format!("📝 Text submission: {} ({} bytes)", request.file_name, request.content.len()));
    let doc = parse_with(&request.content, &request.file_name, &state.options);
    log_outcome(&doc);

    Ok(Json(ParseResponse::from(doc)))
}

fn check_upload(state: &AppState, file_name: &str, size: usize) -> ServerResult<()> {
    let limit = state.config.max_upload_bytes;
    let result = match check_extension(file_name) {
        Err(e) => Err(ServerError::from(e)),
        Ok(()) if size > limit => Err(ServerError::PayloadTooLarge { size, limit }),
        Ok(()) => Ok(()),
    };

    if let Err(ref e) = result {
        log_error(e.to_string());
    }
    result
}

fn log_outcome(doc: &ParsedDocument) {
    log_info_indent(format!("Transaction type: {}", doc.transaction_type), 1);
    log_info_indent(format!("Segments: {}", doc.segments.len()), 1);

    if doc.is_valid() {
        log_success(format!(
            "{} validated ({} warnings)",
            doc.file_name,
            doc.warning_count()
        ));
    } else {
        log_warning(format!(
            "{} processed with {} errors",
            doc.file_name,
            doc.error_count()
        ));
    }
}

fn bad_request(msg: impl Into<String>) -> ServerError {
    ServerError::BadRequest(msg.into())
}
