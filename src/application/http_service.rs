use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        rejection::JsonRejection,
        State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use super::dto::{
    ChatRequest, ChatResponse, HealthResponse, SolveEquationRequest, SolveEquationResponse,
    UploadResponse,
};
use super::error::ApiError;
use super::mappers;
use crate::domain::{
    chat_service::ChatProvider, preview_service::UploadError, solver_service::EquationSolver,
    DEFAULT_PREVIEW_ROWS,
};
use crate::infrastructure::tabular::ParserFactory;

/// Name of the multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "file";

/// Shared, read-only handler dependencies
#[derive(Clone)]
pub struct AppState {
    pub solver: Arc<dyn EquationSolver>,
    pub chat: Arc<dyn ChatProvider>,
    pub parsers: ParserFactory,
    pub preview_rows: usize,
}

impl AppState {
    pub fn new(solver: Arc<dyn EquationSolver>, chat: Arc<dyn ChatProvider>) -> Self {
        Self {
            solver,
            chat,
            parsers: ParserFactory::new(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }

    pub fn with_preview_rows(mut self, preview_rows: usize) -> Self {
        self.preview_rows = preview_rows;
        self
    }
}

/// API routes without server-level layers
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/solve-equation", post(solve_equation))
        .route("/chat", post(chat))
        .route("/upload-data", post(upload_data))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn solve_equation(
    State(state): State<AppState>,
    payload: Result<Json<SolveEquationRequest>, JsonRejection>,
) -> Result<Json<SolveEquationResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = mappers::dto_to_domain_equation(request);

    tracing::debug!(solver = state.solver.name(), equation = %request.equation, "solving equation");

    let solver = Arc::clone(&state.solver);
    let solutions = tokio::task::spawn_blocking(move || solver.solve(&request.equation))
        .await
        .map_err(|e| ApiError::Internal(format!("solver task failed: {e}")))??;

    Ok(Json(mappers::domain_to_dto_solution(&solutions)))
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let conversation = mappers::dto_to_domain_conversation(request)?;

    tracing::debug!(provider = state.chat.name(), messages = conversation.len(), "chat request");

    let response = state.chat.complete(&conversation).await?;
    Ok(Json(ChatResponse { response }))
}

pub async fn upload_data(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let (format, parser) = state.parsers.for_filename(&filename)?;
        let bytes = field.bytes().await.map_err(multipart_error)?;

        tracing::debug!(
            %filename,
            %format,
            size = bytes.len(),
            parser = parser.name(),
            "parsing upload"
        );

        let preview_rows = state.preview_rows;
        let preview =
            tokio::task::spawn_blocking(move || parser.parse(&filename, &bytes, preview_rows))
                .await
                .map_err(|e| ApiError::Internal(format!("parser task failed: {e}")))??;

        return Ok(Json(mappers::domain_to_dto_preview(preview)));
    }

    Err(UploadError::MissingFile.into())
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::BadRequest(e.body_text())
    }
}
