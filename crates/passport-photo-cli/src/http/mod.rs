//! HTTP upload endpoint.
//!
//! `POST /analyse` takes a multipart form with a `file` field and answers
//! with the verdict, per-check messages and descriptive tags.

mod error;

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use passport_photo_core::{format_tags, AnalysisReport, PhotoAnalyser, PhotoImage};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

pub use error::ApiError;

/// Body of a successful `POST /analyse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyseResponse {
    /// Overall verdict and messages.
    pub results: AnalysisReport,
    /// Formatted descriptive tags.
    pub tags: Vec<String>,
}

/// Builds the application router.
pub fn router(analyser: Arc<PhotoAnalyser>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/analyse", post(analyse))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(analyser)
}

async fn analyse(
    State(analyser): State<Arc<PhotoAnalyser>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyseResponse>, ApiError> {
    let (filename, bytes) = read_file_part(&mut multipart?).await?;
    debug!(%filename, size = bytes.len(), "Upload received");

    let response = tokio::task::spawn_blocking(move || {
        let image = PhotoImage::decode(filename, bytes)?;
        let analysis = analyser.analyse(&image)?;
        Ok::<_, ApiError>(AnalyseResponse {
            results: analysis.report,
            tags: format_tags(&analysis.tags),
        })
    })
    .await??;

    info!(status = response.results.status, "Upload analysed");
    Ok(Json(response))
}

/// Finds the `file` field. A `file` field sent without a filename does not
/// count as a file part.
async fn read_file_part(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if name.is_empty() {
            return Err(ApiError::NoSelectedFile);
        }
        let bytes = field.bytes().await?;
        return Ok((name, bytes.to_vec()));
    }
    Err(ApiError::NoFilePart)
}
