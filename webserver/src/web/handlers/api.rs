//! Download endpoint
//!
//! Validates the body before anything touches the filesystem, runs the
//! acquisition pipeline, and streams the file back as an attachment. The
//! workspace is released by the body stream once it ends or is dropped.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::StreamExt;
use std::sync::Arc;

use orchestrator::core::MEDIA_EXTENSION;
use orchestrator::{ProcessInvoker, ResolvedArtifact, WorkspaceManager};
use shared::{DownloadBody, RequestId, logging, request_info, request_warn};

use crate::error::{WebServerError, WebServerResult};
use crate::state::WebServerState;

const MEDIA_CONTENT_TYPE: &str = "video/mp4";

/// `POST /download`
pub async fn download<W, P>(
    State(state): State<Arc<WebServerState<W, P>>>,
    payload: Result<Json<DownloadBody>, JsonRejection>,
) -> WebServerResult<Response>
where
    W: WorkspaceManager + 'static,
    P: ProcessInvoker + 'static,
{
    let request_id = RequestId::new();

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            request_warn!(request_id, "🚫 Rejected body: {}", rejection.body_text());
            return Err(WebServerError::bad_request(rejection.body_text()));
        }
    };
    let request = match body.into_request() {
        Ok(request) => request,
        Err(e) => {
            request_warn!(request_id, "🚫 Invalid request: {}", e);
            return Err(e.into());
        }
    };

    let in_flight = state.begin_download();
    request_info!(request_id, "📥 Download requested for {}", request.url());

    let delivery = match state.orchestrator.acquire(request_id, &request).await {
        Ok(delivery) => delivery,
        Err(e) => {
            logging::log_request_error(&request_id, &format!("Download of {} ({})", request.url(), e.kind()), &e);
            return Err(e.into());
        }
    };

    let headers = attachment_headers(&delivery.artifact, delivery.content_length)?;

    // The counter stays raised until the body has been fully sent or dropped
    let stream = delivery.stream.map(move |chunk| {
        let _in_flight = &in_flight;
        chunk
    });

    Ok((StatusCode::OK, headers, Body::from_stream(stream)).into_response())
}

fn attachment_headers(artifact: &ResolvedArtifact, content_length: u64) -> WebServerResult<HeaderMap> {
    let disposition = HeaderValue::from_str(&content_disposition(artifact))
        .map_err(|e| WebServerError::ResponseError(format!("invalid Content-Disposition: {e}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(MEDIA_CONTENT_TYPE));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(content_length));
    headers.insert(CONTENT_DISPOSITION, disposition);
    Ok(headers)
}

/// `attachment` disposition with the sanitized name, plus an RFC 5987
/// `filename*` carrying the original title when it is not plain ASCII
pub fn content_disposition(artifact: &ResolvedArtifact) -> String {
    let mut value = format!("attachment; filename=\"{}\"", artifact.display_name);

    if let Some(title) = artifact.title.as_deref().filter(|t| !t.is_ascii()) {
        value.push_str(&format!(
            "; filename*=UTF-8''{}.{}",
            urlencoding::encode(title),
            MEDIA_EXTENSION
        ));
    }
    value
}
