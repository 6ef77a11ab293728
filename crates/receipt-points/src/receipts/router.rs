use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;

use super::domain::{Points, ReceiptId, ReceiptSubmission};
use super::service::ReceiptService;
use super::store::ReceiptStore;
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct ProcessReceiptResponse {
    pub id: ReceiptId,
}

#[derive(Debug, Serialize)]
pub struct AwardPointsResponse {
    pub points: Points,
}

/// Router builder exposing the receipt intake and award endpoints.
pub fn receipt_router<S>(service: Arc<ReceiptService<S>>) -> Router
where
    S: ReceiptStore + 'static,
{
    Router::new()
        .route("/receipts/process", post(process_handler::<S>))
        .route("/receipts/:id/points", get(points_handler::<S>))
        .with_state(service)
}

pub(crate) async fn process_handler<S>(
    State(service): State<Arc<ReceiptService<S>>>,
    payload: Result<axum::Json<ReceiptSubmission>, JsonRejection>,
) -> Response
where
    S: ReceiptStore + 'static,
{
    let axum::Json(submission) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            tracing::warn!(reason = %rejection.body_text(), "receipt payload rejected");
            return AppError::from(rejection).into_response();
        }
    };

    match service.submit(submission) {
        Ok(id) => (StatusCode::OK, axum::Json(ProcessReceiptResponse { id })).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn points_handler<S>(
    State(service): State<Arc<ReceiptService<S>>>,
    Path(id): Path<String>,
) -> Response
where
    S: ReceiptStore + 'static,
{
    match service.award(&ReceiptId(id)) {
        Ok(points) => (StatusCode::OK, axum::Json(AwardPointsResponse { points })).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
