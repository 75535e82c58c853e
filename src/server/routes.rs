use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{error::ApiError, query::parse_features};
use crate::handler::{ModelInfoResult, PredictionResult, RequestHandler};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub features: Vec<f64>,
}

pub async fn ping() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

pub async fn predict_body(
    State(handler): State<RequestHandler>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    let result = handler.handle_predict(&request.features)?;
    Ok(Json(result))
}

pub async fn predict_query(
    State(handler): State<RequestHandler>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<PredictionResult>, ApiError> {
    let features = parse_features(&pairs)?.ok_or(ApiError::MissingFeatures)?;
    let result = handler.handle_predict(&features)?;
    Ok(Json(result))
}

pub async fn model_info(State(handler): State<RequestHandler>) -> Json<ModelInfoResult> {
    Json(handler.handle_model_info())
}
