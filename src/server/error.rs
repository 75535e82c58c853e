use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{FeatureParseError, PredictionError};

/// Body of every client error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Request failures as seen by the HTTP layer.
#[derive(Debug)]
pub enum ApiError {
    Prediction(PredictionError),
    FeatureParse(FeatureParseError),
    /// The prediction query had no `features` parameter.
    MissingFeatures,
    /// The POST body was not a `{"features": [...]}` document.
    MalformedBody(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Prediction(_) | Self::FeatureParse(_) => StatusCode::BAD_REQUEST,
            Self::MissingFeatures | Self::MalformedBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prediction(e) => write!(f, "{e}"),
            Self::FeatureParse(e) => write!(f, "{e}"),
            Self::MissingFeatures => write!(f, "missing query parameter: features"),
            Self::MalformedBody(msg) => write!(f, "invalid request body: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Prediction(e) => Some(e),
            Self::FeatureParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PredictionError> for ApiError {
    fn from(value: PredictionError) -> Self {
        Self::Prediction(value)
    }
}

impl From<FeatureParseError> for ApiError {
    fn from(value: FeatureParseError) -> Self {
        Self::FeatureParse(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();
        warn!("rejected request ({status}): {detail}");

        (status, Json(ErrorBody { detail })).into_response()
    }
}
