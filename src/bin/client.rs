//! Exercises a running server: health check, model description, three POST
//! predictions and one GET prediction.
use std::env;

use anyhow::{bail, Context};
use log::{error, info, warn};
use reqwest::{Client, Response};

use linreg_serve::{
    config::{self, DEFAULT_HOST, DEFAULT_PORT},
    server::{ErrorBody, PredictionRequest, StatusResponse},
    ModelInfoResult, PredictionResult,
};

const POST_CASES: [[f64; 4]; 3] = [
    [1.5, 2.3, -0.5, 1.0],
    [0.0, 0.0, 0.0, 0.0],
    [-1.0, 1.5, 2.0, -0.5],
];
const GET_CASE: [f64; 4] = [2.0, -1.5, 0.5, 1.5];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let base_url = format!(
        "http://{}:{}",
        env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
        env::var("SERVER_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string()),
    );
    let client = Client::new();

    let status: StatusResponse = client
        .get(format!("{base_url}/ping"))
        .send()
        .await
        .with_context(|| format!("server unreachable at {base_url}"))?
        .error_for_status()?
        .json()
        .await?;
    info!("server status: {}", status.status);

    let model: ModelInfoResult = client
        .get(format!("{base_url}/api/v1/model_info"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    info!("coefficients: {:?}", model.coefficients);
    info!("intercept: {}", model.intercept);
    info!("r2 score: {:.4}", model.r2_score);
    info!("feature names: {:?}", model.feature_names);

    let mut failures = 0;
    for features in POST_CASES {
        info!("POST /api/v1/prediction with {features:?}");
        let response = client
            .post(format!("{base_url}/api/v1/prediction"))
            .json(&PredictionRequest {
                features: features.to_vec(),
            })
            .send()
            .await?;
        failures += report(response).await? as usize;
    }

    let query = GET_CASE
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    info!("GET /api/v1/prediction with {GET_CASE:?}");
    let response = client
        .get(format!("{base_url}/api/v1/prediction"))
        .query(&[("features", query)])
        .send()
        .await?;
    failures += report(response).await? as usize;

    if failures > 0 {
        bail!("{failures} prediction request(s) failed");
    }
    info!("all requests succeeded");
    Ok(())
}

/// Logs a prediction response. Returns `true` if the server rejected it.
async fn report(response: Response) -> anyhow::Result<bool> {
    let status = response.status();
    if status.is_success() {
        let result: PredictionResult = response.json().await?;
        info!(
            "prediction: {:.4} (features {:?})",
            result.prediction, result.feature_names
        );
        return Ok(false);
    }

    match response.json::<ErrorBody>().await {
        Ok(body) => warn!("server returned {status}: {}", body.detail),
        Err(e) => error!("server returned {status} with unreadable body: {e}"),
    }
    Ok(true)
}
