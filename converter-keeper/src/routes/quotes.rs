//! Quote endpoints

use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    error::Result,
    services::Quoter,
    types::{
        Config, ConvertQuoteRequest, ConvertQuoteResponse, EnterQuoteRequest, EnterQuoteResponse,
        LeaveQuoteRequest, LeaveQuoteResponse,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

pub fn quotes_router(config: Arc<Config>) -> Router {
    let state = AppState { config };

    Router::new()
        .route("/api/quotes/convert", post(convert_quote))
        .route("/api/quotes/enter", post(enter_quote))
        .route("/api/quotes/leave", post(leave_quote))
        .with_state(state)
}

/// Quote a batch conversion
///
/// POST /api/quotes/convert
async fn convert_quote(
    State(state): State<AppState>,
    Json(req): Json<ConvertQuoteRequest>,
) -> Result<Json<ConvertQuoteResponse>> {
    info!(
        targets = req.targets.len(),
        pairs = req.pairs.len(),
        bridges = req.bridges.len(),
        "Quoting conversion"
    );

    let quote = Quoter::quote_conversions(&req, state.config.max_targets).inspect_err(|e| {
        warn!(error = %e, "Conversion quote rejected");
    })?;

    info!(total_out = %quote.total_out, "Quoted conversion");

    Ok(Json(quote))
}

/// POST /api/quotes/enter
async fn enter_quote(Json(req): Json<EnterQuoteRequest>) -> Result<Json<EnterQuoteResponse>> {
    Ok(Json(Quoter::quote_enter(&req)?))
}

/// POST /api/quotes/leave
async fn leave_quote(Json(req): Json<LeaveQuoteRequest>) -> Result<Json<LeaveQuoteResponse>> {
    Ok(Json(Quoter::quote_leave(&req)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_app;
    use serde_json::{json, Value};

    async fn spawn(config: Config) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_app(Arc::new(config));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_health_skips_api_key() {
        let url = spawn(Config {
            api_keys: vec!["secret".to_string()],
            ..Config::default()
        })
        .await;

        let res = reqwest::get(format!("{url}/health")).await.unwrap();
        assert_eq!(res.status(), 200);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_quotes_require_api_key() {
        let url = spawn(Config {
            api_keys: vec!["secret".to_string()],
            ..Config::default()
        })
        .await;
        let client = reqwest::Client::new();
        let body = json!({ "amount": "10", "pool_balance": "0", "total_shares": "0" });

        let res = client
            .post(format!("{url}/api/quotes/enter"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 401);

        let res = client
            .post(format!("{url}/api/quotes/enter"))
            .header("x-api-key", "secret")
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["shares"], "10");
    }

    #[tokio::test]
    async fn test_rejected_quote_maps_to_bad_request() {
        let url = spawn(Config::default()).await;

        let res = reqwest::Client::new()
            .post(format!("{url}/api/quotes/leave"))
            .json(&json!({ "shares": "0", "pool_balance": "10", "total_shares": "10" }))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), 400);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["code"], "QUOTE_REJECTED");
        assert_eq!(body["error"], "Quote rejected: ZeroAmount");
    }
}
