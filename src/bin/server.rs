use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    routing::{get, post},
};
use cut_policy::episode::{Episode, EpisodeSummary};
use cut_policy::{
    ColumnGenerationPolicy, Observation, PlacementAction, Policy, ProductDemand, StockSheet,
    Variant,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

const DEFAULT_MAX_STEPS: usize = 10_000;

#[derive(Deserialize, Serialize)]
struct DecideRequest {
    #[serde(default)]
    variant: Variant,
    observation: Observation,
}

#[derive(Deserialize, Serialize)]
struct EpisodeRequest {
    #[serde(default)]
    variant: Variant,
    stocks: Vec<StockSheet>,
    cuts: Vec<ProductDemand>,
    #[serde(default)]
    max_steps: Option<usize>,
}

fn bad_request(e: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

// A fresh policy per request: patterns only persist within one request.
async fn decide(
    payload: Result<Json<DecideRequest>, JsonRejection>,
) -> Result<Json<PlacementAction>, (StatusCode, String)> {
    let Json(req) = payload.map_err(|e| bad_request(e.body_text()))?;
    tracing::info!(
        variant = %req.variant,
        products = req.observation.products.len(),
        stocks = req.observation.stocks.len(),
        "POST /decide"
    );

    let mut policy = ColumnGenerationPolicy::new(req.variant);
    let action = policy.get_action(&req.observation).map_err(bad_request)?;
    Ok(Json(action))
}

async fn episode(
    payload: Result<Json<EpisodeRequest>, JsonRejection>,
) -> Result<Json<EpisodeSummary>, (StatusCode, String)> {
    let Json(req) = payload.map_err(|e| bad_request(e.body_text()))?;
    tracing::info!(
        variant = %req.variant,
        products = req.cuts.len(),
        stocks = req.stocks.len(),
        "POST /episode"
    );

    let mut policy = ColumnGenerationPolicy::new(req.variant);
    let mut episode = Episode::new(req.stocks, req.cuts);
    let summary = episode
        .run(&mut policy, req.max_steps.unwrap_or(DEFAULT_MAX_STEPS))
        .map_err(bad_request)?;
    Ok(Json(summary))
}

#[tokio::main]
async fn main() {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let _sentry = sentry::init((
        std::env::var("SENTRY_DSN").ok(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/decide", post(decide))
        .route("/episode", post(episode))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{Request, header::CONTENT_TYPE};

    async fn json_payload<T>(body: &str) -> Result<Json<T>, JsonRejection>
    where
        T: serde::de::DeserializeOwned,
    {
        let request = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        Json::<T>::from_request(request, &()).await
    }

    #[tokio::test]
    async fn test_decide_places_product() {
        let body = r#"{"variant": 2, "observation": {
            "products": [{"size": [2, 2], "quantity": 1}],
            "stocks": [{"size": [5, 5]}]
        }}"#;
        let Json(action) = decide(json_payload(body).await).await.unwrap();
        assert_eq!(action.stock(), Some(0));
    }

    #[tokio::test]
    async fn test_invalid_variant_is_bad_request() {
        let body = r#"{"variant": 7, "observation": {"products": [], "stocks": []}}"#;
        let (status, _) = decide(json_payload(body).await).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_stock_is_bad_request() {
        let body = r#"{"stocks": [{"size": [4294967295, 4294967295]}], "cuts": []}"#;
        let (status, text) = episode(json_payload(body).await).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("malformed stock"), "{text}");
    }

    #[tokio::test]
    async fn test_malformed_grid_is_bad_request() {
        let body = r#"{"observation": {"products": [], "stocks": [{"size": [2, 2], "grid": [[-1]]}]}}"#;
        let (status, _) = decide(json_payload(body).await).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
