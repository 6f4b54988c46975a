use anyhow::Context;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cutplan_core::{render_svg, CuttingPlan, Optimizer, PlanError, PlanRequest};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const OPENAPI_SPEC: &str = include_str!("../../../openapi.yaml");
const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Cutting Plan API Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            SwaggerUIBundle({
                url: '/openapi.yaml',
                dom_id: '#swagger-ui',
                presets: [SwaggerUIBundle.presets.apis],
                layout: 'BaseLayout',
            });
        };
    </script>
</body>
</html>"#;
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Cutting Plan API</title>
</head>
<body>
    <h1>Cutting Plan API</h1>
    <h2>API Endpoints:</h2>
    <ul>
        <li>GET /api/health - Health check</li>
        <li>POST /api/optimize - Generate a cutting plan</li>
        <li>POST /api/generate/svg - Render a plan as SVG</li>
        <li>GET /docs - API documentation</li>
    </ul>
</body>
</html>"#;

/// Listener settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
struct ApiConfig {
    host: String,
    port: u16,
}

impl ApiConfig {
    fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(
            std::env::var("CUTPLAN_HOST").ok(),
            std::env::var("PORT").ok(),
        )
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> anyhow::Result<Self> {
        let host = host.unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match port {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got '{}'", raw))?,
            None => 3000,
        };
        Ok(Self { host, port })
    }

    fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cutplan_api=info,tower_http=info")),
        )
        .init();

    let config = ApiConfig::from_env()?;
    let addr = config.addr()?;

    info!("Starting Cutting Plan API");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    info!("API server listening on http://{}", addr);
    info!("Try: curl http://localhost:{}/api/health", config.port);

    axum::serve(listener, app()).await.context("server error")?;
    Ok(())
}

fn app() -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/health", get(health_check))
        .route("/api/optimize", post(optimize))
        .route("/api/generate/svg", post(generate_svg))
        .route("/openapi.yaml", get(serve_openapi_spec))
        .route("/docs", get(serve_swagger_ui))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "cutting-plan-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Main planning endpoint
async fn optimize(Json(request): Json<PlanRequest>) -> Result<Json<CuttingPlan>, AppError> {
    info!(
        "Received plan request: {} items, stock {}mm, kerf {}mm",
        request.items.len(),
        request.stock_length,
        request.kerf
    );

    let optimizer = Optimizer::new(request)?;
    let plan = optimizer.optimize()?;

    if !plan.skipped.is_empty() {
        warn!("{} item(s) skipped before packing", plan.skipped.len());
    }
    info!(
        "Plan complete: {} bars, {:.2}% yield",
        plan.summary.total_bars, plan.summary.total_yield_percentage
    );

    Ok(Json(plan))
}

/// Render a plan as an SVG bar diagram
async fn generate_svg(Json(plan): Json<CuttingPlan>) -> Result<Response, AppError> {
    info!("Generating SVG for {} bars", plan.patterns.len());

    let svg = render_svg(&plan).context("failed to render SVG")?;
    Ok((StatusCode::OK, [("Content-Type", "image/svg+xml")], svg).into_response())
}

/// Application error type
struct AppError(anyhow::Error);

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        AppError(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(plan_err) = self.0.downcast_ref::<PlanError>() {
            warn!("Plan rejected: {}", plan_err);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": plan_err.to_string(),
                    "kind": plan_err.kind(),
                })),
            )
                .into_response();
        }

        error!("Request error: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": self.0.to_string(),
                "kind": "internal",
            })),
        )
            .into_response()
    }
}

async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn serve_openapi_spec() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("Content-Type", "application/yaml")],
        OPENAPI_SPEC,
    )
}

async fn serve_swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
