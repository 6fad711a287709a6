//! HTTP surface for the analyzer.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Form page for submitting an article URL |
//! | `POST` | `/analyze` | Analyze one article (form-encoded `url`) |
//! | `GET` | `/health` | Liveness check |
//!
//! `POST /analyze` accepts `url` plus optional `summary_method`
//! (`auto`, `abstractive`, `extractive`) and `sentiment_method`
//! (`polarity`, `compound`). Successful responses carry the
//! [`AnalysisReport`]; failures carry `{"error": "<message>"}`:
//!
//! | Status | Cause |
//! |--------|-------|
//! | 400 | Missing or malformed URL, unknown method, too little article text |
//! | 502 | The article could not be downloaded |
//! | 500 | Summarization failed |

use crate::config::Settings;
use crate::models::AnalysisReport;
use crate::pipeline::{AnalyzeError, AnalyzeOptions, Analyzer};
use crate::request_log::RequestLog;
use axum::{
    Form, Json, Router,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub log: Arc<RequestLog>,
}

impl AppState {
    pub fn new(analyzer: Analyzer, log: RequestLog) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            log: Arc::new(log),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/analyze", post(handle_analyze))
        .route("/health", get(handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `settings.bind` and serve until the process is stopped.
#[instrument(level = "info", skip_all, fields(bind = %settings.bind))]
pub async fn run_server(settings: Settings) -> Result<(), Box<dyn Error>> {
    let bind = settings.bind.clone();
    let log = RequestLog::new(settings.request_log.clone());
    let log_path = log.path().display().to_string();
    let analyzer = Analyzer::new(settings)?;
    let app = router(AppState::new(analyzer, log));

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(addr = %listener.local_addr()?, request_log = %log_path, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// An [`AnalyzeError`] on its way out as a JSON response.
struct AppError(AnalyzeError);

impl From<AnalyzeError> for AppError {
    fn from(e: AnalyzeError) -> Self {
        Self(e)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0 {
            AnalyzeError::MissingUrl
            | AnalyzeError::InvalidUrl
            | AnalyzeError::UnknownMethod { .. }
            | AnalyzeError::InsufficientText => StatusCode::BAD_REQUEST,
            AnalyzeError::Fetch(_) => StatusCode::BAD_GATEWAY,
            AnalyzeError::Summarization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(%status, error = %self.0, "Analysis failed");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Debug, Default, Deserialize)]
struct AnalyzeForm {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    summary_method: Option<String>,
    #[serde(default)]
    sentiment_method: Option<String>,
}

/// A body that is not a decodable form counts as an empty form, so it is
/// logged and answered like a request without a URL.
async fn handle_analyze(
    State(state): State<AppState>,
    form: Result<Form<AnalyzeForm>, FormRejection>,
) -> Result<Json<AnalysisReport>, AppError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable analyze form; treating it as empty");
            AnalyzeForm::default()
        }
    };
    let url = form.url.unwrap_or_default();
    let result = match AnalyzeOptions::parse(
        form.summary_method.as_deref(),
        form.sentiment_method.as_deref(),
    ) {
        Ok(options) => state.analyzer.analyze_url(&url, options).await,
        Err(e) => Err(e),
    };

    state.log.record(url.trim(), result.is_ok()).await;
    Ok(Json(result?))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::article::FetchError;
    use crate::summarize::SummarizeError;
    use axum::body::Body;
    use axum::http::{Request, header};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(dir: &tempfile::TempDir) -> (Router, std::path::PathBuf) {
        let log_path = dir.path().join("requests.log");
        let analyzer = Analyzer::new(Settings::default()).unwrap();
        let state = AppState::new(analyzer, RequestLog::new(&log_path));
        (router(state), log_path)
    }

    fn analyze_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 65536).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(&dir);
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 65536).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/analyze"));
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(&dir);
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_missing_url_is_bad_request_and_logged() {
        let dir = tempfile::tempdir().unwrap();
        let (app, log_path) = app(&dir);
        let response = app.oneshot(analyze_request("url=")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Please provide a URL");

        let log = tokio::fs::read_to_string(&log_path).await.unwrap();
        assert!(log.trim_end().ends_with("URL:  | Success: False"));
    }

    #[tokio::test]
    async fn test_non_form_post_is_json_bad_request_and_logged() {
        let dir = tempfile::tempdir().unwrap();
        let (app, log_path) = app(&dir);
        let req = Request::builder()
            .method("POST")
            .uri("/analyze")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Please provide a URL");

        let log = tokio::fs::read_to_string(&log_path).await.unwrap();
        assert_eq!(log.lines().count(), 1);
        assert!(log.trim_end().ends_with("| Success: False"));
    }

    #[tokio::test]
    async fn test_absent_url_field_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(&dir);
        let response = app.oneshot(analyze_request("")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_url_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let (app, log_path) = app(&dir);
        let response = app
            .oneshot(analyze_request("url=not+a+url"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "Invalid URL format. Please provide a valid http:// or https:// URL"
        );

        let log = tokio::fs::read_to_string(&log_path).await.unwrap();
        assert!(log.contains("URL: not a url | Success: False"));
    }

    #[tokio::test]
    async fn test_unknown_method_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(&dir);
        let response = app
            .oneshot(analyze_request(
                "url=https%3A%2F%2Fexample.com%2Fstory&summary_method=psychic",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "Unknown summary_method: psychic"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError(AnalyzeError::InsufficientText).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError(AnalyzeError::Summarization(SummarizeError::EmptyReply)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        // Build a real reqwest error from an unparseable request URL.
        let fetch = reqwest::Client::new().get("http://[::1").build().unwrap_err();
        assert_eq!(
            AppError(AnalyzeError::Fetch(FetchError::Http(fetch))).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
