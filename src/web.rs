//! Single-page web form around [`FeedbackPipeline`].

use crate::provider::ProviderKind;
use crate::{ExtractionResult, FeedbackError, FeedbackPipeline, FeedbackReport, FeedbackRequest};
use anyhow::Context as _;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tera::{Context, Tera};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;

/// Maximum form body size (64KB)
pub const MAX_BODY_SIZE: usize = 65_536;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<FeedbackPipeline>,
    templates: Arc<Tera>,
}

impl AppState {
    pub fn new(pipeline: FeedbackPipeline) -> Result<Self, FeedbackError> {
        let mut tera = Tera::default();
        tera.add_raw_template("index.html", INDEX_TEMPLATE)?;
        Ok(Self {
            pipeline: Arc::new(pipeline),
            templates: Arc::new(tera),
        })
    }

    fn render(&self, page: &PageView<'_>) -> Result<Html<String>, FeedbackError> {
        let context = Context::from_serialize(page)?;
        Ok(Html(self.templates.render("index.html", &context)?))
    }
}

impl IntoResponse for FeedbackError {
    fn into_response(self) -> Response {
        self.log();
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

#[derive(Serialize)]
struct ProviderOption {
    value: &'static str,
    label: &'static str,
}

/// Submitted values echoed back into the form. The API key is never echoed.
#[derive(Serialize)]
struct FormView<'a> {
    links: &'a str,
    parameter: &'a str,
    persona: &'a str,
    provider: &'a str,
}

#[derive(Serialize)]
struct PageView<'a> {
    form: FormView<'a>,
    providers: Vec<ProviderOption>,
    submitted: bool,
    validation_error: Option<String>,
    successes: Vec<&'a ExtractionResult>,
    failures: Vec<&'a ExtractionResult>,
    feedback: &'a str,
}

impl<'a> PageView<'a> {
    fn new(request: &'a FeedbackRequest) -> Self {
        let provider = if request.provider.is_empty() {
            ProviderKind::Perplexity.as_str()
        } else {
            request.provider.as_str()
        };

        Self {
            form: FormView {
                links: &request.links,
                parameter: &request.parameter,
                persona: &request.persona,
                provider,
            },
            providers: ProviderKind::ALL
                .iter()
                .map(|kind| ProviderOption {
                    value: kind.as_str(),
                    label: kind.display_name(),
                })
                .collect(),
            submitted: false,
            validation_error: None,
            successes: Vec::new(),
            failures: Vec::new(),
            feedback: "",
        }
    }

    fn with_report(mut self, report: &'a FeedbackReport) -> Self {
        self.submitted = true;
        self.successes = report.successes().collect();
        self.failures = report.failures().collect();
        self.feedback = &report.feedback;
        self
    }
}

pub async fn handle_index(State(state): State<AppState>) -> Result<Html<String>, FeedbackError> {
    let request = FeedbackRequest::default();
    state.render(&PageView::new(&request))
}

pub async fn handle_submit(
    State(state): State<AppState>,
    Form(request): Form<FeedbackRequest>,
) -> Result<Html<String>, FeedbackError> {
    match state.pipeline.run(&request).await {
        Ok(report) => state.render(&PageView::new(&request).with_report(&report)),
        Err(FeedbackError::MissingInput(message)) => {
            let mut page = PageView::new(&request);
            page.validation_error = Some(message);
            state.render(&page)
        }
        Err(e) => Err(e),
    }
}

pub async fn handle_health() -> &'static str {
    "ok"
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_index).post(handle_submit))
        .route("/health", get(handle_health))
        .with_state(state)
        // No whole-request timeout; page fetches carry their own, so a slow
        // submission still renders its partial report.
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
}

pub async fn run_server(config: &ServerConfig, pipeline: FeedbackPipeline) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("parse server bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind server socket {addr}"))?;

    run_server_with_listener(listener, pipeline).await
}

pub async fn run_server_with_listener(
    listener: tokio::net::TcpListener,
    pipeline: FeedbackPipeline,
) -> anyhow::Result<()> {
    let state = AppState::new(pipeline).context("load page templates")?;
    let app = build_app(state);

    let local_addr = listener.local_addr().context("read bound address")?;
    info!(address = %local_addr, "Feedback form listening");

    axum::serve(listener, app)
        .await
        .context("serve feedback form")?;
    Ok(())
}
