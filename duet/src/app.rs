//! HTTP routes over the tool dispatcher.

use std::any::Any;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dprovider::{CallResult, Prompt};
use serde::Deserialize;
use serde_json::Value;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::ServiceRuntime;
use crate::envelope::{
    HealthReport, ServiceIndex, ToolDescriptor, ToolFailure, ToolList, ToolSuccess,
};

pub const HEALTH_PROMPT: &str = "Hello";
pub const HEALTH_TOKEN_BUDGET: u32 = 50;

#[derive(Debug, Clone)]
pub struct AppState {
    pub runtime: ServiceRuntime,
}

impl AppState {
    pub fn new(runtime: ServiceRuntime) -> Self {
        Self { runtime }
    }
}

#[derive(Debug, Deserialize)]
struct ToolCallRequest {
    #[serde(default)]
    arguments: Value,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/{tool_name}", post(call_tool))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

async fn index(State(state): State<AppState>) -> Json<ServiceIndex> {
    let definitions = state.runtime.dispatcher.registry().definitions();
    Json(ServiceIndex::new(&state.runtime.info, definitions))
}

async fn list_tools(State(state): State<AppState>) -> Json<ToolList> {
    let tools = state
        .runtime
        .dispatcher
        .registry()
        .definitions()
        .into_iter()
        .map(ToolDescriptor::from)
        .collect();
    Json(ToolList { tools })
}

async fn health(State(state): State<AppState>) -> Response {
    let info = &state.runtime.info;
    let prompt = Prompt::new(HEALTH_PROMPT, HEALTH_TOKEN_BUDGET);

    match state.runtime.dispatcher.router().route(&prompt).await {
        CallResult::Success(completion) => (
            StatusCode::OK,
            Json(HealthReport::healthy(info, completion.provider.as_str())),
        )
            .into_response(),
        CallResult::Failure(failure) => {
            Json(HealthReport::unhealthy(info, failure.message)).into_response()
        }
    }
}

async fn call_tool(
    State(state): State<AppState>,
    Path(tool_name): Path<String>,
    body: Bytes,
) -> Response {
    let arguments = match parse_arguments(&body) {
        Ok(arguments) => arguments,
        Err(message) => return failure_response(ToolFailure::new(message)),
    };

    match state.runtime.dispatcher.dispatch(&tool_name, &arguments).await {
        Ok(output) => (StatusCode::OK, Json(ToolSuccess::from(output))).into_response(),
        Err(error) => failure_response(ToolFailure::from(error)),
    }
}

/// An empty body means no arguments.
fn parse_arguments(body: &[u8]) -> Result<Value, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice::<ToolCallRequest>(body)
        .map(|request| request.arguments)
        .map_err(|err| format!("invalid request body: {err}"))
}

fn failure_response(failure: ToolFailure) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(failure)).into_response()
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic"
    };
    tracing::error!(phase = "http", event = "handler_panic", detail, "request handler panicked");
    failure_response(ToolFailure::new(format!("internal error: {detail}")))
}
