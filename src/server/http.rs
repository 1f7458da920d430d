use super::{host::Host, power::Power};
use axum::{
    extract::{ConnectInfo, FromRef},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request,
    },
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnRequest, DefaultOnResponse, MakeSpan, TraceLayer},
};
use tracing::{info, span, Level, Span};
use uuid::Uuid;

mod error;
mod power;
mod reply;
mod status;

pub use error::{Error, Result};
pub(crate) use reply::{Logged, Reply};

/// Build the router for the power control endpoint
pub fn router(power: Power, host: Host) -> Router {
    Router::new()
        .route("/status", get(status::status))
        .route(
            "/shutdown",
            get(power::shutdown_query).post(power::shutdown_body),
        )
        .route("/reboot", get(power::reboot_query).post(power::reboot_body))
        .route("/cancel", get(power::cancel).post(power::cancel))
        .fallback(not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE, AUTHORIZATION]),
        )
        .layer(middleware::from_fn(log_request))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(MakeSpanWithId)
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .with_state(AppState { power, host })
}

#[derive(Clone)]
pub struct AppState {
    power: Power,
    host: Host,
}

impl FromRef<AppState> for Power {
    fn from_ref(input: &AppState) -> Self {
        input.power.clone()
    }
}

impl FromRef<AppState> for Host {
    fn from_ref(input: &AppState) -> Self {
        input.host.clone()
    }
}

async fn not_found() -> Error {
    Error::NotFound
}

/// Log the client, path and outcome of every request
async fn log_request<B>(request: Request<B>, next: Next<B>) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(address)| address.ip().to_string())
        .unwrap_or_else(|| String::from("-"));
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    match response.extensions().get::<Logged>() {
        Some(Logged(message)) => info!(%client, %path, %message),
        None => info!(%client, %method, %path, status = response.status().as_u16()),
    }

    response
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct MakeSpanWithId;

impl<B> MakeSpan<B> for MakeSpanWithId {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        span!(
            Level::INFO,
            "remote-power::request",
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
            id = %Uuid::new_v4(),
        )
    }
}
