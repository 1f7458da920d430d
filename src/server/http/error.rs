use crate::{
    models::ErrorResponse,
    server::{host, power},
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An API error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Endpoint not found")]
    NotFound,
    #[error("Error getting status: {0}")]
    Status(#[source] host::Error),
    #[error("Error scheduling shutdown: {0}")]
    Shutdown(#[source] power::Error),
    #[error("Error scheduling reboot: {0}")]
    Reboot(#[source] power::Error),
    #[error("Error canceling shutdown: {0}")]
    Cancel(#[source] power::Error),
    #[error("Error serializing response: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = format!("{self}");
        let code = match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Status(_)
            | Self::Shutdown(_)
            | Self::Reboot(_)
            | Self::Cancel(_)
            | Self::Serialize(_) => {
                error!(%message, "failed to handle request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let mut response = Json(ErrorResponse {
            code: code.as_u16(),
            message,
        })
        .into_response();

        *response.status_mut() = code;
        response
    }
}
