use super::Error;
use axum::{
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The message logged alongside a handled request
#[derive(Clone, Debug)]
pub struct Logged(pub String);

/// A pretty-printed JSON response
#[derive(Debug)]
pub struct Reply<T> {
    body: T,
    message: Option<String>,
}

impl<T> Reply<T> {
    pub fn new(body: T) -> Self {
        Reply {
            body,
            message: None,
        }
    }

    /// Log `message` once the response is sent
    pub fn logged(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        let body = match serde_json::to_vec_pretty(&self.body) {
            Ok(body) => body,
            Err(error) => return Error::from(error).into_response(),
        };
        let length = body.len();

        let mut response = (
            StatusCode::OK,
            [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            body,
        )
            .into_response();
        response
            .headers_mut()
            .insert(CONTENT_LENGTH, HeaderValue::from(length));
        response.extensions_mut().insert(Logged(
            self.message
                .unwrap_or_else(|| String::from("Response sent")),
        ));

        response
    }
}
