use super::{Error, Reply, Result};
use crate::{
    constants::DEFAULT_DELAY,
    models::ActionResponse,
    server::{
        now,
        power::{Outcome, Power},
    },
};
use axum::{
    body::Bytes,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{instrument, warn};

#[derive(Debug, Deserialize)]
pub struct ShutdownQuery {
    delay: Option<u64>,
    force: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RebootQuery {
    delay: Option<u64>,
}

/// A `delay` that was given but can't be read as a whole number of seconds
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("invalid delay: {0}")]
pub struct InvalidDelay(pub Value);

/// Parameters pulled out of a request body
///
/// Anything that isn't a JSON object is treated as an empty one, and missing fields fall back to
/// their defaults on their own. A `delay` that is present must be a non-negative whole number,
/// either as a JSON number or a numeric string.
#[derive(Debug, PartialEq)]
pub(crate) struct BodyParameters {
    pub delay: std::result::Result<u64, InvalidDelay>,
    pub force: bool,
}

impl BodyParameters {
    pub fn parse(body: &[u8]) -> Self {
        let value = serde_json::from_slice::<Value>(body).unwrap_or(Value::Null);

        BodyParameters {
            delay: delay(value.get("delay")),
            force: value
                .get("force")
                .and_then(Value::as_bool)
                .unwrap_or_default(),
        }
    }
}

fn delay(value: Option<&Value>) -> std::result::Result<u64, InvalidDelay> {
    let seconds = match value {
        None => return Ok(DEFAULT_DELAY),
        Some(Value::Number(number)) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Some(Value::String(text)) => text.trim().parse::<u64>().ok(),
        Some(_) => None,
    };

    seconds.ok_or_else(|| InvalidDelay(value.cloned().unwrap_or_default()))
}

#[instrument(name = "shutdown_query", skip(power))]
pub async fn shutdown_query(
    State(power): State<Power>,
    Query(query): Query<ShutdownQuery>,
) -> Result<Reply<ActionResponse>> {
    let delay = query.delay.unwrap_or(DEFAULT_DELAY);
    let force = query
        .force
        .map(|force| force.to_lowercase() == "true")
        .unwrap_or_default();

    shutdown(&power, delay, force).await
}

#[instrument(name = "shutdown_body", skip_all)]
pub async fn shutdown_body(
    State(power): State<Power>,
    body: Bytes,
) -> Result<Reply<ActionResponse>> {
    let parameters = BodyParameters::parse(&body);
    match parameters.delay {
        Ok(delay) => shutdown(&power, delay, parameters.force).await,
        Err(invalid) => Ok(rejected(invalid)),
    }
}

#[instrument(name = "reboot_query", skip(power))]
pub async fn reboot_query(
    State(power): State<Power>,
    Query(query): Query<RebootQuery>,
) -> Result<Reply<ActionResponse>> {
    reboot(&power, query.delay.unwrap_or(DEFAULT_DELAY)).await
}

#[instrument(name = "reboot_body", skip_all)]
pub async fn reboot_body(
    State(power): State<Power>,
    body: Bytes,
) -> Result<Reply<ActionResponse>> {
    match BodyParameters::parse(&body).delay {
        Ok(delay) => reboot(&power, delay).await,
        Err(invalid) => Ok(rejected(invalid)),
    }
}

#[instrument(name = "cancel", skip_all)]
pub async fn cancel(State(power): State<Power>) -> Result<Reply<ActionResponse>> {
    let outcome = power.cancel().await.map_err(Error::Cancel)?;

    let message = match outcome.success {
        true => "Shutdown cancelled",
        false => "No shutdown scheduled",
    };

    Ok(reply(ActionResponse {
        success: outcome.success,
        message: String::from(message),
        delay: None,
        force: None,
        error: None,
        timestamp: now(),
    }))
}

async fn shutdown(power: &Power, delay: u64, force: bool) -> Result<Reply<ActionResponse>> {
    let outcome = power
        .schedule_shutdown(delay, force)
        .await
        .map_err(Error::Shutdown)?;

    let mut response = scheduled(outcome, format!("Shutdown scheduled in {delay} seconds"));
    response.delay = Some(delay);
    response.force = power.platform().supports_force().then_some(force);

    Ok(reply(response))
}

async fn reboot(power: &Power, delay: u64) -> Result<Reply<ActionResponse>> {
    let outcome = power.schedule_reboot(delay).await.map_err(Error::Reboot)?;

    let mut response = scheduled(outcome, format!("Reboot scheduled in {delay} seconds"));
    response.delay = Some(delay);

    Ok(reply(response))
}

/// Describe the outcome of scheduling a shutdown or reboot
fn scheduled(outcome: Outcome, message: String) -> ActionResponse {
    let (message, error) = match outcome.success {
        true => (message, None),
        false => (format!("Error: {}", outcome.stderr), Some(outcome.stderr)),
    };

    ActionResponse {
        success: outcome.success,
        message,
        delay: None,
        force: None,
        error,
        timestamp: now(),
    }
}

/// Refuse to schedule anything when the requested delay is unusable
fn rejected(invalid: InvalidDelay) -> Reply<ActionResponse> {
    warn!(%invalid, "not scheduling");
    let error = invalid.to_string();

    reply(ActionResponse {
        success: false,
        message: format!("Error: {error}"),
        delay: None,
        force: None,
        error: Some(error),
        timestamp: now(),
    })
}

fn reply(response: ActionResponse) -> Reply<ActionResponse> {
    let message = response.message.clone();
    Reply::new(response).logged(message)
}

#[cfg(test)]
mod tests {
    use super::{BodyParameters, InvalidDelay};
    use serde_json::json;

    fn parameters(delay: u64, force: bool) -> BodyParameters {
        BodyParameters {
            delay: Ok(delay),
            force,
        }
    }

    #[test]
    fn empty_body_uses_defaults() {
        assert_eq!(BodyParameters::parse(b""), parameters(30, false));
    }

    #[test]
    fn malformed_body_uses_defaults() {
        assert_eq!(BodyParameters::parse(b"\"not json"), parameters(30, false));
        assert_eq!(BodyParameters::parse(b"[1, 2, 3]"), parameters(30, false));
    }

    #[test]
    fn fields_default_independently() {
        assert_eq!(
            BodyParameters::parse(br#"{"delay": 5}"#),
            parameters(5, false)
        );
        assert_eq!(
            BodyParameters::parse(br#"{"force": true}"#),
            parameters(30, true)
        );
    }

    #[test]
    fn whole_floats_and_numeric_strings_are_accepted() {
        assert_eq!(
            BodyParameters::parse(br#"{"delay": 600.0}"#),
            parameters(600, false)
        );
        assert_eq!(
            BodyParameters::parse(br#"{"delay": "600", "force": true}"#),
            parameters(600, true)
        );
    }

    #[test]
    fn unusable_delay_is_rejected() {
        for (body, value) in [
            (r#"{"delay": -600}"#, json!(-600)),
            (r#"{"delay": 12.5}"#, json!(12.5)),
            (r#"{"delay": "soon"}"#, json!("soon")),
            (r#"{"delay": "-600"}"#, json!("-600")),
            (r#"{"delay": null}"#, json!(null)),
            (r#"{"delay": [600]}"#, json!([600])),
        ] {
            assert_eq!(
                BodyParameters::parse(body.as_bytes()).delay,
                Err(InvalidDelay(value)),
                "{body}"
            );
        }
    }
}
