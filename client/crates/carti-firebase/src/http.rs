//! Status and error mapping shared by the REST adapters.

use carti_core::{BackendError, BackendResult};
use log::debug;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Failure to send a request or read its response.
#[track_caller]
pub fn transport_error(err: reqwest::Error) -> BackendError {
    if err.is_decode() {
        BackendError::decode(err.to_string())
    } else {
        BackendError::unavailable(err.to_string())
    }
}

/// Whether `status` is worth retrying.
pub fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

/// Map a non-success response to a [`BackendError`].
///
/// Google APIs answer `{"error": {"code", "message", "status"}}`. Identity
/// Toolkit puts a machine code in `message` (`EMAIL_EXISTS`,
/// `TOO_MANY_ATTEMPTS_TRY_LATER : ...`); Firestore puts it in `status`.
pub fn status_error(status: StatusCode, body: &str) -> BackendError {
    let error = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|body| body.get("error").cloned());

    let message = error
        .as_ref()
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(body)
        .to_string();

    if is_transient_status(status) {
        return BackendError::unavailable(format!("HTTP {status}: {message}"));
    }

    let code = machine_code(&message)
        .or_else(|| {
            error
                .as_ref()
                .and_then(|e| e.get("status"))
                .and_then(Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| status.as_u16().to_string());

    BackendError::rejected(code, message)
}

/// Leading `UPPER_SNAKE` token of an Identity Toolkit message.
fn machine_code(message: &str) -> Option<String> {
    let token = message.split([' ', ':']).next()?.trim();
    let is_code = token.len() > 1
        && token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    is_code.then(|| token.to_string())
}

/// Decode a success body, or map the failure.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        debug!("Request failed with {status}");
        return Err(status_error(status, &body));
    }

    serde_json::from_str(&body).map_err(BackendError::from)
}

/// Check a response whose success body is not needed.
pub async fn read_empty(response: Response) -> BackendResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.map_err(transport_error)?;
    Err(status_error(status, &body))
}
