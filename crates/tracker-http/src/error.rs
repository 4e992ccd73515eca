use railyard_tracker::TrackerError;

#[allow(clippy::needless_pass_by_value)] // signature required for use with .map_err()
pub(crate) fn map_reqwest_err(e: reqwest::Error) -> TrackerError {
    if e.is_decode() {
        TrackerError::Decode(e.to_string())
    } else if let Some(status) = e.status() {
        TrackerError::Api {
            status: status.as_u16(),
            message: e.to_string(),
        }
    } else {
        TrackerError::Connection(e.to_string())
    }
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: String,
}

/// TestRail reports failures as `{"error": "..."}`; fall back to the raw body.
pub(crate) fn api_error(status: u16, body: &str) -> TrackerError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string());
    TrackerError::Api { status, message }
}
