//! Map curl errors and HTTP status codes onto `NetworkError`.

use crate::error::NetworkError;

/// Timeouts become `NetworkError::Timeout`; everything else is a transport error.
pub fn classify_curl_error(url: &str, e: curl::Error) -> NetworkError {
    if e.is_operation_timedout() {
        return NetworkError::Timeout {
            url: url.to_string(),
        };
    }
    NetworkError::Transport {
        url: url.to_string(),
        source: e,
    }
}

/// Non-2xx final status is an error.
pub fn classify_status(url: &str, code: u32) -> Result<(), NetworkError> {
    if (200..300).contains(&code) {
        return Ok(());
    }
    Err(NetworkError::Status {
        url: url.to_string(),
        status: code,
    })
}
