#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("platform request failed: {method} {path}")]
    Request {
        method: &'static str,
        path: String,
        source: reqwest::Error,
    },

    #[error("platform returned {status} for {path}: {body}")]
    Status {
        status: reqwest::StatusCode,
        path: String,
        body: String,
    },

    #[error("failed to decode platform response for {path}")]
    Decode {
        path: String,
        source: reqwest::Error,
    },
}
