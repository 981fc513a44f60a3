use thiserror::Error;

#[derive(Debug, Error)]
pub enum Cin7Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by Cin7 (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// Non-2xx response with the upstream body carried verbatim — order
    /// submission failures must be reportable word-for-word to the operator.
    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("invalid Cin7 base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
