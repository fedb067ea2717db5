use thiserror::Error;

/// Errors returned by the ERP inventory client.
#[derive(Debug, Error)]
pub enum ErpError {
    /// Network or TLS failure, or a non-2xx HTTP status, from the underlying
    /// HTTP client. The only retriable kind.
    #[error("ERP HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The ERP embedded its quota-exceeded marker in a 200-status payload.
    /// Surfaced as-is, never retried.
    #[error("ERP call quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The payload carried no usable result set: missing, not an array, or
    /// (for the full list) empty.
    #[error("no stock registered")]
    NoStock,

    /// The response body could not be decoded into the expected shape.
    #[error("ERP response decode error for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL is not a valid URL.
    #[error("invalid ERP base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
