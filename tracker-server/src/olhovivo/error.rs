//! Olho Vivo client error types.

/// Errors from the Olho Vivo HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum OlhoVivoError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A position or line query was issued without a valid session
    #[error("not authenticated with the Olho Vivo API")]
    NotAuthenticated,
}
