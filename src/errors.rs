use thiserror::Error;

/// Defines errors that can occur when talking to a Gancio instance.
///
/// Every completed request that comes back with a non-success status turns into
/// [`GancioError::Api`]. There is no separate variant for "not found",
/// "unauthorized" and so on; inspect the status code to branch.
///
/// # Example: Treating a missing event as absent
///
/// ```ignore
/// match client.get_event("some-slug").await {
///     Ok(event) => println!("{}", event.title),
///     Err(err) if err.is_not_found() => println!("no such event"),
///     Err(err) => return Err(err),
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GancioError {
    /// The server answered with a non-success status.
    ///
    /// Carries the request line that failed together with the exact status code
    /// and body text the server returned.
    #[error("{method} {path} -> {status_code}: {body}")]
    Api {
        /// HTTP method of the failed request (e.g. `POST`)
        method: String,
        /// Request path including any query string (e.g. `/oauth/login`)
        path: String,
        /// HTTP status code (e.g. 400, 404, 500)
        status_code: u16,
        /// Raw response body
        body: String,
    },
    /// Transport-level failure (connection refused, TLS, timeout...).
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    /// The server returned a success status but the body did not decode.
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),
    /// The request could not be encoded (e.g. an invalid image MIME type).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Failed to build the HTTP client or the blocking runtime.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl GancioError {
    /// Returns the HTTP status code if this is an [`GancioError::Api`] error.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Returns the raw response body if this is an [`GancioError::Api`] error.
    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns `true` if the server answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}
