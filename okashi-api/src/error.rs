use okashi_http::HttpError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Everything that can stop a search before the result store sees it.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The keyword could not be turned into a query component; nothing was sent.
    #[error("keyword could not be percent-encoded: {0}")]
    Encoding(String),
    /// The request URL could not be assembled; nothing was sent.
    #[error("request URL could not be built: {0}")]
    RequestBuild(String),
    /// Connection, timeout or non-success HTTP status.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The body was not JSON or did not have the expected shape.
    #[error("response could not be decoded: {0}")]
    Decode(String),
}

/// Payload-free discriminant of [`SearchError`], cheap to copy into reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchErrorKind {
    Encoding,
    RequestBuild,
    Transport,
    Decode,
}

impl SearchError {
    pub fn kind(&self) -> SearchErrorKind {
        match self {
            SearchError::Encoding(_) => SearchErrorKind::Encoding,
            SearchError::RequestBuild(_) => SearchErrorKind::RequestBuild,
            SearchError::Transport(_) => SearchErrorKind::Transport,
            SearchError::Decode(_) => SearchErrorKind::Decode,
        }
    }
}

impl fmt::Display for SearchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SearchErrorKind::Encoding => "encoding",
            SearchErrorKind::RequestBuild => "request_build",
            SearchErrorKind::Transport => "transport",
            SearchErrorKind::Decode => "decode",
        };
        f.write_str(s)
    }
}

impl From<HttpError> for SearchError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Url(msg) | HttpError::Build(msg) => SearchError::RequestBuild(msg),
            HttpError::Network(msg) => SearchError::Transport(msg),
            HttpError::Api { status, message } => {
                SearchError::Transport(format!("HTTP {status}: {message}"))
            }
            HttpError::Decode(msg, _snippet) => SearchError::Decode(msg),
        }
    }
}
