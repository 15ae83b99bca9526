//! Keyword encoding and request URL assembly.
//!
//! The keyword is escaped with the RFC 3986 unreserved set, so query
//! delimiters such as `&`, `#`, `=` and spaces never leak into the URL
//! structure.
use crate::error::SearchError;
use std::borrow::Cow;
use std::fmt;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://sysbird.jp/toriko/api/";
pub const DEFAULT_API_KEY: &str = "guest";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_ORDER: &str = "r";

/// Caller-supplied search text, kept as raw bytes until it is encoded.
#[derive(Clone, PartialEq, Eq)]
pub struct SearchKeyword(Vec<u8>);

impl SearchKeyword {
    /// Percent-encode for use as a query value. Fails for non-UTF-8 input.
    pub fn encode(&self) -> Result<Cow<'_, str>, SearchError> {
        let text = std::str::from_utf8(&self.0)
            .map_err(|e| SearchError::Encoding(format!("keyword is not valid UTF-8: {e}")))?;
        Ok(urlencoding::encode(text))
    }
}

impl fmt::Display for SearchKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for SearchKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SearchKeyword({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl From<&str> for SearchKeyword {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for SearchKeyword {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&String> for SearchKeyword {
    fn from(s: &String) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<&[u8]> for SearchKeyword {
    fn from(b: &[u8]) -> Self {
        Self(b.to_vec())
    }
}

impl From<Vec<u8>> for SearchKeyword {
    fn from(b: Vec<u8>) -> Self {
        Self(b)
    }
}

/// Fixed request shape: `<endpoint>?apikey=..&format=json&keyword=..&max=..&order=..`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    endpoint: Url,
    apikey: String,
    max: u32,
    order: String,
}

impl Default for QueryTemplate {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            apikey: DEFAULT_API_KEY.into(),
            max: DEFAULT_PAGE_SIZE,
            order: DEFAULT_ORDER.into(),
        }
    }
}

impl QueryTemplate {
    pub fn new(endpoint: Url, apikey: impl Into<String>, max: u32, order: impl Into<String>) -> Self {
        Self {
            endpoint,
            apikey: apikey.into(),
            max,
            order: order.into(),
        }
    }

    /// Same defaults, different endpoint (mirrors, local test servers).
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Assemble the request URL for `keyword`.
    ///
    /// ```
    /// use okashi_api::{QueryTemplate, SearchKeyword};
    ///
    /// let url = QueryTemplate::default()
    ///     .request_url(&SearchKeyword::from("pocky sticks"))
    ///     .unwrap();
    /// assert_eq!(
    ///     url.as_str(),
    ///     "https://sysbird.jp/toriko/api/?apikey=guest&format=json&keyword=pocky%20sticks&max=10&order=r"
    /// );
    /// ```
    pub fn request_url(&self, keyword: &SearchKeyword) -> Result<Url, SearchError> {
        let encoded = keyword.encode()?;

        match self.endpoint.scheme() {
            "http" | "https" => {}
            other => {
                return Err(SearchError::RequestBuild(format!(
                    "unsupported endpoint scheme: {other}"
                )));
            }
        }

        let mut base = self.endpoint.clone();
        base.set_query(None);
        base.set_fragment(None);

        let raw = format!(
            "{base}?apikey={}&format=json&keyword={encoded}&max={}&order={}",
            urlencoding::encode(&self.apikey),
            self.max,
            urlencoding::encode(&self.order),
        );
        Url::parse(&raw).map_err(|e| SearchError::RequestBuild(format!("{e}: {raw}")))
    }
}
