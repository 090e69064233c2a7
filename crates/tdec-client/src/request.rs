//! Request description passed to [`DecisionClient::execute`](crate::DecisionClient::execute).
//!
//! A request is plain data so the transport can send it twice (once more after
//! a re-login) without the caller rebuilding it.

use serde_json::Value;

/// HTTP methods the 3decision API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One API call: method, path (or absolute URL), query, extra headers, body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) target: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
    pub(crate) description: &'static str,
}

impl ApiRequest {
    /// `target` is either a path joined to the base URL (`/projects`) or an
    /// absolute `http(s)://` URL used as is.
    #[must_use]
    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::Get, target.into())
    }

    #[must_use]
    pub fn post(target: impl Into<String>) -> Self {
        Self::new(Method::Post, target.into())
    }

    const fn new(method: Method, target: String) -> Self {
        Self {
            method,
            target,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            description: "request",
        }
    }

    /// Append a query parameter; the value is percent-encoded when sent.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Set a header for this call only, replacing a session header of the
    /// same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Label used in logs.
    #[must_use]
    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether `target` bypasses the base URL.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        has_scheme(&self.target)
    }

    /// The URL this request is sent to, relative targets joined to `base_url`.
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        let mut url = if self.is_absolute() {
            self.target.clone()
        } else if self.target.starts_with('/') {
            format!("{base_url}{}", self.target)
        } else {
            format!("{base_url}/{}", self.target)
        };

        if !self.query.is_empty() {
            let encoded: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect();
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&encoded.join("&"));
        }
        url
    }
}

pub(crate) fn has_scheme(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
