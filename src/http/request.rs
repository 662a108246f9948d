use std::collections::HashMap;

/// HTTP request methods.
///
/// The common verbs get their own variant; any other uppercase token is kept
/// verbatim in `Extension`. Method filtering is left to handlers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// Any other token, e.g. `PROPFIND`
    Extension(String),
}

/// A fully parsed HTTP request.
///
/// Produced only by a successful parse; a handler never sees a request with
/// missing parts. `params` is empty until the router fills it in.
#[derive(Debug, Clone)]
pub struct Request {
    /// The request method
    pub method: Method,
    /// Request target up to, not including, the first `?`
    pub path: String,
    /// Query string pairs, last value wins on duplicate keys
    pub query: HashMap<String, String>,
    /// Captures bound by the matching route pattern
    pub params: HashMap<String, String>,
    /// Header name to raw value, names as received, last line wins
    pub headers: HashMap<String, String>,
    /// Present only when `Content-Length` was sent
    pub body: Option<Vec<u8>>,
    /// Version token from the request line (typically "HTTP/1.1")
    pub version: String,
}

/// Builder for constructing Request objects.
#[derive(Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    target: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
}

impl Method {
    /// Parses a method token.
    ///
    /// Tokens are case-sensitive and must consist of uppercase ASCII letters,
    /// digits, `-` or `_`.
    ///
    /// # Example
    ///
    /// ```
    /// # use wireline::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("PURGE"), Some(Method::Extension("PURGE".into())));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let method = match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            _ if is_method_token(s) => Method::Extension(s.to_string()),
            _ => return None,
        };
        Some(method)
    }

    /// The method exactly as it appeared on the request line.
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Extension(token) => token,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_method_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Splits a request target into its path and raw query string.
pub fn split_target(target: &str) -> (&str, &str) {
    target.split_once('?').unwrap_or((target, ""))
}

/// Parses `a=1&b=2` into a map.
///
/// Pairs are split on their first `=`; a pair with no `=` at all is dropped.
/// No percent-decoding is done.
pub fn parse_query(qs: &str) -> HashMap<String, String> {
    qs.split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the request target; anything after `?` becomes the query.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let target = self.target.ok_or("target missing")?;
        let (path, qs) = split_target(&target);

        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: path.to_string(),
            query: parse_query(qs),
            params: HashMap::new(),
            headers: self.headers,
            body: self.body,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
        })
    }
}

impl Request {
    /// Retrieves a header value by exact name, surrounding whitespace trimmed.
    ///
    /// The `headers` map keeps the raw text after the colon; this accessor
    /// is the one to use for comparisons.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.trim())
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Body bytes, empty when no `Content-Length` was sent.
    pub fn body(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }

    /// Determines whether the connection should remain open after the response.
    ///
    /// `HTTP/1.0` always closes, as does `Connection: close` (any case).
    /// Everything else stays open.
    pub fn keep_alive(&self) -> bool {
        if self.version == "HTTP/1.0" {
            return false;
        }

        !self
            .header("Connection")
            .is_some_and(|v| v.eq_ignore_ascii_case("close"))
    }
}
