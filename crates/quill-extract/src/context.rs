//! Extraction context over a buffered request.

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use quill_router::Params;

/// Everything an extractor may need from a request: method, URI, headers,
/// the fully buffered body, and the route's path parameters.
///
/// # Example
///
/// ```rust
/// use quill_extract::ExtractionContext;
/// use quill_router::Params;
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let mut params = Params::new();
/// params.push("story_id", "s-1");
///
/// let ctx = ExtractionContext::new(
///     Method::GET,
///     Uri::from_static("/stories/s-1"),
///     HeaderMap::new(),
///     Bytes::new(),
///     params,
/// );
///
/// assert_eq!(ctx.path(), "/stories/s-1");
/// assert_eq!(ctx.path_params().get("story_id"), Some("s-1"));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
}

impl ExtractionContext {
    /// Creates a new extraction context.
    #[must_use]
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        path_params: Params,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            path_params,
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the buffered request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the extracted path parameters.
    #[must_use]
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Whether the request body is empty.
    #[must_use]
    pub fn is_body_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Builder for constructing an [`ExtractionContext`], mostly used by the
/// server glue and by tests.
#[derive(Debug, Default)]
pub struct ExtractionContextBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
}

impl ExtractionContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Sets the headers wholesale.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single header. Invalid values are dropped.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the path parameters wholesale.
    #[must_use]
    pub fn path_params(mut self, params: Params) -> Self {
        self.path_params = params;
        self
    }

    /// Adds a single path parameter.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push(name, value);
        self
    }

    /// Builds the extraction context.
    ///
    /// # Panics
    ///
    /// Panics if method or uri were not set.
    #[must_use]
    pub fn build(self) -> ExtractionContext {
        ExtractionContext {
            method: self.method.expect("method is required"),
            uri: self.uri.expect("uri is required"),
            headers: self.headers,
            body: self.body,
            path_params: self.path_params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_accessors() {
        let mut params = Params::new();
        params.push("story_id", "s-1");

        let ctx = ExtractionContext::new(
            Method::GET,
            Uri::from_static("/stories/s-1?fields=id,title"),
            HeaderMap::new(),
            Bytes::new(),
            params,
        );

        assert_eq!(ctx.method(), &Method::GET);
        assert_eq!(ctx.path(), "/stories/s-1");
        assert_eq!(ctx.query_string(), Some("fields=id,title"));
        assert_eq!(ctx.path_params().get("story_id"), Some("s-1"));
        assert!(ctx.is_body_empty());
    }

    #[test]
    fn test_builder() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .uri(Uri::from_static("/stories"))
            .header("content-type", "application/json")
            .header("authorization", "Bearer token-1")
            .body(r#"{"title": "The Lighthouse"}"#)
            .build();

        assert_eq!(ctx.content_type(), Some("application/json"));
        assert_eq!(ctx.header("authorization"), Some("Bearer token-1"));
        assert!(!ctx.is_body_empty());
    }
}
