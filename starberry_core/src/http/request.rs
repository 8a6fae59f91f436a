use super::http_value::HttpMethod;
use super::meta::{HeaderList, HttpMeta};

/// Represents an HTTP request with metadata and body.
///
/// The request line is kept as method and path; everything else the
/// middlewares need lives in the header metadata.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub meta: HttpMeta,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new<P: Into<String>>(method: HttpMethod, path: P, meta: HttpMeta, body: Vec<u8>) -> Self {
        Self { method, path: path.into(), meta, body }
    }

    pub fn meta(&self) -> &HttpMeta {
        &self.meta
    }

    /// Adds a header, builder style.
    pub fn with_header<K: AsRef<str>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.meta.add_attribute(key, value);
        self
    }
}

impl Default for HttpRequest {
    fn default() -> Self {
        HttpRequest::new(HttpMethod::GET, "/", HttpMeta::new(HeaderList::new()), Vec::new())
    }
}

/// Collection of helper functions to easily create common HTTP requests.
pub mod request_templates {
    use super::HttpRequest;
    use crate::http::http_value::HttpMethod;
    use crate::http::meta::HttpMeta;

    pub fn get_request<T: Into<String>>(url: T) -> HttpRequest {
        HttpRequest::new(HttpMethod::GET, url, HttpMeta::default(), Vec::new())
    }
}
