use super::cookie::Cookie;
use super::http_value::StatusCode;
use super::meta::HttpMeta;

/// An HTTP response produced by an endpoint and rewritten by middlewares
/// on its way out.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub meta: HttpMeta,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new<B: Into<Vec<u8>>>(status: StatusCode, meta: HttpMeta, body: B) -> Self {
        Self { status, meta, body: body.into() }
    }

    pub fn add_header<K: AsRef<str>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.meta.add_attribute(key, value);
        self
    }

    /// Appends a `set-cookie` header for `name`.
    pub fn add_cookie<T: AsRef<str>>(mut self, name: T, cookie: Cookie) -> Self {
        self.meta.add_cookie(name, cookie);
        self
    }

    pub fn set_content_length(mut self) -> Self {
        let length = self.body.len();
        self.meta.set_attribute("content-length", length.to_string());
        self
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        response_templates::return_status(StatusCode::NOT_FOUND)
    }
}

pub mod response_templates {
    use super::HttpResponse;
    use crate::http::http_value::StatusCode;
    use crate::http::meta::HttpMeta;

    pub fn normal_response<B: Into<Vec<u8>>>(status_code: StatusCode, body: B) -> HttpResponse {
        HttpResponse::new(status_code, HttpMeta::default(), body)
    }

    pub fn text_response<B: Into<Vec<u8>>>(body: B) -> HttpResponse {
        normal_response(StatusCode::OK, body)
            .add_header("content-type", "text/plain")
            .set_content_length()
    }

    pub fn return_status(status_code: StatusCode) -> HttpResponse {
        normal_response(status_code, Vec::new())
    }
}
