use crate::extensions::Locals;
use crate::http::cookie::{Cookie, CookieMap};
use crate::http::http_value::HttpMethod;
use crate::http::meta::HttpMeta;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;

/// The `HttpReqCtx` struct holds the context of a request while it travels
/// through the middleware chain to the endpoint and back.
///
/// `locals` are scoped to this request and dropped with it.
#[derive(Debug)]
pub struct HttpReqCtx {
    pub request: HttpRequest,
    pub response: HttpResponse,
    pub locals: Locals,
}

impl HttpReqCtx {
    /// Creates a new Request Context with a default response.
    pub fn new(request: HttpRequest) -> Self {
        Self {
            request,
            response: HttpResponse::default(),
            locals: Default::default(),
        }
    }

    /// Returns the meta in the request as reference
    pub fn meta(&mut self) -> &mut HttpMeta {
        &mut self.request.meta
    }

    pub fn path(&self) -> &str {
        &self.request.path
    }

    pub fn method(&self) -> HttpMethod {
        self.request.method
    }

    /// Get the full cookie map
    pub fn get_cookies(&mut self) -> &CookieMap {
        self.request.meta.get_cookies()
    }

    /// Get a single cookie
    pub fn get_cookie(&mut self, key: &str) -> Option<Cookie> {
        self.request.meta.get_cookie(key)
    }

    /// Get a cookie. If not found a default cookie will be returned
    pub fn get_cookie_or_default<T: AsRef<str>>(&mut self, key: T) -> Cookie {
        self.request.meta.get_cookie_or_default(key)
    }

    /// The `Host` header of the request
    pub fn get_host(&self) -> Option<String> {
        self.request.meta.get_host()
    }

    /// Consumes the context, keeping only the response
    pub fn into_response(self) -> HttpResponse {
        self.response
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::http::request::request_templates::get_request;

    #[test]
    fn cookies_and_host_come_from_request() {
        let request = get_request("/session")
            .with_header("Host", "example.com")
            .with_header("Cookie", "a=1");
        let mut ctx = HttpReqCtx::new(request);
        assert_eq!(ctx.path(), "/session");
        assert_eq!(ctx.method(), HttpMethod::GET);
        assert_eq!(ctx.get_host(), Some("example.com".to_string()));
        assert_eq!(ctx.get_cookie("a").unwrap().get_value(), "1");
        assert_eq!(ctx.get_cookie_or_default("b").get_value(), "");
    }

    #[test]
    fn new_context_has_empty_locals_and_default_response() {
        let ctx = HttpReqCtx::new(get_request("/"));
        assert!(ctx.locals.keys().is_empty());
        assert_eq!(ctx.response.status, crate::http::http_value::StatusCode::NOT_FOUND);
        assert_eq!(format!("{:?}", ctx.locals), "Locals { keys: [] }");
    }
}
