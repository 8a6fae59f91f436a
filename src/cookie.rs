use std::time::Duration;

use chrono::{DateTime, Utc};
use starberry_core::http::cookie::{Cookie, SameSite};

use crate::error::{Result, SessionError};
use crate::key::SessionKey;

/// Default wire name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "bareASGI-session";

/// Format of the `Expires` attribute (IMF-fixdate).
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// The attributes written on every session `set-cookie` header.
///
/// Fixed when the middleware is built; only the key and, without a
/// configured domain, the request host vary between responses.
#[derive(Debug, Clone, PartialEq)]
pub struct CookieAttributes {
    pub name: String,
    pub expires: Option<DateTime<Utc>>,
    pub max_age: Option<Duration>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            name: SESSION_COOKIE_NAME.to_string(),
            expires: None,
            max_age: None,
            path: None,
            domain: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }
}

impl CookieAttributes {
    /// Picks the `Domain` attribute: the configured domain, else the
    /// request host. Browsers reject a `Domain` of `localhost`, so it is
    /// left out for that host.
    pub fn resolve_domain(&self, host: Option<&str>) -> Result<Option<String>> {
        if let Some(ref domain) = self.domain {
            return Ok(Some(domain.clone()));
        }
        let host = host.ok_or(SessionError::MissingHost)?;
        if is_localhost(host) {
            return Ok(None);
        }
        Ok(Some(host.to_string()))
    }

    /// Builds the session cookie carrying `key`.
    pub fn to_cookie(&self, key: &SessionKey, host: Option<&str>) -> Result<Cookie> {
        let mut cookie = Cookie::new(key.as_str())
            .secure(self.secure)
            .http_only(self.http_only);
        if let Some(expires) = self.expires {
            cookie.set_expires(expires.format(HTTP_DATE));
        }
        if let Some(max_age) = self.max_age {
            cookie.set_max_age(max_age.as_secs());
        }
        if let Some(ref path) = self.path {
            cookie.set_path(path);
        }
        if let Some(domain) = self.resolve_domain(host)? {
            cookie.set_domain(domain);
        }
        cookie.same_site = self.same_site;
        Ok(cookie)
    }

    /// Builds the `set-cookie` header value carrying `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use starberry_session::cookie::CookieAttributes;
    /// use starberry_session::key::SessionKey;
    ///
    /// let attributes = CookieAttributes { path: Some("/".into()), http_only: true, ..Default::default() };
    /// let header = attributes.create_cookie(&SessionKey::from("abc123"), Some("example.com")).unwrap();
    /// assert_eq!(header, "bareASGI-session=abc123; Path=/; Domain=example.com; HttpOnly");
    /// ```
    pub fn create_cookie(&self, key: &SessionKey, host: Option<&str>) -> Result<String> {
        Ok(self.to_cookie(key, host)?.to_set_cookie(&self.name))
    }
}

fn is_localhost(host: &str) -> bool {
    host == "localhost" || host.starts_with("localhost:")
}
