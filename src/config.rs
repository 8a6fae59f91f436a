use std::time::Duration;

use chrono::{DateTime, Utc};
use starberry_core::http::cookie::SameSite;

use crate::cookie::CookieAttributes;
use crate::key::KeyPolicy;

/// Default key under which session data is attached to the request context.
pub const SESSION_CONTEXT_KEY: &str = "__starberry_session__";

/// When the session cookie is written to a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CookiePolicy {
    /// Only when the key was minted on this request. A returning client
    /// already holds the cookie.
    #[default]
    WhenNew,
    /// On every response, re-applying the configured attributes.
    Always,
}

/// Settings of the session middleware.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use starberry_core::http::cookie::SameSite;
/// use starberry_session::{CookiePolicy, SessionConfig};
///
/// let config = SessionConfig::new()
///     .with_cookie_name("sid")
///     .with_path("/")
///     .with_max_age(Duration::from_secs(3600))
///     .with_http_only(true)
///     .with_same_site(SameSite::Lax)
///     .with_cookie_policy(CookiePolicy::Always);
/// assert_eq!(config.cookie_name(), "sid");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionConfig {
    pub cookie: CookieAttributes,
    pub context_key: Option<String>,
    pub cookie_policy: CookiePolicy,
    pub key_policy: KeyPolicy,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie.name
    }

    pub fn context_key(&self) -> &str {
        self.context_key.as_deref().unwrap_or(SESSION_CONTEXT_KEY)
    }

    pub fn with_cookie_name<T: Into<String>>(mut self, name: T) -> Self {
        self.cookie.name = name.into();
        self
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.cookie.expires = Some(expires);
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.cookie.max_age = Some(max_age);
        self
    }

    pub fn with_path<T: Into<String>>(mut self, path: T) -> Self {
        self.cookie.path = Some(path.into());
        self
    }

    pub fn with_domain<T: Into<String>>(mut self, domain: T) -> Self {
        self.cookie.domain = Some(domain.into());
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.cookie.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.cookie.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.cookie.same_site = Some(same_site);
        self
    }

    pub fn with_cookie_attributes(mut self, cookie: CookieAttributes) -> Self {
        self.cookie = cookie;
        self
    }

    pub fn with_context_key<T: Into<String>>(mut self, context_key: T) -> Self {
        self.context_key = Some(context_key.into());
        self
    }

    pub fn with_cookie_policy(mut self, cookie_policy: CookiePolicy) -> Self {
        self.cookie_policy = cookie_policy;
        self
    }

    pub fn with_key_policy(mut self, key_policy: KeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }
}
