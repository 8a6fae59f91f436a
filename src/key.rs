use std::fmt;

use starberry_core::http::cookie::CookieMap;
use uuid::Uuid;

/// Longest cookie value accepted as a session key under `KeyPolicy::Strict`.
pub const MAX_STRICT_KEY_LEN: usize = 128;

/// An opaque token identifying one session.
///
/// Keys minted by this crate are random UUID v4 values in simple form
/// (32 lowercase hex characters). Keys read back from a cookie are used
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    /// Mints a fresh random key.
    pub fn generate() -> Self {
        SessionKey(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for SessionKey {
    fn from(key: &str) -> Self {
        SessionKey(key.to_string())
    }
}

impl From<String> for SessionKey {
    fn from(key: String) -> Self {
        SessionKey(key)
    }
}

impl AsRef<str> for SessionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How much a session key presented by a client is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Any ASCII cookie value is used verbatim as the storage key, the
    /// empty string included.
    #[default]
    Opaque,
    /// Only values of 1 to `MAX_STRICT_KEY_LEN` characters from
    /// `[A-Za-z0-9_-]` are accepted; anything else is treated as if no
    /// cookie was sent and a new key is minted.
    Strict,
}

impl KeyPolicy {
    pub fn accepts(&self, value: &str) -> bool {
        if !value.is_ascii() {
            return false;
        }
        match self {
            KeyPolicy::Opaque => true,
            KeyPolicy::Strict => {
                !value.is_empty()
                    && value.len() <= MAX_STRICT_KEY_LEN
                    && value
                        .bytes()
                        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
            }
        }
    }
}

/// The outcome of looking up the session cookie on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub key: SessionKey,
    /// `true` when no usable cookie was sent and `key` was minted here.
    pub is_new: bool,
}

/// Picks the session key for a request from its cookies.
///
/// # Examples
///
/// ```rust
/// use starberry_core::http::cookie::CookieMap;
/// use starberry_session::key::{resolve_session_key, KeyPolicy};
///
/// let cookies = CookieMap::parse("bareASGI-session=abc123");
/// let resolved = resolve_session_key(&cookies, "bareASGI-session", KeyPolicy::Opaque);
/// assert_eq!(resolved.key.as_str(), "abc123");
/// assert!(!resolved.is_new);
///
/// let resolved = resolve_session_key(&CookieMap::new(), "bareASGI-session", KeyPolicy::Opaque);
/// assert!(resolved.is_new);
/// ```
pub fn resolve_session_key(cookies: &CookieMap, cookie_name: &str, policy: KeyPolicy) -> ResolvedKey {
    match cookies.get(cookie_name).map(|c| c.get_value()) {
        Some(value) if policy.accepts(value) => ResolvedKey {
            key: SessionKey::from(value),
            is_new: false,
        },
        _ => ResolvedKey {
            key: SessionKey::generate(),
            is_new: true,
        },
    }
}
