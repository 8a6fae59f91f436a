use std::collections::HashMap;
use std::fmt;

/// Cookies sent by a client in the `cookie` request header, keyed by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CookieMap(pub HashMap<String, Cookie>);

impl CookieMap {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Parses a `cookie` request header into a Cookie Map.
    ///
    /// Pairs are separated by `;` and split on the first `=` only, so values
    /// may themselves contain `=`. When a name is repeated the first
    /// occurrence is kept. Pairs without a name are skipped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use starberry_core::http::cookie::CookieMap;
    ///
    /// let cookies = CookieMap::parse("theme=dark; token=YWJj==; theme=light");
    /// assert_eq!(cookies.get("theme").unwrap().get_value(), "dark");
    /// assert_eq!(cookies.get("token").unwrap().get_value(), "YWJj==");
    /// ```
    pub fn parse<T: AsRef<str>>(cookies: T) -> Self {
        let mut cookie_map = CookieMap::new();
        cookie_map.extend_from_header(cookies.as_ref());
        cookie_map
    }

    /// Parses one more `cookie` header into this map without overriding
    /// names that are already present.
    pub fn extend_from_header(&mut self, header: &str) {
        for pair in header.split(';') {
            let mut parts = pair.splitn(2, '=');
            let name = parts.next().unwrap_or("").trim();
            let Some(value) = parts.next() else { continue };
            if name.is_empty() {
                continue;
            }
            self.0
                .entry(name.to_string())
                .or_insert_with(|| Cookie::new(value.trim()));
        }
    }

    pub fn get<T: AsRef<str>>(&self, key: T) -> Option<&Cookie> {
        self.0.get(key.as_ref())
    }

    pub fn set<T: Into<String>>(&mut self, key: T, value: Cookie) {
        self.0.insert(key.into(), value);
    }

    pub fn remove<T: AsRef<str>>(&mut self, key: T) -> Option<Cookie> {
        self.0.remove(key.as_ref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for CookieMap {
    fn from(map: HashMap<String, String>) -> Self {
        let mut cookie_map = CookieMap::new();
        for (key, value) in map {
            cookie_map.set(key, Cookie::new(value));
        }
        cookie_map
    }
}

/// The `SameSite` attribute of a `set-cookie` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "strict" => Some(SameSite::Strict),
            "lax" => Some(SameSite::Lax),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cookie value together with the attributes of a `set-cookie` header.
/// The cookie name is kept outside, as the key of a `CookieMap` or as the
/// argument of `to_set_cookie`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cookie {
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub expires: Option<String>,
    pub max_age: Option<String>,
    pub secure: Option<bool>,
    pub http_only: Option<bool>,
    pub same_site: Option<SameSite>,
}

impl Cookie {
    /// Creates a new Cookie with the given value and no attributes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use starberry_core::http::cookie::Cookie;
    ///
    /// let cookie = Cookie::new("abc123").path("/").secure(true).http_only(true);
    /// assert_eq!(cookie.to_set_cookie("sid"), "sid=abc123; Path=/; Secure; HttpOnly");
    /// ```
    pub fn new<T: ToString>(value: T) -> Self {
        Self {
            value: value.to_string(),
            ..Default::default()
        }
    }

    /// Parses a `set-cookie` header value into a cookie name and Cookie object.
    ///
    /// Attribute names are matched case-insensitively and unknown attributes
    /// are ignored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use starberry_core::http::cookie::{Cookie, SameSite};
    ///
    /// let (name, cookie) = Cookie::parse_set_cookie("sid=abc123; Path=/; Secure; SameSite=Lax");
    /// assert_eq!(name, "sid");
    /// assert_eq!(cookie.get_value(), "abc123");
    /// assert_eq!(cookie.get_path(), Some("/".to_string()));
    /// assert_eq!(cookie.get_secure(), Some(true));
    /// assert_eq!(cookie.get_same_site(), Some(SameSite::Lax));
    /// ```
    pub fn parse_set_cookie(set_cookie_str: &str) -> (String, Self) {
        let mut attrs = set_cookie_str.split(';');

        let pair = attrs.next().unwrap_or("");
        let mut pair = pair.splitn(2, '=');
        let name = pair.next().unwrap_or("").trim().to_string();
        let mut cookie = Cookie::new(pair.next().unwrap_or("").trim());

        for attr in attrs {
            let attr = attr.trim();
            if attr.eq_ignore_ascii_case("Secure") {
                cookie.set_secure(true);
                continue;
            }
            if attr.eq_ignore_ascii_case("HttpOnly") {
                cookie.set_http_only(true);
                continue;
            }

            let mut kv = attr.splitn(2, '=');
            let (Some(attr_name), Some(attr_value)) = (kv.next(), kv.next()) else {
                continue;
            };
            let attr_value = attr_value.trim();
            match attr_name.trim().to_ascii_lowercase().as_str() {
                "path" => cookie.set_path(attr_value),
                "domain" => cookie.set_domain(attr_value),
                "expires" => cookie.set_expires(attr_value),
                "max-age" => cookie.set_max_age(attr_value),
                "samesite" => cookie.same_site = SameSite::parse(attr_value),
                _ => {}
            }
        }

        (name, cookie)
    }

    pub fn get_value(&self) -> &str {
        &self.value
    }

    pub fn set_value<T: ToString>(&mut self, value: T) {
        self.value = value.to_string();
    }

    pub fn path<T: ToString>(self, path: T) -> Self {
        Self { path: Some(path.to_string()), ..self }
    }

    pub fn get_path(&self) -> Option<String> {
        self.path.clone()
    }

    pub fn set_path<T: ToString>(&mut self, path: T) {
        self.path = Some(path.to_string());
    }

    pub fn domain<T: ToString>(self, domain: T) -> Self {
        Self { domain: Some(domain.to_string()), ..self }
    }

    pub fn get_domain(&self) -> Option<String> {
        self.domain.clone()
    }

    pub fn set_domain<T: ToString>(&mut self, domain: T) {
        self.domain = Some(domain.to_string());
    }

    pub fn expires<T: ToString>(self, expires: T) -> Self {
        Self { expires: Some(expires.to_string()), ..self }
    }

    pub fn get_expires(&self) -> Option<String> {
        self.expires.clone()
    }

    pub fn set_expires<T: ToString>(&mut self, expires: T) {
        self.expires = Some(expires.to_string());
    }

    pub fn max_age<T: ToString>(self, max_age: T) -> Self {
        Self { max_age: Some(max_age.to_string()), ..self }
    }

    pub fn get_max_age(&self) -> Option<String> {
        self.max_age.clone()
    }

    pub fn set_max_age<T: ToString>(&mut self, max_age: T) {
        self.max_age = Some(max_age.to_string());
    }

    pub fn secure(self, secure: bool) -> Self {
        Self { secure: Some(secure), ..self }
    }

    pub fn get_secure(&self) -> Option<bool> {
        self.secure
    }

    pub fn set_secure(&mut self, secure: bool) {
        self.secure = Some(secure);
    }

    pub fn http_only(self, http_only: bool) -> Self {
        Self { http_only: Some(http_only), ..self }
    }

    pub fn get_http_only(&self) -> Option<bool> {
        self.http_only
    }

    pub fn set_http_only(&mut self, http_only: bool) {
        self.http_only = Some(http_only);
    }

    pub fn same_site(self, same_site: SameSite) -> Self {
        Self { same_site: Some(same_site), ..self }
    }

    pub fn get_same_site(&self) -> Option<SameSite> {
        self.same_site
    }

    /// Builds the full `set-cookie` header value for this cookie under `name`.
    ///
    /// Attributes are written in the order Expires, Max-Age, Path, Domain,
    /// Secure, HttpOnly, SameSite. Flags set to `false` are omitted.
    pub fn to_set_cookie(&self, name: &str) -> String {
        format!("{}={}", name, self)
    }
}

/// Formats the value followed by its attributes, without the cookie name.
impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)?;
        if let Some(ref expires) = self.expires {
            write!(f, "; Expires={}", expires)?;
        }
        if let Some(ref max_age) = self.max_age {
            write!(f, "; Max-Age={}", max_age)?;
        }
        if let Some(ref path) = self.path {
            write!(f, "; Path={}", path)?;
        }
        if let Some(ref domain) = self.domain {
            write!(f, "; Domain={}", domain)?;
        }
        if self.secure == Some(true) {
            f.write_str("; Secure")?;
        }
        if self.http_only == Some(true) {
            f.write_str("; HttpOnly")?;
        }
        if let Some(same_site) = self.same_site {
            write!(f, "; SameSite={}", same_site)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_request_header() {
        let cookies = CookieMap::parse("a=1;b=2 ;  c = 3");
        assert_eq!(cookies.len(), 3);
        assert_eq!(cookies.get("c").unwrap().get_value(), "3");
    }

    #[test]
    fn parse_skips_malformed_pairs() {
        let cookies = CookieMap::parse("novalue; =orphan; ok=yes");
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies.get("ok").unwrap().get_value(), "yes");
    }

    #[test]
    fn parse_empty_value_is_kept() {
        let cookies = CookieMap::parse("empty=");
        assert_eq!(cookies.get("empty").unwrap().get_value(), "");
    }

    #[test]
    fn extend_keeps_first_value() {
        let mut cookies = CookieMap::parse("sid=first");
        cookies.extend_from_header("sid=second; other=x");
        assert_eq!(cookies.get("sid").unwrap().get_value(), "first");
        assert_eq!(cookies.get("other").unwrap().get_value(), "x");
    }

    #[test]
    fn set_cookie_with_every_attribute() {
        let cookie = Cookie::new("v")
            .expires("Sun, 06 Nov 1994 08:49:37 GMT")
            .max_age(60)
            .path("/")
            .domain("example.com")
            .secure(true)
            .http_only(true)
            .same_site(SameSite::Strict);
        assert_eq!(
            cookie.to_set_cookie("n"),
            "n=v; Expires=Sun, 06 Nov 1994 08:49:37 GMT; Max-Age=60; Path=/; Domain=example.com; Secure; HttpOnly; SameSite=Strict"
        );
    }

    #[test]
    fn false_flags_are_omitted() {
        let cookie = Cookie::new("v").secure(false).http_only(false);
        assert_eq!(cookie.to_set_cookie("n"), "n=v");
    }

    #[test]
    fn parse_set_cookie_reads_back_attributes() {
        let header = Cookie::new("abc")
            .max_age(10)
            .domain("example.org")
            .http_only(true)
            .to_set_cookie("sid");
        let (name, cookie) = Cookie::parse_set_cookie(&header);
        assert_eq!(name, "sid");
        assert_eq!(cookie.get_max_age(), Some("10".to_string()));
        assert_eq!(cookie.get_domain(), Some("example.org".to_string()));
        assert_eq!(cookie.get_http_only(), Some(true));
        assert_eq!(cookie.get_secure(), None);
    }

    #[test]
    fn parse_set_cookie_tolerates_garbage() {
        let (name, cookie) = Cookie::parse_set_cookie("justtext");
        assert_eq!(name, "justtext");
        assert_eq!(cookie.get_value(), "");
    }
}
