use super::cookie::{Cookie, CookieMap};
use std::fmt;

/// An ordered list of header pairs.
///
/// Unlike a map this keeps every occurrence of a header in the order it was
/// added, which matters for headers such as `set-cookie` that may appear
/// more than once. Names are compared case-insensitively and stored
/// lower-cased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderList {
    entries: Vec<(String, String)>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Appends a header, keeping any existing header of the same name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use starberry_core::http::meta::HeaderList;
    ///
    /// let mut headers = HeaderList::new();
    /// headers.append("Set-Cookie", "a=1");
    /// headers.append("set-cookie", "b=2");
    /// assert_eq!(headers.get_all("set-cookie"), vec!["a=1", "b=2"]);
    /// ```
    pub fn append<K: AsRef<str>, V: Into<String>>(&mut self, name: K, value: V) {
        self.entries
            .push((name.as_ref().to_ascii_lowercase(), value.into()));
    }

    /// Replaces every header of this name with a single value. The new value
    /// takes the position of the first existing occurrence, or is appended.
    pub fn set<K: AsRef<str>, V: Into<String>>(&mut self, name: K, value: V) {
        let name = name.as_ref().to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter().position(|(n, _)| *n == name) {
            Some(first) => {
                self.entries[first].1 = value;
                let mut index = 0;
                self.entries.retain(|(n, _)| {
                    let keep = index <= first || *n != name;
                    index += 1;
                    keep
                });
            }
            None => self.entries.push((name, value)),
        }
    }

    /// Returns the first value of the header, if any.
    pub fn get<K: AsRef<str>>(&self, name: K) -> Option<&str> {
        let name = name.as_ref();
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value of the header in order.
    pub fn get_all<K: AsRef<str>>(&self, name: K) -> Vec<&str> {
        let name = name.as_ref();
        self.entries
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains<K: AsRef<str>>(&self, name: K) -> bool {
        self.get(name).is_some()
    }

    /// Removes every header of this name, returning how many were dropped.
    pub fn remove<K: AsRef<str>>(&mut self, name: K) -> usize {
        let name = name.as_ref();
        let before = self.entries.len();
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        before - self.entries.len()
    }

    /// Replaces the first header for which `predicate` holds with
    /// `name: value`, in place. If nothing matches the header is appended.
    /// Every other entry keeps its position and multiplicity.
    ///
    /// Returns `true` when an existing entry was replaced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use starberry_core::http::meta::HeaderList;
    ///
    /// let mut headers = HeaderList::new();
    /// headers.append("x-a", "1");
    /// headers.append("x-b", "2");
    /// let replaced = headers.upsert_by(|n, _| n == "x-a", "x-a", "9");
    /// assert!(replaced);
    /// assert_eq!(headers.iter().collect::<Vec<_>>(), vec![("x-a", "9"), ("x-b", "2")]);
    /// ```
    pub fn upsert_by<P, K, V>(&mut self, mut predicate: P, name: K, value: V) -> bool
    where
        P: FnMut(&str, &str) -> bool,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entry = (name.as_ref().to_ascii_lowercase(), value.into());
        match self.entries.iter().position(|(n, v)| predicate(n, v)) {
            Some(index) => {
                self.entries[index] = entry;
                true
            }
            None => {
                self.entries.push(entry);
                false
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderList {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = HeaderList::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

impl fmt::Display for HeaderList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            write!(f, "{}: {}\r\n", name, value)?;
        }
        Ok(())
    }
}

/// Header metadata of a request or response.
///
/// Cookies of a request are parsed lazily from the `cookie` header(s) and
/// cached until the headers are modified through this struct.
#[derive(Debug, Clone, Default)]
pub struct HttpMeta {
    pub header: HeaderList,

    // Parsed `cookie` header, request side only
    cookies: Option<CookieMap>,
}

impl HttpMeta {
    pub fn new(header: HeaderList) -> Self {
        Self { header, cookies: None }
    }

    pub fn get_header<T: AsRef<str>>(&self, key: T) -> Option<String> {
        self.header.get(key).map(str::to_string)
    }

    pub fn set_attribute<T: AsRef<str>, S: Into<String>>(&mut self, key: T, value: S) {
        self.clear_cookies();
        self.header.set(key, value);
    }

    pub fn add_attribute<T: AsRef<str>, S: Into<String>>(&mut self, key: T, value: S) {
        self.clear_cookies();
        self.header.append(key, value);
    }

    /// Gets the cookies sent with a request.
    ///
    /// Every `cookie` header is parsed; for a name appearing more than once
    /// the first value wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use starberry_core::http::meta::{HeaderList, HttpMeta};
    ///
    /// let mut meta = HttpMeta::new([("cookie", "sessionId=abc123; theme=dark")].into_iter().collect());
    /// assert_eq!(meta.get_cookies().get("theme").unwrap().get_value(), "dark");
    /// ```
    pub fn get_cookies(&mut self) -> &CookieMap {
        let header = &self.header;
        self.cookies.get_or_insert_with(|| {
            let mut cookies = CookieMap::new();
            for value in header.get_all("cookie") {
                cookies.extend_from_header(value);
            }
            cookies
        })
    }

    pub fn get_cookie<T: AsRef<str>>(&mut self, key: T) -> Option<Cookie> {
        self.get_cookies().get(key).cloned()
    }

    pub fn get_cookie_or_default<T: AsRef<str>>(&mut self, key: T) -> Cookie {
        self.get_cookie(key).unwrap_or_else(|| Cookie::new(""))
    }

    /// Invalidates the cached cookie map; the next lookup re-parses the headers.
    pub fn clear_cookies(&mut self) {
        self.cookies = None;
    }

    /// Appends a `set-cookie` header for `name`.
    pub fn add_cookie<T: AsRef<str>>(&mut self, name: T, cookie: Cookie) {
        self.header.append("set-cookie", cookie.to_set_cookie(name.as_ref()));
    }

    /// Decodes every `set-cookie` header of a response, in order.
    pub fn get_set_cookies(&self) -> Vec<(String, Cookie)> {
        self.header
            .get_all("set-cookie")
            .into_iter()
            .map(Cookie::parse_set_cookie)
            .collect()
    }

    /// Returns the `Host` header, if the client sent one.
    pub fn get_host(&self) -> Option<String> {
        self.get_header("host").map(|h| h.trim().to_string())
    }
}
