use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// The state of one session: string keys mapped to arbitrary JSON values.
///
/// A fresh session is empty. Handlers mutate it in place through the
/// request context; the middleware saves it once the handler returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionData(HashMap<String, Value>);

impl SessionData {
    pub fn new() -> Self {
        SessionData(HashMap::new())
    }

    pub fn from_hash(map: HashMap<String, Value>) -> Self {
        SessionData(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Reads `key` as a typed value. A missing key is `Ok(None)`; a value of
    /// the wrong shape is an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use starberry_session::SessionData;
    ///
    /// let mut session = SessionData::new();
    /// session.set_as("visits", &3u32).unwrap();
    /// assert_eq!(session.get_as::<u32>("visits").unwrap(), Some(3));
    /// assert_eq!(session.get_as::<u32>("missing").unwrap(), None);
    /// ```
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.0.get(key) {
            Some(value) => Ok(Some(T::deserialize(value)?)),
            None => Ok(None),
        }
    }

    /// Serializes `value` and stores it under `key`.
    pub fn set_as<K: Into<String>, T: Serialize + ?Sized>(&mut self, key: K, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.0.insert(key.into(), value);
        Ok(())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn into_inner(self) -> HashMap<String, Value> {
        self.0
    }
}

impl From<HashMap<String, Value>> for SessionData {
    fn from(map: HashMap<String, Value>) -> Self {
        SessionData(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for SessionData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        SessionData(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Cart {
        items: Vec<String>,
    }

    #[test]
    fn typed_values_round_trip() {
        let mut session = SessionData::new();
        let cart = Cart { items: vec!["apple".to_string()] };
        session.set_as("cart", &cart).unwrap();
        assert_eq!(session.get("cart"), Some(&json!({ "items": ["apple"] })));
        assert_eq!(session.get_as::<Cart>("cart").unwrap(), Some(cart));
    }

    #[test]
    fn wrong_shape_is_an_error() {
        let mut session = SessionData::new();
        session.insert("count", "not a number");
        assert!(session.get_as::<u64>("count").is_err());
    }

    #[test]
    fn serializes_as_plain_object() {
        let session: SessionData = [("count", 1)].into_iter().collect();
        assert_eq!(serde_json::to_value(&session).unwrap(), json!({ "count": 1 }));
        let back: SessionData = serde_json::from_value(json!({ "count": 1 })).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn insert_returns_previous() {
        let mut session = SessionData::new();
        assert_eq!(session.insert("a", 1), None);
        assert_eq!(session.insert("a", 2), Some(json!(1)));
        assert_eq!(session.remove("a"), Some(json!(2)));
        assert!(session.is_empty());
    }
}
