use std::{any::Any, collections::HashMap, fmt};

/// String-based extension storage scoped to one request.
///
/// Values are still typed: a lookup with the wrong type returns `None`
/// instead of handing out a value of another type stored under the same key.
#[derive(Default)]
pub struct Locals {
    inner: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Locals {
    /// Stores a value under `key`, replacing whatever was there.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use starberry_core::extensions::Locals;
    ///
    /// let mut locals = Locals::default();
    /// locals.set("user_id", 123u32);
    /// assert_eq!(locals.get::<u32>("user_id"), Some(&123));
    /// assert_eq!(locals.get::<String>("user_id"), None);
    /// ```
    pub fn set<T: 'static + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.inner.insert(key.into(), Box::new(value));
    }

    pub fn get<T: 'static + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.inner
            .get(key)
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    pub fn get_mut<T: 'static + Send + Sync>(&mut self, key: &str) -> Option<&mut T> {
        self.inner
            .get_mut(key)
            .and_then(|boxed| boxed.downcast_mut::<T>())
    }

    /// Removes and returns the value under `key` if it has type `T`.
    /// A value of another type is left in place.
    pub fn take<T: 'static + Send + Sync>(&mut self, key: &str) -> Option<T> {
        if !self.inner.get(key).is_some_and(|boxed| boxed.is::<T>()) {
            return None;
        }
        self.inner
            .remove(key)
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.inner.keys().map(|s| s.as_str()).collect()
    }
}

impl fmt::Debug for Locals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.keys();
        f.debug_struct("Locals").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct User {
        id: u32,
    }

    #[test]
    fn locals_take_wrong_type_keeps_value() {
        let mut l = Locals::default();
        l.set("k", User { id: 3 });
        assert_eq!(l.take::<String>("k"), None);
        assert!(l.contains("k"));
        assert_eq!(l.take::<User>("k"), Some(User { id: 3 }));
        assert!(!l.contains("k"));
    }

    #[test]
    fn locals_get_mut() {
        let mut l = Locals::default();
        l.set("items", vec![1u8]);
        l.get_mut::<Vec<u8>>("items").unwrap().push(2);
        assert_eq!(l.get::<Vec<u8>>("items"), Some(&vec![1, 2]));
    }
}
