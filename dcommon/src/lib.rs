//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use dcommon::{Registry, SecretString};
//!
//! let mut registry = Registry::new();
//! registry.insert("deepseek".to_string(), 1_u32);
//! let key = SecretString::new("sk-test");
//!
//! assert_eq!(registry.get("deepseek"), Some(&1));
//! assert_eq!(format!("{key:?}"), "[REDACTED]");
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use dcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod secret {
    //! Credential wrapper that never prints its value.
    //!
    //! ```rust
    //! use dcommon::SecretString;
    //!
    //! let key = SecretString::new("hf_abc");
    //! assert_eq!(key.expose(), "hf_abc");
    //! assert!(!key.is_blank());
    //! ```

    use std::fmt::{Debug, Formatter};

    #[derive(Clone, PartialEq, Eq)]
    pub struct SecretString {
        value: String,
    }

    impl SecretString {
        pub fn new(value: impl Into<String>) -> Self {
            Self {
                value: value.into(),
            }
        }

        pub fn expose(&self) -> &str {
            self.value.as_str()
        }

        pub fn is_blank(&self) -> bool {
            self.value.trim().is_empty()
        }
    }

    impl Debug for SecretString {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str("[REDACTED]")
        }
    }

    impl Drop for SecretString {
        fn drop(&mut self) {
            // SAFETY: zero bytes are valid UTF-8.
            unsafe {
                self.value.as_mut_vec().fill(0);
            }
        }
    }
}

pub mod registry {
    //! Generic registry map wrapper used by runtime registries.
    //!
    //! Iteration follows key order so listings are stable across runs.
    //!
    //! ```rust
    //! use dcommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert("beta".to_string(), 2_u32);
    //! registry.insert("alpha".to_string(), 1_u32);
    //!
    //! assert!(registry.contains_key("alpha"));
    //! assert_eq!(registry.values().copied().collect::<Vec<_>>(), vec![1, 2]);
    //! ```

    use std::borrow::Borrow;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        items: BTreeMap<K, V>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Ord,
    {
        fn default() -> Self {
            Self {
                items: BTreeMap::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Ord,
    {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            self.items.insert(key, value)
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Ord + ?Sized,
        {
            self.items.get(key)
        }

        pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
        where
            K: Borrow<Q>,
            Q: Ord + ?Sized,
        {
            self.items.remove(key)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Ord + ?Sized,
        {
            self.items.contains_key(key)
        }

        pub fn keys(&self) -> impl Iterator<Item = &K> {
            self.items.keys()
        }

        pub fn values(&self) -> impl Iterator<Item = &V> {
            self.items.values()
        }

        pub fn len(&self) -> usize {
            self.items.len()
        }

        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }
    }
}

pub use future::BoxFuture;
pub use registry::Registry;
pub use secret::SecretString;
