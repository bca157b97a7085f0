//! Session payload data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reserved payload key holding the session's own identifier.
///
/// Written by the session manager on every `set`; clients should treat it
/// as read-only.
pub const SESSION_ID_KEY: &str = "uuid";

/// Ordered string→string session data.
///
/// Logically owned by whichever session manager last wrote it. The inner
/// map is ordered so the encoded form is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionPayload {
    entries: BTreeMap<String, String>,
}

impl SessionPayload {
    /// Create an empty payload.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Get a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set a value, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Remove a value by key.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// The session identifier recorded under [`SESSION_ID_KEY`], if any.
    ///
    /// Returns the raw string form; parsing is the caller's concern.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.get(SESSION_ID_KEY)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the payload holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for SessionPayload {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}

impl<K, V> FromIterator<(K, V)> for SessionPayload
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
