//! Cache keys and the filters used to select them.
//!
//! A key is an ordered list of parts, e.g. `["/api/news"]` for the news
//! collection and `["/api/news", 5]` for one article. List keys are
//! prefixes of their item keys, which is what lets one prefix filter
//! invalidate a resource family in a single call.

use std::fmt;

/// One segment of a [`QueryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyPart {
    Str(String),
    Int(i64),
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        KeyPart::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        KeyPart::Str(value)
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        KeyPart::Int(value)
    }
}

impl From<u32> for KeyPart {
    fn from(value: u32) -> Self {
        KeyPart::Int(i64::from(value))
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Str(s) => write!(f, "{s}"),
            KeyPart::Int(n) => write!(f, "{n}"),
        }
    }
}

/// Identity of one cache entry.
///
/// Equality is structural over the parts; two observers naming the same
/// parts share an entry and therefore share fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    pub fn new(parts: Vec<KeyPart>) -> Self {
        QueryKey(parts)
    }

    /// Single-part key, the usual shape for a collection endpoint.
    pub fn root(part: impl Into<KeyPart>) -> Self {
        QueryKey(vec![part.into()])
    }

    /// Extend the key with one more part.
    pub fn push(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    /// True when `prefix` matches the leading parts of this key.
    /// Every key is a prefix of itself.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0
    }
}

impl fmt::Display for QueryKey {
    // Keys read like paths in log lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in &self.0 {
            if !first {
                write!(f, "/")?;
            }
            write!(f, "{part}")?;
            first = false;
        }
        Ok(())
    }
}

/// Selects cache entries for invalidation.
#[derive(Debug, Clone)]
pub enum KeyFilter {
    /// Matches exactly one key.
    Exact(QueryKey),
    /// Matches every key the given key is a prefix of, itself included.
    Prefix(QueryKey),
}

impl KeyFilter {
    pub fn exact(key: QueryKey) -> Self {
        KeyFilter::Exact(key)
    }

    pub fn prefix(key: QueryKey) -> Self {
        KeyFilter::Prefix(key)
    }

    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            KeyFilter::Exact(wanted) => key == wanted,
            KeyFilter::Prefix(prefix) => key.starts_with(prefix),
        }
    }
}
