//! Normalized query parameters.
//!
//! Hosts hand the engine an ordered list of raw `(key, value)` pairs.
//! Bracket syntax (`filter[age]`) and dotted syntax (`filter.age`) are
//! equivalent on the wire; normalization happens once at ingest so every
//! interpreter only ever sees the dotted form. Re-serialization for link
//! text converts back to bracket syntax.

/// Reserved query-parameter prefixes known to all interpreters
pub mod prefix {
    pub const FILTER: &str = "filter";
    pub const SORT: &str = "sort";
    pub const PAGE_NUMBER: &str = "page.number";
    pub const PAGE_SIZE: &str = "page.size";
    pub const FIELDS: &str = "fields";
    pub const INCLUDE: &str = "include";
}

/// Ordered multimap of normalized query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw pairs, normalizing bracket keys to dotted form
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (normalize_key(k.as_ref()), v.into()))
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First value for an exact normalized key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All `(sub-key, value)` pairs under `prefix.` in arrival order
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.entries.iter().filter_map(move |(k, v)| {
            k.strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('.'))
                .map(|sub| (sub, v.as_str()))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Re-serialize every originally-present parameter with the page-number
    /// parameter rewritten to `page` (appended when absent). Dotted keys go
    /// back to bracket syntax for the link text.
    pub fn query_string_with_page(&self, page: usize) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.entries.len() + 1);
        let mut page_written = false;
        for (key, value) in &self.entries {
            if key == prefix::PAGE_NUMBER {
                if !page_written {
                    parts.push(format!("{}={}", bracketize(key), page));
                    page_written = true;
                }
            } else {
                parts.push(format!("{}={}", bracketize(key), urlencoding::encode(value)));
            }
        }
        if !page_written {
            parts.push(format!("{}={}", bracketize(prefix::PAGE_NUMBER), page));
        }
        format!("?{}", parts.join("&"))
    }
}

/// `filter[age]` -> `filter.age`; already-dotted keys pass through
fn normalize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for ch in key.chars() {
        match ch {
            '[' => out.push('.'),
            ']' => {}
            other => out.push(other),
        }
    }
    out
}

/// `filter.age` -> `filter[age]`; each dotted segment gets its own brackets
fn bracketize(key: &str) -> String {
    let mut segments = key.split('.');
    let Some(head) = segments.next() else {
        return String::new();
    };
    let mut out = head.to_string();
    for segment in segments {
        out.push('[');
        out.push_str(segment);
        out.push(']');
    }
    out
}
