//! Lenient, read-only access into loosely shaped JSON payloads.
//!
//! Server payloads vary by emitter: the same entity ID may sit under
//! `incident._id`, `incidentId` or `id`, and numbers sometimes arrive as
//! strings. Lookups take dotted paths and try alternatives in order; a
//! miss is `None`, never an error.

use serde_json::Value as JsonValue;

use super::Timestamp;

#[derive(Debug, Clone, Copy)]
pub struct PayloadReader<'a> {
    root: &'a JsonValue,
}

impl<'a> PayloadReader<'a> {
    pub fn new(root: &'a JsonValue) -> Self {
        Self { root }
    }

    pub fn is_object(&self) -> bool {
        self.root.is_object()
    }

    /// Value at a dotted path (`"incident.reportedBy.name"`).
    pub fn value(&self, path: &str) -> Option<&'a JsonValue> {
        path.split('.')
            .try_fold(self.root, |node, key| node.get(key))
            .filter(|v| !v.is_null())
    }

    /// Non-blank string at the first path that has one.
    pub fn text(&self, paths: &[&str]) -> Option<String> {
        paths.iter().find_map(|path| {
            self.value(path)
                .and_then(JsonValue::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
    }

    /// Identifier at the first path that has one; numbers are accepted.
    pub fn id(&self, paths: &[&str]) -> Option<String> {
        paths.iter().find_map(|path| match self.value(path)? {
            JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Number at the first path that has one; numeric strings are accepted.
    pub fn number(&self, paths: &[&str]) -> Option<f64> {
        paths.iter().find_map(|path| match self.value(path)? {
            JsonValue::Number(n) => n.as_f64(),
            JsonValue::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn boolean(&self, paths: &[&str]) -> Option<bool> {
        paths
            .iter()
            .find_map(|path| self.value(path).and_then(JsonValue::as_bool))
    }

    /// RFC 3339 timestamp at the first path that parses.
    pub fn timestamp(&self, paths: &[&str]) -> Option<Timestamp> {
        paths.iter().find_map(|path| {
            self.value(path)
                .and_then(JsonValue::as_str)
                .and_then(Timestamp::parse)
        })
    }

    /// Length of the array at the first path holding one.
    pub fn array_len(&self, paths: &[&str]) -> Option<usize> {
        paths
            .iter()
            .find_map(|path| self.value(path).and_then(JsonValue::as_array).map(Vec::len))
    }
}
