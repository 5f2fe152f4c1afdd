//! User metadata carried on stored objects.
//!
//! The upstream ingestion component attaches `userid` and `imageid` keys to
//! uploaded objects. Casing is not guaranteed (`UserId` / `ImageId` occur in
//! the wild), so lookups are case-insensitive. Metadata is propagated to the
//! output object unchanged; only the content type is recomputed.

use std::collections::HashMap;

/// String-to-string metadata map for a stored object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata(HashMap<String, String>);

impl ObjectMetadata {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Case-insensitive lookup by key name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Consume into the underlying map (for handing to SDK builders).
    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl From<HashMap<String, String>> for ObjectMetadata {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_get() {
        let mut metadata = ObjectMetadata::new();
        metadata.insert("UserId", "u1");
        metadata.insert("imageid", "img1");

        assert_eq!(metadata.get("userid"), Some("u1"));
        assert_eq!(metadata.get("USERID"), Some("u1"));
        assert_eq!(metadata.get("ImageId"), Some("img1"));
        assert_eq!(metadata.get("missing"), None);
    }

    #[test]
    fn test_from_map() {
        let mut map = HashMap::new();
        map.insert("userid".to_string(), "u1".to_string());
        let metadata = ObjectMetadata::from(map);
        assert_eq!(metadata.get("userid"), Some("u1"));
    }
}
