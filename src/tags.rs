//! Run-wide tag set supplied on the command line.
//!
//! Every pair arrives as a single `key=value` token. The token is split on the
//! first `=` only, so values may themselves contain `=`. Keys and values are
//! trimmed and must be non-empty, and a key may appear at most once per run.

use thiserror::Error;

/// Rejected `key=value` token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("tag must be in format 'key=value', got: {0}")]
    MalformedPair(String),

    #[error("tag key cannot be empty")]
    EmptyKey,

    #[error("tag value cannot be empty")]
    EmptyValue,

    #[error("tag key '{0}' already provided")]
    DuplicateKey(String),
}

/// Ordered, append-only collection of tags to stamp onto every metric.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    pairs: Vec<(String, String)>,
}

impl TagSet {
    /// Create an empty tag set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tag set from `key=value` tokens, stopping at the first bad one.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, TagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for pair in pairs {
            set.add(pair.as_ref())?;
        }
        Ok(set)
    }

    /// Parse and store one `key=value` token.
    ///
    /// On error the set is left untouched.
    pub fn add(&mut self, pair: &str) -> Result<(), TagError> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| TagError::MalformedPair(pair.to_string()))?;

        let key = key.trim();
        let value = value.trim();

        if key.is_empty() {
            return Err(TagError::EmptyKey);
        }
        if value.is_empty() {
            return Err(TagError::EmptyValue);
        }
        if self.contains_key(key) {
            return Err(TagError::DuplicateKey(key.to_string()));
        }

        self.pairs.push((key.to_string(), value.to_string()));
        Ok(())
    }

    /// Tags in the order they were added
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_valid_pair() {
        let mut tags = TagSet::new();
        tags.add("key=value").unwrap();
        assert_eq!(tags.get("key"), Some("value"));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn add_trims_key_and_value() {
        let mut tags = TagSet::new();
        tags.add(" key = value ").unwrap();
        assert_eq!(tags.get("key"), Some("value"));
    }

    #[test]
    fn add_splits_on_first_equals_only() {
        let mut tags = TagSet::new();
        tags.add("query=a=b").unwrap();
        assert_eq!(tags.get("query"), Some("a=b"));
    }

    #[test]
    fn add_without_equals_is_malformed() {
        let mut tags = TagSet::new();
        for input in ["keyvalue", "key value", ""] {
            assert_eq!(
                tags.add(input),
                Err(TagError::MalformedPair(input.to_string()))
            );
        }
        assert!(tags.is_empty());
    }

    #[test]
    fn add_empty_key_fails() {
        let mut tags = TagSet::new();
        assert_eq!(tags.add("=value"), Err(TagError::EmptyKey));
        assert_eq!(tags.add("   =value"), Err(TagError::EmptyKey));
        assert!(tags.is_empty());
    }

    #[test]
    fn add_empty_value_fails() {
        let mut tags = TagSet::new();
        assert_eq!(tags.add("key="), Err(TagError::EmptyValue));
        assert_eq!(tags.add("key=  "), Err(TagError::EmptyValue));
        assert!(tags.is_empty());
    }

    #[test]
    fn add_duplicate_key_fails_even_with_new_value() {
        let mut tags = TagSet::new();
        tags.add("env=prod").unwrap();
        assert_eq!(
            tags.add(" env =test"),
            Err(TagError::DuplicateKey("env".to_string()))
        );
        assert_eq!(tags.get("env"), Some("prod"));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn entries_keep_insertion_order() {
        let tags = TagSet::from_pairs(["region=eu", "env=dev", "build=1.2.3"]).unwrap();
        let keys: Vec<&str> = tags.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["region", "env", "build"]);
    }

    #[test]
    fn from_pairs_stops_at_first_error() {
        let err = TagSet::from_pairs(["env=dev", "bogus", "region=eu"]).unwrap_err();
        assert_eq!(err, TagError::MalformedPair("bogus".to_string()));
    }

    #[test]
    fn error_messages_name_the_problem() {
        assert_eq!(
            TagError::MalformedPair("abc".into()).to_string(),
            "tag must be in format 'key=value', got: abc"
        );
        assert_eq!(
            TagError::DuplicateKey("env".into()).to_string(),
            "tag key 'env' already provided"
        );
    }
}
