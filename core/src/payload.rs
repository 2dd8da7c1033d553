//! Payload generation for bulk runs

use std::collections::HashMap;

/// Generates the field map for a given request index
///
/// Implementations must be callable concurrently from all workers and must
/// return the same key set for every index within a single run, so that the
/// encoder behaves consistently across requests.
pub trait PayloadSource: Send + Sync {
    /// Produce the field → value map for request `index`
    fn payload(&self, index: usize) -> HashMap<String, String>;
}

impl<F> PayloadSource for F
where
    F: Fn(usize) -> HashMap<String, String> + Send + Sync,
{
    fn payload(&self, index: usize) -> HashMap<String, String> {
        self(index)
    }
}

/// Payload source backed by per-field wordlists
///
/// Request `i` takes line `i % len` from each field's list, so shorter lists
/// wrap around. An empty list yields an empty string for its field.
#[derive(Debug, Clone, Default)]
pub struct WordlistSource {
    lists: HashMap<String, Vec<String>>,
}

impl WordlistSource {
    /// Create a source from field → lines mappings
    pub fn new(lists: HashMap<String, Vec<String>>) -> Self {
        Self { lists }
    }

    /// Length of the shortest list, 0 when there are no fields
    pub fn min_len(&self) -> usize {
        self.lists.values().map(Vec::len).min().unwrap_or(0)
    }

    /// Number of fields
    pub fn field_count(&self) -> usize {
        self.lists.len()
    }
}

impl PayloadSource for WordlistSource {
    fn payload(&self, index: usize) -> HashMap<String, String> {
        self.lists
            .iter()
            .map(|(field, list)| {
                let value = if list.is_empty() {
                    String::new()
                } else {
                    list[index % list.len()].clone()
                };
                (field.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists() -> HashMap<String, Vec<String>> {
        let mut lists = HashMap::new();
        lists.insert(
            "email".to_string(),
            vec!["a@x".to_string(), "b@x".to_string(), "c@x".to_string()],
        );
        lists.insert("pwd".to_string(), vec!["p1".to_string(), "p2".to_string()]);
        lists
    }

    #[test]
    fn test_wordlist_cycling() {
        let source = WordlistSource::new(lists());

        let p0 = source.payload(0);
        assert_eq!(p0["email"], "a@x");
        assert_eq!(p0["pwd"], "p1");

        // pwd has two entries, so index 2 wraps
        let p2 = source.payload(2);
        assert_eq!(p2["email"], "c@x");
        assert_eq!(p2["pwd"], "p1");

        let p3 = source.payload(3);
        assert_eq!(p3["email"], "a@x");
        assert_eq!(p3["pwd"], "p2");
    }

    #[test]
    fn test_wordlist_min_len() {
        let source = WordlistSource::new(lists());
        assert_eq!(source.min_len(), 2);
        assert_eq!(WordlistSource::default().min_len(), 0);
    }

    #[test]
    fn test_empty_list_yields_empty_value() {
        let mut lists = HashMap::new();
        lists.insert("token".to_string(), Vec::new());
        let source = WordlistSource::new(lists);
        assert_eq!(source.payload(7)["token"], "");
    }

    #[test]
    fn test_closure_source() {
        let source = |i: usize| {
            let mut fields = HashMap::new();
            fields.insert("user".to_string(), format!("u{i}"));
            fields
        };
        assert_eq!(PayloadSource::payload(&source, 4)["user"], "u4");
    }
}
