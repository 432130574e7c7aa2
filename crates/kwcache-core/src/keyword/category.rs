//! Category classification strategies.
//!
//! The category of a keyword is derived from the name of its subcategory.
//! The derivation lives behind [`CategoryClassifier`] so the naming
//! convention can change without touching the pipeline.

/// Derives a category letter from a subcategory name.
///
/// Implementations may return letters outside the known set; the
/// transformer rejects those records individually.
pub trait CategoryClassifier: Send + Sync {
    fn classify(&self, subcategory_name: &str) -> String;
}

/// Prefix-based classification: `"A-..."` maps to `A`, and so on.
#[derive(Debug, Clone)]
pub struct PrefixClassifier {
    rules: Vec<(String, String)>,
    default: String,
}

impl PrefixClassifier {
    /// Build a classifier from `(prefix, category)` rules and a fallback category.
    ///
    /// The longest matching prefix wins.
    pub fn new(rules: impl IntoIterator<Item = (String, String)>, default: impl Into<String>) -> Self {
        let mut rules: Vec<(String, String)> = rules.into_iter().collect();
        rules.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self {
            rules,
            default: default.into(),
        }
    }
}

impl Default for PrefixClassifier {
    fn default() -> Self {
        Self::new(
            [
                ("A-".to_string(), "A".to_string()),
                ("B-".to_string(), "B".to_string()),
                ("C-".to_string(), "C".to_string()),
            ],
            "A",
        )
    }
}

impl CategoryClassifier for PrefixClassifier {
    fn classify(&self, subcategory_name: &str) -> String {
        self.rules
            .iter()
            .find(|(prefix, _)| subcategory_name.starts_with(prefix.as_str()))
            .map(|(_, category)| category.clone())
            .unwrap_or_else(|| self.default.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefixes() {
        let c = PrefixClassifier::default();
        assert_eq!(c.classify("A-core"), "A");
        assert_eq!(c.classify("B-tools"), "B");
        assert_eq!(c.classify("C-misc"), "C");
    }

    #[test]
    fn test_unrecognized_prefix_defaults_to_a() {
        let c = PrefixClassifier::default();
        assert_eq!(c.classify("X-special"), "A");
        assert_eq!(c.classify(""), "A");
        // Prefix match is case sensitive
        assert_eq!(c.classify("b-lower"), "A");
    }

    #[test]
    fn test_longest_prefix_wins() {
        let c = PrefixClassifier::new(
            [
                ("B-".to_string(), "B".to_string()),
                ("B-legacy".to_string(), "C".to_string()),
            ],
            "A",
        );
        assert_eq!(c.classify("B-legacy-api"), "C");
        assert_eq!(c.classify("B-api"), "B");
    }
}
