//! Topic taxonomy from TOML (`[[topics]]` tables)
//!
//! When no `[[topics]]` table is present the built-in taxonomy is used.

use quorum_domain::{TopicRule, TopicTaxonomy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTopicConfig {
    pub label: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

pub fn to_taxonomy(topics: &[FileTopicConfig]) -> TopicTaxonomy {
    if topics.is_empty() {
        return TopicTaxonomy::default();
    }
    TopicTaxonomy::new(
        topics
            .iter()
            .map(|t| TopicRule::new(t.label.trim().to_lowercase(), t.keywords.iter().map(|k| k.trim())))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_uses_builtin_taxonomy() {
        assert_eq!(to_taxonomy(&[]), TopicTaxonomy::default());
    }

    #[test]
    fn test_custom_topics() {
        let taxonomy = to_taxonomy(&[FileTopicConfig {
            label: "Law".to_string(),
            keywords: vec![" Statute ".to_string()],
        }]);
        assert_eq!(taxonomy.topics.len(), 1);
        assert_eq!(taxonomy.topics[0].label, "law");
        assert_eq!(taxonomy.topics[0].keywords, vec!["statute".to_string()]);
    }
}
