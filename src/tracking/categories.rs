use std::fmt::Display;

use serde::{Deserialize, Serialize};

const DEFAULT_PRODUCTIVE: [&str; 12] = [
    "leetcode.com",
    "geeksforgeeks.org",
    "codeforces.com",
    "github.com",
    "stackOverflow.com",
    "kaggle.com",
    "codechef.com",
    "coursera.org",
    "udemy.com",
    "w3schools.com",
    "developer.mozilla.org",
    "docs.python.org",
];

const DEFAULT_UNPRODUCTIVE: [&str; 8] = [
    "instagram.com",
    "facebook.com",
    "twitter.com",
    "x.com",
    "tiktok.com",
    "reddit.com",
    "youtube.com",
    "netflix.com",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Productive,
    Unproductive,
    Neutral,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Productive => write!(f, "productive"),
            Category::Unproductive => write!(f, "unproductive"),
            Category::Neutral => write!(f, "neutral"),
        }
    }
}

/// User editable suffix patterns. Order is kept as given, although it doesn't affect
/// classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryList {
    #[serde(default)]
    pub productive: Vec<String>,
    #[serde(default)]
    pub unproductive: Vec<String>,
}

impl CategoryList {
    /// Lists written on first start.
    pub fn builtin() -> Self {
        Self {
            productive: DEFAULT_PRODUCTIVE.iter().map(|v| v.to_string()).collect(),
            unproductive: DEFAULT_UNPRODUCTIVE.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Productive patterns are checked first, so a domain present in both lists is productive.
    ///
    /// Matching is a raw string suffix test: `ample.com` matches `example.com`. Patterns are not
    /// normalized either, so `stackOverflow.com` never matches a lowercase domain.
    pub fn classify(&self, domain: &str) -> Category {
        let matches = |patterns: &[String]| patterns.iter().any(|p| domain.ends_with(p.as_str()));
        if matches(&self.productive) {
            Category::Productive
        } else if matches(&self.unproductive) {
            Category::Unproductive
        } else {
            Category::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, CategoryList};

    fn list(productive: &[&str], unproductive: &[&str]) -> CategoryList {
        CategoryList {
            productive: productive.iter().map(|v| v.to_string()).collect(),
            unproductive: unproductive.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn test_builtin_classification() {
        let categories = CategoryList::builtin();
        assert_eq!(categories.classify("leetcode.com"), Category::Productive);
        assert_eq!(categories.classify("gist.github.com"), Category::Productive);
        assert_eq!(categories.classify("instagram.com"), Category::Unproductive);
        assert_eq!(categories.classify("wikipedia.org"), Category::Neutral);
    }

    #[test]
    fn test_productive_wins_when_both_match() {
        let categories = list(&["youtube.com"], &["youtube.com", "tube.com"]);
        assert_eq!(categories.classify("youtube.com"), Category::Productive);
        assert_eq!(categories.classify("mytube.com"), Category::Unproductive);
    }

    #[test]
    fn test_suffix_match_is_not_label_aware() {
        let categories = list(&["ample.com"], &[]);
        assert_eq!(categories.classify("example.com"), Category::Productive);
    }

    #[test]
    fn test_patterns_are_compared_verbatim() {
        let categories = CategoryList::builtin();
        assert_eq!(categories.classify("stackoverflow.com"), Category::Neutral);
    }

    #[test]
    fn test_empty_lists_classify_everything_as_neutral() {
        let categories = CategoryList::default();
        assert_eq!(categories.classify("github.com"), Category::Neutral);
        assert_eq!(categories.classify(""), Category::Neutral);
    }

    #[test]
    fn test_serialized_shape() {
        let categories = list(&["a.com"], &["b.com"]);
        assert_eq!(
            serde_json::to_value(&categories).unwrap(),
            serde_json::json!({ "productive": ["a.com"], "unproductive": ["b.com"] })
        );
        assert_eq!(
            serde_json::to_value(Category::Unproductive).unwrap(),
            serde_json::json!("unproductive")
        );
    }
}
