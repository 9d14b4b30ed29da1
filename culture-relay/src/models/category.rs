//! Content categories controlling the storage layout

use serde::Serialize;

/// Declared classification of an upload
///
/// Anything outside the known set is `Unclassified` and shares a single
/// directory with every other unclassified upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    Annotation,
    Segment,
    Reconstruct,
    Unclassified,
}

impl ContentCategory {
    /// Classify the raw `type` form value (exact, case-sensitive match)
    pub fn classify(raw: &str) -> Self {
        match raw {
            "annotation" => ContentCategory::Annotation,
            "segment" => ContentCategory::Segment,
            "reconstruct" => ContentCategory::Reconstruct,
            _ => ContentCategory::Unclassified,
        }
    }

    /// Directory name under the upload root, `None` for the shared fallback
    pub fn dir_name(&self) -> Option<&'static str> {
        match self {
            ContentCategory::Annotation => Some("annotation"),
            ContentCategory::Segment => Some("segment"),
            ContentCategory::Reconstruct => Some("reconstruct"),
            ContentCategory::Unclassified => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories() {
        for (raw, expected) in [
            ("annotation", ContentCategory::Annotation),
            ("segment", ContentCategory::Segment),
            ("reconstruct", ContentCategory::Reconstruct),
        ] {
            let category = ContentCategory::classify(raw);
            assert_eq!(category, expected);
            assert_eq!(category.dir_name(), Some(raw));
        }
    }

    #[test]
    fn test_unknown_falls_back() {
        assert_eq!(ContentCategory::classify("Segment"), ContentCategory::Unclassified);
        assert_eq!(ContentCategory::classify(""), ContentCategory::Unclassified);
        assert_eq!(ContentCategory::Unclassified.dir_name(), None);
    }
}
