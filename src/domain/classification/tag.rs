use serde::{Deserialize, Serialize};

/// Type assigned to an intake by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationTag {
    Pdf,
    Text,
    Txt,
    Html,
    Htm,
    Image,
    Document,
    Unknown,
}

impl ClassificationTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Text => "text",
            Self::Txt => "txt",
            Self::Html => "html",
            Self::Htm => "htm",
            Self::Image => "image",
            Self::Document => "document",
            Self::Unknown => "unknown",
        }
    }

    /// Map a lowercased file extension to a tag
    ///
    /// `doc` and `docx` have no tag of their own and land on `Document`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Txt),
            "html" => Some(Self::Html),
            "htm" => Some(Self::Htm),
            "doc" | "docx" => Some(Self::Document),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClassificationTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_serialization() {
        assert_eq!(
            serde_json::to_string(&ClassificationTag::Pdf).unwrap(),
            "\"pdf\""
        );
        assert_eq!(
            serde_json::to_string(&ClassificationTag::Unknown).unwrap(),
            "\"unknown\""
        );
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(ClassificationTag::from_extension("htm"), Some(ClassificationTag::Htm));
        assert_eq!(
            ClassificationTag::from_extension("docx"),
            Some(ClassificationTag::Document)
        );
        assert_eq!(ClassificationTag::from_extension("exe"), None);
    }
}
