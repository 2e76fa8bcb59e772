//! Content classifier
//!
//! Classification is an ordered list of rules evaluated first-match-wins:
//! binary signatures, then the printable-text heuristic, then the file
//! extension, then `unknown`.

use std::path::Path;

use super::tag::ClassificationTag;

/// Number of leading bytes inspected for binary signatures
pub const SIGNATURE_WINDOW: usize = 8;

/// Minimum share of printable characters for a buffer to count as text
pub const DEFAULT_PRINTABLE_RATIO: f64 = 0.8;

/// Known binary signatures as hex prefixes, in evaluation order
pub const SIGNATURES: &[(&str, ClassificationTag)] = &[
    ("25504446", ClassificationTag::Pdf),
    ("89504e47", ClassificationTag::Image),
    ("ffd8", ClassificationTag::Image),
    ("d0cf11e0", ClassificationTag::Document),
    ("504b0304", ClassificationTag::Document),
];

/// Extensions accepted by default for the extension fallback
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["pdf", "txt", "html", "htm", "doc", "docx"];

/// A single classification rule
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationRule {
    /// Hex-encoded prefix of the first bytes
    Signature {
        hex_prefix: &'static str,
        tag: ClassificationTag,
    },
    /// Valid UTF-8 with no NUL byte and a printable ratio above `min_ratio`
    PrintableText { min_ratio: f64 },
    /// Lowercased file extension, when it is in the allowed list
    Extension { allowed: Vec<String> },
}

impl ClassificationRule {
    /// Evaluate the rule, returning a tag on match
    pub fn evaluate(&self, buffer: &[u8], file_name: Option<&str>) -> Option<ClassificationTag> {
        match self {
            Self::Signature { hex_prefix, tag } => {
                let window = &buffer[..buffer.len().min(SIGNATURE_WINDOW)];
                hex::encode(window)
                    .starts_with(hex_prefix)
                    .then_some(*tag)
            }
            Self::PrintableText { min_ratio } => {
                is_printable_text(buffer, *min_ratio).then_some(ClassificationTag::Text)
            }
            Self::Extension { allowed } => {
                let ext = file_extension(file_name?)?;

                if !allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext)) {
                    return None;
                }

                ClassificationTag::from_extension(&ext)
            }
        }
    }
}

/// Ordered rule list mapping a buffer to a [`ClassificationTag`]
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<ClassificationRule>,
}

impl Classifier {
    /// Build the standard rule list with the given extension allow-list
    pub fn new<I, S>(allowed_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules: Vec<ClassificationRule> = SIGNATURES
            .iter()
            .map(|&(hex_prefix, tag)| ClassificationRule::Signature { hex_prefix, tag })
            .collect();

        rules.push(ClassificationRule::PrintableText {
            min_ratio: DEFAULT_PRINTABLE_RATIO,
        });
        rules.push(ClassificationRule::Extension {
            allowed: allowed_extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        });

        Self { rules }
    }

    /// Build a classifier from an explicit rule list
    pub fn with_rules(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Classify a buffer; the first matching rule wins
    pub fn classify(&self, buffer: &[u8], file_name: Option<&str>) -> ClassificationTag {
        self.rules
            .iter()
            .find_map(|rule| rule.evaluate(buffer, file_name))
            .unwrap_or(ClassificationTag::Unknown)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_EXTENSIONS)
    }
}

/// Check whether a buffer reads as plain text
pub fn is_printable_text(buffer: &[u8], min_ratio: f64) -> bool {
    if buffer.contains(&0) {
        return false;
    }

    let Ok(text) = std::str::from_utf8(buffer) else {
        return false;
    };

    let mut total = 0usize;
    let mut printable = 0usize;

    for c in text.chars() {
        total += 1;

        if matches!(c, ' '..='~') || c.is_ascii_whitespace() {
            printable += 1;
        }
    }

    if total == 0 {
        return false;
    }

    (printable as f64 / total as f64) > min_ratio
}

/// Lowercased extension of a file name, without the dot
pub fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(buffer: &[u8], name: Option<&str>) -> ClassificationTag {
        Classifier::default().classify(buffer, name)
    }

    #[test]
    fn test_signature_wins_over_extension() {
        let pdf = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        assert_eq!(classify(pdf, Some("notes.txt")), ClassificationTag::Pdf);

        let png = [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00];
        assert_eq!(classify(&png, Some("report.pdf")), ClassificationTag::Image);

        let jpeg = [0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10];
        assert_eq!(classify(&jpeg, None), ClassificationTag::Image);
    }

    #[test]
    fn test_office_signatures_are_documents() {
        let ole = [0xd0, 0xcf, 0x11, 0xe0, 0xa1, 0xb1, 0x1a, 0xe1];
        assert_eq!(classify(&ole, Some("legacy.doc")), ClassificationTag::Document);

        let zip = [0x50, 0x4b, 0x03, 0x04, 0x14, 0x00, 0x06, 0x00];
        assert_eq!(classify(&zip, Some("cv.docx")), ClassificationTag::Document);
    }

    #[test]
    fn test_printable_text_ignores_extension() {
        let text = b"Name: Jane Doe\nRole: Engineer\n";
        assert_eq!(classify(text, Some("resume.docx")), ClassificationTag::Text);
        assert_eq!(classify(text, None), ClassificationTag::Text);
    }

    #[test]
    fn test_null_byte_disqualifies_text() {
        let text = b"hello\0world";
        assert_eq!(classify(text, None), ClassificationTag::Unknown);
        assert_eq!(classify(text, Some("page.HTML")), ClassificationTag::Html);
    }

    #[test]
    fn test_low_printable_ratio_falls_through() {
        let mostly_accents = "ééééééééé a".as_bytes();
        assert_eq!(classify(mostly_accents, None), ClassificationTag::Unknown);
        assert_eq!(classify(mostly_accents, Some("x.txt")), ClassificationTag::Txt);
    }

    #[test]
    fn test_invalid_utf8_uses_extension() {
        let bytes = [0xc3, 0x28, 0xa0, 0xa1];
        assert_eq!(classify(&bytes, Some("scan.pdf")), ClassificationTag::Pdf);
        assert_eq!(classify(&bytes, Some("scan.exe")), ClassificationTag::Unknown);
        assert_eq!(classify(&bytes, Some("old.doc")), ClassificationTag::Document);
    }

    #[test]
    fn test_empty_buffer_is_not_text() {
        assert_eq!(classify(b"", None), ClassificationTag::Unknown);
        assert_eq!(classify(b"", Some("empty.txt")), ClassificationTag::Txt);
    }

    #[test]
    fn test_extension_respects_allow_list() {
        let classifier = Classifier::new(&["pdf"]);
        let bytes = [0xfe, 0xfe, 0xfe];
        assert_eq!(
            classifier.classify(&bytes, Some("page.html")),
            ClassificationTag::Unknown
        );
        assert_eq!(
            classifier.classify(&bytes, Some("page.PDF")),
            ClassificationTag::Pdf
        );
    }

    #[test]
    fn test_rule_order_is_data() {
        let classifier = Classifier::default();
        let rules = classifier.rules();

        assert_eq!(rules.len(), SIGNATURES.len() + 2);
        assert!(matches!(rules[0], ClassificationRule::Signature { .. }));
        assert!(matches!(
            rules[SIGNATURES.len()],
            ClassificationRule::PrintableText { .. }
        ));
        assert!(matches!(
            rules[SIGNATURES.len() + 1],
            ClassificationRule::Extension { .. }
        ));
    }

    #[test]
    fn test_custom_rules_change_precedence() {
        let classifier = Classifier::with_rules(vec![
            ClassificationRule::Extension {
                allowed: vec!["txt".to_string()],
            },
            ClassificationRule::Signature {
                hex_prefix: "25504446",
                tag: ClassificationTag::Pdf,
            },
        ]);

        assert_eq!(
            classifier.classify(b"%PDF-1.4", Some("a.txt")),
            ClassificationTag::Txt
        );
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Report.PDF"), Some("pdf".to_string()));
        assert_eq!(file_extension("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension("trailing."), None);
    }

    #[test]
    fn test_is_printable_text_threshold() {
        assert!(is_printable_text(b"plain ascii\twith\r\nwhitespace", 0.8));
        assert!(!is_printable_text(&[0xff, 0xfe], 0.8));
    }
}
