use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Uploading,
    Parsing,
    Indexed,
    Failed(String),
}

impl DocumentStatus {
    pub fn is_uploading(&self) -> bool {
        matches!(self, DocumentStatus::Uploading)
    }

    pub fn is_parsing(&self) -> bool {
        matches!(self, DocumentStatus::Parsing)
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, DocumentStatus::Indexed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DocumentStatus::Failed(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Indexed | DocumentStatus::Failed(_))
    }

    pub fn can_transition_to(&self, new_status: &DocumentStatus) -> bool {
        match (self, new_status) {
            (DocumentStatus::Uploading, DocumentStatus::Parsing) => true,
            (DocumentStatus::Parsing, DocumentStatus::Indexed) => true,
            (DocumentStatus::Parsing, DocumentStatus::Failed(_)) => true,
            _ => false,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            DocumentStatus::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Uploading => "uploading",
            DocumentStatus::Parsing => "parsing",
            DocumentStatus::Indexed => "indexed",
            // Keep the stored status short, the error lives in error_message
            DocumentStatus::Failed(_) => "failed",
        }
    }

    pub fn from_parts(status: &str, error_message: Option<&str>) -> Result<Self, String> {
        match status.to_lowercase().as_str() {
            "uploading" => Ok(DocumentStatus::Uploading),
            "parsing" => Ok(DocumentStatus::Parsing),
            "indexed" => Ok(DocumentStatus::Indexed),
            "failed" => Ok(DocumentStatus::Failed(
                error_message.unwrap_or("Unknown error").to_string(),
            )),
            _ => Err(format!("Invalid document status: {}", status)),
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_checks() {
        let uploading = DocumentStatus::Uploading;
        let parsing = DocumentStatus::Parsing;
        let indexed = DocumentStatus::Indexed;
        let failed = DocumentStatus::Failed("error".to_string());

        assert!(uploading.is_uploading());
        assert!(parsing.is_parsing());
        assert!(indexed.is_indexed());
        assert!(failed.is_failed());

        assert!(!uploading.is_terminal());
        assert!(!parsing.is_terminal());
        assert!(indexed.is_terminal());
        assert!(failed.is_terminal());
    }

    #[test]
    fn test_transitions_are_monotonic() {
        let uploading = DocumentStatus::Uploading;
        let parsing = DocumentStatus::Parsing;
        let indexed = DocumentStatus::Indexed;
        let failed = DocumentStatus::Failed("error".to_string());

        assert!(uploading.can_transition_to(&parsing));
        assert!(parsing.can_transition_to(&indexed));
        assert!(parsing.can_transition_to(&failed));

        // No path revisits an earlier or terminal state
        assert!(!uploading.can_transition_to(&indexed));
        assert!(!uploading.can_transition_to(&failed));
        assert!(!parsing.can_transition_to(&uploading));
        assert!(!indexed.can_transition_to(&parsing));
        assert!(!indexed.can_transition_to(&failed));
        assert!(!failed.can_transition_to(&parsing));
        assert!(!failed.can_transition_to(&indexed));
    }

    #[test]
    fn test_error_message() {
        let failed = DocumentStatus::Failed("indexing timed out".to_string());
        assert_eq!(failed.error_message(), Some("indexing timed out"));
        assert_eq!(DocumentStatus::Indexed.error_message(), None);
    }

    #[test]
    fn test_string_round_trip() {
        let statuses = vec![
            DocumentStatus::Uploading,
            DocumentStatus::Parsing,
            DocumentStatus::Indexed,
        ];

        for status in statuses {
            let parsed = DocumentStatus::from_parts(status.as_str(), None).unwrap();
            assert_eq!(status, parsed);
        }

        let failed = DocumentStatus::from_parts("failed", Some("boom")).unwrap();
        assert_eq!(failed, DocumentStatus::Failed("boom".to_string()));
    }

    #[test]
    fn test_invalid_status_string() {
        assert!(DocumentStatus::from_parts("queued", None).is_err());
    }
}
