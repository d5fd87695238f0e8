use serde::{Deserialize, Serialize};

/// How a document's content reached the retrieval index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessType {
    /// Raw text submitted directly, no blob involved.
    Text,
    /// Image/video content extracted by the vision model, then indexed as text.
    Vision,
    /// Original file bytes handed to the retrieval backend's file path.
    Generic,
}

impl ProcessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessType::Text => "text",
            ProcessType::Vision => "vision",
            ProcessType::Generic => "generic",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "text" => Ok(ProcessType::Text),
            "vision" => Ok(ProcessType::Vision),
            "generic" => Ok(ProcessType::Generic),
            _ => Err(format!("Invalid process type: {}", s)),
        }
    }
}

impl std::fmt::Display for ProcessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
