use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A session's title is derived from its first query, bounded to this many
/// characters before an ellipsis is appended.
pub const TITLE_MAX_CHARS: usize = 50;

pub const DEFAULT_TITLE: &str = "New conversation";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    id: Uuid,
    title: String,
    kb_id: Option<Uuid>,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(kb_id: Option<Uuid>, user_id: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: DEFAULT_TITLE.to_string(),
            kb_id,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_parts(
        id: Uuid,
        title: String,
        kb_id: Option<Uuid>,
        user_id: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            kb_id,
            user_id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kb_id(&self) -> Option<Uuid> {
        self.kb_id
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }
}

/// Derive a session title from its first query.
pub fn title_from_query(query: &str) -> String {
    let chars: Vec<char> = query.chars().collect();
    if chars.len() > TITLE_MAX_CHARS {
        let truncated: String = chars[..TITLE_MAX_CHARS].iter().collect();
        format!("{}...", truncated)
    } else {
        query.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_query_is_used_verbatim() {
        assert_eq!(title_from_query("What color is the sky?"), "What color is the sky?");
    }

    #[test]
    fn test_long_query_is_truncated_with_ellipsis() {
        let query = "z".repeat(80);
        let title = title_from_query(&query);
        assert_eq!(title, format!("{}...", "z".repeat(TITLE_MAX_CHARS)));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let query = "日".repeat(60);
        let title = title_from_query(&query);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
    }

    #[test]
    fn test_new_session_has_placeholder_title() {
        let session = ChatSession::new(None, 1);
        assert_eq!(session.title(), DEFAULT_TITLE);
    }
}
