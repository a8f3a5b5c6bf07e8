use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A survey question. Answers reference it by id without a foreign key.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Question {
    pub question_id: String,
    pub question_title: String,
    pub question_description: Option<String>,
    pub question_categories: Option<Vec<String>>,
    pub qrcode_url: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Question {
    /// Caller-defined categories with blanks removed; empty means "use the built-in list".
    pub fn categories(&self) -> Vec<String> {
        self.question_categories
            .iter()
            .flatten()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionCreate {
    pub question_title: String,
    pub question_description: Option<String>,
    pub question_categories: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct QuestionDeleted {
    pub message: String,
    pub deleted_answers: u64,
}
