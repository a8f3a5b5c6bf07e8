use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Answer {
    pub answer_id: i32,
    pub question_id: String,
    pub answer_text: String,
    pub category: String,
    pub submitter_name: Option<String>,
    pub submitter_code: Option<String>,
    pub submitter_department: Option<String>,
    /// Comma-separated, at most three.
    pub answer_keywords: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerCreate {
    pub question_id: String,
    pub answer_text: String,
    pub submitter_name: Option<String>,
    pub submitter_code: Option<String>,
    pub submitter_department: Option<String>,
}

/// Category and keywords computed before insert.
#[derive(Debug, Clone)]
pub struct NewAnswer<'a> {
    pub input: &'a AnswerCreate,
    pub category: String,
    pub keywords: Vec<String>,
}
