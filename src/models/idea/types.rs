use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Free-text columns of `idea_tank`, in storage order.
pub const TEXT_FIELDS: [&str; 18] = [
    "idea_code",
    "category_idea_type1",
    "idea_inno_type",
    "idea_name",
    "idea_subject",
    "idea_source",
    "customer_target",
    "idea_detail",
    "idea_finance_impact",
    "idea_nonfinance_impact",
    "idea_status",
    "idea_owner_empcode",
    "idea_owner_empname",
    "idea_owner_deposit",
    "idea_owner_contacts",
    "idea_keywords",
    "idea_comment",
    "idea_summary_byai",
];

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Idea {
    pub idea_seq: i32,
    pub idea_code: Option<String>,
    pub category_idea_type1: Option<String>,
    pub idea_inno_type: Option<String>,
    pub idea_name: Option<String>,
    pub idea_subject: Option<String>,
    pub idea_source: Option<String>,
    pub customer_target: Option<String>,
    pub idea_detail: Option<String>,
    pub idea_finance_impact: Option<String>,
    pub idea_nonfinance_impact: Option<String>,
    pub idea_status: Option<String>,
    pub idea_owner_empcode: Option<String>,
    pub idea_owner_empname: Option<String>,
    pub idea_owner_deposit: Option<String>,
    pub idea_owner_contacts: Option<String>,
    pub idea_keywords: Option<String>,
    pub idea_comment: Option<String>,
    pub idea_summary_byai: Option<String>,
    pub idea_score: Option<f64>,
    pub idea_score_comment: Option<String>,
    pub create_datetime: NaiveDateTime,
    pub update_datetime: NaiveDateTime,
}

/// Body of create, replace and patch requests. Absent fields are `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdeaInput {
    pub idea_code: Option<String>,
    pub category_idea_type1: Option<String>,
    pub idea_inno_type: Option<String>,
    pub idea_name: Option<String>,
    pub idea_subject: Option<String>,
    pub idea_source: Option<String>,
    pub customer_target: Option<String>,
    pub idea_detail: Option<String>,
    pub idea_finance_impact: Option<String>,
    pub idea_nonfinance_impact: Option<String>,
    pub idea_status: Option<String>,
    pub idea_owner_empcode: Option<String>,
    pub idea_owner_empname: Option<String>,
    pub idea_owner_deposit: Option<String>,
    pub idea_owner_contacts: Option<String>,
    pub idea_keywords: Option<String>,
    pub idea_comment: Option<String>,
    pub idea_summary_byai: Option<String>,
}

impl IdeaInput {
    /// Column/value pairs in `TEXT_FIELDS` order.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 18] {
        [
            ("idea_code", self.idea_code.as_deref()),
            ("category_idea_type1", self.category_idea_type1.as_deref()),
            ("idea_inno_type", self.idea_inno_type.as_deref()),
            ("idea_name", self.idea_name.as_deref()),
            ("idea_subject", self.idea_subject.as_deref()),
            ("idea_source", self.idea_source.as_deref()),
            ("customer_target", self.customer_target.as_deref()),
            ("idea_detail", self.idea_detail.as_deref()),
            ("idea_finance_impact", self.idea_finance_impact.as_deref()),
            ("idea_nonfinance_impact", self.idea_nonfinance_impact.as_deref()),
            ("idea_status", self.idea_status.as_deref()),
            ("idea_owner_empcode", self.idea_owner_empcode.as_deref()),
            ("idea_owner_empname", self.idea_owner_empname.as_deref()),
            ("idea_owner_deposit", self.idea_owner_deposit.as_deref()),
            ("idea_owner_contacts", self.idea_owner_contacts.as_deref()),
            ("idea_keywords", self.idea_keywords.as_deref()),
            ("idea_comment", self.idea_comment.as_deref()),
            ("idea_summary_byai", self.idea_summary_byai.as_deref()),
        ]
    }

    /// Set a field by column name; unknown names are ignored.
    pub fn set(&mut self, column: &str, value: String) {
        let slot = match column {
            "idea_code" => &mut self.idea_code,
            "category_idea_type1" => &mut self.category_idea_type1,
            "idea_inno_type" => &mut self.idea_inno_type,
            "idea_name" => &mut self.idea_name,
            "idea_subject" => &mut self.idea_subject,
            "idea_source" => &mut self.idea_source,
            "customer_target" => &mut self.customer_target,
            "idea_detail" => &mut self.idea_detail,
            "idea_finance_impact" => &mut self.idea_finance_impact,
            "idea_nonfinance_impact" => &mut self.idea_nonfinance_impact,
            "idea_status" => &mut self.idea_status,
            "idea_owner_empcode" => &mut self.idea_owner_empcode,
            "idea_owner_empname" => &mut self.idea_owner_empname,
            "idea_owner_deposit" => &mut self.idea_owner_deposit,
            "idea_owner_contacts" => &mut self.idea_owner_contacts,
            "idea_keywords" => &mut self.idea_keywords,
            "idea_comment" => &mut self.idea_comment,
            "idea_summary_byai" => &mut self.idea_summary_byai,
            _ => return,
        };
        *slot = Some(value);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdeaSearch {
    pub keyword: Option<String>,
}

/// Outcome of a spreadsheet import.
#[derive(Debug, Default, Serialize)]
pub struct ImportResult {
    pub imported_count: usize,
    pub errors: Vec<String>,
}

/// Ad-hoc scoring of text that is not stored.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub system_prompt: String,
    pub idea_name: String,
    pub idea_detail: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScoreOneRequest {
    pub system_prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BatchScoreRequest {
    pub system_prompt: Option<String>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub clear_scores: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct BatchScoreResult {
    pub processed_count: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ScoresCleared {
    pub message: String,
    pub cleared_count: u64,
}

#[derive(Debug, Serialize)]
pub struct IdeaSummary {
    pub idea_seq: i32,
    pub idea_summary_byai: String,
}

/// A score ready to be written back.
#[derive(Debug, Clone)]
pub struct ScoreUpdate {
    pub idea_seq: i32,
    pub score: f64,
    pub comment: String,
}
