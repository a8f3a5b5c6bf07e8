use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::client::{ChatClient, ChatMessage, ChatRequest};

/// Labels assigned to answers when the question defines none of its own.
pub const CATEGORIES: [&str; 5] = ["สินเชื่อ", "เงินฝาก", "ข่าวการเมือง", "ข่าวกีฬา", OTHER_CATEGORY];

/// Catch-all label.
pub const OTHER_CATEGORY: &str = "อื่นๆ";

pub const MAX_KEYWORDS: usize = 3;
const MIN_KEYWORD_CHARS: usize = 3;

/// Substring rules, checked in order against the lowercased text.
const KEYWORD_RULES: [(&str, &[&str]); 4] = [
    ("สินเชื่อ", &["loan", "credit", "ผ่อน", "กู้", "สินเชื่อ"]),
    ("เงินฝาก", &["deposit", "ออม", "ดอกเบี้ย", "ฝาก", "เงินฝาก"]),
    ("ข่าวการเมือง", &["การเมือง", "รัฐบาล", "เลือกตั้ง", "politic"]),
    ("ข่าวกีฬา", &["กีฬา", "บอล", "ฟุตบอล", "sport", "match"]),
];

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{M}\p{N}]+").expect("word regex"));

/// Local rule match against the built-in categories.
pub fn keyword_fallback(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| lower.contains(n)))
        .map(|(category, _)| *category)
}

/// Fallback for a caller-supplied category list: a built-in rule whose label
/// is in the list, then any category name that occurs in the text.
fn fallback_for(text: &str, categories: &[String]) -> String {
    if categories.is_empty() {
        return keyword_fallback(text).unwrap_or(OTHER_CATEGORY).to_string();
    }
    if let Some(hit) = keyword_fallback(text).filter(|c| categories.iter().any(|x| x == c)) {
        return hit.to_string();
    }
    let lower = text.to_lowercase();
    categories
        .iter()
        .find(|c| !c.trim().is_empty() && lower.contains(&c.to_lowercase()))
        .cloned()
        .unwrap_or_else(|| OTHER_CATEGORY.to_string())
}

/// Assign one category to a free-text answer.
///
/// `categories` overrides the built-in list when non-empty. The model is
/// asked first when available; any failure or off-list reply falls back to
/// local substring rules. Never fails.
pub async fn classify(client: Option<&dyn ChatClient>, text: &str, categories: &[String]) -> String {
    let labels: Vec<String> = if categories.is_empty() {
        CATEGORIES.iter().map(|c| c.to_string()).collect()
    } else {
        categories.to_vec()
    };

    if let Some(client) = client {
        let request = ChatRequest {
            messages: vec![ChatMessage::user(classification_prompt(&labels, text))],
            max_tokens: Some(20),
            temperature: Some(0.0),
            json_response: false,
        };
        match client.complete(request).await {
            Ok(reply) => {
                if let Some(label) = labels.iter().find(|l| reply.contains(l.as_str())) {
                    return label.clone();
                }
                log::warn!("Classifier reply '{reply}' matched no category, using keyword fallback");
            }
            Err(e) => log::warn!("Classification call failed, using keyword fallback: {e}"),
        }
    }

    fallback_for(text, categories)
}

fn classification_prompt(labels: &[String], text: &str) -> String {
    format!(
        "คุณคือนักจัดหมวดหมู่ จัดข้อความคำตอบต่อไปนี้ให้เป็นหนึ่งในหมวดหมู่: {}.\n\
         ตอบกลับเฉพาะชื่อหมวดหมู่เท่านั้น.\nข้อความ: {text}",
        labels.join(", ")
    )
}

/// Split a model reply like `"a, b , c"` into at most three distinct keywords.
pub fn parse_keyword_reply(reply: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    reply
        .split([',', '\n', '、'])
        .map(|k| k.trim().trim_matches(|c| matches!(c, '"' | '\'' | '-' | '*' | '.')).trim())
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.to_lowercase()))
        .take(MAX_KEYWORDS)
        .map(String::from)
        .collect()
}

/// The three longest distinct tokens of at least three characters;
/// equal lengths keep their order of first appearance.
pub fn local_keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tokens: Vec<&str> = WORD_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|t| t.chars().count() >= MIN_KEYWORD_CHARS)
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect();
    tokens.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
    tokens.into_iter().take(MAX_KEYWORDS).map(String::from).collect()
}

/// Extract up to three keywords, preferring the model's comma-separated answer.
pub async fn extract_keywords(client: Option<&dyn ChatClient>, text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    if let Some(client) = client {
        let prompt = format!(
            "Extract at most {MAX_KEYWORDS} short keywords that best describe the following text. \
             Use the language of the text. Reply with the keywords separated by commas only.\n\
             Text: {text}"
        );
        let request = ChatRequest {
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: Some(60),
            temperature: Some(0.0),
            json_response: false,
        };
        match client.complete(request).await {
            Ok(reply) => {
                let keywords = parse_keyword_reply(&reply);
                if !keywords.is_empty() {
                    return keywords;
                }
                log::warn!("Keyword reply was empty, using local extraction");
            }
            Err(e) => log::warn!("Keyword call failed, using local extraction: {e}"),
        }
    }

    local_keywords(text)
}
