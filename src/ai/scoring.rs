use serde::{Deserialize, Serialize};

use super::client::{ChatClient, ChatMessage, ChatRequest};
use super::error::LlmError;

/// Settings key under which the scoring rubric is stored.
pub const SYSTEM_PROMPT_CODE: &str = "idea_score_system_prompt";

pub const CRITERIA_COUNT: usize = 5;
pub const MAX_CRITERION_SCORE: f64 = 20.0;
pub const MAX_OVERALL_SCORE: f64 = 100.0;
const SUM_TOLERANCE: f64 = 0.1;

/// Rubric installed on first read of the system prompt setting.
pub const DEFAULT_SCORING_PROMPT: &str = "\
คุณเป็นกรรมการตัดสินการประกวดนวัตกรรมของธนาคาร มีประสบการณ์ด้านการพัฒนาเทคโนโลยีและธุรกิจธนาคาร
ให้ประเมินบทความนวัตกรรมที่ได้รับตามเกณฑ์ 5 ข้อ ข้อละ 0-20 คะแนน รวม 100 คะแนน

หมายเหตุ
- หากนวัตกรรมซ้ำซ้อนกับระบบที่ธนาคารมีอยู่แล้ว ให้หักคะแนนตามความใกล้เคียง
- หากบทความสั้นเกินไป (น้อยกว่า 200 ตัวอักษร) ให้หักคะแนนเกณฑ์ที่ 2 และ 3 อย่างมาก

เกณฑ์การตัดสิน
1. ผลกระทบทางธุรกิจและมูลค่าเชิงนวัตกรรม
2. ความเป็นไปได้ในการนำไปใช้จริง
3. การแก้ปัญหาและตอบโจทย์ลูกค้า
4. ความเป็นเลิศทางเทคนิคและความสามารถในการขยายขนาด
5. การบริหารความเสี่ยงและการปฏิบัติตามกฎระเบียบ";

pub const DEFAULT_PROMPT_DESCRIPTION: &str = "System prompt for AI idea scoring";

const RESPONSE_FORMAT: &str = r#"Respond with a JSON object only, in exactly this shape:
{"scores":[{"criterion":"<criterion name>","score":<0-20>,"explanation":"<reason>"}],"overall_score":<0-100>,"overall_feedback":"<summary>"}
Return exactly 5 entries in "scores". "overall_score" must equal the sum of the five scores."#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: String,
    pub score: f64,
    pub explanation: String,
}

/// A validated rubric evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub scores: Vec<CriterionScore>,
    pub overall_score: f64,
    pub overall_feedback: String,
}

impl ScoreResult {
    /// Parse and validate a model reply. No repair is attempted.
    pub fn parse(reply: &str) -> Result<Self, LlmError> {
        let result: ScoreResult = serde_json::from_str(reply.trim())
            .map_err(|e| LlmError::invalid_response(format!("score JSON did not parse: {e}")))?;
        result.validate()?;
        Ok(result)
    }

    pub fn validate(&self) -> Result<(), LlmError> {
        if self.scores.len() != CRITERIA_COUNT {
            return Err(LlmError::invalid_response(format!(
                "expected {CRITERIA_COUNT} criteria, got {}",
                self.scores.len()
            )));
        }
        for s in &self.scores {
            if !s.score.is_finite() || !(0.0..=MAX_CRITERION_SCORE).contains(&s.score) {
                return Err(LlmError::invalid_response(format!(
                    "criterion '{}' scored {} (allowed 0-{MAX_CRITERION_SCORE})",
                    s.criterion, s.score
                )));
            }
        }
        if !self.overall_score.is_finite() || !(0.0..=MAX_OVERALL_SCORE).contains(&self.overall_score) {
            return Err(LlmError::invalid_response(format!(
                "overall score {} outside 0-{MAX_OVERALL_SCORE}",
                self.overall_score
            )));
        }
        let sum: f64 = self.scores.iter().map(|s| s.score).sum();
        if (sum - self.overall_score).abs() > SUM_TOLERANCE {
            return Err(LlmError::invalid_response(format!(
                "overall score {} does not match criteria sum {sum}",
                self.overall_score
            )));
        }
        Ok(())
    }

    /// Text stored in `idea_score_comment`.
    pub fn to_comment(&self) -> String {
        let mut out = String::new();
        for s in &self.scores {
            out.push_str(&format!("{}: {}/20\n{}\n\n", s.criterion, s.score, s.explanation));
        }
        out.push_str(&format!("คะแนนรวม: {}/100\n{}", self.overall_score, self.overall_feedback));
        out
    }
}

/// Evaluate one idea against a rubric prompt.
pub async fn score_idea(
    client: &dyn ChatClient,
    system_prompt: &str,
    idea_name: &str,
    idea_detail: &str,
) -> Result<ScoreResult, LlmError> {
    let request = ChatRequest {
        messages: vec![
            ChatMessage::system(format!("{system_prompt}\n\n{RESPONSE_FORMAT}")),
            ChatMessage::user(format!("ชื่อไอเดีย: {idea_name}\n\nรายละเอียด:\n{idea_detail}")),
        ],
        max_tokens: Some(2000),
        temperature: Some(0.2),
        json_response: true,
    };
    let reply = client.complete(request).await?;
    ScoreResult::parse(&reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    fn reply(scores: &[f64], overall: f64) -> String {
        json!({
            "scores": scores.iter().enumerate().map(|(i, s)| json!({
                "criterion": format!("c{}", i + 1),
                "score": s,
                "explanation": "ok",
            })).collect::<Vec<_>>(),
            "overall_score": overall,
            "overall_feedback": "solid idea",
        })
        .to_string()
    }

    #[test]
    fn accepts_consistent_scores() {
        let r = ScoreResult::parse(&reply(&[15.0, 12.5, 18.0, 10.0, 14.0], 69.5)).unwrap();
        assert_eq!(r.scores.len(), 5);
        assert_eq!(r.overall_score, 69.5);
    }

    #[test]
    fn sum_within_tolerance_is_accepted() {
        assert!(ScoreResult::parse(&reply(&[10.0; 5], 50.05)).is_ok());
        assert!(ScoreResult::parse(&reply(&[10.0; 5], 50.5)).is_err());
    }

    #[test]
    fn rejects_wrong_criteria_count_and_ranges() {
        assert!(ScoreResult::parse(&reply(&[10.0; 4], 40.0)).is_err());
        assert!(ScoreResult::parse(&reply(&[25.0, 10.0, 10.0, 10.0, 10.0], 65.0)).is_err());
        assert!(ScoreResult::parse(&reply(&[-1.0, 10.0, 10.0, 10.0, 11.0], 40.0)).is_err());
        assert!(ScoreResult::parse("not json").is_err());
        assert!(ScoreResult::parse("```json\n{}\n```").is_err());
    }

    #[test]
    fn comment_lists_each_criterion() {
        let r = ScoreResult::parse(&reply(&[10.0; 5], 50.0)).unwrap();
        let comment = r.to_comment();
        assert!(comment.contains("c1: 10/20"));
        assert!(comment.contains("คะแนนรวม: 50/100"));
        assert!(comment.ends_with("solid idea"));
    }

    struct Canned(String);

    #[async_trait]
    impl ChatClient for Canned {
        async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
            assert!(request.json_response);
            assert!(request.messages[0].content.starts_with("rubric"));
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn score_idea_sends_rubric_as_system_message() {
        let client = Canned(reply(&[20.0; 5], 100.0));
        let r = score_idea(&client, "rubric", "name", "detail").await.unwrap();
        assert_eq!(r.overall_score, 100.0);
    }
}
