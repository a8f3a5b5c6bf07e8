use super::client::{ChatClient, ChatMessage, ChatRequest};
use super::error::LlmError;

/// Stored for ideas whose detail is empty.
pub const EMPTY_SUMMARY: &str = "-";

const SYSTEM_PROMPT: &str = "คุณเป็นผู้ช่วยในการวิเคราะห์และสรุปข้อความภาษาไทยเพื่อให้อ่านง่ายขึ้น \
คุณมีความเชี่ยวชาญในการจัดรูปแบบข้อความและสรุปใจความสำคัญ";

/// True when there is nothing worth sending to the model.
pub fn is_blank_detail(text: &str) -> bool {
    let t = text.trim();
    t.is_empty() || t == EMPTY_SUMMARY
}

/// Restructure and summarize idea detail text in Thai.
pub async fn summarize(client: &dyn ChatClient, text: &str) -> Result<String, LlmError> {
    if is_blank_detail(text) {
        return Ok(EMPTY_SUMMARY.to_string());
    }

    let prompt = format!(
        "กรุณาวิเคราะห์และสรุปข้อความต่อไปนี้ให้อ่านง่ายขึ้น โดย:\n\
         1. จัดรูปแบบข้อความให้มีโครงสร้างที่ชัดเจน\n\
         2. สรุปประเด็นสำคัญและใจความหลัก\n\
         3. แบ่งเป็นหัวข้อย่อยๆ ที่เข้าใจง่าย\n\
         4. เน้นความคิดสร้างสรรค์และนวัตกรรมที่สำคัญ\n\
         5. เขียนเป็นภาษาไทยที่กระชับและเข้าใจง่าย\n\n\
         ข้อความต้นฉบับ:\n{text}\n\n\
         กรุณาตอบกลับเป็นภาษาไทยเท่านั้น:"
    );
    let request = ChatRequest {
        messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
        max_tokens: Some(2000),
        temperature: Some(0.7),
        json_response: false,
    };
    let summary = client.complete(request).await?;
    if summary.is_empty() {
        return Err(LlmError::invalid_response("empty summary"));
    }
    Ok(summary)
}
