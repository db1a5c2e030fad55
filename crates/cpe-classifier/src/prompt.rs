//! Classifier instruction and output extraction.

use serde_json::Value;

use crate::ClassificationRequest;

/// System instruction sent with every classification.
pub const SYSTEM_INSTRUCTION: &str = "\
You are a regulatory compliance reviewer for cannabis marketing and customer \
communications in the United States. You will receive a JSON object with a \
`jurisdiction` (state code), a `channel` (for example retail, advertising, sms) \
and the `content` to review.

Decide whether the content may be published in that jurisdiction and channel. \
Flag health or therapeutic claims, guaranteed outcomes, content appealing to \
persons under 21, free product giveaways, false or misleading statements, and \
anything else the jurisdiction's cannabis advertising rules prohibit.

Respond with a single JSON object and nothing else:
{\"status\": \"pass\" | \"fail\" | \"warning\", \"violations\": [string], \"suggestions\": [string]}

Use \"pass\" only when there are no violations; its `violations` array must be empty. \
Use \"warning\" for borderline wording that should be reviewed but may be published.";

/// The user message: the request as a JSON object.
pub fn user_message(request: &ClassificationRequest) -> String {
    serde_json::json!({
        "jurisdiction": request.jurisdiction.as_str(),
        "channel": request.channel.as_str(),
        "content": request.content,
    })
    .to_string()
}

/// Pull a JSON object out of free-form classifier text.
///
/// Tried in order: the whole text, the first fenced code block, the span
/// from the first `{` to the last `}`.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Some(v) = parse_object(trimmed) {
        return Some(v);
    }
    if let Some(v) = fenced_block(trimmed).and_then(parse_object) {
        return Some(v);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&trimmed[start..=end])
}

fn parse_object(s: &str) -> Option<Value> {
    serde_json::from_str::<Value>(s)
        .ok()
        .filter(Value::is_object)
}

fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after = &text[open + 3..];
    // Skip an info string such as `json`.
    let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}
