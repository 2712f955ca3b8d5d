use serde::Deserialize;
use serde_json::Value;

/// Body the storytelling service returns alongside a failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Pulls an error message out of a response body.
///
/// The service reports failures through an `error` field that is usually a
/// string. Story generation may instead set it to `true` and put the
/// explanation in `story`, so a truthy non-string value falls back to that
/// text. Returns `None` when the field is absent, null, `false` or empty.
pub fn error_message(body: &Value) -> Option<String> {
    if let Ok(ErrorBody { error }) = ErrorBody::deserialize(body) {
        return Some(error).filter(|message| !message.trim().is_empty());
    }
    match body.get("error")? {
        Value::Null | Value::Bool(false) | Value::String(_) => None,
        Value::Bool(true) => Some(
            body.get("story")
                .and_then(Value::as_str)
                .filter(|story| !story.trim().is_empty())
                .unwrap_or("request failed")
                .to_string(),
        ),
        other => Some(other.to_string()),
    }
}
