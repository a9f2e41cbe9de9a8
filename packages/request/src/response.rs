//! Classification of backend responses.
//!
//! The backend reports failures and informational notices in the response
//! body with a success status, so every body is classified before it is
//! treated as an analysis result.

use serde_json::Value;

/// Message used when a failed response carries no text.
pub const UNDESCRIBED_FAILURE: &str = "Analysis request failed";

/// What a response body means.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    /// The backend reported a failure.
    Failed(String),
    /// The backend sent a notice instead of results (e.g. a queued task).
    Message(String),
    /// An analysis result.
    Data(Value),
}

/// Classifies a response body.
///
/// Checked in order: a truthy `error` or a `success` of `false`/`"false"`
/// is a failure; any `message` field is a notice; anything else is data.
#[must_use]
pub fn classify_response(body: Value) -> ResponseOutcome {
    let error = body.get("error").filter(|error| is_truthy(error));
    let failed = error.is_some() || body.get("success").is_some_and(is_false);

    if failed {
        let message = error
            .or_else(|| body.get("message").filter(|message| is_truthy(message)))
            .map_or_else(|| UNDESCRIBED_FAILURE.to_string(), display_text);
        return ResponseOutcome::Failed(message);
    }

    if let Some(message) = body.get("message") {
        return ResponseOutcome::Message(display_text(message));
    }

    ResponseOutcome::Data(body)
}

fn is_false(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::String(s) => s == "false",
        _ => false,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
