use reqwest::StatusCode;
use serde_json::Value;

/// Decoded body of a service response.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Json(Value),
    /// Body that is not valid JSON, kept verbatim.
    Raw(String),
    Empty,
}

impl Payload {
    pub fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            return Payload::Empty;
        }
        match serde_json::from_str(&text) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Raw(text),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub payload: Payload,
}

impl ApiResponse {
    pub fn new(status: StatusCode, payload: Payload) -> Self {
        Self { status, payload }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json(&self) -> Option<&Value> {
        match &self.payload {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match &self.payload {
            Payload::Raw(text) => Some(text),
            _ => None,
        }
    }

    /// Error message carried by a structured failure body, if any.
    pub fn description(&self) -> Option<&str> {
        let object = self.json()?.as_object()?;
        ["description", "error", "message"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
    }
}
