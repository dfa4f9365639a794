use serde::Serialize;
use serde_json::Value;

pub const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// A single RFC 6902 operation. The service only accepts `replace`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatchOperation {
    pub op: &'static str,
    pub path: String,
    pub value: Value,
}

impl PatchOperation {
    pub fn replace(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            op: "replace",
            path: path.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_status_document() {
        let ops = [PatchOperation::replace("/status", "REVIEWED")];
        assert_eq!(
            serde_json::to_string(&ops).unwrap(),
            r#"[{"op":"replace","path":"/status","value":"REVIEWED"}]"#
        );
    }
}
