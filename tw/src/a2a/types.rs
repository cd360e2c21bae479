use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const METHOD_MESSAGE_SEND: &str = "message/send";
pub const METHOD_MESSAGE_STREAM: &str = "message/stream";
pub const METHOD_TASKS_CANCEL: &str = "tasks/cancel";

pub const JSON_RPC_PARSE_ERROR: i64 = -32700;
pub const JSON_RPC_INVALID_REQUEST: i64 = -32600;
pub const JSON_RPC_METHOD_NOT_FOUND: i64 = -32601;
pub const JSON_RPC_INVALID_PARAMS: i64 = -32602;
pub const JSON_RPC_INTERNAL_ERROR: i64 = -32603;
pub const A2A_UNSUPPORTED_OPERATION: i64 = -32004;

/// JSON-RPC 2.0 id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcId {
    Number(i64),
    String(String),
}

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonRpcId>,
}

impl JsonRpcRequest {
    pub fn new(id: JsonRpcId, method: &str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params: Some(params),
            id: Some(id),
        }
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<JsonRpcId>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<JsonRpcId>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<JsonRpcId>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
            id,
        }
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Message part; only text is produced, other kinds are carried through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text { text: String },
    Data { data: Value },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Agent,
}

fn message_kind() -> String {
    "message".to_string()
}

/// A2A message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct A2aMessage {
    #[serde(default = "message_kind")]
    pub kind: String,
    pub role: MessageRole,
    pub parts: Vec<Part>,
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
}

impl A2aMessage {
    fn text(role: MessageRole, text: impl Into<String>, context_id: Option<String>) -> Self {
        Self {
            kind: message_kind(),
            role,
            parts: vec![Part::Text { text: text.into() }],
            message_id: uuid::Uuid::now_v7().to_string(),
            context_id,
        }
    }

    pub fn user_text(text: impl Into<String>, context_id: Option<String>) -> Self {
        Self::text(MessageRole::User, text, context_id)
    }

    pub fn agent_text(text: impl Into<String>, context_id: Option<String>) -> Self {
        Self::text(MessageRole::Agent, text, context_id)
    }

    /// All text parts joined by newlines
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                Part::Data { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// First text part, if any
    pub fn first_text(&self) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            Part::Text { text } => Some(text.as_str()),
            Part::Data { .. } => None,
        })
    }
}

/// Params of `message/send` and `message/stream`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSendParams {
    pub message: A2aMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Params of `tasks/cancel`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskIdParams {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_shape() {
        let msg = A2aMessage::user_text("Plan Tokyo", Some("ctx".to_string()));
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["kind"], "message");
        assert_eq!(value["role"], "user");
        assert_eq!(value["parts"][0], serde_json::json!({"kind": "text", "text": "Plan Tokyo"}));
        assert_eq!(value["contextId"], "ctx");
        assert!(value["messageId"].is_string());
    }

    #[test]
    fn test_joined_text_skips_data_parts() {
        let msg: A2aMessage = serde_json::from_value(serde_json::json!({
            "role": "user",
            "messageId": "m1",
            "parts": [
                {"kind": "text", "text": "line one"},
                {"kind": "data", "data": {"x": 1}},
                {"kind": "text", "text": "line two"}
            ]
        }))
        .unwrap();

        assert_eq!(msg.kind, "message");
        assert_eq!(msg.joined_text(), "line one\nline two");
        assert_eq!(msg.first_text(), Some("line one"));
        assert!(msg.context_id.is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let resp = JsonRpcResponse::error(Some(JsonRpcId::Number(7)), A2A_UNSUPPORTED_OPERATION, "cancel not supported");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["error"]["code"], -32004);
        assert_eq!(value["id"], 7);
        assert!(value.get("result").is_none());
    }
}
