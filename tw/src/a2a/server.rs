//! axum server exposing one agent over A2A JSON-RPC

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::{debug, info, instrument, warn};

use super::types::*;
use crate::agent::{AgentCard, AgentError, AgentExecutor};

/// Shared state for one agent's server
#[derive(Clone)]
pub struct A2aState {
    executor: AgentExecutor,
    card: Arc<AgentCard>,
}

impl A2aState {
    pub fn new(executor: AgentExecutor, card: AgentCard) -> Self {
        Self {
            executor,
            card: Arc::new(card),
        }
    }

    pub fn card(&self) -> &AgentCard {
        &self.card
    }

    /// Dispatch one JSON-RPC request
    pub async fn handle(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, "A2aState::handle: called");
        let id = request.id.clone();
        match request.method.as_str() {
            METHOD_MESSAGE_SEND | METHOD_MESSAGE_STREAM => self.message_send(id, request.params).await,
            METHOD_TASKS_CANCEL => {
                let task_id = request
                    .params
                    .and_then(|p| serde_json::from_value::<TaskIdParams>(p).ok())
                    .map(|p| p.id)
                    .unwrap_or_default();
                match self.executor.cancel(&task_id).await {
                    Ok(()) => JsonRpcResponse::success(id, Value::Null),
                    Err(e) => JsonRpcResponse::error(id, A2A_UNSUPPORTED_OPERATION, e.to_string()),
                }
            }
            other => {
                warn!(method = %other, "A2aState::handle: unknown method");
                JsonRpcResponse::error(id, JSON_RPC_METHOD_NOT_FOUND, format!("Method not found: {}", other))
            }
        }
    }

    async fn message_send(&self, id: Option<JsonRpcId>, params: Option<Value>) -> JsonRpcResponse {
        let params: MessageSendParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => return JsonRpcResponse::error(id, JSON_RPC_INVALID_PARAMS, e.to_string()),
            None => return JsonRpcResponse::error(id, JSON_RPC_INVALID_PARAMS, "missing params"),
        };

        let query = params.message.joined_text();
        let context_id = params.message.context_id;
        match self.executor.execute(&query, context_id.as_deref()).await {
            Ok(text) => {
                let reply = A2aMessage::agent_text(text, context_id);
                match serde_json::to_value(&reply) {
                    Ok(value) => JsonRpcResponse::success(id, value),
                    Err(e) => JsonRpcResponse::error(id, JSON_RPC_INTERNAL_ERROR, e.to_string()),
                }
            }
            Err(e @ AgentError::Model(_)) => {
                warn!(kind = %self.executor.kind(), error = %e, "message_send: model failure");
                JsonRpcResponse::error(id, JSON_RPC_INTERNAL_ERROR, e.to_string())
            }
            Err(e) => JsonRpcResponse::error(id, A2A_UNSUPPORTED_OPERATION, e.to_string()),
        }
    }
}

/// Parse a raw body into a request, or the error response to send instead
fn parse_request(body: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| JsonRpcResponse::error(None, JSON_RPC_PARSE_ERROR, format!("Parse error: {}", e)))?;
    let id = value
        .get("id")
        .and_then(|id| serde_json::from_value::<JsonRpcId>(id.clone()).ok());
    let request: JsonRpcRequest = serde_json::from_value(value)
        .map_err(|e| JsonRpcResponse::error(id.clone(), JSON_RPC_INVALID_REQUEST, format!("Invalid request: {}", e)))?;
    if request.jsonrpc != "2.0" {
        return Err(JsonRpcResponse::error(id, JSON_RPC_INVALID_REQUEST, "jsonrpc must be \"2.0\""));
    }
    Ok(request)
}

/// GET /.well-known/agent-card.json
#[instrument(skip(state))]
async fn agent_card_handler(State(state): State<A2aState>) -> Json<AgentCard> {
    Json(state.card().clone())
}

/// POST / - JSON-RPC entry point
#[instrument(skip(state, body))]
async fn rpc_handler(State(state): State<A2aState>, body: String) -> Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(response) => return Json(response).into_response(),
    };

    if request.method == METHOD_MESSAGE_STREAM {
        // Only the final reply is streamed; there are no intermediate events
        let response = state.handle(request).await;
        let data = serde_json::to_string(&response).unwrap_or_default();
        let stream = futures::stream::once(async move { Ok::<_, Infallible>(Event::default().data(data)) });
        return Sse::new(stream).into_response();
    }

    Json(state.handle(request).await).into_response()
}

/// Build the A2A axum Router for one agent
pub fn a2a_router(state: A2aState) -> Router {
    Router::new()
        .route("/.well-known/agent-card.json", get(agent_card_handler))
        .route("/.well-known/agent.json", get(agent_card_handler))
        .route("/", post(rpc_handler))
        .with_state(state)
}

/// Serve a router until ctrl-c
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    info!(addr = ?listener.local_addr().ok(), "serve: listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentEndpoint, AgentSpec};
    use crate::domain::AgentKind;
    use crate::llm::{ScriptedLlmClient, ScriptedReply};

    fn state(llm: ScriptedLlmClient) -> A2aState {
        let spec = AgentSpec::builtin(AgentKind::Weather);
        let card = AgentCard::new(&spec, "http://localhost:9005/");
        let endpoint = AgentEndpoint::new(spec, Arc::new(llm));
        A2aState::new(AgentExecutor::new(Arc::new(endpoint)), card)
    }

    fn send_request(text: &str) -> JsonRpcRequest {
        JsonRpcRequest::new(
            JsonRpcId::Number(1),
            METHOD_MESSAGE_SEND,
            serde_json::json!({"message": A2aMessage::user_text(text, Some("ctx-9".to_string()))}),
        )
    }

    #[tokio::test]
    async fn test_message_send_returns_agent_message() {
        let state = state(ScriptedLlmClient::texts(["not json at all"]));
        let resp = state.handle(send_request("Paris, 3 days")).await;

        let msg: A2aMessage = serde_json::from_value(resp.result.unwrap()).unwrap();
        assert_eq!(msg.role, MessageRole::Agent);
        assert_eq!(msg.context_id.as_deref(), Some("ctx-9"));
        let payload: Value = serde_json::from_str(msg.first_text().unwrap()).unwrap();
        assert_eq!(payload["error"], "Failed to generate structured weather forecast");
        assert!(state.executor.endpoint().sessions().contains("ctx-9").await);
    }

    #[tokio::test]
    async fn test_model_failure_is_internal_error() {
        let state = state(ScriptedLlmClient::new([ScriptedReply::Fail("boom".to_string())]));
        let resp = state.handle(send_request("Paris")).await;
        assert_eq!(resp.error.unwrap().code, JSON_RPC_INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_cancel_is_unsupported() {
        let state = state(ScriptedLlmClient::texts(Vec::<String>::new()));
        let req = JsonRpcRequest::new(JsonRpcId::String("c".to_string()), METHOD_TASKS_CANCEL, serde_json::json!({"id": "t1"}));
        let err = state.handle(req).await.error.unwrap();
        assert_eq!(err.code, A2A_UNSUPPORTED_OPERATION);
        assert_eq!(err.message, "cancel not supported");
    }

    #[tokio::test]
    async fn test_unknown_method_and_bad_params() {
        let state = state(ScriptedLlmClient::texts(Vec::<String>::new()));

        let req = JsonRpcRequest::new(JsonRpcId::Number(2), "tasks/get", Value::Null);
        assert_eq!(state.handle(req).await.error.unwrap().code, JSON_RPC_METHOD_NOT_FOUND);

        let req = JsonRpcRequest::new(JsonRpcId::Number(3), METHOD_MESSAGE_SEND, serde_json::json!({"nope": 1}));
        assert_eq!(state.handle(req).await.error.unwrap().code, JSON_RPC_INVALID_PARAMS);
    }

    #[test]
    fn test_parse_request_errors() {
        assert_eq!(parse_request("{not json").unwrap_err().error.unwrap().code, JSON_RPC_PARSE_ERROR);

        let err = parse_request(r#"{"jsonrpc": "2.0", "id": 4}"#).unwrap_err();
        assert_eq!(err.error.unwrap().code, JSON_RPC_INVALID_REQUEST);
        assert_eq!(err.id, Some(JsonRpcId::Number(4)));

        let err = parse_request(r#"{"jsonrpc": "1.0", "method": "message/send"}"#).unwrap_err();
        assert_eq!(err.error.unwrap().code, JSON_RPC_INVALID_REQUEST);
    }
}
