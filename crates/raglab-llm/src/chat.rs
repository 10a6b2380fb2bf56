//! Chat completion client and conversation sessions.

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use raglab_core::error::{Error, Result};
use raglab_core::traits::CompletionModel;
use raglab_core::types::{ChatMessage, Role};

use crate::tools::{ToolRegistry, ToolSpec};

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Reply to an unregistered tool request; shown to the user, never fatal.
pub const UNKNOWN_TOOL_REPLY: &str = "I don't know how to do that yet.";

/// One message on the completion-service wire. `tool_calls` appears on
/// assistant messages requesting a tool run; `tool_call_id` on the tool
/// result sent back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_calls: Option<Vec<ToolCallPayload>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_call_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallPayload {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionCall,
}

/// `arguments` is a JSON document encoded as a string, as the service
/// sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: Some(content.into()), tool_calls: None, tool_call_id: None }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: Some(content.into()), tool_calls: None, tool_call_id: None }
    }

    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    fn from_chat(msg: &ChatMessage) -> Self {
        let role = match msg.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        };
        Self { role: role.to_string(), content: Some(msg.content.clone()), tool_calls: None, tool_call_id: None }
    }
}

/// What one completion turn produced: plain text, or a request to run a
/// local tool.
#[derive(Debug, Clone)]
pub enum ChatTurn {
    Text(String),
    ToolCall { id: String, name: String, arguments: Value },
}

impl ChatTurn {
    fn from_message(message: &Message) -> Result<Self> {
        if let Some(call) = message.tool_calls.as_ref().and_then(|calls| calls.first()) {
            let arguments: Value = if call.function.arguments.trim().is_empty() {
                Value::Object(serde_json::Map::new())
            } else {
                serde_json::from_str(&call.function.arguments).map_err(|e| {
                    Error::Service(format!("tool call arguments are not valid JSON: {e}"))
                })?
            };
            return Ok(ChatTurn::ToolCall {
                id: call.id.clone(),
                name: call.function.name.clone(),
                arguments,
            });
        }
        Ok(ChatTurn::Text(message.content.clone().unwrap_or_default()))
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

pub struct ChatClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl ChatClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Service(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One request/response round-trip. Returns the assistant message as
    /// the service produced it (tool calls included).
    pub async fn request(
        &self,
        messages: &[Message],
        tools: Option<&[ToolSpec]>,
    ) -> Result<Message> {
        let mut payload = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });
        if let Some(max_tokens) = self.max_tokens {
            payload["max_tokens"] = Value::from(max_tokens);
        }
        if let Some(tools) = tools {
            if !tools.is_empty() {
                let declared: Vec<Value> = tools
                    .iter()
                    .map(|spec| serde_json::json!({ "type": "function", "function": spec }))
                    .collect();
                payload["tools"] = Value::from(declared);
            }
        }
        tracing::debug!(model = %self.model, messages = messages.len(), "requesting completion");
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Service(format!("completion request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service(format!(
                "completion service returned {status}: {body}"
            )));
        }
        let mut parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Service(format!("invalid completion response: {e}")))?;
        if parsed.choices.is_empty() {
            return Err(Error::Service("completion response had no choices".to_string()));
        }
        Ok(parsed.choices.remove(0).message)
    }

    /// Send a batch of independent prompts in one concurrent round-trip.
    /// Results come back in input order; any failure fails the batch.
    pub async fn complete_batch(&self, prompts: &[String]) -> Result<Vec<String>> {
        let futures = prompts.iter().map(|prompt| async move {
            let messages = [Message::user(prompt.clone())];
            let reply = self.request(&messages, None).await?;
            Ok::<String, Error>(reply.content.unwrap_or_default())
        });
        try_join_all(futures).await
    }
}

#[async_trait]
impl CompletionModel for ChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let wire: Vec<Message> = messages.iter().map(Message::from_chat).collect();
        let reply = self.request(&wire, None).await?;
        Ok(reply.content.unwrap_or_default())
    }
}

/// A conversation with history, optionally backed by a tool registry.
///
/// The client and registry are owned by the entry point and borrowed here.
pub struct ChatSession<'a> {
    client: &'a ChatClient,
    registry: Option<&'a ToolRegistry>,
    history: Vec<Message>,
}

// One tool round per user turn is the normal shape; a couple of extra
// rounds covers a follow-up call without letting a confused model spin.
const MAX_TOOL_ROUNDS: usize = 3;

impl<'a> ChatSession<'a> {
    pub fn new(client: &'a ChatClient) -> Self {
        Self { client, registry: None, history: Vec::new() }
    }

    pub fn with_tools(client: &'a ChatClient, registry: &'a ToolRegistry) -> Self {
        Self { client, registry: Some(registry), history: Vec::new() }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.history.push(Message::system(prompt));
        self
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Run one user turn: send, dispatch any tool call, and return the
    /// final text. An unregistered tool name yields a fallback reply
    /// instead of an error.
    pub async fn send(&mut self, user_input: &str) -> Result<String> {
        self.history.push(Message::user(user_input));
        let specs = self.registry.map(ToolRegistry::specs);
        for _ in 0..MAX_TOOL_ROUNDS {
            let reply = self.client.request(&self.history, specs.as_deref()).await?;
            let turn = ChatTurn::from_message(&reply)?;
            self.history.push(reply);
            match turn {
                ChatTurn::Text(text) => return Ok(text),
                ChatTurn::ToolCall { id, name, arguments } => {
                    let registry = match self.registry {
                        Some(registry) => registry,
                        None => {
                            self.history.pop();
                            return Ok(UNKNOWN_TOOL_REPLY.to_string());
                        }
                    };
                    match registry.dispatch(&name, &arguments) {
                        Ok(result) => self.history.push(Message::tool(id, result)),
                        Err(Error::UnknownTool(_)) => {
                            // Drop the dangling tool request so the next
                            // turn starts from a clean history.
                            self.history.pop();
                            return Ok(UNKNOWN_TOOL_REPLY.to_string());
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }
        Err(Error::Service("model kept requesting tools without answering".to_string()))
    }
}
