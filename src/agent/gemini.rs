use crate::agent::session::Session;
use crate::agent::tools::{call_tool, declarations};
use crate::agent::wire::{Content, GenerateRequest, GenerateResponse, Tool};
use crate::agent::{AGENT_INSTRUCTION, ProductAgent};
use crate::catalog::CatalogStore;
use crate::config::AgentConfig;
use crate::model::AgentError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Agent backed by the hosted Gemini `generateContent` API with function calling.
pub struct GeminiAgent {
    client: Client,
    config: AgentConfig,
    store: Arc<CatalogStore>,
    session: Mutex<Session>,
}

impl GeminiAgent {
    pub fn new(config: AgentConfig, store: Arc<CatalogStore>) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        let session = Mutex::new(Session::new(config.history_limit));

        Ok(Self {
            client,
            config,
            store,
            session,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    /// One round trip to the model. Returns the first candidate's content.
    async fn generate(&self, contents: &[Content]) -> Result<Content, AgentError> {
        let request = GenerateRequest {
            system_instruction: Content::system(AGENT_INSTRUCTION),
            contents,
            tools: vec![Tool {
                function_declarations: declarations(),
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown".into());
            warn!("Model API responded [{}]: {}", status, body);
            return Err(AgentError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or(AgentError::EmptyResponse)?;
        if let Some(reason) = &candidate.finish_reason {
            debug!("Candidate finished with {}", reason);
        }
        candidate.content.ok_or(AgentError::EmptyResponse)
    }
}

#[async_trait::async_trait]
impl ProductAgent for GeminiAgent {
    async fn respond(&self, message: &str) -> Result<String, AgentError> {
        // Held for the whole exchange so concurrent chats don't interleave turns.
        let mut session = self.session.lock().await;

        let mut contents = session.history().to_vec();
        contents.push(Content::user_text(message));

        let max_rounds = self.config.max_tool_rounds;
        for round in 0..=max_rounds {
            let reply = self.generate(&contents).await?;
            let calls = reply.function_calls();

            if calls.is_empty() {
                let text = reply.text();
                if text.trim().is_empty() {
                    return Err(AgentError::EmptyResponse);
                }
                session.record(message, &text);
                info!(
                    "Agent answered after {} tool round(s), {} exchange(s) in session",
                    round,
                    session.exchanges()
                );
                return Ok(text);
            }

            if round == max_rounds {
                break;
            }

            let responses = calls
                .into_iter()
                .map(|call| call_tool(&self.store, call))
                .collect();
            contents.push(reply);
            contents.push(Content {
                role: Some("user".into()),
                parts: responses,
            });
        }

        warn!("Agent still calling tools after {} rounds", max_rounds);
        Err(AgentError::ToolRoundsExceeded(max_rounds))
    }
}
