//! HTTP transport to the agent endpoint.

use super::command::{AgentCommand, ChatRequest};
use super::envelope::normalize;
use super::error::AgentError;
use crate::client_config::ClientConfig;
use crate::games::tictactoe::GameSnapshot;
use tracing::{debug, info, instrument, warn};

/// Something that can deliver a command to the agent.
#[async_trait::async_trait]
pub trait AgentClient: Send + Sync {
    /// Sends a command and returns the raw response body.
    async fn send(&self, command: AgentCommand) -> Result<String, AgentError>;

    /// Sends a command and normalizes the reply.
    async fn exchange(&self, command: AgentCommand) -> Result<GameSnapshot, AgentError> {
        let body = self.send(command).await?;
        normalize(&body)
    }
}

/// reqwest-backed agent client.
#[derive(Debug, Clone)]
pub struct HttpAgentClient {
    /// HTTP client.
    client: reqwest::Client,
    /// Chat endpoint URL.
    url: String,
    /// Agent identifier sent with every request.
    agent_id: String,
}

impl HttpAgentClient {
    /// Creates a client for the configured endpoint.
    #[instrument(skip(config), fields(url = %config.endpoint_url(), agent_id = %config.agent_id()))]
    pub fn new(config: &ClientConfig) -> Result<Self, AgentError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            debug!(?timeout, "Request timeout configured");
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        info!("Agent client ready");
        Ok(Self {
            client,
            url: config.endpoint_url(),
            agent_id: config.agent_id().clone(),
        })
    }

    /// Chat endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl AgentClient for HttpAgentClient {
    #[instrument(
        skip(self),
        fields(url = %self.url, agent_id = %self.agent_id, message = %command)
    )]
    async fn send(&self, command: AgentCommand) -> Result<String, AgentError> {
        let request = ChatRequest::new(command.to_string(), self.agent_id.clone());
        debug!(?request, "Sending command to agent");

        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Agent endpoint returned error status");
            return Err(AgentError::network(format!("HTTP {}", status)));
        }

        let body = response.text().await?;
        debug!(%status, body = %body, "Got agent response");
        Ok(body)
    }
}
