use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{
    AgentListEnvelope, ConversationListEnvelope, ConversationStore, ConversationThread,
    MessageEnvelope, MessageListEnvelope, PatchEnvelope, QuickReplyListEnvelope, SendMessageBody,
    ThreadEnvelope,
};
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::models::input::UpdateConversationInput;
use crate::models::{Agent, Conversation, ConversationPatch, ConversationStatus, Message, QuickReply};

/// HTTP client for the conversation store's JSON API.
pub struct HttpStore {
    client: reqwest::Client,
    base: Url,
}

impl HttpStore {
    pub fn new(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()?;
        let base = Url::parse(&config.base_url)?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, DashboardError> {
        Ok(self.base.join(path)?)
    }

    /// Check the status line, then decode the JSON body.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, DashboardError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DashboardError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ConversationStore for HttpStore {
    async fn list_conversations(
        &self,
        status: ConversationStatus,
        limit: u32,
    ) -> Result<Vec<Conversation>, DashboardError> {
        let url = self.endpoint("/conversations")?;
        debug!(status = status.as_str(), limit, "listing conversations");
        let response = self
            .client
            .get(url)
            .query(&[("status", status.as_str()), ("limit", &limit.to_string())])
            .send()
            .await?;
        let envelope: ConversationListEnvelope = Self::decode(response).await?;
        Ok(envelope.conversations)
    }

    async fn fetch_thread(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationThread, DashboardError> {
        let url = self.endpoint(&format!("/conversations/{}", conversation_id))?;
        let response = self.client.get(url).send().await?;
        let envelope: ThreadEnvelope = Self::decode(response).await?;
        Ok(envelope.conversation)
    }

    async fn messages_after(
        &self,
        conversation_id: &str,
        after: &str,
    ) -> Result<Vec<Message>, DashboardError> {
        let url = self.endpoint(&format!("/conversations/{}/messages", conversation_id))?;
        let response = self
            .client
            .get(url)
            .query(&[("after", after)])
            .send()
            .await?;
        let envelope: MessageListEnvelope = Self::decode(response).await?;
        Ok(envelope.messages)
    }

    async fn send_message(
        &self,
        conversation_id: &str,
        content: &str,
    ) -> Result<Message, DashboardError> {
        let url = self.endpoint(&format!("/conversations/{}/messages", conversation_id))?;
        let body = SendMessageBody {
            content: content.to_string(),
        };
        let response = self.client.post(url).json(&body).send().await?;
        let envelope: MessageEnvelope = Self::decode(response).await?;
        Ok(envelope.message)
    }

    async fn update_conversation(
        &self,
        conversation_id: &str,
        update: &UpdateConversationInput,
    ) -> Result<ConversationPatch, DashboardError> {
        let url = self.endpoint(&format!("/conversations/{}", conversation_id))?;
        let response = self.client.put(url).json(update).send().await?;
        let envelope: PatchEnvelope = Self::decode(response).await?;
        Ok(envelope.conversation)
    }

    async fn list_agents(&self) -> Result<Vec<Agent>, DashboardError> {
        let url = self.endpoint("/agents")?;
        let response = self.client.get(url).send().await?;
        let envelope: AgentListEnvelope = Self::decode(response).await?;
        Ok(envelope.agents)
    }

    async fn list_quick_replies(&self) -> Result<Vec<QuickReply>, DashboardError> {
        let url = self.endpoint("/quick-replies")?;
        let response = self.client.get(url).send().await?;
        let envelope: QuickReplyListEnvelope = Self::decode(response).await?;
        Ok(envelope.quick_replies)
    }
}
