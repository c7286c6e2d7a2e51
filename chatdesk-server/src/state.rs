use chatdesk::models::{
    Agent, AssignedAgent, Conversation, ConversationPatch, ConversationStatus, Customer, Message,
    QuickReply, SenderProfile,
};
use chatdesk::store::ConversationThread;
use dashmap::DashMap;
use std::sync::RwLock;

/// Identity attached to messages posted through the console endpoint.
/// Authentication is out of scope; every staff send uses this sender.
const CONSOLE_SENDER_ID: &str = "agent-console";
const CONSOLE_SENDER_NAME: &str = "Support Agent";

#[derive(Debug)]
pub enum UpdateError {
    ConversationNotFound,
    AgentNotFound,
}

pub struct ConversationRecord {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// In-memory conversation store backing the HTTP API.
pub struct StoreState {
    conversations: DashMap<String, ConversationRecord>,
    agents: DashMap<String, Agent>,
    quick_replies: RwLock<Vec<QuickReply>>,
}

impl StoreState {
    pub fn new() -> Self {
        Self {
            conversations: DashMap::new(),
            agents: DashMap::new(),
            quick_replies: RwLock::new(Vec::new()),
        }
    }

    pub fn add_agent(&self, id: &str, name: &str) {
        self.agents.insert(
            id.to_string(),
            Agent {
                id: id.to_string(),
                name: name.to_string(),
                assigned_count: 0,
            },
        );
    }

    pub fn add_quick_reply(&self, title: &str, content: &str, category: Option<&str>) {
        let mut replies = self.quick_replies.write().expect("quick replies lock");
        replies.push(QuickReply {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            content: content.to_string(),
            category: category.map(String::from),
        });
    }

    pub fn create_conversation(
        &self,
        subject: Option<&str>,
        priority: i32,
        customer: Customer,
    ) -> Conversation {
        let conversation = Conversation {
            id: uuid::Uuid::new_v4().to_string(),
            subject: subject.map(String::from),
            status: ConversationStatus::Open,
            priority,
            unread_count: 0,
            last_message_at: None,
            customer,
            assigned_to: None,
        };
        self.conversations.insert(
            conversation.id.clone(),
            ConversationRecord {
                conversation: conversation.clone(),
                messages: Vec::new(),
            },
        );
        conversation
    }

    /// Conversations for a status filter, most recent activity first.
    pub fn list_conversations(
        &self,
        status: ConversationStatus,
        limit: usize,
    ) -> Vec<Conversation> {
        let mut conversations: Vec<Conversation> = self
            .conversations
            .iter()
            .filter(|entry| entry.conversation.status == status)
            .map(|entry| entry.conversation.clone())
            .collect();
        conversations.sort_by(|left, right| {
            right
                .last_message_at
                .unwrap_or(i64::MIN)
                .cmp(&left.last_message_at.unwrap_or(i64::MIN))
                .then_with(|| left.id.cmp(&right.id))
        });
        conversations.truncate(limit);
        conversations
    }

    /// Full thread for the console view. Fetching a thread marks the
    /// conversation as read.
    pub fn thread(&self, conversation_id: &str) -> Option<ConversationThread> {
        let mut record = self.conversations.get_mut(conversation_id)?;
        record.conversation.unread_count = 0;
        Some(ConversationThread {
            conversation: record.conversation.clone(),
            messages: record.messages.clone(),
        })
    }

    /// Messages strictly after the given message id. An unknown cursor
    /// yields an empty batch rather than a replay of the whole thread.
    pub fn messages_after(&self, conversation_id: &str, after: &str) -> Option<Vec<Message>> {
        let record = self.conversations.get(conversation_id)?;
        let position = record.messages.iter().position(|m| m.id == after);
        Some(match position {
            Some(index) => record.messages[index + 1..].to_vec(),
            None => Vec::new(),
        })
    }

    /// Append a staff message from the console. Does not touch the unread
    /// count; unread tracks customer messages the staff has not seen.
    pub fn append_staff_message(&self, conversation_id: &str, content: &str) -> Option<Message> {
        let sender = SenderProfile {
            id: CONSOLE_SENDER_ID.to_string(),
            name: CONSOLE_SENDER_NAME.to_string(),
            avatar_url: None,
            role: Some("agent".to_string()),
        };
        self.append_message(conversation_id, content, CONSOLE_SENDER_ID, Some(sender), false, false)
    }

    /// Append an inbound customer message and bump the unread count.
    pub fn append_customer_message(&self, conversation_id: &str, content: &str) -> Option<Message> {
        let customer_id = self
            .conversations
            .get(conversation_id)?
            .conversation
            .customer
            .id
            .clone();
        self.append_message(conversation_id, content, &customer_id, None, false, true)
    }

    /// Append an automated notice (system flag set).
    pub fn append_system_notice(&self, conversation_id: &str, content: &str) -> Option<Message> {
        self.append_message(conversation_id, content, "system", None, true, false)
    }

    fn append_message(
        &self,
        conversation_id: &str,
        content: &str,
        sender_id: &str,
        sender: Option<SenderProfile>,
        is_system: bool,
        bump_unread: bool,
    ) -> Option<Message> {
        let mut record = self.conversations.get_mut(conversation_id)?;

        // Keep created_at strictly increasing within a conversation so the
        // timestamp ordering matches insertion order even under fast writes.
        let mut created_at = chrono::Utc::now().timestamp_millis();
        if let Some(last) = record.messages.last() {
            if created_at <= last.created_at {
                created_at = last.created_at + 1;
            }
        }

        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.to_string(),
            sender_id: sender_id.to_string(),
            message_type: "text".to_string(),
            is_system,
            created_at,
            sender,
        };
        record.messages.push(message.clone());
        record.conversation.last_message_at = Some(created_at);
        if bump_unread {
            record.conversation.unread_count += 1;
        }
        Some(message)
    }

    /// Apply a partial status/assignee update and return only the fields
    /// that changed. Assigning also rebalances the agents' workload counts.
    pub fn update_conversation(
        &self,
        conversation_id: &str,
        status: Option<ConversationStatus>,
        assigned_to_id: Option<&str>,
    ) -> Result<ConversationPatch, UpdateError> {
        let assignee = match assigned_to_id {
            Some(agent_id) => {
                let agent = self
                    .agents
                    .get(agent_id)
                    .ok_or(UpdateError::AgentNotFound)?;
                Some(AssignedAgent {
                    id: agent.id.clone(),
                    name: agent.name.clone(),
                })
            }
            None => None,
        };

        let mut record = self
            .conversations
            .get_mut(conversation_id)
            .ok_or(UpdateError::ConversationNotFound)?;

        let mut patch = ConversationPatch {
            id: conversation_id.to_string(),
            status: None,
            assigned_to: None,
        };

        if let Some(status) = status {
            record.conversation.status = status;
            patch.status = Some(status);
        }

        if let Some(assignee) = assignee {
            let previous = record.conversation.assigned_to.take();
            if let Some(previous) = previous {
                if let Some(mut agent) = self.agents.get_mut(&previous.id) {
                    agent.assigned_count = (agent.assigned_count - 1).max(0);
                }
            }
            if let Some(mut agent) = self.agents.get_mut(&assignee.id) {
                agent.assigned_count += 1;
            }
            record.conversation.assigned_to = Some(assignee.clone());
            patch.assigned_to = Some(assignee);
        }

        Ok(patch)
    }

    pub fn agents(&self) -> Vec<Agent> {
        let mut agents: Vec<Agent> = self.agents.iter().map(|entry| entry.value().clone()).collect();
        agents.sort_by(|left, right| left.name.cmp(&right.name));
        agents
    }

    pub fn quick_replies(&self) -> Vec<QuickReply> {
        self.quick_replies
            .read()
            .expect("quick replies lock")
            .clone()
    }

    /// Seed a small demo dataset for running the server standalone.
    pub fn seed_demo(&self) {
        self.add_agent("agent-1", "Sam Rivera");
        self.add_agent("agent-2", "Priya Nair");

        self.add_quick_reply(
            "Greeting",
            "Thanks for reaching out! How can we help?",
            Some("general"),
        );
        self.add_quick_reply(
            "Order status",
            "Could you share your order number so we can look into it?",
            Some("orders"),
        );
        self.add_quick_reply("Closing", "Glad we could help. Have a great day!", Some("general"));

        let customers = [
            ("customer-1", "Ada Lovelace", "ada@example.com"),
            ("customer-2", "Grace Hopper", "grace@example.com"),
            ("customer-3", "Alan Turing", "alan@example.com"),
        ];
        let subjects = [
            Some("Order never arrived"),
            Some("Refund request"),
            None,
        ];
        for ((id, name, email), subject) in customers.iter().zip(subjects) {
            let conversation = self.create_conversation(
                subject,
                1,
                Customer {
                    id: id.to_string(),
                    name: name.to_string(),
                    email: Some(email.to_string()),
                    avatar_url: None,
                },
            );
            self.append_customer_message(&conversation.id, "Hi, I need some help with my order.");
        }
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}
