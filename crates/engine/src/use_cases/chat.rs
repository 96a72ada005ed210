//! NPC chat use case.
//!
//! Sends the player's message and the recent conversation with the same NPC
//! to the AI worker. When the worker fails, the reply comes from the era's
//! offline pool instead; the player always gets an answer.

use std::sync::Arc;

use chronoquest_domain::offline::{fallback_line, FALLBACK_MODEL};
use chronoquest_shared::{ChatRequest, ChatResponse};

use crate::infrastructure::ports::{
    AiWorkerPort, ChatTurn, ConversationRecord, ConversationRepo, WorkerChatRequest,
};

pub const DEFAULT_NPC_NAME: &str = "Local Guide";

/// Model recorded when the worker does not name one.
pub const DEFAULT_CHAT_MODEL: &str = "grok-3-fast";

/// Prior exchanges sent as context.
pub const HISTORY_LIMIT: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message required")]
    MissingMessage,
}

pub struct ChatWithNpc {
    worker: Arc<dyn AiWorkerPort>,
    conversations: Arc<dyn ConversationRepo>,
}

impl ChatWithNpc {
    pub fn new(worker: Arc<dyn AiWorkerPort>, conversations: Arc<dyn ConversationRepo>) -> Self {
        Self {
            worker,
            conversations,
        }
    }

    pub async fn execute(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        if request.message.trim().is_empty() {
            return Err(ChatError::MissingMessage);
        }

        let npc_name = request
            .npc_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NPC_NAME.to_string());
        let era = request.chapter_era.unwrap_or_default();
        let chapter_id = request
            .chapter_id
            .map(|id| id.into_string())
            .unwrap_or_default();
        let chapter_title = request
            .chapter_title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| era.clone());

        // Context is best-effort; a cache failure only costs the NPC its memory
        let prior = match self
            .conversations
            .recent(&chapter_id, &npc_name, HISTORY_LIMIT)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, npc = %npc_name, "Failed to load conversation history");
                Vec::new()
            }
        };
        let turn = prior.len();
        let history: Vec<ChatTurn> = prior
            .into_iter()
            .rev()
            .flat_map(|row| [ChatTurn::user(row.user_msg), ChatTurn::assistant(row.npc_reply)])
            .collect();

        let worker_request = WorkerChatRequest {
            user_message: request.message.clone(),
            npc_name: npc_name.clone(),
            era: era.clone(),
            chapter_title,
            history,
            chapter_id: chapter_id.clone(),
        };

        let (reply, model) = match self.worker.chat(worker_request).await {
            Ok(answer) if !answer.reply.trim().is_empty() => (
                answer.reply,
                answer.model.unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            ),
            Ok(_) => {
                tracing::warn!(npc = %npc_name, "Worker returned an empty reply, using fallback");
                (fallback_line(&era, turn).to_string(), FALLBACK_MODEL.to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, npc = %npc_name, "Chat failed, using fallback");
                (fallback_line(&era, turn).to_string(), FALLBACK_MODEL.to_string())
            }
        };

        if let Err(e) = self
            .conversations
            .record(ConversationRecord {
                chapter_id,
                npc_name,
                user_msg: request.message,
                npc_reply: reply.clone(),
                model: model.clone(),
            })
            .await
        {
            tracing::warn!(error = %e, "Failed to record conversation");
        }

        Ok(ChatResponse { reply, model })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        ChatRole, MockAiWorkerPort, MockConversationRepo, RepoError, WorkerChatReply, WorkerError,
    };
    use chronoquest_domain::ChapterId;

    fn request(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            npc_name: Some("Hiro".to_string()),
            chapter_era: Some("Edo Japan".to_string()),
            chapter_id: Some(ChapterId::new("2")),
            chapter_title: None,
        }
    }

    fn row(user: &str, reply: &str) -> ConversationRecord {
        ConversationRecord {
            chapter_id: "2".into(),
            npc_name: "Hiro".into(),
            user_msg: user.into(),
            npc_reply: reply.into(),
            model: "grok-3-fast".into(),
        }
    }

    #[tokio::test]
    async fn when_message_empty_returns_error() {
        let use_case = ChatWithNpc::new(
            Arc::new(MockAiWorkerPort::new()),
            Arc::new(MockConversationRepo::new()),
        );
        let result = use_case.execute(request("   ")).await;
        assert!(matches!(result, Err(ChatError::MissingMessage)));
    }

    #[tokio::test]
    async fn sends_history_oldest_first_and_records_exchange() {
        let mut conversations = MockConversationRepo::new();
        conversations
            .expect_recent()
            .withf(|chapter, npc, limit| chapter == "2" && npc == "Hiro" && *limit == 10)
            .returning(|_, _, _| Ok(vec![row("second", "b"), row("first", "a")]));
        conversations
            .expect_record()
            .withf(|r| r.user_msg == "What is koku?" && r.npc_reply == "A measure of rice.")
            .times(1)
            .returning(|_| Ok(()));

        let mut worker = MockAiWorkerPort::new();
        worker
            .expect_chat()
            .withf(|req| {
                req.chapter_title == "Edo Japan"
                    && req.history.len() == 4
                    && req.history[0].content == "first"
                    && req.history[1].role == ChatRole::Assistant
                    && req.history[3].content == "b"
            })
            .returning(|_| {
                Ok(WorkerChatReply {
                    reply: "A measure of rice.".into(),
                    model: Some("grok-3-fast".into()),
                })
            });

        let use_case = ChatWithNpc::new(Arc::new(worker), Arc::new(conversations));
        let response = use_case.execute(request("What is koku?")).await.unwrap();
        assert_eq!(response.reply, "A measure of rice.");
        assert_eq!(response.model, "grok-3-fast");
    }

    #[tokio::test]
    async fn worker_failure_falls_back_to_era_line() {
        let mut conversations = MockConversationRepo::new();
        conversations
            .expect_recent()
            .returning(|_, _, _| Err(RepoError::database("recent", "locked")));
        conversations
            .expect_record()
            .withf(|r| r.model == FALLBACK_MODEL)
            .returning(|_| Ok(()));

        let mut worker = MockAiWorkerPort::new();
        worker
            .expect_chat()
            .returning(|_| Err(WorkerError::Timeout));

        let use_case = ChatWithNpc::new(Arc::new(worker), Arc::new(conversations));
        let response = use_case.execute(request("Hello")).await.unwrap();
        assert_eq!(response.model, FALLBACK_MODEL);
        assert_eq!(response.reply, fallback_line("Edo Japan", 0));
    }

    #[tokio::test]
    async fn missing_npc_name_defaults_to_local_guide() {
        let mut conversations = MockConversationRepo::new();
        conversations
            .expect_recent()
            .withf(|_, npc, _| npc == DEFAULT_NPC_NAME)
            .returning(|_, _, _| Ok(vec![]));
        conversations.expect_record().returning(|_| Ok(()));

        let mut worker = MockAiWorkerPort::new();
        worker
            .expect_chat()
            .withf(|req| req.npc_name == DEFAULT_NPC_NAME)
            .returning(|_| {
                Ok(WorkerChatReply {
                    reply: "Welcome, traveller.".into(),
                    model: None,
                })
            });

        let mut req = request("Hi");
        req.npc_name = None;
        let use_case = ChatWithNpc::new(Arc::new(worker), Arc::new(conversations));
        let response = use_case.execute(req).await.unwrap();
        assert_eq!(response.model, DEFAULT_CHAT_MODEL);
    }
}
