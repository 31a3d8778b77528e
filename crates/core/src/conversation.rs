use tracing::debug;

use crate::llm::{ChatCompletionRequest, ChatError, ChatMessage, ModelClient};

/// Caller-owned transcript for a multi-turn chat.
#[derive(Clone, Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Request carrying the whole transcript so far.
    pub fn request(&self, model: &str, max_tokens: Option<u32>) -> ChatCompletionRequest {
        let mut req = ChatCompletionRequest::new(model, self.messages.clone());
        req.max_tokens = max_tokens;
        req
    }

    /// Appends `input`, sends the transcript and appends the first reply if there is one.
    ///
    /// On error the user message is popped again, leaving the transcript as it was.
    pub async fn turn<C: ModelClient>(
        &mut self,
        client: &C,
        model: &str,
        input: &str,
        max_tokens: Option<u32>,
    ) -> Result<Option<ChatMessage>, ChatError> {
        self.messages.push(ChatMessage::user(input));
        let req = self.request(model, max_tokens);
        match client.create_chat_completion(&req).await {
            Ok(resp) => {
                let reply = resp.first_message().cloned();
                if let Some(m) = &reply {
                    self.messages.push(m.clone());
                }
                debug!(target: "core::conversation", "turn done len={} replied={}", self.messages.len(), reply.is_some());
                Ok(reply)
            }
            Err(e) => {
                self.messages.pop();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{
        ChatCompletionResponse, Choice, ModelListResponse, Role, TransportError, NO_RESPONSE,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned replies and records every request it receives.
    #[derive(Default)]
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<Vec<&'static str>, ()>>>,
        seen: Mutex<Vec<ChatCompletionRequest>>,
    }

    impl ScriptedClient {
        fn with(replies: Vec<Result<Vec<&'static str>, ()>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::default(),
            }
        }
    }

    impl ModelClient for ScriptedClient {
        async fn list_models(&self) -> Result<ModelListResponse, ChatError> {
            Ok(ModelListResponse::default())
        }

        async fn create_chat_completion(
            &self,
            req: &ChatCompletionRequest,
        ) -> Result<ChatCompletionResponse, ChatError> {
            self.seen.lock().unwrap().push(req.clone());
            let next = self.replies.lock().unwrap().pop_front().unwrap_or(Ok(vec![]));
            match next {
                Ok(texts) => Ok(ChatCompletionResponse {
                    choices: texts
                        .into_iter()
                        .enumerate()
                        .map(|(i, t)| Choice {
                            index: i as u32,
                            message: ChatMessage::assistant(t),
                            finish_reason: Some("stop".into()),
                        })
                        .collect(),
                    ..Default::default()
                }),
                Err(()) => Err(TransportError::Network("connection refused".into()).into()),
            }
        }
    }

    #[tokio::test]
    async fn second_turn_sends_three_messages_in_order() {
        let client = ScriptedClient::with(vec![Ok(vec!["Hello"]), Ok(vec!["Fine"])]);
        let mut conv = Conversation::new();
        conv.turn(&client, "m", "Hi", Some(500)).await.unwrap();
        conv.turn(&client, "m", "How are you?", Some(500)).await.unwrap();

        let seen = client.seen.lock().unwrap();
        let second = &seen[1].messages;
        assert_eq!(second.len(), 3);
        assert_eq!(second[0], ChatMessage::user("Hi"));
        assert_eq!(second[1], ChatMessage::assistant("Hello"));
        assert_eq!(second[2], ChatMessage::user("How are you?"));
        assert_eq!(seen[1].max_tokens, Some(500));
        assert_eq!(conv.len(), 4);
    }

    #[tokio::test]
    async fn failed_turn_leaves_transcript_untouched() {
        let client = ScriptedClient::with(vec![Ok(vec!["Hello"]), Err(())]);
        let mut conv = Conversation::new();
        conv.turn(&client, "m", "Hi", None).await.unwrap();
        let before = conv.messages().to_vec();

        let err = conv.turn(&client, "m", "again", None).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(conv.messages(), before.as_slice());
    }

    #[tokio::test]
    async fn empty_reply_keeps_user_message_only() {
        let client = ScriptedClient::with(vec![Ok(vec![])]);
        let mut conv = Conversation::new();
        let reply = conv.turn(&client, "m", "Hi", None).await.unwrap();
        assert!(reply.is_none());
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.messages()[0].role, Role::User);
    }

    #[tokio::test]
    async fn only_first_choice_is_appended() {
        let client = ScriptedClient::with(vec![Ok(vec!["one", "two"])]);
        let mut conv = Conversation::new();
        let reply = conv.turn(&client, "m", "Hi", None).await.unwrap();
        assert_eq!(reply.unwrap().content, "one");
        assert_eq!(conv.len(), 2);
    }

    #[tokio::test]
    async fn clear_resets_to_empty() {
        let client = ScriptedClient::with(vec![Ok(vec!["Hello"])]);
        let mut conv = Conversation::new();
        conv.turn(&client, "m", "Hi", None).await.unwrap();
        conv.clear();
        assert!(conv.is_empty());
    }

    #[tokio::test]
    async fn simple_chat_uses_fixed_defaults_and_first_choice() {
        let client = ScriptedClient::with(vec![Ok(vec!["Bonjour", "Salut"])]);
        assert_eq!(client.simple_chat("hello", "m").await.unwrap(), "Bonjour");
        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].max_tokens, Some(500));
        assert_eq!(seen[0].temperature, Some(0.7));
        assert_eq!(seen[0].messages, vec![ChatMessage::user("hello")]);
    }

    #[tokio::test]
    async fn simple_chat_zero_choices_is_sentinel_not_error() {
        let client = ScriptedClient::with(vec![Ok(vec![]), Ok(vec![""])]);
        assert_eq!(client.simple_chat("x", "m").await.unwrap(), NO_RESPONSE);
        assert_eq!(client.simple_chat_reply("x", "m").await.unwrap(), Some(String::new()));
    }
}
