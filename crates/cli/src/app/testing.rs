use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::Mutex;

use lmchat_core::llm::{
    ChatCompletionRequest, ChatCompletionResponse, ChatError, ChatMessage, Choice, Model,
    ModelClient, ModelListResponse, TransportError, Usage,
};

use super::App;

pub type ScriptedApp = App<FakeClient, Cursor<Vec<u8>>, Vec<u8>>;

/// In-memory stand-in for the HTTP client. Queued replies are consumed in
/// order; `None` in the queue is a transport failure.
#[derive(Default)]
pub struct FakeClient {
    pub models: Vec<String>,
    pub fail_models: bool,
    replies: Mutex<VecDeque<Option<Vec<String>>>>,
    seen: Mutex<Vec<ChatCompletionRequest>>,
}

impl FakeClient {
    pub fn with_models(mut self, ids: &[&str]) -> Self {
        self.models = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn failing_models(mut self) -> Self {
        self.fail_models = true;
        self
    }

    pub fn reply(self, contents: &[&str]) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Some(contents.iter().map(|s| s.to_string()).collect()));
        self
    }

    pub fn fail_next(self) -> Self {
        self.replies.lock().unwrap().push_back(None);
        self
    }

    pub fn seen(&self) -> Vec<ChatCompletionRequest> {
        self.seen.lock().unwrap().clone()
    }
}

fn refused() -> ChatError {
    TransportError::Network("connection refused".into()).into()
}

impl ModelClient for FakeClient {
    async fn list_models(&self) -> Result<ModelListResponse, ChatError> {
        if self.fail_models {
            return Err(refused());
        }
        Ok(ModelListResponse {
            data: self
                .models
                .iter()
                .map(|id| Model {
                    id: id.clone(),
                    object: "model".into(),
                    owned_by: "tester".into(),
                })
                .collect(),
        })
    }

    async fn create_chat_completion(
        &self,
        req: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ChatError> {
        self.seen.lock().unwrap().push(req.clone());
        let next = self.replies.lock().unwrap().pop_front().unwrap_or(Some(vec![]));
        let Some(contents) = next else {
            return Err(refused());
        };
        Ok(ChatCompletionResponse {
            id: "fake-1".into(),
            object: "chat.completion".into(),
            created: 0,
            model: req.model.clone(),
            choices: contents
                .into_iter()
                .enumerate()
                .map(|(i, c)| Choice {
                    index: i as u32,
                    message: ChatMessage::assistant(c),
                    finish_reason: Some("stop".into()),
                })
                .collect(),
            usage: Some(Usage {
                prompt_tokens: 5,
                completion_tokens: 2,
                total_tokens: 7,
            }),
        })
    }
}

/// Runs the menu over `script` as stdin and returns the app with everything it printed.
pub async fn run_script(client: FakeClient, script: &str) -> (ScriptedApp, String) {
    run_input(client, script.as_bytes()).await
}

/// Like [`run_script`] for raw stdin bytes.
pub async fn run_input(client: FakeClient, input: &[u8]) -> (ScriptedApp, String) {
    let mut app = App::new(
        client,
        Cursor::new(input.to_vec()),
        Vec::new(),
        "test-model",
    );
    app.run().await.expect("menu loop");
    let out = String::from_utf8_lossy(&app.out).into_owned();
    (app, out)
}
