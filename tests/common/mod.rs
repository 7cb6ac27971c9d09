#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use wordwolf::domain::model::{ModelRequest, ModelResponse};
use wordwolf::{Result, TextGenerator, WordWolfError};

/// Replays canned replies in order and records every prompt it was sent.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn reply(self, body: serde_json::Value) -> Self {
        self.reply_raw(body.to_string())
    }

    pub fn reply_raw(self, text: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    pub fn fail(self, message: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Err(message.into()));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(ModelResponse { text }),
            Some(Err(message)) => Err(WordWolfError::ExternalService { message }),
            None => Err(WordWolfError::ExternalService {
                message: "no scripted reply left".to_string(),
            }),
        }
    }
}

pub fn candidates(domain: &str, words: &[&str]) -> serde_json::Value {
    let explanations: Vec<String> = words.iter().map(|w| format!("about {}", w)).collect();
    serde_json::json!({
        "domain": domain,
        "sub_domain": "misc",
        "difficulty_level": 2,
        "words": words,
        "explanations": explanations,
    })
}
