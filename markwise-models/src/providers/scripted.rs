//! Scripted provider for tests and offline runs.
//!
//! Queue replies with [`ScriptedProvider::push_reply`] or
//! [`ScriptedProvider::push_error`]; each `chat()` consumes one entry in
//! order. Every request is recorded so tests can assert on prompts.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatRequest, ChatResponse, ModelProvider};
use crate::{Error, Result};

/// A queued outcome for the next `chat()` call.
enum Scripted {
    Reply(String),
    Fail(String),
}

/// In-memory provider that replays queued responses.
#[derive(Default)]
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    /// Create an empty provider. Calls fail until something is queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, content: impl Into<String>) -> &Self {
        self.lock_queue().push_back(Scripted::Reply(content.into()));
        self
    }

    /// Queue a provider failure.
    pub fn push_error(&self, message: impl Into<String>) -> &Self {
        self.lock_queue().push_back(Scripted::Fail(message.into()));
        self
    }

    /// Number of replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lock_queue().len()
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<Scripted>> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);

        match self.lock_queue().pop_front() {
            Some(Scripted::Reply(content)) => Ok(ChatResponse::text(content)),
            Some(Scripted::Fail(message)) => Err(Error::ProviderApi(message)),
            None => Err(Error::Request("no scripted response queued".to_string())),
        }
    }
}
