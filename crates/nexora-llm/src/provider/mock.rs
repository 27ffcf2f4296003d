//! Mock LLM provider for testing

use crate::client::{LLMClient, LLMRequest, LLMResponse};
use crate::error::{LLMError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One scripted outcome
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Error { status: u16, message: String },
}

/// Mock LLM provider
///
/// Scripted replies are consumed in order; once the script is exhausted the
/// default response is returned. Every request is recorded.
pub struct MockProvider {
    default_response: String,
    script: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<LLMRequest>>,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self::with_response("Mock LLM response")
    }

    /// Create with custom default response
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a successful reply
    pub fn then_reply(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Text(text.into()));
        self
    }

    /// Queue a failing reply with the given HTTP status
    pub fn then_fail(self, status: u16, message: impl Into<String>) -> Self {
        self.push(MockReply::Error {
            status,
            message: message.into(),
        });
        self
    }

    fn push(&self, reply: MockReply) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, oldest first
    /// User prompts received, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| request.prompt)
            .collect()
    }

    /// Full requests received, oldest first
    pub fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for MockProvider {
    async fn call(&self, request: LLMRequest) -> Result<LLMResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match next {
            Some(MockReply::Error { status, message }) => {
                Err(LLMError::ApiStatus { status, message })
            }
            Some(MockReply::Text(text)) => Ok(LLMResponse::new(text, request.model).with_tokens(10)),
            None => Ok(LLMResponse::new(self.default_response.clone(), request.model)
                .with_tokens(10)),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
