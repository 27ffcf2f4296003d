//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use nexora_core::{CustomerProfile, DocumentExcerpt};
use nexora_llm::{LLMClient, MockProvider};
use nexora_repository::{InMemoryInteractionLog, ProfileStore};
use nexora_retrieval::{KnowledgeRetriever, RetrievalError, RetrievalResult};
use nexora_sdk::{
    EngineConfig, MockNotifier, RecommendationEngine, RecommendationEngineBuilder, RetryPolicy,
};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const VALID_JSON: &str =
    r#"{"product_name": "Platinum Travel Card", "recommendation": "Earn 3x miles on flights. No foreign transaction fees."}"#;

pub fn profiles() -> Vec<CustomerProfile> {
    vec![
        CustomerProfile::new(
            "USR_001",
            5200.0,
            "Low",
            "Conservative saver",
            "Buy a house in 5 years",
        ),
        CustomerProfile::new(
            "USR_002",
            8000.0,
            "High",
            "Growth investor",
            "Early retirement",
        ),
    ]
}

/// Retriever returning fixed excerpts and counting calls
pub struct CountingRetriever {
    excerpts: Vec<DocumentExcerpt>,
    calls: AtomicUsize,
    queries: Mutex<Vec<(String, usize)>>,
    transient_failures: AtomicU32,
}

impl CountingRetriever {
    pub fn new(texts: &[&str]) -> Self {
        Self {
            excerpts: texts.iter().map(|t| DocumentExcerpt::new(*t)).collect(),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            transient_failures: AtomicU32::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(&[])
    }

    pub fn fail_times(self, n: u32) -> Self {
        self.transient_failures.store(n, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl KnowledgeRetriever for CountingRetriever {
    async fn search(&self, query: &str, k: usize) -> RetrievalResult<Vec<DocumentExcerpt>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push((query.to_string(), k));

        let failing = self
            .transient_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(RetrievalError::Store("connection refused".to_string()));
        }

        Ok(self.excerpts.iter().take(k).cloned().collect())
    }
}

/// Retry policy without real waiting
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay_ms: 1,
        max_delay_ms: 2,
        timeout_ms: 5_000,
        jitter: false,
    }
}

pub struct Harness {
    pub engine: RecommendationEngine,
    pub retriever: Arc<CountingRetriever>,
    pub llm: Arc<MockProvider>,
    pub notifier: Arc<MockNotifier>,
    pub log: Arc<InMemoryInteractionLog>,
}

pub fn harness(retriever: CountingRetriever, llm: MockProvider) -> Harness {
    harness_with(retriever, llm, MockNotifier::new())
}

pub fn harness_with(
    retriever: CountingRetriever,
    llm: MockProvider,
    notifier: MockNotifier,
) -> Harness {
    let retriever = Arc::new(retriever);
    let llm = Arc::new(llm);
    let notifier = Arc::new(notifier);
    let log = Arc::new(InMemoryInteractionLog::new());

    let engine = RecommendationEngineBuilder::new()
        .with_profiles(Arc::new(ProfileStore::from_profiles(profiles()).unwrap()))
        .with_retriever(retriever.clone())
        .with_llm(llm.clone() as Arc<dyn LLMClient>)
        .with_notifier(notifier.clone())
        .with_interaction_log(log.clone())
        .with_config(
            EngineConfig::default()
                .with_retry(fast_retry())
                .with_sms_destination("+15551234567"),
        )
        .build()
        .unwrap();

    Harness {
        engine,
        retriever,
        llm,
        notifier,
        log,
    }
}
