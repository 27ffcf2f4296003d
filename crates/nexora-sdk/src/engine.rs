//! Recommendation engine - main runtime API

use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use crate::notification::{format_offer_sms, DeliveryId, Notifier};
use crate::prompts::{self, Prompt};
use crate::retry;
use crate::session::Session;
use nexora_core::{
    join_excerpts, ChatMessage, CustomerProfile, DocumentExcerpt, InteractionAction,
    InteractionRecord, Recommendation, TransactionEvent,
};
use nexora_llm::{extract_json, normalize_response, LLMClient, LLMRequest};
use nexora_repository::{InteractionLog, ProfileRepository, RepositoryError};
use nexora_retrieval::KnowledgeRetriever;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Recommendation engine
///
/// Stateless between requests apart from the interaction log; one engine is
/// shared by every session.
pub struct RecommendationEngine {
    pub(crate) profiles: Arc<dyn ProfileRepository>,
    pub(crate) retriever: Arc<dyn KnowledgeRetriever>,
    pub(crate) llm: Arc<dyn LLMClient>,
    pub(crate) notifier: Option<Arc<dyn Notifier>>,
    pub(crate) interaction_log: Arc<dyn InteractionLog>,
    pub(crate) config: EngineConfig,
}

impl RecommendationEngine {
    /// Produce a recommendation for a transaction event
    pub async fn generate(&self, event: &TransactionEvent) -> Result<Recommendation> {
        event.validate()?;
        let profile = self.find_profile(&event.user_id)?;

        info!(
            user_id = %event.user_id,
            amount = event.amount,
            "generating recommendation"
        );

        let excerpts = self
            .search(&event.description, self.config.recommendation_k)
            .await?;
        let context = join_excerpts(&excerpts);

        let prompt = prompts::recommendation_prompt(profile, event, &context);
        debug!(
            user_id = %event.user_id,
            tolerance = %profile.risk_tolerance(),
            "risk tolerance compliance is requested in the prompt only; output is unverified"
        );

        let raw = self.complete(prompt).await?;
        let recommendation = parse_recommendation(&raw);

        if recommendation.is_fallback() {
            warn!(user_id = %event.user_id, "generation output was not valid JSON, using fallback");
        } else {
            info!(
                user_id = %event.user_id,
                product = %recommendation.product_name,
                "recommendation generated"
            );
        }

        Ok(recommendation)
    }

    /// Answer a free-form question in the user's context
    pub async fn chat(&self, user_id: &str, message: &str) -> Result<String> {
        let profile = self.find_profile(user_id)?;
        info!(user_id, "answering chat question");

        let excerpts = self.search(message, self.config.chat_k).await?;
        let context = join_excerpts(&excerpts);

        let prompt = prompts::chat_prompt(profile, &context, message);
        let raw = self.complete(prompt).await?;

        Ok(raw.trim().to_string())
    }

    /// Open a session for a known user
    pub fn start_session(&self, user_id: &str) -> Result<Session> {
        self.find_profile(user_id)?;
        Ok(Session::new(user_id))
    }

    /// Generate a recommendation and hold it in the session
    ///
    /// Replaces any recommendation already pending.
    pub async fn recommend(
        &self,
        session: &mut Session,
        event: &TransactionEvent,
    ) -> Result<Recommendation> {
        if event.user_id != session.user_id() {
            return Err(SdkError::InvalidEvent(format!(
                "event for {} sent to session of {}",
                event.user_id,
                session.user_id()
            )));
        }

        let recommendation = self.generate(event).await?;
        session.pending = Some(recommendation.clone());
        Ok(recommendation)
    }

    /// Accept the pending recommendation: send the SMS and log it
    ///
    /// On delivery failure the recommendation stays pending so the user can
    /// try again.
    pub async fn accept(&self, session: &mut Session) -> Result<DeliveryId> {
        let pending = session
            .pending
            .as_ref()
            .ok_or(SdkError::NoPendingRecommendation)?;

        let notifier = self
            .notifier
            .as_ref()
            .ok_or_else(|| SdkError::Configuration("no notifier configured".to_string()))?;
        let destination = self
            .config
            .sms_destination
            .as_deref()
            .ok_or_else(|| SdkError::Configuration("no SMS destination configured".to_string()))?;

        let body = format_offer_sms(&pending.product_name);
        let summary = pending.summary();

        // A resent POST is a second SMS: only failures that prove nothing
        // went out are retried, and a timed-out attempt is final
        let delivery_id = retry::run_at_most_once(&self.config.retry, "sms_delivery", || {
            notifier.send(&body, destination)
        })
        .await
        .map_err(|e| {
            error!(user_id = %session.user_id(), error = %e, "SMS delivery failed");
            SdkError::Notification(e)
        })?;

        info!(user_id = %session.user_id(), delivery_id = %delivery_id, "offer accepted");

        // The SMS is out; clear first so a log failure cannot cause a resend
        session.pending = None;
        self.record(session.user_id(), InteractionAction::Accepted, &summary)
            .await?;

        Ok(delivery_id)
    }

    /// Dismiss the pending recommendation
    pub async fn dismiss(&self, session: &mut Session) -> Result<Recommendation> {
        let dismissed = session
            .pending
            .take()
            .ok_or(SdkError::NoPendingRecommendation)?;

        info!(user_id = %session.user_id(), product = %dismissed.product_name, "offer dismissed");
        self.record(
            session.user_id(),
            InteractionAction::Dismissed,
            &dismissed.summary(),
        )
        .await?;

        Ok(dismissed)
    }

    /// Ask a question within the session, keeping the chat history
    pub async fn ask(&self, session: &mut Session, message: &str) -> Result<String> {
        session.history.push(ChatMessage::user(message));

        let user_id = session.user_id().to_string();
        let reply = self.chat(&user_id, message).await?;
        session.history.push(ChatMessage::assistant(reply.clone()));

        self.record(&user_id, InteractionAction::ChatQuery, message)
            .await?;
        Ok(reply)
    }

    /// All recorded interactions, oldest first
    pub async fn interactions(&self) -> Result<Vec<InteractionRecord>> {
        self.interaction_log
            .read_all()
            .await
            .map_err(SdkError::InteractionLog)
    }

    /// Profiles in source order
    pub fn profiles(&self) -> Vec<&CustomerProfile> {
        self.profiles.list()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn find_profile(&self, user_id: &str) -> Result<&CustomerProfile> {
        self.profiles.find(user_id).map_err(|e| match e {
            RepositoryError::NotFound { user_id } => {
                warn!(user_id = %user_id, "unknown user");
                SdkError::UserNotFound { user_id }
            }
            other => SdkError::Configuration(other.to_string()),
        })
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<DocumentExcerpt>> {
        let retriever = &self.retriever;
        let excerpts = retry::run(&self.config.retry, "knowledge_search", move || {
            retriever.search(query, k)
        })
        .await
        .map_err(|e| {
            error!(error = %e, "knowledge retrieval failed");
            SdkError::Retrieval(e)
        })?;

        debug!(requested = k, found = excerpts.len(), "retrieved product context");
        Ok(excerpts)
    }

    async fn complete(&self, prompt: Prompt) -> Result<String> {
        let settings = &self.config.llm;
        let request = LLMRequest::new(prompt.user, settings.model.clone())
            .with_system(prompt.system)
            .with_sampling(settings.temperature, settings.max_tokens);

        let llm = &self.llm;
        let response = retry::run(&self.config.retry, "text_generation", move || {
            llm.call(request.clone())
        })
        .await
        .map_err(|e| {
            error!(model = %settings.model, error = %e, "text generation failed");
            SdkError::Service(e)
        })?;

        if response.is_truncated() {
            warn!(model = %response.model, "generation stopped at the token limit");
        }
        debug!(
            model = %response.model,
            tokens = ?response.tokens_used,
            finish_reason = ?response.finish_reason,
            "generation complete"
        );
        Ok(response.content)
    }

    async fn record(&self, user_id: &str, action: InteractionAction, detail: &str) -> Result<()> {
        let record = InteractionRecord::new(user_id, action, detail);
        self.interaction_log.append(record).await.map_err(|e| {
            error!(user_id, action = %action, error = %e, "failed to record interaction");
            SdkError::InteractionLog(e)
        })
    }
}

/// Turn raw generation output into a recommendation
///
/// Never fails: anything that is not a JSON object with string
/// `product_name` and `recommendation` becomes the fallback wrapping the
/// normalized text.
pub fn parse_recommendation(raw: &str) -> Recommendation {
    match extract_json::<Recommendation>(raw) {
        Ok(rec) if !rec.product_name.trim().is_empty() => rec,
        _ => Recommendation::fallback(normalize_response(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let rec = parse_recommendation(
            r#"{"product_name": "Travel Card", "recommendation": "Earn miles. No FX fees."}"#,
        );
        assert_eq!(rec.product_name, "Travel Card");
        assert_eq!(rec.recommendation_text, "Earn miles. No FX fees.");
        assert!(!rec.is_fallback());
    }

    #[test]
    fn test_parse_fenced_json() {
        let rec = parse_recommendation(
            "```json\n{\"product_name\":\"X\",\"recommendation\":\"Y\"}\n```",
        );
        assert_eq!(rec, Recommendation::new("X", "Y"));
    }

    #[test]
    fn test_parse_free_text_falls_back() {
        let rec = parse_recommendation("Sorry, I cannot help.");
        assert_eq!(rec.product_name, "Bank Offer");
        assert_eq!(rec.recommendation_text, "Sorry, I cannot help.");
        assert!(rec.is_fallback());
    }

    #[test]
    fn test_parse_missing_key_falls_back() {
        let rec = parse_recommendation(r#"{"product_name": "X"}"#);
        assert!(rec.is_fallback());
        assert_eq!(rec.recommendation_text, r#"{"product_name": "X"}"#);
    }

    #[test]
    fn test_parse_non_string_value_falls_back() {
        let rec = parse_recommendation(r#"{"product_name": 7, "recommendation": "Y"}"#);
        assert!(rec.is_fallback());
    }

    #[test]
    fn test_parse_empty_output() {
        let rec = parse_recommendation("   \n");
        assert!(rec.is_fallback());
        assert_eq!(rec.recommendation_text, "");
    }
}
