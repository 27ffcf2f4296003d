//! Twilio Programmable Messaging

use super::{DeliveryId, Notifier, NotifyError, NotifyResult};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

const TWILIO_API: &str = "https://api.twilio.com";

/// Who the message is sent from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TwilioSender {
    /// A Messaging Service SID (`MG...`)
    MessagingService(String),
    /// A Twilio phone number
    From(String),
}

/// SMS notifier backed by the Twilio REST API
pub struct TwilioNotifier {
    client: reqwest::Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
    sender: TwilioSender,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

impl TwilioNotifier {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        sender: TwilioSender,
    ) -> NotifyResult<Self> {
        let account_sid = account_sid.into();
        let auth_token = auth_token.into();
        if account_sid.trim().is_empty() || auth_token.trim().is_empty() {
            return Err(NotifyError::Configuration(
                "account SID and auth token are required".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: TWILIO_API.to_string(),
            account_sid,
            auth_token,
            sender,
        })
    }

    /// Override the API host (tests, regional edges)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    async fn send(&self, body: &str, destination: &str) -> NotifyResult<DeliveryId> {
        let preview: String = body.chars().take(50).collect();
        debug!("Sending SMS: {}...", preview);

        let sender = match &self.sender {
            TwilioSender::MessagingService(sid) => ("MessagingServiceSid", sid.as_str()),
            TwilioSender::From(number) => ("From", number.as_str()),
        };
        let form = [("To", destination), ("Body", body), sender];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_builder() {
                    NotifyError::Unsent(e.to_string())
                } else {
                    NotifyError::Transport(e.to_string())
                }
            })?;

        // From here Twilio has seen the request; a failure means the outcome
        // is unknown
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.message)
                .unwrap_or(text);
            return Err(NotifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessageResponse = serde_json::from_str(&text)
            .map_err(|e| NotifyError::InvalidResponse(e.to_string()))?;

        info!(sid = %parsed.sid, "SMS accepted by Twilio");
        Ok(DeliveryId(parsed.sid))
    }
}
