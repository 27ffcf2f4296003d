//! Interaction records for the audit log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SUMMARY_CHARS: usize = 50;

/// User action recorded in the interaction log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionAction {
    Accepted,
    Dismissed,
    ChatQuery,
}

impl InteractionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionAction::Accepted => "ACCEPTED",
            InteractionAction::Dismissed => "DISMISSED",
            InteractionAction::ChatQuery => "CHAT_QUERY",
        }
    }
}

impl fmt::Display for InteractionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACCEPTED" => Ok(InteractionAction::Accepted),
            "DISMISSED" => Ok(InteractionAction::Dismissed),
            "CHAT_QUERY" => Ok(InteractionAction::ChatQuery),
            other => Err(format!("unknown interaction action: {}", other)),
        }
    }
}

/// One row of the append-only interaction log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub action: InteractionAction,
    pub summary: String,
}

impl InteractionRecord {
    /// Create a record stamped with the current time; `detail` is truncated
    pub fn new(user_id: impl Into<String>, action: InteractionAction, detail: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            user_id: user_id.into(),
            action,
            summary: summarize(detail),
        }
    }
}

/// First 50 characters followed by "..."
pub(crate) fn summarize(text: &str) -> String {
    let head: String = text.chars().take(SUMMARY_CHARS).collect();
    format!("{}...", head)
}
