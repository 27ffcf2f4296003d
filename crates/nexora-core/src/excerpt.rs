//! Document excerpts returned by the knowledge retriever

use serde::{Deserialize, Serialize};

/// A chunk of source content returned by similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentExcerpt {
    /// Chunk text
    pub text: String,

    /// Similarity score (higher is more similar), when the store reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,

    /// Source document (file name, URL, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl DocumentExcerpt {
    /// Create a new excerpt
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            score: None,
            source: None,
        }
    }

    /// Set the similarity score
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    /// Set the source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Concatenate excerpt texts, newline-joined, into a single context block.
///
/// Zero excerpts produce an empty string.
pub fn join_excerpts(excerpts: &[DocumentExcerpt]) -> String {
    excerpts
        .iter()
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_excerpts() {
        let excerpts = vec![
            DocumentExcerpt::new("Travel Rewards Card: 3x points on flights"),
            DocumentExcerpt::new("Travel Insurance: covers cancellations").with_score(0.71),
        ];

        assert_eq!(
            join_excerpts(&excerpts),
            "Travel Rewards Card: 3x points on flights\nTravel Insurance: covers cancellations"
        );
    }

    #[test]
    fn test_join_empty() {
        assert_eq!(join_excerpts(&[]), "");
    }
}
