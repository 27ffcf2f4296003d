//! Recommendation produced by the generator

use serde::{Deserialize, Serialize};

/// Product name used when the generation service output cannot be parsed
pub const FALLBACK_PRODUCT_NAME: &str = "Bank Offer";

/// Personalized product recommendation
///
/// On the wire the explanation is carried under the `recommendation` key,
/// which is the key the generation service is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Name of the recommended bank product
    pub product_name: String,

    /// Personalized explanation, nominally two sentences
    #[serde(rename = "recommendation", alias = "recommendation_text")]
    pub recommendation_text: String,

    #[serde(skip)]
    fallback: bool,
}

impl Recommendation {
    /// Create a new recommendation
    pub fn new(product_name: impl Into<String>, recommendation_text: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            recommendation_text: recommendation_text.into(),
            fallback: false,
        }
    }

    /// Build the fallback recommendation that wraps unparseable output
    pub fn fallback(raw_text: impl Into<String>) -> Self {
        Self {
            product_name: FALLBACK_PRODUCT_NAME.to_string(),
            recommendation_text: raw_text.into(),
            fallback: true,
        }
    }

    /// Whether this value was produced by the fallback path
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Short form used in interaction logs: first 50 characters plus "..."
    pub fn summary(&self) -> String {
        crate::interaction::summarize(&format!(
            "{}: {}",
            self.product_name, self.recommendation_text
        ))
    }
}
