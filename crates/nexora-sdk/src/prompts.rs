//! Prompt templates for the text generation service

use nexora_core::{CustomerProfile, TransactionEvent};

/// A filled template
///
/// `system` goes to the provider's system channel, `user` is the turn itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Persona and compliance rule for recommendations
pub const RECOMMENDATION_SYSTEM: &str = "You are a helpful Financial Advisor for a Bank.
COMPLIANCE: Only recommend products that match the user's Risk Tolerance.";

/// Transaction-triggered recommendation
pub const RECOMMENDATION_PROMPT: &str = r#"USER PROFILE:
- Monthly Income: {income}
- Risk Tolerance: {tolerance}
- Financial Goal: {goal}

RECENT ACTIVITY:
- User just spent ${amount} at {description}.

AVAILABLE BANK PRODUCTS (Retrieved from DB):
{context}

TASK: Output a JSON object with keys: 'product_name' and 'recommendation' (the 2-sentence personalized message).
Ensure the output is raw JSON without markdown formatting.
"#;

/// Assistant persona for chat, scoped to the user's risk tolerance
pub const CHAT_SYSTEM: &str = "You are a Smart Bank Assistant. Use the provided Product Context to answer the User Question.
If the question is about Loans, Insurance, or Investments, give a 'Smart Recommendation'
based on the user's Profile: {tolerance} risk tolerance.";

/// Free-form chat question
pub const CHAT_PROMPT: &str = r#"CONTEXT FROM BANK DB:
{context}

USER QUESTION: {question}
"#;

/// Fill the recommendation templates
pub fn recommendation_prompt(
    profile: &CustomerProfile,
    event: &TransactionEvent,
    context: &str,
) -> Prompt {
    let income = profile.monthly_income().to_string();
    let amount = format_amount(event.amount);
    let user = render(
        RECOMMENDATION_PROMPT,
        &[
            ("income", income.as_str()),
            ("tolerance", profile.risk_tolerance()),
            ("goal", profile.financial_goal()),
            ("amount", amount.as_str()),
            ("description", event.description.as_str()),
            ("context", context),
        ],
    );

    Prompt {
        system: RECOMMENDATION_SYSTEM.to_string(),
        user,
    }
}

/// Fill the chat templates
pub fn chat_prompt(profile: &CustomerProfile, context: &str, question: &str) -> Prompt {
    Prompt {
        system: render(CHAT_SYSTEM, &[("tolerance", profile.risk_tolerance())]),
        user: render(CHAT_PROMPT, &[("context", context), ("question", question)]),
    }
}

/// Single-pass `{name}` substitution; inserted values are never rescanned
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let var = tail.find('}').and_then(|close| {
            let name = &tail[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });

        match var {
            Some((close, value)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}
