//! Unit tests for core value types as they appear on the wire

use nexora_core::{
    join_excerpts, CustomerProfile, DocumentExcerpt, InteractionAction, InteractionRecord,
    Recommendation, TransactionEvent,
};

#[test]
fn test_profile_collection_from_json() {
    let json = r#"[
        {
            "user_id": "USR_001",
            "historic_data": {"avg_monthly_income": 4500},
            "risk_profiling": {"tolerance": "Low", "requirement": "Stable savings"},
            "questionnaire": {"goals": "Emergency fund"}
        },
        {
            "user_id": "USR_002",
            "historic_data": {"avg_monthly_income": 12000.5},
            "risk_profiling": {"tolerance": "High", "requirement": "Aggressive growth"},
            "questionnaire": {"goals": "Retire at 45"}
        }
    ]"#;

    let profiles: Vec<CustomerProfile> = serde_json::from_str(json).unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[1].monthly_income(), 12000.5);
    assert!(profiles.iter().all(|p| p.validate().is_ok()));
}

#[test]
fn test_profile_collection_from_yaml() {
    let yaml = r#"
- user_id: USR_010
  historic_data:
    avg_monthly_income: 3000
  risk_profiling:
    tolerance: Moderate
    requirement: Balanced
  questionnaire:
    goals: Child education
"#;

    let profiles: Vec<CustomerProfile> = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(profiles[0].risk_tolerance(), "Moderate");
}

#[test]
fn test_event_serialization_is_flat() -> anyhow::Result<()> {
    let event = TransactionEvent::new("USR_001", 99.99, "Purchase at Steam")
        .with_transaction_type("E-COMMERCE");

    let value = serde_json::to_value(&event)?;
    assert_eq!(value["user_id"], "USR_001");
    assert_eq!(value["description"], "Purchase at Steam");
    assert_eq!(value["transaction_type"], "E-COMMERCE");
    assert!(value.get("timestamp").is_none());

    let back: TransactionEvent = serde_json::from_value(value)?;
    assert_eq!(back, event);
    Ok(())
}

#[test]
fn test_event_missing_description_is_rejected() {
    let json = r#"{"user_id": "USR_001", "amount": 10.0}"#;
    assert!(serde_json::from_str::<TransactionEvent>(json).is_err());
}

#[test]
fn test_excerpt_scores_are_optional() {
    let json = r#"[{"text": "Gold Loan at 9%"}, {"text": "Home Loan", "score": 0.82, "source": "loans.pdf"}]"#;
    let excerpts: Vec<DocumentExcerpt> = serde_json::from_str(json).unwrap();

    assert!(excerpts[0].score.is_none());
    assert_eq!(excerpts[1].source.as_deref(), Some("loans.pdf"));
    assert_eq!(join_excerpts(&excerpts), "Gold Loan at 9%\nHome Loan");
}

#[test]
fn test_recommendation_summary() {
    let rec = Recommendation::new(
        "Premium Travel Card",
        "Since you travel often, this card waives foreign transaction fees.",
    );
    let summary = rec.summary();

    assert!(summary.starts_with("Premium Travel Card: Since"));
    assert!(summary.ends_with("..."));
    assert_eq!(summary.chars().count(), 53);
}

#[test]
fn test_interaction_record_serializes_action_name() {
    let record = InteractionRecord::new("USR_002", InteractionAction::Dismissed, "anything");
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["action"], "DISMISSED");
    assert_eq!(value["user_id"], "USR_002");
}
