//! Integration tests for batch validation and auto-fix suggestions

use reqforge_engine::models::{Capability, Enabler};
use reqforge_engine::{
    generate_auto_fix_suggestions, CorpusContext, Document, FindingCategory, PrecisionEngine,
};

fn valid_capability() -> Document {
    Document::from(Capability {
        id: Some("CAP-0001".to_string()),
        title: Some("Billing".to_string()),
        description: Some("Invoice customers monthly based on metered usage".to_string()),
        status: Some("Draft".to_string()),
        priority: Some("High".to_string()),
        owner: Some("Finance Platform".to_string()),
        enablers: vec!["ENB-0001".to_string()],
        ..Default::default()
    })
}

fn invalid_capability() -> Document {
    Document::from(Capability {
        id: Some("CAP-0002".to_string()),
        description: Some("Short".to_string()),
        status: Some("draft".to_string()),
        priority: Some("high".to_string()),
        ..Default::default()
    })
}

#[tokio::test]
async fn test_valid_and_invalid_summary() {
    let engine = PrecisionEngine::default();
    let documents = vec![valid_capability(), invalid_capability()];

    let report = engine.batch_validate(&documents, None).await;

    assert_eq!(report.summary.total_documents, 2);
    assert_eq!(report.summary.valid_documents, 1);
    assert_eq!(report.summary.invalid_documents, 1);
    assert!(!report.all_valid());
    assert!(report.results[0].is_valid);
    assert!(!report.results[1].is_valid);

    let expected_errors: usize = report.results.iter().map(|r| r.errors().count()).sum();
    assert_eq!(report.summary.total_errors, expected_errors);

    let mean = report
        .results
        .iter()
        .map(|r| f64::from(r.quality_score))
        .sum::<f64>()
        / 2.0;
    assert!((report.summary.average_quality_score - mean).abs() < 1e-9);
}

#[tokio::test]
async fn test_one_bad_document_does_not_abort_batch() {
    let engine = PrecisionEngine::default();
    let documents = vec![
        Document::from(Enabler::default()),
        valid_capability(),
        Document::from(Capability::default()),
    ];

    let report = engine.batch_validate(&documents, None).await;

    assert_eq!(report.results.len(), 3);
    assert!(report.results[1].is_valid);
    assert_eq!(report.summary.invalid_documents, 2);
}

#[tokio::test]
async fn test_report_serializes_with_camel_case_fields() {
    let engine = PrecisionEngine::default();
    let report = engine.batch_validate(&[invalid_capability()], None).await;

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["summary"]["invalidDocuments"], 1);
    assert!(json["runId"].is_string());
    let result = &json["results"][0];
    assert_eq!(result["documentId"], "CAP-0002");
    assert_eq!(result["isValid"], false);
    assert!(result["processingTimeMillis"].is_u64());
    assert_eq!(result["findings"][0]["category"], "MISSING_REQUIRED_FIELD");
    assert_eq!(result["findings"][0]["kind"], "error");
}

#[tokio::test]
async fn test_auto_fix_for_batch() {
    let engine = PrecisionEngine::default();
    let documents = vec![
        valid_capability(),
        invalid_capability(),
        Document::from(Capability {
            id: Some("CAP7".to_string()),
            title: Some("Payments".to_string()),
            description: Some("Accept card payments from customers worldwide".to_string()),
            status: Some("Draft".to_string()),
            priority: Some("Medium".to_string()),
            owner: Some("Payments".to_string()),
            ..Default::default()
        }),
    ];
    let corpus = CorpusContext::new(documents.clone());

    let report = engine.batch_validate(&documents, Some(&corpus)).await;
    let fixes = generate_auto_fix_suggestions(&report.results, Some(&corpus));

    let for_doc = |id: &str| {
        fixes
            .iter()
            .filter(|f| f.document_id.as_deref() == Some(id))
            .map(|f| (f.field.as_str(), f.suggested_value.as_str()))
            .collect::<Vec<_>>()
    };

    // CAP-0002: missing title + owner, lower-case status and priority
    assert_eq!(
        for_doc("CAP-0002"),
        vec![
            ("title", "Untitled Capability"),
            ("owner", "Unassigned"),
            ("status", "Draft"),
            ("priority", "High"),
        ]
    );

    // CAP7: digits salvaged into a conforming id
    let id_fix = fixes
        .iter()
        .find(|f| f.category == FindingCategory::InvalidIdFormat)
        .unwrap();
    assert_eq!(id_fix.suggested_value, "CAP-0007");
    assert_eq!(id_fix.current_value.as_deref(), Some("CAP7"));

    assert!(for_doc("CAP-0001").is_empty());
    assert!(fixes.iter().all(|f| (0.0..=1.0).contains(&f.confidence)));
}

#[tokio::test]
async fn test_duplicate_ids_in_corpus_are_errors() {
    let engine = PrecisionEngine::default();
    let mut renamed = valid_capability();
    if let Document::Capability(capability) = &mut renamed {
        capability.title = Some("Invoicing".to_string());
    }
    let documents = vec![valid_capability(), renamed];
    let corpus = CorpusContext::new(documents.clone());

    let report = engine.batch_validate(&documents, Some(&corpus)).await;

    assert_eq!(report.summary.invalid_documents, 2);
    for result in &report.results {
        assert!(result
            .errors()
            .any(|f| f.category == FindingCategory::DuplicateId));
    }
}
