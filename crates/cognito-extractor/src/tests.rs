//! End-to-end tests for the extractor against the mock provider

use crate::{ConceptExtractor, ExtractorConfig, ExtractorError};
use cognito_domain::Document;
use cognito_llm::MockProvider;
use std::sync::Arc;
use std::time::Duration;

const ALPHA_REPLY: &str = r#"```json
{
    "concepts": [
        {"name": "Working memory", "type": "theory", "description": "d", "domain": "psychology", "importance": 0.9},
        {"name": "Dual-task paradigm", "type": "method", "description": "d", "domain": "psychology", "importance": 0.6}
    ],
    "claims": [
        {"text": "Capacity is about four items", "claim_type": "finding", "confidence": 0.8}
    ]
}
```"#;

const BETA_REPLY: &str = r#"{
    "concepts": [
        {"name": "Attention schema", "type": "theory", "description": "d", "domain": "neuroscience", "importance": 0.7}
    ],
    "claims": [
        {"text": "Attention is modelled internally", "claim_type": "theory", "confidence": 0.6},
        {"text": "The model is simplified", "claim_type": "observation", "confidence": 0.5}
    ]
}"#;

fn docs() -> Vec<Document> {
    vec![
        Document::new("alpha", "Alpha study", "alpha body text"),
        Document::new("broken", "Broken study", "broken body text"),
        Document::new("beta", "Beta study", "beta body text"),
    ]
}

fn provider() -> MockProvider {
    let llm = MockProvider::new("not json at all");
    llm.add_response("Paper Title: Alpha study", ALPHA_REPLY);
    llm.add_response("Paper Title: Beta study", BETA_REPLY);
    llm
}

#[tokio::test]
async fn test_one_failure_does_not_suppress_others() {
    let extractor = ConceptExtractor::new(Arc::new(provider()), ExtractorConfig::default());

    let report = extractor.extract_all(&docs(), None).await;

    assert_eq!(report.concepts.len(), 3);
    assert_eq!(report.claims.len(), 3);
    assert_eq!(report.documents_succeeded, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].document_id, "broken");
    assert_eq!(report.degradation_notes().len(), 1);
}

#[tokio::test]
async fn test_llm_error_isolated() {
    let llm = provider();
    llm.add_error("Paper Title: Broken study");
    let extractor = ConceptExtractor::new(Arc::new(llm), ExtractorConfig::default());

    let report = extractor.extract_all(&docs(), None).await;
    assert_eq!(report.documents_succeeded, 2);
    assert!(report.failures[0].reason.contains("LLM error"));
}

#[tokio::test]
async fn test_claim_ids_deterministic_and_ordered() {
    let extractor = ConceptExtractor::new(Arc::new(provider()), ExtractorConfig::default());
    let report = extractor.extract_all(&docs(), None).await;

    let ids: Vec<_> = report.claims.iter().map(|c| c.id.to_string()).collect();
    assert_eq!(ids, vec!["alpha_claim_0", "beta_claim_0", "beta_claim_1"]);
}

#[tokio::test]
async fn test_concurrent_fan_out_keeps_input_order() {
    let llm = MockProvider::new("{}");
    llm.add_delayed("Paper Title: Alpha study", Duration::from_millis(80), ALPHA_REPLY);
    llm.add_response("Paper Title: Beta study", BETA_REPLY);
    let config = ExtractorConfig {
        concurrency: 3,
        ..Default::default()
    };
    let extractor = ConceptExtractor::new(Arc::new(llm), config);

    let report = extractor.extract_all(&docs(), None).await;
    let names: Vec<_> = report.concepts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Working memory", "Dual-task paradigm", "Attention schema"]);
}

#[tokio::test]
async fn test_timeout_is_scoped_to_document() {
    let slow = MockProvider::new("{}");
    slow.add_delayed("Paper Title: Alpha study", Duration::from_secs(5), ALPHA_REPLY);
    slow.add_response("Paper Title: Beta study", BETA_REPLY);

    let config = ExtractorConfig {
        call_timeout_secs: 1,
        ..Default::default()
    };
    let extractor = ConceptExtractor::new(Arc::new(slow), config);
    let report = extractor
        .extract_all(&[docs()[0].clone(), docs()[2].clone()], None)
        .await;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].reason, ExtractorError::Timeout.to_string());
    assert_eq!(report.concepts.len(), 1);
}

#[tokio::test]
async fn test_empty_and_duplicate_documents() {
    let llm = Arc::new(provider());
    let extractor = ConceptExtractor::new(Arc::clone(&llm), ExtractorConfig::default());
    let documents = vec![
        Document::new("alpha", "Alpha study", "alpha body text"),
        Document::new("alpha", "Alpha study", "again"),
        Document::new("blank", "Blank", "   "),
    ];

    let report = extractor.extract_all(&documents, None).await;
    assert_eq!(report.documents_succeeded, 1);
    assert_eq!(report.failures.len(), 2);
    // The blank document never reaches the model
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn test_request_budget_and_excerpt() {
    let llm = Arc::new(provider());
    let config = ExtractorConfig {
        max_excerpt_chars: 5,
        ..Default::default()
    };
    let extractor = ConceptExtractor::new(Arc::clone(&llm), config);
    let doc = Document::new("alpha", "Alpha study", "0123456789");

    extractor
        .extract_document(&doc, Some("memory"))
        .await
        .unwrap();

    let request = &llm.calls()[0];
    assert_eq!(request.max_tokens, 3000);
    assert!(request.prompt.contains("01234\n"));
    assert!(!request.prompt.contains("56789"));
    assert!(request.prompt.contains("Focus Area: memory"));
    assert!(request.system_prompt.is_some());
}

#[tokio::test]
async fn test_concurrent_extraction_on_spawned_task_keeps_input_order() {
    let llm = MockProvider::new("not json at all");
    llm.add_delayed("Paper Title: Alpha study", Duration::from_millis(30), ALPHA_REPLY);
    llm.add_response("Paper Title: Beta study", BETA_REPLY);
    let extractor = Arc::new(ConceptExtractor::new(
        Arc::new(llm),
        ExtractorConfig {
            concurrency: 3,
            ..ExtractorConfig::default()
        },
    ));

    let report = tokio::spawn(async move { extractor.extract_all(&docs(), Some("memory")).await })
        .await
        .unwrap();

    let papers: Vec<_> = report
        .concepts
        .iter()
        .map(|c| c.source_paper_id.as_str())
        .collect();
    assert_eq!(papers, vec!["alpha", "alpha", "beta"]);
    assert_eq!(report.failures.len(), 1);
}
