//! Parse LLM output into concepts and claims

use crate::error::ExtractorError;
use crate::types::DocumentExtraction;
use cognito_domain::confidence::{clamp_unit, DEFAULT_SCORE};
use cognito_domain::{Claim, ClaimId, Concept, ConceptType, Document};
use cognito_llm::strip_code_fences;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Parse an extraction reply for `document`
///
/// The reply must be a JSON object (optionally fenced). Missing `concepts`
/// or `claims` arrays count as empty. Malformed entries are skipped; the
/// claim ordinal is the entry's position in the reply's array, so skipped
/// entries leave a gap rather than shifting later ids.
pub fn parse_extraction(
    response: &str,
    document: &Document,
) -> Result<DocumentExtraction, ExtractorError> {
    let json: Value = serde_json::from_str(strip_code_fences(response))
        .map_err(|e| ExtractorError::JsonParse(e.to_string()))?;

    let obj = json
        .as_object()
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected JSON object".to_string()))?;

    let mut extraction = DocumentExtraction::default();

    for (idx, item) in entries(obj, "concepts")?.iter().enumerate() {
        match parse_concept(item, document) {
            Ok(concept) => extraction.concepts.push(concept),
            Err(e) => {
                warn!("Document {}: skipping concept {}: {}", document.id, idx, e);
                extraction.skipped_entries += 1;
            }
        }
    }

    for (idx, item) in entries(obj, "claims")?.iter().enumerate() {
        match parse_claim(item, idx, document) {
            Ok(claim) => extraction.claims.push(claim),
            Err(e) => {
                warn!("Document {}: skipping claim {}: {}", document.id, idx, e);
                extraction.skipped_entries += 1;
            }
        }
    }

    Ok(extraction)
}

fn entries<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], ExtractorError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ExtractorError::InvalidFormat(format!(
            "'{}' must be an array",
            key
        ))),
    }
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_concept(json: &Value, document: &Document) -> Result<Concept, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Concept is not a JSON object".to_string())?;

    let name = non_empty_str(obj, "name")
        .ok_or_else(|| "Missing or invalid 'name'".to_string())?
        .to_string();

    let concept_type = match obj.get("type").and_then(|v| v.as_str()) {
        Some(label) => ConceptType::parse(label).unwrap_or_else(|| {
            debug!("Unknown concept type '{}', using phenomenon", label);
            ConceptType::Phenomenon
        }),
        None => ConceptType::Phenomenon,
    };

    let importance = obj.get("importance").and_then(|v| v.as_f64()).map(clamp_unit);

    Ok(Concept {
        name,
        concept_type,
        description: non_empty_str(obj, "description").unwrap_or_default().to_string(),
        domain: non_empty_str(obj, "domain").unwrap_or_default().to_string(),
        importance,
        source_paper_id: document.id.clone(),
        source_paper_title: document.title.clone(),
    })
}

fn parse_claim(json: &Value, ordinal: usize, document: &Document) -> Result<Claim, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Claim is not a JSON object".to_string())?;

    let text = non_empty_str(obj, "text")
        .ok_or_else(|| "Missing or invalid 'text'".to_string())?
        .to_string();

    let confidence = obj
        .get("confidence")
        .and_then(|v| v.as_f64())
        .map(clamp_unit)
        .unwrap_or(DEFAULT_SCORE);

    Ok(Claim {
        id: ClaimId::for_document(&document.id, ordinal),
        text,
        claim_type: non_empty_str(obj, "claim_type")
            .unwrap_or("finding")
            .to_lowercase(),
        confidence,
        source_paper_id: document.id.clone(),
        source_paper_title: document.title.clone(),
        page_reference: non_empty_str(obj, "page_reference").map(str::to_string),
    })
}
