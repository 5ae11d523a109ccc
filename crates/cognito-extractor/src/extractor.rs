//! Core extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_extraction;
use crate::prompt::{PromptBuilder, SYSTEM_PROMPT};
use crate::types::{DocumentExtraction, ExtractionFailure, ExtractionReport};
use cognito_domain::{Document, LlmProvider, LlmRequest};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Extracts concepts and claims from documents
pub struct ConceptExtractor<L: LlmProvider> {
    llm: Arc<L>,
    config: ExtractorConfig,
}

impl<L: LlmProvider> ConceptExtractor<L> {
    /// Create a new extractor sharing `llm`
    pub fn new(llm: Arc<L>, config: ExtractorConfig) -> Self {
        Self { llm, config }
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract from one document
    ///
    /// Errors are scoped to this document; callers batching documents
    /// should record them and move on.
    pub async fn extract_document(
        &self,
        document: &Document,
        focus_area: Option<&str>,
    ) -> Result<DocumentExtraction, ExtractorError> {
        if !document.is_usable() {
            return Err(ExtractorError::EmptyDocument(document.id.clone()));
        }

        let excerpt = document.excerpt(self.config.max_excerpt_chars);
        let prompt = PromptBuilder::new(&document.title, excerpt)
            .with_focus_area(focus_area)
            .build();
        debug!(
            "Document {}: prompt {} chars (excerpt {} of {} chars)",
            document.id,
            prompt.len(),
            excerpt.len(),
            document.text.len()
        );

        let request = LlmRequest::new(prompt)
            .with_system(SYSTEM_PROMPT)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature);

        let response = timeout(self.config.call_timeout(), self.call_llm(&request))
            .await
            .map_err(|_| ExtractorError::Timeout)??;

        let extraction = parse_extraction(&response, document)?;
        info!(
            "Document {}: {} concepts, {} claims ({} entries skipped)",
            document.id,
            extraction.concepts.len(),
            extraction.claims.len(),
            extraction.skipped_entries
        );
        Ok(extraction)
    }

    async fn call_llm(&self, request: &LlmRequest) -> Result<String, ExtractorError> {
        self.llm
            .generate(request)
            .await
            .map_err(|e| ExtractorError::Llm(e.to_string()))
    }

    /// Extract from every document, isolating failures per document
    ///
    /// Results are concatenated in input order regardless of concurrency.
    /// A document whose id already appeared earlier in the batch is skipped
    /// so claim ids stay unique within the session.
    pub async fn extract_all(
        &self,
        documents: &[Document],
        focus_area: Option<&str>,
    ) -> ExtractionReport {
        let mut seen = HashSet::new();
        let mut report = ExtractionReport::default();
        let mut unique = Vec::with_capacity(documents.len());

        for document in documents {
            if seen.insert(document.id.as_str()) {
                unique.push(document);
            } else {
                warn!("Skipping duplicate document id {}", document.id);
                report.failures.push(ExtractionFailure {
                    document_id: document.id.clone(),
                    reason: ExtractorError::DuplicateDocument(document.id.clone()).to_string(),
                });
            }
        }

        // Indexed items keep the closure argument free of borrows, so the
        // combined future stays `Send` inside `async_trait` methods.
        let unique = &unique;
        let results: Vec<_> = stream::iter(0..unique.len())
            .map(|i| {
                let document = unique[i];
                async move { (document, self.extract_document(document, focus_area).await) }
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        for (document, result) in results {
            match result {
                Ok(extraction) => {
                    report.concepts.extend(extraction.concepts);
                    report.claims.extend(extraction.claims);
                    report.documents_succeeded += 1;
                }
                Err(e) => {
                    warn!("Extraction failed for document {}: {}", document.id, e);
                    report.failures.push(ExtractionFailure {
                        document_id: document.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Extraction finished: {} concepts, {} claims, {}/{} documents failed",
            report.concepts.len(),
            report.claims.len(),
            report.failures.len(),
            documents.len()
        );
        report
    }
}
