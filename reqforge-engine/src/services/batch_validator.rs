//! Batch validation
//!
//! Runs the orchestrator over a whole corpus. Every document is submitted at
//! once; the engine-wide slot pool bounds how many actually validate
//! concurrently. Results keep input order, and a document that fails
//! internally only affects its own result.

use crate::models::{CorpusContext, Document};
use crate::services::precision_engine::PrecisionEngine;
use crate::types::{FindingKind, ValidationResult};
use futures::future::join_all;
use reqforge_common::time::elapsed_millis;
use serde::Serialize;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Aggregate figures for one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total_documents: usize,
    pub valid_documents: usize,
    pub invalid_documents: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_suggestions: usize,
    /// Results served from the cache
    pub cached_results: usize,
    /// Mean quality score (0.0 for an empty batch)
    pub average_quality_score: f64,
    /// Wall-clock time for the whole batch
    #[serde(rename = "processingTimeMillis")]
    pub processing_time_ms: u64,
}

impl BatchSummary {
    /// Summarize results
    pub fn from_results(results: &[ValidationResult], processing_time_ms: u64) -> Self {
        let total_documents = results.len();
        let valid_documents = results.iter().filter(|r| r.is_valid).count();
        let score_sum: u64 = results.iter().map(|r| u64::from(r.quality_score)).sum();

        Self {
            total_documents,
            valid_documents,
            invalid_documents: total_documents - valid_documents,
            total_errors: results.iter().map(|r| r.count(FindingKind::Error)).sum(),
            total_warnings: results.iter().map(|r| r.count(FindingKind::Warning)).sum(),
            total_suggestions: results.iter().map(|r| r.count(FindingKind::Suggestion)).sum(),
            cached_results: results.iter().filter(|r| r.from_cache).count(),
            average_quality_score: if total_documents == 0 {
                0.0
            } else {
                score_sum as f64 / total_documents as f64
            },
            processing_time_ms,
        }
    }
}

/// Batch outcome
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub run_id: Uuid,
    /// One result per input document, in input order
    pub results: Vec<ValidationResult>,
    pub summary: BatchSummary,
}

impl BatchReport {
    pub fn all_valid(&self) -> bool {
        self.summary.invalid_documents == 0
    }
}

impl PrecisionEngine {
    /// Validate every document of a corpus
    pub async fn batch_validate(
        &self,
        documents: &[Document],
        corpus: Option<&CorpusContext>,
    ) -> BatchReport {
        let run_id = Uuid::new_v4();
        let started = Instant::now();

        let results = join_all(
            documents
                .iter()
                .map(|document| self.validate_document(document, corpus)),
        )
        .await;

        let summary = BatchSummary::from_results(&results, elapsed_millis(started));

        info!(
            run_id = %run_id,
            total = summary.total_documents,
            valid = summary.valid_documents,
            invalid = summary.invalid_documents,
            errors = summary.total_errors,
            warnings = summary.total_warnings,
            cached = summary.cached_results,
            average_quality_score = summary.average_quality_score,
            processing_time_ms = summary.processing_time_ms,
            "Batch validation complete"
        );

        BatchReport {
            run_id,
            results,
            summary,
        }
    }
}
