//! Precision Engine - validation orchestrator
//!
//! Public entry point for validating documents. One engine owns its cache
//! and its engine-wide slot pool, so several isolated engines can live in
//! one process.
//!
//! # Pipeline (per document)
//! 1. **Cache lookup** (caching enabled, non-blank id): a live entry is
//!    returned immediately with `from_cache = true`
//! 2. **Engine slot**: waits for one of `max_concurrent_validations` slots
//! 3. **Rule checkers**: each runs as its own task holding one of
//!    `max_concurrent_checks` per-document slots
//! 4. **Aggregate**: findings in checker declaration order, regardless of
//!    completion order. A checker error or panic becomes a single critical
//!    `VALIDATION_ERROR` finding for the first failing phase.
//! 5. **Score**, 6. **cache write**, 7. **slot release** (guard drop)
//!
//! Validation never returns an error to the caller; every call yields a
//! well-formed [`ValidationResult`].

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{CorpusContext, Document};
use crate::services::concurrency::ConcurrencyLimiter;
use crate::services::quality_scorer;
use crate::services::validation_cache::{CacheStats, ValidationCache};
use crate::types::{
    CheckError, Finding, FindingCategory, RuleChecker, Severity, ValidationPhase,
    ValidationResult,
};
use crate::validators::default_checkers;
use reqforge_common::time::{self, elapsed_millis};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{AbortHandle, JoinError, JoinHandle};
use tracing::{debug, warn};

/// Engine statistics snapshot
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub cache_enabled: bool,
    pub cache: CacheStats,
    /// Validations currently holding an engine slot
    pub in_flight_validations: usize,
    /// Highest number of validations ever holding engine slots at once
    pub peak_in_flight_validations: usize,
    /// Validations that ran the checkers (cache hits excluded)
    pub total_validations: u64,
    pub max_concurrent_checks: usize,
    pub max_concurrent_validations: usize,
}

/// Validation orchestrator
pub struct PrecisionEngine {
    config: EngineConfig,
    checkers: Vec<Arc<dyn RuleChecker>>,
    cache: ValidationCache,
    engine_slots: ConcurrencyLimiter,
    total_validations: AtomicU64,
}

impl std::fmt::Debug for PrecisionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrecisionEngine")
            .field("config", &self.config)
            .field("checkers", &self.checkers.len())
            .field("cache_entries", &self.cache.len())
            .finish()
    }
}

impl Default for PrecisionEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default(), default_checkers())
    }
}

impl PrecisionEngine {
    /// Create engine with the built-in checkers
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Self::with_checkers(config, default_checkers())
    }

    /// Create engine with a custom checker list (aggregated in list order)
    pub fn with_checkers(
        config: EngineConfig,
        checkers: Vec<Arc<dyn RuleChecker>>,
    ) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::build(config, checkers))
    }

    fn build(config: EngineConfig, checkers: Vec<Arc<dyn RuleChecker>>) -> Self {
        Self {
            cache: ValidationCache::new(config.cache_ttl, config.cache_max_entries),
            engine_slots: ConcurrencyLimiter::new("engine_validations", config.max_concurrent_validations),
            checkers,
            config,
            total_validations: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate one document, optionally against a corpus
    pub async fn validate_document(
        &self,
        document: &Document,
        corpus: Option<&CorpusContext>,
    ) -> ValidationResult {
        let started = Instant::now();
        let cache_key = document.key().filter(|_| self.config.cache_enabled);

        if let Some(key) = cache_key {
            if let Some(mut cached) = self.cache.get(key) {
                cached.from_cache = true;
                debug!(document_id = %key, from_cache = true, "Cache hit");
                return cached;
            }
        }

        let _slot = match self.engine_slots.acquire().await {
            Ok(slot) => slot,
            Err(e) => {
                warn!(document_id = ?document.key(), error = %e, "Engine slot unavailable");
                let findings = vec![validation_error("engine", &e.to_string())];
                return self.finish(document, findings, started);
            }
        };

        self.total_validations.fetch_add(1, Ordering::Relaxed);
        let findings = self.run_checkers(document, corpus).await;
        let result = self.finish(document, findings, started);

        if let Some(key) = cache_key {
            self.cache.put(key, result.clone());
        }

        debug!(
            document_id = ?result.document_id,
            is_valid = result.is_valid,
            quality_score = result.quality_score,
            findings = result.findings.len(),
            processing_time_ms = result.processing_time_ms,
            "Document validated"
        );

        result
    }

    /// Validate with a caller-supplied deadline
    ///
    /// On expiry the in-progress validation is abandoned: its engine slot is
    /// released, nothing is cached and its checker tasks are aborted. A
    /// checker already inside its synchronous `check` runs to completion.
    pub async fn validate_document_with_deadline(
        &self,
        document: &Document,
        corpus: Option<&CorpusContext>,
        deadline: Duration,
    ) -> EngineResult<ValidationResult> {
        tokio::time::timeout(deadline, self.validate_document(document, corpus))
            .await
            .map_err(|_| {
                warn!(
                    document_id = ?document.key(),
                    deadline_ms = deadline.as_millis() as u64,
                    "Validation deadline exceeded"
                );
                EngineError::DeadlineExceeded(deadline)
            })
    }

    async fn run_checkers(&self, document: &Document, corpus: Option<&CorpusContext>) -> Vec<Finding> {
        let shared_document = Arc::new(document.clone());
        let corpus = corpus.cloned();
        let document_slots = ConcurrencyLimiter::new("document_checks", self.config.max_concurrent_checks);

        let handles: Vec<(ValidationPhase, JoinHandle<Result<Vec<Finding>, CheckError>>)> = self
            .checkers
            .iter()
            .map(|checker| {
                let phase = checker.phase();
                let checker = Arc::clone(checker);
                let document = Arc::clone(&shared_document);
                let corpus = corpus.clone();
                let slots = document_slots.clone();

                let handle = tokio::spawn(async move {
                    let _slot = slots
                        .acquire()
                        .await
                        .map_err(|e| CheckError::Internal(e.to_string()))?;
                    checker.check(&document, corpus.as_ref())
                });
                (phase, handle)
            })
            .collect();
        let _abort_guard = AbortOnDrop(handles.iter().map(|(_, h)| h.abort_handle()).collect());

        let mut findings = Vec::new();
        let mut failed_phase: Option<ValidationPhase> = None;

        for (phase, handle) in handles {
            let outcome = match handle.await {
                Ok(Ok(found)) => Ok(found),
                Ok(Err(e)) => Err(e.to_string()),
                Err(join_error) => Err(describe_join_error(join_error)),
            };

            match outcome {
                Ok(found) => {
                    debug!(
                        document_id = ?document.key(),
                        phase = %phase,
                        findings = found.len(),
                        "Rule checker finished"
                    );
                    findings.extend(found);
                }
                Err(message) => {
                    warn!(
                        document_id = ?document.key(),
                        phase = %phase,
                        error = %message,
                        "Rule checker failed"
                    );
                    if failed_phase.is_none() {
                        failed_phase = Some(phase);
                        findings.push(validation_error(phase.as_str(), &message));
                    }
                }
            }
        }

        findings
    }

    fn finish(&self, document: &Document, findings: Vec<Finding>, started: Instant) -> ValidationResult {
        let is_valid = !findings.iter().any(Finding::is_error);
        let quality_score = quality_scorer::score(&findings, document);

        ValidationResult {
            document_id: document.key().map(str::to_string),
            kind: document.kind(),
            is_valid,
            findings,
            quality_score,
            processing_time_ms: elapsed_millis(started),
            from_cache: false,
            validated_at: time::now(),
        }
    }

    /// Drop every cached result
    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!("Validation cache cleared");
    }

    /// Drop the cached result for one document id
    pub fn invalidate(&self, document_id: &str) -> bool {
        self.cache.invalidate(document_id.trim())
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            cache_enabled: self.config.cache_enabled,
            cache: self.cache.stats(),
            in_flight_validations: self.engine_slots.in_flight(),
            peak_in_flight_validations: self.engine_slots.peak_in_flight(),
            total_validations: self.total_validations.load(Ordering::Relaxed),
            max_concurrent_checks: self.config.max_concurrent_checks,
            max_concurrent_validations: self.config.max_concurrent_validations,
        }
    }
}

/// Aborts checker tasks still pending when a validation future is dropped
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

fn validation_error(phase: &str, message: &str) -> Finding {
    Finding::error(
        FindingCategory::ValidationError,
        Severity::Critical,
        phase,
        format!("Validation failed during {} phase: {}", phase, message),
    )
}

fn describe_join_error(error: JoinError) -> String {
    if error.is_cancelled() {
        return "checker task was cancelled".to_string();
    }
    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("checker panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("checker panicked: {}", message)
    } else {
        "checker panicked".to_string()
    }
}
