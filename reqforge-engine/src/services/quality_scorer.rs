//! Quality score calculation
//!
//! Start at 100, subtract 10 per error and 5 per warning, add 5 each for a
//! description longer than the bonus threshold, non-empty acceptance
//! criteria and a non-empty implementation plan, then clamp to 0..=100.
//! Suggestions do not affect the score.

use crate::catalog::QUALITY_GATES;
use crate::models::{is_present, Document};
use crate::types::{Finding, FindingKind};

const BASE_SCORE: i64 = 100;
const ERROR_PENALTY: i64 = 10;
const WARNING_PENALTY: i64 = 5;
const COMPLETENESS_BONUS: i64 = 5;

/// Score a document from its findings
pub fn score(findings: &[Finding], document: &Document) -> u8 {
    let errors = findings.iter().filter(|f| f.kind == FindingKind::Error).count() as i64;
    let warnings = findings.iter().filter(|f| f.kind == FindingKind::Warning).count() as i64;

    let mut score = BASE_SCORE - ERROR_PENALTY * errors - WARNING_PENALTY * warnings;

    let description_length = document
        .description()
        .map(|d| d.trim().chars().count())
        .unwrap_or(0);
    if description_length > QUALITY_GATES.score_bonus_description_length {
        score += COMPLETENESS_BONUS;
    }
    if is_present(document.acceptance_criteria()) {
        score += COMPLETENESS_BONUS;
    }
    if is_present(document.implementation_plan()) {
        score += COMPLETENESS_BONUS;
    }

    score.clamp(0, 100) as u8
}
