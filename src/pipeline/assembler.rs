use crate::core::classifier::{check_score, recommend, ThresholdTable};
use crate::core::error::DefenseError;
use crate::core::time::iso_timestamp;
use crate::core::types::{Assessment, DetectionResult, Module};

/// Stamp a detector assessment with module identity, time and remediation advice.
///
/// The reported status must be the one the detector's own threshold table
/// assigns to the score; a mismatch or an out-of-range score is a detector bug
/// and is returned as `PolicyViolation`.
pub fn assemble(
    module: Module,
    thresholds: &ThresholdTable,
    assessment: Assessment,
) -> Result<DetectionResult, DefenseError> {
    let name = module.display_name();
    let score = check_score(name, assessment.risk_score)?;
    let expected = thresholds.classify(score)?;
    if expected != assessment.status {
        return Err(DefenseError::policy(
            name,
            score,
            format!(
                "reported status {} but threshold table gives {}",
                assessment.status, expected
            ),
        ));
    }

    Ok(DetectionResult {
        module: name.to_string(),
        status: assessment.status,
        risk_score: score,
        details: assessment.details,
        timestamp: iso_timestamp(),
        recommendation: recommend(module, score),
    })
}
