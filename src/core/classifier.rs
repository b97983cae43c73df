//! Shared score -> status policy.
//!
//! Every detector reports a status alongside its score; the assembler checks the
//! pair against the detector's threshold table so the two can never drift apart.
//! Detectors that do not declare their own table use [`ThresholdTable::default`].

use crate::core::error::DefenseError;
use crate::core::types::{Module, Status};

pub const CRITICAL_THRESHOLD: f64 = 0.7;
pub const WARNING_THRESHOLD: f64 = 0.4;

/// Inclusive lower bounds for `critical` and `warning`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTable {
    pub critical: f64,
    pub warning: f64,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            critical: CRITICAL_THRESHOLD,
            warning: WARNING_THRESHOLD,
        }
    }
}

impl ThresholdTable {
    pub fn new(critical: f64, warning: f64) -> Result<Self, DefenseError> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(critical) || !in_unit(warning) || warning > critical {
            return Err(DefenseError::Config(format!(
                "invalid threshold table: critical={} warning={}",
                critical, warning
            )));
        }
        Ok(Self { critical, warning })
    }

    pub fn classify(&self, score: f64) -> Result<Status, DefenseError> {
        let score = check_score("classifier", score)?;
        if score >= self.critical {
            Ok(Status::Critical)
        } else if score >= self.warning {
            Ok(Status::Warning)
        } else {
            Ok(Status::Safe)
        }
    }
}

/// Classify with the default table.
pub fn classify(score: f64) -> Result<Status, DefenseError> {
    ThresholdTable::default().classify(score)
}

/// Rejects non-finite scores and anything outside [0, 1]. Never clamps.
pub fn check_score(module: &str, score: f64) -> Result<f64, DefenseError> {
    if !score.is_finite() {
        return Err(DefenseError::policy(module, score, "score is not finite"));
    }
    if !(0.0..=1.0).contains(&score) {
        return Err(DefenseError::policy(module, score, "score outside [0, 1]"));
    }
    Ok(score)
}

/// Remediation advice emitted when a score is strictly above `above`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationRule {
    pub above: f64,
    pub text: &'static str,
}

pub fn recommendation_rule(module: Module) -> Option<RecommendationRule> {
    match module {
        Module::Wifi => Some(RecommendationRule {
            above: 0.5,
            text: "Disconnect immediately if network is unknown.",
        }),
        Module::Malware => Some(RecommendationRule {
            above: 0.7,
            text: "Uninstall application immediately.",
        }),
        Module::RogueAp | Module::Mitm | Module::Anomaly => None,
    }
}

pub fn recommend(module: Module, score: f64) -> Option<String> {
    recommendation_rule(module)
        .filter(|rule| score > rule.above)
        .map(|rule| rule.text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive_lower_bounds() {
        assert_eq!(classify(0.7).unwrap(), Status::Critical);
        assert_eq!(classify(0.6999).unwrap(), Status::Warning);
        assert_eq!(classify(0.4).unwrap(), Status::Warning);
        assert_eq!(classify(0.3999).unwrap(), Status::Safe);
        assert_eq!(classify(0.0).unwrap(), Status::Safe);
        assert_eq!(classify(1.0).unwrap(), Status::Critical);
    }

    #[test]
    fn out_of_range_scores_fail_fast() {
        for bad in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                classify(bad),
                Err(DefenseError::PolicyViolation { .. })
            ));
        }
    }

    #[test]
    fn table_rejects_inverted_bounds() {
        assert!(ThresholdTable::new(0.3, 0.6).is_err());
        assert!(ThresholdTable::new(1.2, 0.6).is_err());
        let table = ThresholdTable::new(0.9, 0.5).unwrap();
        assert_eq!(table.classify(0.85).unwrap(), Status::Warning);
    }

    #[test]
    fn recommendations_are_strictly_greater_than() {
        assert_eq!(recommend(Module::Wifi, 0.5), None);
        assert!(recommend(Module::Wifi, 0.65).is_some());
        assert_eq!(recommend(Module::Malware, 0.7), None);
        assert_eq!(
            recommend(Module::Malware, 0.88).as_deref(),
            Some("Uninstall application immediately.")
        );
        assert_eq!(recommend(Module::Mitm, 0.98), None);
    }
}
