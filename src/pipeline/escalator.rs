use std::collections::BTreeMap;

use crate::core::types::{
    AlertStatus, DetectionResult, Module, Severity, Status, ThreatEvent,
};

/// Only critical detections become standing alerts.
pub fn escalates(result: &DetectionResult) -> bool {
    result.status == Status::Critical
}

/// Build the HIGH, active alert recorded for a critical detection.
pub fn critical_event(
    module: Module,
    result: &DetectionResult,
    id: String,
    timestamp: i64,
    device: &str,
) -> ThreatEvent {
    let mut details = BTreeMap::new();
    details.insert("module".to_string(), module.key().to_string());
    details.insert("risk_score".to_string(), format!("{:.2}", result.risk_score));
    if let Some(rec) = &result.recommendation {
        details.insert("recommendation".to_string(), rec.clone());
    }

    ThreatEvent {
        id,
        timestamp,
        threat_type: module.threat_type(),
        severity: Severity::High,
        description: result.details.clone(),
        device: device.to_string(),
        status: AlertStatus::Active,
        details,
    }
}
