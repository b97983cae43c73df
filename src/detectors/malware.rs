use crate::core::types::{AppScanSignal, Assessment, Module, Status};
use crate::detectors::Detector;

pub const RISK_PERMISSIONS: [&str; 3] = [
    "SEND_SMS",
    "SYSTEM_ALERT_WINDOW",
    "BIND_ACCESSIBILITY_SERVICE",
];

pub struct MalwareDetector;

impl MalwareDetector {
    /// Risky permissions in input order.
    pub fn risky_permissions(signal: &AppScanSignal) -> Vec<&str> {
        signal
            .permissions
            .iter()
            .map(String::as_str)
            .filter(|p| RISK_PERMISSIONS.contains(p))
            .collect()
    }
}

impl Detector for MalwareDetector {
    type Signal = AppScanSignal;

    fn module(&self) -> Module {
        Module::Malware
    }

    fn evaluate(&self, signal: &AppScanSignal) -> Assessment {
        let detected = Self::risky_permissions(signal);
        match detected.as_slice() {
            [] => Assessment::new(0.02, Status::Safe, "App signature matches trusted whitelist"),
            [one] => Assessment::new(
                0.45,
                Status::Warning,
                format!("Suspicious permission: {}", one),
            ),
            many => Assessment::new(
                0.88,
                Status::Critical,
                format!("High-risk permission combination: {}", many.join(", ")),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(perms: &[&str]) -> AppScanSignal {
        AppScanSignal {
            package_name: "com.sus.flashlight".into(),
            app_name: "Flashlight Pro".into(),
            permissions: perms.iter().map(|p| p.to_string()).collect(),
            api_calls: vec![],
        }
    }

    #[test]
    fn single_risky_permission_is_warning() {
        let a = MalwareDetector.evaluate(&signal(&["SEND_SMS", "CAMERA"]));
        assert_eq!(a.status, Status::Warning);
        assert_eq!(a.risk_score, 0.45);
        assert_eq!(a.details, "Suspicious permission: SEND_SMS");
    }

    #[test]
    fn combination_keeps_input_order() {
        let a = MalwareDetector.evaluate(&signal(&[
            "BIND_ACCESSIBILITY_SERVICE",
            "INTERNET",
            "SEND_SMS",
        ]));
        assert_eq!(a.status, Status::Critical);
        assert_eq!(
            a.details,
            "High-risk permission combination: BIND_ACCESSIBILITY_SERVICE, SEND_SMS"
        );
    }

    #[test]
    fn score_is_monotonic_in_risky_count() {
        let scores: Vec<f64> = [
            signal(&[]),
            signal(&["SYSTEM_ALERT_WINDOW"]),
            signal(&["SYSTEM_ALERT_WINDOW", "SEND_SMS"]),
            signal(&["SYSTEM_ALERT_WINDOW", "SEND_SMS", "BIND_ACCESSIBILITY_SERVICE"]),
        ]
        .iter()
        .map(|s| MalwareDetector.evaluate(s).risk_score)
        .collect();
        assert_eq!(scores, vec![0.02, 0.45, 0.88, 0.88]);
    }
}
