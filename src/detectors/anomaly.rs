use crate::core::types::{Assessment, Module, Status, TrafficSignal};
use crate::detectors::Detector;

/// Upload volume above which a window counts as an exfiltration spike.
/// Placeholder until a per-device statistical baseline replaces it.
pub const EXFIL_BYTES_OUT: u64 = 50_000;

pub struct AnomalyDetector;

impl Detector for AnomalyDetector {
    type Signal = TrafficSignal;

    fn module(&self) -> Module {
        Module::Anomaly
    }

    fn evaluate(&self, signal: &TrafficSignal) -> Assessment {
        if signal.bytes_out > EXFIL_BYTES_OUT {
            return Assessment::new(
                0.90,
                Status::Critical,
                "Data exfiltration spike detected (>50MB upload)",
            );
        }
        Assessment::new(0.15, Status::Safe, "Traffic volume within baseline")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn signal(bytes_out: u64) -> TrafficSignal {
        TrafficSignal {
            timestamp: "2025-01-02T00:00:00Z".into(),
            bytes_in: 1_000,
            bytes_out,
            protocol_distribution: BTreeMap::new(),
        }
    }

    #[test]
    fn threshold_is_strictly_greater_than() {
        assert_eq!(AnomalyDetector.evaluate(&signal(50_000)).status, Status::Safe);
        let spike = AnomalyDetector.evaluate(&signal(50_001));
        assert_eq!(spike.status, Status::Critical);
        assert_eq!(spike.risk_score, 0.90);
    }
}
