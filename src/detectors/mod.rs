use std::time::Duration;

use crate::core::classifier::ThresholdTable;
use crate::core::types::{Assessment, Module};

pub mod anomaly;
pub mod malware;
pub mod mitm;
pub mod rogue_ap;
pub mod wifi;

pub use anomaly::AnomalyDetector;
pub use malware::MalwareDetector;
pub use mitm::MitmDetector;
pub use rogue_ap::RogueApDetector;
pub use wifi::WifiDetector;

/// Scoring backend for one signal domain.
///
/// Implementations must be pure and bounded-time: the same signal always yields
/// the same assessment, and no shared state is touched. The rule-based detectors
/// in this module are one backend; a learned model can implement the same trait
/// and be swapped in through [`DetectorSet`].
pub trait Detector: Send + Sync {
    type Signal;

    fn module(&self) -> Module;

    /// Threshold table the reported status must agree with.
    fn thresholds(&self) -> ThresholdTable {
        ThresholdTable::default()
    }

    /// Declared maximum latency; `None` defers to the engine budget.
    fn latency_budget(&self) -> Option<Duration> {
        None
    }

    fn evaluate(&self, signal: &Self::Signal) -> Assessment;
}

/// One backend per domain, injected into the engine.
pub struct DetectorSet<W, R, M, A, N> {
    pub wifi: W,
    pub rogue_ap: R,
    pub mitm: M,
    pub malware: A,
    pub anomaly: N,
}

pub type RuleDetectors =
    DetectorSet<WifiDetector, RogueApDetector, MitmDetector, MalwareDetector, AnomalyDetector>;

impl Default for RuleDetectors {
    fn default() -> Self {
        Self {
            wifi: WifiDetector,
            rogue_ap: RogueApDetector,
            mitm: MitmDetector,
            malware: MalwareDetector,
            anomaly: AnomalyDetector,
        }
    }
}
