use crate::core::types::{Assessment, Module, RogueApSignal, Status};
use crate::detectors::Detector;

/// Case-sensitive vendor fragments that do not match any known AP profile.
const SUSPECT_VENDORS: [&str; 2] = ["Raspberry", "Unknown"];

pub struct RogueApDetector;

impl Detector for RogueApDetector {
    type Signal = RogueApSignal;

    fn module(&self) -> Module {
        Module::RogueAp
    }

    fn evaluate(&self, signal: &RogueApSignal) -> Assessment {
        if SUSPECT_VENDORS.iter().any(|v| signal.vendor.contains(v)) {
            return Assessment::new(
                0.95,
                Status::Critical,
                format!("Hardware Signature Mismatch: {}", signal.vendor),
            );
        }
        Assessment::new(0.1, Status::Safe, "AP Vendor matches historical profile")
    }
}
