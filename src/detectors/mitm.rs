use crate::core::types::{Assessment, MitmSignal, Module, Status};
use crate::detectors::Detector;

const UNTRUSTED_ISSUERS: [&str; 2] = ["Self-Signed", "Debug"];

pub struct MitmDetector;

impl Detector for MitmDetector {
    type Signal = MitmSignal;

    fn module(&self) -> Module {
        Module::Mitm
    }

    fn evaluate(&self, signal: &MitmSignal) -> Assessment {
        if UNTRUSTED_ISSUERS
            .iter()
            .any(|i| signal.certificate_issuer.contains(i))
        {
            return Assessment::new(
                0.98,
                Status::Critical,
                "Untrusted Certificate Authority intercepted",
            );
        }
        Assessment::new(0.1, Status::Safe, "SSL Chain of Trust verified")
    }
}
