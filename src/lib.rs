//! Crimson Defense detection engine.
//!
//! Per-domain detectors score typed signal snapshots, the shared classifier keeps
//! score and status consistent, the assembler stamps results, and the alert
//! store serves standing threat events.

pub mod cli;
pub mod config;
pub mod core;
pub mod detectors;
pub mod pipeline;

pub use crate::config::AppConfig;
pub use crate::core::engine::{DetectionRequest, Engine};
pub use crate::core::error::DefenseError;
pub use crate::core::types::{
    AlertStatus, AppScanSignal, DetectionResult, EncryptionScheme, MitmSignal, Module,
    RogueApSignal, Severity, Status, ThreatEvent, ThreatType, TrafficSignal, WifiSignal,
};
