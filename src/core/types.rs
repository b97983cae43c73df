use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::DefenseError;

/// Detection domain; each one maps to exactly one detector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Module {
    Wifi,
    RogueAp,
    Mitm,
    Malware,
    Anomaly,
}

impl Module {
    pub const ALL: [Module; 5] = [
        Module::Wifi,
        Module::RogueAp,
        Module::Mitm,
        Module::Malware,
        Module::Anomaly,
    ];

    /// Routing key used at the request boundary.
    pub fn key(&self) -> &'static str {
        match self {
            Module::Wifi => "wifi",
            Module::RogueAp => "rogue-ap",
            Module::Mitm => "mitm",
            Module::Malware => "malware",
            Module::Anomaly => "anomaly",
        }
    }

    /// Name stamped on every `DetectionResult`.
    pub fn display_name(&self) -> &'static str {
        match self {
            Module::Wifi => "WiFi Sentry",
            Module::RogueAp => "Rogue AP Detector",
            Module::Mitm => "MITM Guard",
            Module::Malware => "App Shield",
            Module::Anomaly => "Network LSTM",
        }
    }

    pub fn threat_type(&self) -> ThreatType {
        match self {
            Module::Wifi => ThreatType::SuspiciousWifi,
            Module::RogueAp => ThreatType::RogueAccessPoint,
            Module::Mitm => ThreatType::Mitm,
            Module::Malware => ThreatType::MaliciousApplication,
            Module::Anomaly => ThreatType::NetworkAnomaly,
        }
    }

    pub fn parse(value: &str) -> Result<Self, DefenseError> {
        let lowered = value.trim().to_lowercase();
        Module::ALL
            .iter()
            .copied()
            .find(|m| m.key() == lowered)
            .ok_or_else(|| DefenseError::UnknownModule(value.to_string()))
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Tri-state outcome of a detection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Safe,
    Warning,
    Critical,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Safe => write!(f, "safe"),
            Status::Warning => write!(f, "warning"),
            Status::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EncryptionScheme {
    Open,
    Wep,
    Wpa,
    Wpa2,
    Wpa3,
    Other(String),
}

impl EncryptionScheme {
    pub fn is_insecure(&self) -> bool {
        matches!(self, EncryptionScheme::Open | EncryptionScheme::Wep)
    }
}

impl From<String> for EncryptionScheme {
    fn from(value: String) -> Self {
        match value.trim().to_uppercase().as_str() {
            "OPEN" => EncryptionScheme::Open,
            "WEP" => EncryptionScheme::Wep,
            "WPA" => EncryptionScheme::Wpa,
            "WPA2" => EncryptionScheme::Wpa2,
            "WPA3" => EncryptionScheme::Wpa3,
            _ => EncryptionScheme::Other(value),
        }
    }
}

impl From<&str> for EncryptionScheme {
    fn from(value: &str) -> Self {
        EncryptionScheme::from(value.to_string())
    }
}

impl From<EncryptionScheme> for String {
    fn from(value: EncryptionScheme) -> Self {
        match value {
            EncryptionScheme::Open => "OPEN".to_string(),
            EncryptionScheme::Wep => "WEP".to_string(),
            EncryptionScheme::Wpa => "WPA".to_string(),
            EncryptionScheme::Wpa2 => "WPA2".to_string(),
            EncryptionScheme::Wpa3 => "WPA3".to_string(),
            EncryptionScheme::Other(raw) => raw,
        }
    }
}

/// Wireless association snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WifiSignal {
    pub ssid: String,
    pub bssid: String,
    /// Received strength in dBm; values near 0 are very strong.
    #[serde(rename = "rssi")]
    pub signal_strength_dbm: i32,
    pub encryption: EncryptionScheme,
}

/// Access-point hardware metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RogueApSignal {
    pub ssid: String,
    pub bssid: String,
    #[serde(rename = "vendor_oui")]
    pub vendor: String,
    #[serde(default)]
    pub security_protocol: String,
}

/// Gateway and TLS chain metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MitmSignal {
    pub gateway_mac: String,
    pub certificate_issuer: String,
    #[serde(default)]
    pub dns_server: String,
    #[serde(default)]
    pub latency_ms: f64,
}

/// Installed application metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppScanSignal {
    pub package_name: String,
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub api_calls: Vec<String>,
}

/// Traffic counters for one sampling window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrafficSignal {
    #[serde(default)]
    pub timestamp: String,
    pub bytes_in: u64,
    pub bytes_out: u64,
    #[serde(default)]
    pub protocol_distribution: BTreeMap<String, f64>,
}

/// Raw detector output before it is stamped by the assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub risk_score: f64,
    pub status: Status,
    pub details: String,
}

impl Assessment {
    pub fn new(risk_score: f64, status: Status, details: impl Into<String>) -> Self {
        Self {
            risk_score,
            status,
            details: details.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionResult {
    pub module: String,
    pub status: Status,
    pub risk_score: f64,
    pub details: String,
    /// RFC 3339, local clock.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ThreatType {
    #[serde(rename = "Suspicious WiFi")]
    SuspiciousWifi,
    #[serde(rename = "Rogue Access Point")]
    RogueAccessPoint,
    #[serde(rename = "MITM Attack")]
    Mitm,
    #[serde(rename = "Malicious Application")]
    MaliciousApplication,
    #[serde(rename = "Network Anomaly")]
    NetworkAnomaly,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Resolved,
}

/// Standing alert held by the alert store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreatEvent {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub threat_type: ThreatType,
    pub severity: Severity,
    pub description: String,
    pub device: String,
    pub status: AlertStatus,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}
