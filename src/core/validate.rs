use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::core::error::DefenseError;
use crate::core::types::{AppScanSignal, MitmSignal, RogueApSignal, TrafficSignal, WifiSignal};

pub const MIN_RSSI_DBM: i32 = -127;
pub const MAX_RSSI_DBM: i32 = 0;
const FRACTION_TOLERANCE: f64 = 1e-6;

/// Structural checks run before a signal reaches a detector. Returns the
/// normalized record on success.
pub trait Validate: Sized {
    fn validate(self) -> Result<Self, DefenseError>;
}

impl Validate for WifiSignal {
    fn validate(self) -> Result<Self, DefenseError> {
        if !(MIN_RSSI_DBM..=MAX_RSSI_DBM).contains(&self.signal_strength_dbm) {
            return Err(DefenseError::Validation(format!(
                "rssi {} dBm outside [{}, {}]",
                self.signal_strength_dbm, MIN_RSSI_DBM, MAX_RSSI_DBM
            )));
        }
        require_mac("bssid", &self.bssid)?;
        Ok(self)
    }
}

impl Validate for RogueApSignal {
    fn validate(self) -> Result<Self, DefenseError> {
        require_mac("bssid", &self.bssid)?;
        Ok(self)
    }
}

impl Validate for MitmSignal {
    fn validate(self) -> Result<Self, DefenseError> {
        require_mac("gateway_mac", &self.gateway_mac)?;
        if !self.latency_ms.is_finite() || self.latency_ms < 0.0 {
            return Err(DefenseError::Validation(format!(
                "latency_ms must be finite and >= 0 (got {})",
                self.latency_ms
            )));
        }
        Ok(self)
    }
}

impl Validate for AppScanSignal {
    fn validate(mut self) -> Result<Self, DefenseError> {
        if self.package_name.trim().is_empty() {
            return Err(DefenseError::Validation(
                "package_name must not be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        self.permissions.retain(|p| seen.insert(p.clone()));
        Ok(self)
    }
}

impl Validate for TrafficSignal {
    fn validate(self) -> Result<Self, DefenseError> {
        let mut total = 0.0;
        for (protocol, fraction) in &self.protocol_distribution {
            if !fraction.is_finite() || !(0.0..=1.0).contains(fraction) {
                return Err(DefenseError::Validation(format!(
                    "protocol fraction for {} must be within [0, 1] (got {})",
                    protocol, fraction
                )));
            }
            total += fraction;
        }
        if total > 1.0 + FRACTION_TOLERANCE {
            return Err(DefenseError::Validation(format!(
                "protocol fractions sum to {:.4} (> 1.0)",
                total
            )));
        }
        Ok(self)
    }
}

fn mac_pattern() -> &'static Regex {
    static MAC: OnceLock<Regex> = OnceLock::new();
    MAC.get_or_init(|| {
        Regex::new(r"^[0-9A-Fa-f]{2}(?:[:-][0-9A-Fa-f]{2}){5}$")
            .expect("static MAC pattern")
    })
}

fn require_mac(field: &str, value: &str) -> Result<(), DefenseError> {
    if mac_pattern().is_match(value.trim()) {
        Ok(())
    } else {
        Err(DefenseError::Validation(format!(
            "{} is not a MAC address: {:?}",
            field, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EncryptionScheme;
    use std::collections::BTreeMap;

    fn wifi(rssi: i32) -> WifiSignal {
        WifiSignal {
            ssid: "Home".into(),
            bssid: "AA:BB:CC:DD:EE:FF".into(),
            signal_strength_dbm: rssi,
            encryption: EncryptionScheme::Wpa2,
        }
    }

    #[test]
    fn rssi_range_is_enforced() {
        assert!(wifi(-60).validate().is_ok());
        assert!(wifi(0).validate().is_ok());
        assert!(matches!(
            wifi(5).validate(),
            Err(DefenseError::Validation(_))
        ));
        assert!(wifi(-200).validate().is_err());
    }

    #[test]
    fn bssid_must_be_mac() {
        let mut sig = wifi(-50);
        sig.bssid = "not-a-mac".into();
        assert!(sig.validate().is_err());
        let mut sig = wifi(-50);
        sig.bssid = "aa-bb-cc-dd-ee-ff".into();
        assert!(sig.validate().is_ok());
    }

    #[test]
    fn permissions_are_deduplicated_in_order() {
        let sig = AppScanSignal {
            package_name: "com.example".into(),
            app_name: "Example".into(),
            permissions: vec![
                "CAMERA".into(),
                "SEND_SMS".into(),
                "CAMERA".into(),
                "SEND_SMS".into(),
            ],
            api_calls: vec![],
        }
        .validate()
        .unwrap();
        assert_eq!(sig.permissions, vec!["CAMERA", "SEND_SMS"]);
    }

    #[test]
    fn identifiers_are_checked_free_text_is_not() {
        let blank_package = AppScanSignal {
            package_name: "  ".into(),
            app_name: String::new(),
            permissions: vec![],
            api_calls: vec![],
        };
        assert!(matches!(
            blank_package.validate(),
            Err(DefenseError::Validation(_))
        ));

        let mut sig = wifi(-50);
        sig.ssid = "☕ café guest (5G) ".into();
        assert!(sig.validate().is_ok());

        let ap = RogueApSignal {
            ssid: String::new(),
            bssid: "AA:BB:CC:DD:EE:FF".into(),
            vendor: "??".into(),
            security_protocol: String::new(),
        };
        assert!(ap.validate().is_ok());
    }

    #[test]
    fn negative_latency_is_rejected() {
        let sig = MitmSignal {
            gateway_mac: "00:11:22:33:44:55".into(),
            certificate_issuer: "DigiCert".into(),
            dns_server: "1.1.1.1".into(),
            latency_ms: -1.0,
        };
        assert!(sig.validate().is_err());
    }

    #[test]
    fn protocol_fractions_must_sum_to_at_most_one() {
        let mut dist = BTreeMap::new();
        dist.insert("tcp".to_string(), 0.7);
        dist.insert("udp".to_string(), 0.5);
        let sig = TrafficSignal {
            timestamp: String::new(),
            bytes_in: 10,
            bytes_out: 10,
            protocol_distribution: dist,
        };
        assert!(sig.validate().is_err());
    }
}
