use crate::core::types::{Assessment, Module, Status, WifiSignal};
use crate::detectors::Detector;

/// Anything stronger than this is treated as a proximate (possibly spoofed)
/// transmitter.
pub const PROXIMITY_DBM: i32 = -30;

pub struct WifiDetector;

impl Detector for WifiDetector {
    type Signal = WifiSignal;

    fn module(&self) -> Module {
        Module::Wifi
    }

    fn evaluate(&self, signal: &WifiSignal) -> Assessment {
        if signal.encryption.is_insecure() {
            return Assessment::new(
                0.85,
                Status::Critical,
                "Insecure Encryption Detected (OPEN/WEP)",
            );
        }
        if signal.signal_strength_dbm > PROXIMITY_DBM {
            return Assessment::new(
                0.65,
                Status::Warning,
                "Abnormally strong signal source (Proximity Alert)",
            );
        }
        Assessment::new(0.05, Status::Safe, "WiFi connection appears secure")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EncryptionScheme;

    fn signal(rssi: i32, encryption: EncryptionScheme) -> WifiSignal {
        WifiSignal {
            ssid: "Lab".into(),
            bssid: "AA:BB:CC:DD:EE:FF".into(),
            signal_strength_dbm: rssi,
            encryption,
        }
    }

    #[test]
    fn weak_encryption_wins_regardless_of_strength() {
        for enc in [EncryptionScheme::Open, EncryptionScheme::Wep] {
            for rssi in [-90, -30, -10, 0] {
                let a = WifiDetector.evaluate(&signal(rssi, enc.clone()));
                assert_eq!(a.status, Status::Critical);
                assert_eq!(a.risk_score, 0.85);
            }
        }
    }

    #[test]
    fn strong_signal_on_modern_encryption_is_warning() {
        for enc in [EncryptionScheme::Wpa2, EncryptionScheme::Wpa3] {
            let a = WifiDetector.evaluate(&signal(-29, enc));
            assert_eq!(a.status, Status::Warning);
            assert_eq!(a.risk_score, 0.65);
        }
    }

    #[test]
    fn minus_thirty_exactly_is_safe() {
        let a = WifiDetector.evaluate(&signal(-30, EncryptionScheme::Wpa2));
        assert_eq!(a.status, Status::Safe);
        assert_eq!(a.risk_score, 0.05);
        assert_eq!(a.details, "WiFi connection appears secure");
    }
}
