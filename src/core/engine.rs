use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::core::alert::AlertStore;
use crate::core::error::DefenseError;
use crate::core::time::now_millis;
use crate::core::types::{
    AppScanSignal, DetectionResult, MitmSignal, Module, RogueApSignal, ThreatEvent,
    TrafficSignal, WifiSignal,
};
use crate::core::validate::Validate;
use crate::detectors::{
    AnomalyDetector, Detector, DetectorSet, MalwareDetector, MitmDetector, RogueApDetector,
    RuleDetectors, WifiDetector,
};
use crate::pipeline::assembler::assemble;
use crate::pipeline::escalator::{critical_event, escalates};

/// One signal record keyed by its detection domain.
#[derive(Debug, Clone)]
pub enum DetectionRequest {
    Wifi(WifiSignal),
    RogueAp(RogueApSignal),
    Mitm(MitmSignal),
    Malware(AppScanSignal),
    Anomaly(TrafficSignal),
}

impl DetectionRequest {
    pub fn module(&self) -> Module {
        match self {
            DetectionRequest::Wifi(_) => Module::Wifi,
            DetectionRequest::RogueAp(_) => Module::RogueAp,
            DetectionRequest::Mitm(_) => Module::Mitm,
            DetectionRequest::Malware(_) => Module::Malware,
            DetectionRequest::Anomaly(_) => Module::Anomaly,
        }
    }

    /// Decode a JSON body for `module`. Decoding failures (missing fields,
    /// negative byte counts, wrong types) are validation errors.
    pub fn from_value(module: Module, value: serde_json::Value) -> Result<Self, DefenseError> {
        Ok(match module {
            Module::Wifi => DetectionRequest::Wifi(decode(module, value)?),
            Module::RogueAp => DetectionRequest::RogueAp(decode(module, value)?),
            Module::Mitm => DetectionRequest::Mitm(decode(module, value)?),
            Module::Malware => DetectionRequest::Malware(decode(module, value)?),
            Module::Anomaly => DetectionRequest::Anomaly(decode(module, value)?),
        })
    }
}

/// Batch input entry: `{"module": "wifi", "signal": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchItem {
    pub module: String,
    pub signal: serde_json::Value,
}

impl BatchItem {
    pub fn into_request(self) -> Result<DetectionRequest, DefenseError> {
        let module = Module::parse(&self.module)?;
        DetectionRequest::from_value(module, self.signal)
    }
}

fn decode<T: DeserializeOwned>(module: Module, value: serde_json::Value) -> Result<T, DefenseError> {
    serde_json::from_value(value)
        .map_err(|e| DefenseError::Validation(format!("malformed {} signal: {}", module.key(), e)))
}

pub struct Engine<
    W = WifiDetector,
    R = RogueApDetector,
    M = MitmDetector,
    A = MalwareDetector,
    N = AnomalyDetector,
> {
    pub config: AppConfig,
    detectors: DetectorSet<W, R, M, A, N>,
    alerts: AlertStore,
}

impl Engine {
    /// Engine backed by the rule-based detectors.
    pub fn new(config: AppConfig) -> Result<Self, DefenseError> {
        Self::with_detectors(config, RuleDetectors::default())
    }
}

impl<W, R, M, A, N> Engine<W, R, M, A, N>
where
    W: Detector<Signal = WifiSignal>,
    R: Detector<Signal = RogueApSignal>,
    M: Detector<Signal = MitmSignal>,
    A: Detector<Signal = AppScanSignal>,
    N: Detector<Signal = TrafficSignal>,
{
    pub fn with_detectors(
        config: AppConfig,
        detectors: DetectorSet<W, R, M, A, N>,
    ) -> Result<Self, DefenseError> {
        config.validate()?;
        let alerts = AlertStore::new(config.alerts.seed_demo_alerts, config.alerts.max_recorded);
        Ok(Self {
            config,
            detectors,
            alerts,
        })
    }

    pub fn detect(&self, request: DetectionRequest) -> Result<DetectionResult, DefenseError> {
        let module = request.module();
        let result = self.assess(request)?;
        self.maybe_escalate(module, &result);
        Ok(result)
    }

    /// Validate, evaluate and assemble without touching the alert store.
    fn assess(&self, request: DetectionRequest) -> Result<DetectionResult, DefenseError> {
        match request {
            DetectionRequest::Wifi(s) => {
                self.evaluate_with(&self.detectors.wifi, &s.validate()?)
            }
            DetectionRequest::RogueAp(s) => {
                self.evaluate_with(&self.detectors.rogue_ap, &s.validate()?)
            }
            DetectionRequest::Mitm(s) => {
                self.evaluate_with(&self.detectors.mitm, &s.validate()?)
            }
            DetectionRequest::Malware(s) => {
                self.evaluate_with(&self.detectors.malware, &s.validate()?)
            }
            DetectionRequest::Anomaly(s) => {
                self.evaluate_with(&self.detectors.anomaly, &s.validate()?)
            }
        }
    }

    /// Request/response boundary: `domain` is one of the module keys and
    /// `payload` the JSON signal body.
    pub fn detect_json(&self, domain: &str, payload: &str) -> Result<DetectionResult, DefenseError> {
        let module = Module::parse(domain)?;
        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|e| DefenseError::Validation(format!("invalid JSON body: {}", e)))?;
        self.detect(DetectionRequest::from_value(module, value)?)
    }

    pub fn detect_wifi(&self, signal: WifiSignal) -> Result<DetectionResult, DefenseError> {
        let signal = signal.validate()?;
        self.run(&self.detectors.wifi, &signal)
    }

    pub fn detect_rogue_ap(&self, signal: RogueApSignal) -> Result<DetectionResult, DefenseError> {
        let signal = signal.validate()?;
        self.run(&self.detectors.rogue_ap, &signal)
    }

    pub fn detect_mitm(&self, signal: MitmSignal) -> Result<DetectionResult, DefenseError> {
        let signal = signal.validate()?;
        self.run(&self.detectors.mitm, &signal)
    }

    pub fn detect_malware(&self, signal: AppScanSignal) -> Result<DetectionResult, DefenseError> {
        let signal = signal.validate()?;
        self.run(&self.detectors.malware, &signal)
    }

    pub fn detect_anomaly(&self, signal: TrafficSignal) -> Result<DetectionResult, DefenseError> {
        let signal = signal.validate()?;
        self.run(&self.detectors.anomaly, &signal)
    }

    pub fn list_alerts(&self) -> Vec<ThreatEvent> {
        self.alerts.list_alerts()
    }

    pub fn record_alert(&self, event: ThreatEvent) -> bool {
        self.alerts.record_alert(event)
    }

    pub fn resolve_alert(&self, id: &str) -> Result<bool, DefenseError> {
        self.alerts.resolve(id)
    }

    pub fn alerts(&self) -> &AlertStore {
        &self.alerts
    }

    /// Latency budget declared by the detector for `module`, else the engine default.
    pub fn budget_for(&self, module: Module) -> Duration {
        let declared = match module {
            Module::Wifi => self.detectors.wifi.latency_budget(),
            Module::RogueAp => self.detectors.rogue_ap.latency_budget(),
            Module::Mitm => self.detectors.mitm.latency_budget(),
            Module::Malware => self.detectors.malware.latency_budget(),
            Module::Anomaly => self.detectors.anomaly.latency_budget(),
        };
        declared.unwrap_or_else(|| self.config.latency_budget())
    }

    fn run<D: Detector>(&self, detector: &D, signal: &D::Signal) -> Result<DetectionResult, DefenseError> {
        let result = self.evaluate_with(detector, signal)?;
        self.maybe_escalate(detector.module(), &result);
        Ok(result)
    }

    fn evaluate_with<D: Detector>(
        &self,
        detector: &D,
        signal: &D::Signal,
    ) -> Result<DetectionResult, DefenseError> {
        let module = detector.module();
        let assessment = detector.evaluate(signal);
        let result = assemble(module, &detector.thresholds(), assessment)?;
        tracing::debug!(
            module = module.key(),
            status = %result.status,
            risk_score = result.risk_score,
            "detection complete"
        );
        Ok(result)
    }

    fn maybe_escalate(&self, module: Module, result: &DetectionResult) {
        if !self.config.alerts.escalate_critical || !escalates(result) {
            return;
        }
        let timestamp = now_millis();
        let device = self.config.alerts.device.as_str();
        let event = self
            .alerts
            .record_with(|id| critical_event(module, result, id, timestamp, device));
        tracing::info!(
            alert_id = %event.id,
            module = module.key(),
            "critical detection recorded as alert"
        );
    }
}

impl<W, R, M, A, N> Engine<W, R, M, A, N>
where
    W: Detector<Signal = WifiSignal> + 'static,
    R: Detector<Signal = RogueApSignal> + 'static,
    M: Detector<Signal = MitmSignal> + 'static,
    A: Detector<Signal = AppScanSignal> + 'static,
    N: Detector<Signal = TrafficSignal> + 'static,
{
    /// Run independent detections in parallel, each bounded by its latency
    /// budget. Results come back in request order. Escalation happens only for
    /// detections that finished within budget, so a timed-out entry never
    /// leaves an alert behind.
    pub async fn detect_batch(
        self: &Arc<Self>,
        requests: Vec<DetectionRequest>,
    ) -> Vec<Result<DetectionResult, DefenseError>> {
        let mut handles = Vec::with_capacity(requests.len());
        for request in requests {
            let module = request.module();
            let budget = self.budget_for(module);
            let engine = Arc::clone(self);
            handles.push(tokio::spawn(async move {
                let worker = Arc::clone(&engine);
                let work = tokio::task::spawn_blocking(move || worker.assess(request));
                match tokio::time::timeout(budget, work).await {
                    Ok(Ok(Ok(result))) => {
                        engine.maybe_escalate(module, &result);
                        Ok(result)
                    }
                    Ok(Ok(Err(err))) => Err(err),
                    Ok(Err(join)) => Err(DefenseError::Detector(format!(
                        "{}: {}",
                        module.key(),
                        join
                    ))),
                    Err(_) => {
                        tracing::warn!(module = module.key(), ?budget, "detector exceeded budget");
                        Err(DefenseError::Timeout(format!(
                            "{} exceeded {}ms",
                            module.key(),
                            budget.as_millis()
                        )))
                    }
                }
            }));
        }

        let mut out = Vec::with_capacity(handles.len());
        for handle in handles {
            out.push(match handle.await {
                Ok(result) => result,
                Err(join) => Err(DefenseError::Detector(join.to_string())),
            });
        }
        out
    }
}
