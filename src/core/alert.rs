//! Standing alert feed.
//!
//! Holds recorded [`ThreatEvent`]s for the process lifetime behind a
//! reader/writer lock: writers (`record_alert`, `resolve`) are serialized and
//! readers get a consistent snapshot. When enabled, the illustrative demo feed
//! is regenerated on every read with fresh ids and timestamps relative to now.
//!
//! The store is bounded. Eviction prefers resolved events, and the ids of
//! evicted events are retained (up to the same bound) so that resubmitting one
//! stays a no-op.

use std::collections::{BTreeMap, HashSet, VecDeque};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::core::error::DefenseError;
use crate::core::time::now_millis;
use crate::core::types::{AlertStatus, Severity, ThreatEvent, ThreatType};

pub const DEFAULT_MAX_RECORDED: usize = 1_000;

#[derive(Default)]
struct Ledger {
    events: Vec<ThreatEvent>,
    retired: VecDeque<String>,
    retired_ids: HashSet<String>,
}

impl Ledger {
    fn knows(&self, id: &str) -> bool {
        self.retired_ids.contains(id) || self.events.iter().any(|e| e.id == id)
    }

    fn retire(&mut self, id: String, cap: usize) {
        if self.retired.len() >= cap {
            if let Some(oldest) = self.retired.pop_front() {
                self.retired_ids.remove(&oldest);
            }
        }
        self.retired_ids.insert(id.clone());
        self.retired.push_back(id);
    }
}

pub struct AlertStore {
    ledger: RwLock<Ledger>,
    seed_demo: bool,
    max_recorded: usize,
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new(true, DEFAULT_MAX_RECORDED)
    }
}

impl AlertStore {
    pub fn new(seed_demo: bool, max_recorded: usize) -> Self {
        Self {
            ledger: RwLock::new(Ledger::default()),
            seed_demo,
            max_recorded: max_recorded.max(1),
        }
    }

    /// Current standing alerts, most recent first.
    pub fn list_alerts(&self) -> Vec<ThreatEvent> {
        let ledger = self.ledger.read();
        let mut out = if self.seed_demo {
            demo_alerts(now_millis(), |taken| unique_id(&ledger, taken))
        } else {
            Vec::new()
        };
        out.extend(ledger.events.iter().cloned());
        drop(ledger);
        // stable: equal timestamps keep insertion order
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        out
    }

    /// Append a standing alert. Resubmitting an id the store has already
    /// recorded (including one since evicted) is a no-op and returns `false`.
    pub fn record_alert(&self, event: ThreatEvent) -> bool {
        let mut ledger = self.ledger.write();
        if ledger.knows(&event.id) {
            return false;
        }
        self.push_bounded(&mut ledger, event);
        true
    }

    /// Record an event built around a freshly allocated id, returning a copy.
    /// Id allocation and insertion happen under one write lock.
    pub fn record_with<F>(&self, build: F) -> ThreatEvent
    where
        F: FnOnce(String) -> ThreatEvent,
    {
        let mut ledger = self.ledger.write();
        let id = unique_id(&ledger, &[]);
        let event = build(id);
        self.push_bounded(&mut ledger, event.clone());
        event
    }

    /// Fresh `evt-` id not used by any recorded or evicted event.
    pub fn new_event_id(&self) -> String {
        unique_id(&self.ledger.read(), &[])
    }

    /// Transition `active -> resolved`. Returns `false` if it was already resolved.
    pub fn resolve(&self, id: &str) -> Result<bool, DefenseError> {
        let mut ledger = self.ledger.write();
        let event = ledger
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| DefenseError::UnknownAlert(id.to_string()))?;
        if event.status == AlertStatus::Resolved {
            return Ok(false);
        }
        event.status = AlertStatus::Resolved;
        tracing::info!(alert_id = id, "alert resolved");
        Ok(true)
    }

    pub fn get(&self, id: &str) -> Option<ThreatEvent> {
        self.ledger.read().events.iter().find(|e| e.id == id).cloned()
    }

    /// Number of recorded (non-demo) alerts.
    pub fn len(&self) -> usize {
        self.ledger.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push_bounded(&self, ledger: &mut Ledger, event: ThreatEvent) {
        if ledger.events.len() >= self.max_recorded {
            let evicted = match ledger
                .events
                .iter()
                .position(|e| e.status == AlertStatus::Resolved)
            {
                Some(idx) => {
                    let evicted = ledger.events.remove(idx);
                    tracing::debug!(alert_id = %evicted.id, "alert store full; evicted resolved alert");
                    evicted
                }
                None => {
                    let evicted = ledger.events.remove(0);
                    tracing::warn!(
                        alert_id = %evicted.id,
                        capacity = self.max_recorded,
                        "alert store full of active alerts; evicted oldest active alert"
                    );
                    evicted
                }
            };
            ledger.retire(evicted.id, self.max_recorded);
        }
        ledger.events.push(event);
    }
}

/// `evt-` plus 8 hex chars, unique against the ledger and `taken`.
fn unique_id(ledger: &Ledger, taken: &[String]) -> String {
    loop {
        let raw = Uuid::new_v4().simple().to_string();
        let id = format!("evt-{}", &raw[..8]);
        if !ledger.knows(&id) && !taken.iter().any(|t| *t == id) {
            return id;
        }
    }
}

fn demo_alerts<F>(now: i64, mut next_id: F) -> Vec<ThreatEvent>
where
    F: FnMut(&[String]) -> String,
{
    let first = next_id(&[]);
    let second = next_id(std::slice::from_ref(&first));

    vec![
        ThreatEvent {
            id: first,
            timestamp: now - 360_000,
            threat_type: ThreatType::MaliciousApplication,
            severity: Severity::High,
            description: "App 'Flashlight Pro' requested Accessibility Services.".to_string(),
            device: "Pixel 7 Pro".to_string(),
            status: AlertStatus::Active,
            details: BTreeMap::from([("pkg".to_string(), "com.sus.flashlight".to_string())]),
        },
        ThreatEvent {
            id: second,
            timestamp: now - 7_200_000,
            threat_type: ThreatType::SuspiciousWifi,
            severity: Severity::Medium,
            description: "Connected to open network 'Starbucks_Free'.".to_string(),
            device: "Galaxy S23".to_string(),
            status: AlertStatus::Resolved,
            details: BTreeMap::from([("ssid".to_string(), "Starbucks_Free".to_string())]),
        },
    ]
}
