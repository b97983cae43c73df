use std::io::Read;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use crate::cli::flags::{Cli, Command};
use crate::config::{load_config, AppConfig};
use crate::core::engine::{BatchItem, DetectionRequest, Engine};
use crate::core::error::DefenseError;
use crate::core::identity::IdentityStore;
use crate::core::types::Module;

pub async fn run(cli: Cli) -> Result<()> {
    let mut cfg = load_config(cli.config.as_deref())?;
    if cli.escalate {
        cfg.alerts.escalate_critical = true;
    }

    match cli.command {
        Command::Detect { module, input } => run_detect(cfg, module.into(), &input),
        Command::Batch { input } => run_batch(cfg, &input).await,
        Command::Alerts => run_alerts(cfg),
        Command::Login { username, password } => run_login(&cfg, &username, &password),
    }
}

fn run_detect(cfg: AppConfig, module: Module, input: &str) -> Result<()> {
    let engine = Engine::new(cfg)?;
    let payload = read_input(input)?;
    let result = engine.detect_json(module.key(), &payload)?;
    print_json(&result)
}

async fn run_batch(cfg: AppConfig, input: &str) -> Result<()> {
    let engine = Arc::new(Engine::new(cfg)?);
    let payload = read_input(input)?;
    let items: Vec<serde_json::Value> =
        serde_json::from_str(&payload).context("batch input must be a JSON array")?;

    let mut slots: Vec<Option<Result<serde_json::Value, DefenseError>>> = Vec::new();
    let mut pending: Vec<(usize, DetectionRequest)> = Vec::new();
    for (idx, raw) in items.into_iter().enumerate() {
        let request = serde_json::from_value::<BatchItem>(raw)
            .map_err(|e| DefenseError::Validation(format!("malformed batch entry: {}", e)))
            .and_then(BatchItem::into_request);
        match request {
            Ok(req) => {
                pending.push((idx, req));
                slots.push(None);
            }
            Err(err) => slots.push(Some(Err(err))),
        }
    }

    let (indices, requests): (Vec<usize>, Vec<DetectionRequest>) = pending.into_iter().unzip();
    let results = engine.detect_batch(requests).await;
    for (idx, result) in indices.into_iter().zip(results) {
        slots[idx] = Some(result.and_then(|r| {
            serde_json::to_value(r).map_err(|e| DefenseError::Detector(e.to_string()))
        }));
    }

    let out: Vec<serde_json::Value> = slots
        .into_iter()
        .map(|slot| match slot {
            Some(Ok(value)) => value,
            Some(Err(err)) => serde_json::json!({ "error": err.to_string() }),
            None => serde_json::json!({ "error": "missing result" }),
        })
        .collect();
    print_json(&out)
}

fn run_alerts(cfg: AppConfig) -> Result<()> {
    let engine = Engine::new(cfg)?;
    print_json(&engine.list_alerts())
}

fn run_login(cfg: &AppConfig, username: &str, password: &str) -> Result<()> {
    let identity = IdentityStore::new(&cfg.users);
    let session = identity.login(username, password)?;
    print_json(&session)
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    let data =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
    if data.trim().is_empty() {
        return Err(anyhow!("input file is empty: {}", path));
    }
    Ok(data)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
