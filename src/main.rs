use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use crimson_defense::cli::{commands, flags::Cli};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_ROTATE_BYTES: u64 = 1_000_000;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;
    commands::run(cli).await
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries JSON results
    let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(false);

    let mut rotation_failure = None;
    let file_layer = match &cli.log_file {
        Some(path) => {
            if let Err(err) = rotate_if_large(path) {
                rotation_failure = Some((rotated_path(path), err));
            }
            let file = open_log_file(path)?;
            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    if let Some((rotated, err)) = rotation_failure {
        tracing::warn!(rotated = %rotated.display(), error = %err, "log rotation failed; appending");
    }
    Ok(())
}

/// `<file>.1`, keeping the original extension.
fn rotated_path(log_path: &Path) -> PathBuf {
    let mut name = OsString::from(log_path.as_os_str());
    name.push(".1");
    PathBuf::from(name)
}

fn rotate_if_large(log_path: &Path) -> io::Result<()> {
    match fs::metadata(log_path) {
        Ok(meta) if meta.len() > LOG_ROTATE_BYTES => fs::rename(log_path, rotated_path(log_path)),
        _ => Ok(()),
    }
}

fn open_log_file(log_path: &Path) -> Result<fs::File> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_appends_suffix_to_full_name() {
        assert_eq!(
            rotated_path(Path::new("logs/crimson.txt")),
            PathBuf::from("logs/crimson.txt.1")
        );
        assert_eq!(
            rotated_path(Path::new("crimson.log")),
            PathBuf::from("crimson.log.1")
        );
    }

    #[test]
    fn large_log_is_rotated_small_log_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let big = dir.path().join("big.txt");
        let small = dir.path().join("small.txt");
        fs::write(&big, vec![b'x'; (LOG_ROTATE_BYTES + 1) as usize]).unwrap();
        fs::write(&small, b"ok").unwrap();

        rotate_if_large(&big).unwrap();
        rotate_if_large(&small).unwrap();
        rotate_if_large(&dir.path().join("missing.txt")).unwrap();

        assert!(!big.exists());
        assert!(dir.path().join("big.txt.1").exists());
        assert!(small.exists());
    }
}
