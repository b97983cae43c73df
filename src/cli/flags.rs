use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::core::types::Module;

#[derive(Parser, Debug)]
#[command(
    name = "crimson-defense",
    version,
    about = "Crimson Defense local threat detection engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (TOML). Default: config/crimson.toml
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Increase verbosity (info, debug, trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Optional log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Record critical detections as standing alerts
    #[arg(long, global = true)]
    pub escalate: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate one signal record
    Detect {
        /// Detection domain
        #[arg(value_enum)]
        module: ModuleArg,
        /// JSON signal file, or '-' for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Evaluate a JSON array of {"module", "signal"} entries in parallel
    Batch {
        /// JSON batch file, or '-' for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Print the standing alert feed
    Alerts,
    /// Exchange credentials for a bearer token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ModuleArg {
    Wifi,
    RogueAp,
    Mitm,
    Malware,
    Anomaly,
}

impl From<ModuleArg> for Module {
    fn from(value: ModuleArg) -> Self {
        match value {
            ModuleArg::Wifi => Module::Wifi,
            ModuleArg::RogueAp => Module::RogueAp,
            ModuleArg::Mitm => Module::Mitm,
            ModuleArg::Malware => Module::Malware,
            ModuleArg::Anomaly => Module::Anomaly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kebab_case_module() {
        let cli = Cli::parse_from(["crimson-defense", "detect", "rogue-ap", "--input", "ap.json"]);
        match cli.command {
            Command::Detect { module, input } => {
                assert_eq!(Module::from(module), Module::RogueAp);
                assert_eq!(input, "ap.json");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from(["crimson-defense", "alerts", "-vv", "--escalate"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.escalate);
    }
}
