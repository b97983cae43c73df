use std::io;

#[derive(thiserror::Error, Debug)]
pub enum DefenseError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("policy violation in {module}: score={score} ({reason})")]
    PolicyViolation {
        module: String,
        score: f64,
        reason: String,
    },
    #[error("unknown detection module: {0}")]
    UnknownModule(String),
    #[error("detector timed out: {0}")]
    Timeout(String),
    #[error("detector failed: {0}")]
    Detector(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("username already exists: {0}")]
    UserExists(String),
    #[error("unknown alert: {0}")]
    UnknownAlert(String),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl DefenseError {
    pub fn policy(module: &str, score: f64, reason: impl Into<String>) -> Self {
        DefenseError::PolicyViolation {
            module: module.to_string(),
            score,
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for DefenseError {
    fn from(err: toml::de::Error) -> Self {
        DefenseError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_errors_become_config_errors() {
        let err: DefenseError = toml::from_str::<toml::Value>("engine = [")
            .unwrap_err()
            .into();
        assert!(matches!(err, DefenseError::Config(_)));
    }

    #[test]
    fn detector_failure_names_the_cause() {
        let err = DefenseError::Detector("wifi: task panicked".to_string());
        assert_eq!(err.to_string(), "detector failed: wifi: task panicked");
    }
}
