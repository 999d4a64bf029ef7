//! Configuration for the demo binary.
//!
//! Every flag can also be set through an environment variable; a `.env` file
//! in the working directory is loaded before parsing.

use clap::{ArgAction, Parser, ValueEnum};
use std::time::Duration;
use thiserror::Error;

/// Which store backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Process-local store; contents are lost on exit.
    Memory,
    /// MongoDB (requires the `mongodb` feature).
    Mongodb,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("mongodb uri must start with mongodb:// or mongodb+srv://, got {0:?}")]
    InvalidMongoUri(String),
    #[error("database name must not be empty")]
    EmptyDatabase,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "clientapps-demo", version, about = "Runs the client application lifecycle against a store backend")]
pub struct DemoConfig {
    /// Store backend.
    #[arg(long, env = "CLIENTAPPS_BACKEND", value_enum, default_value_t = BackendKind::Memory)]
    pub backend: BackendKind,

    /// MongoDB connection string.
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// Database holding the `clientapps` collection.
    #[arg(long, env = "CLIENTAPPS_DATABASE", default_value = "lynxDev")]
    pub database: String,

    /// Per-request deadline in milliseconds; 0 disables it.
    #[arg(long, env = "CLIENTAPPS_TIMEOUT_MS", default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON.
    #[arg(long, env = "CLIENTAPPS_JSON_LOGS")]
    pub json_logs: bool,
}

impl DemoConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == BackendKind::Mongodb {
            let uri = self.mongodb_uri.trim();
            if !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://")) {
                return Err(ConfigError::InvalidMongoUri(self.mongodb_uri.clone()));
            }
            if self.database.trim().is_empty() {
                return Err(ConfigError::EmptyDatabase);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> DemoConfig {
        DemoConfig::try_parse_from(std::iter::once("clientapps-demo").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn explicit_flags_are_parsed() {
        let config = parse(&["--backend", "mongodb", "--database", "clientdb", "--timeout-ms", "250", "-vv"]);

        assert_eq!(config.backend, BackendKind::Mongodb);
        assert_eq!(config.database, "clientdb");
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.verbose, 2);
    }

    #[test]
    fn zero_timeout_disables_deadline() {
        assert_eq!(parse(&["--timeout-ms", "0"]).request_timeout(), None);
    }

    #[test]
    fn mongodb_backend_requires_mongodb_uri() {
        let config = parse(&["--backend", "mongodb", "--mongodb-uri", "postgres://localhost", "--database", "x"]);

        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidMongoUri("postgres://localhost".into()))
        );
    }

    #[test]
    fn mongodb_backend_requires_database() {
        let config = parse(&["--backend", "mongodb", "--mongodb-uri", "mongodb+srv://cluster.example.net", "--database", " "]);

        assert_eq!(config.validate(), Err(ConfigError::EmptyDatabase));
    }

    #[test]
    fn memory_backend_ignores_mongodb_settings() {
        let config = parse(&["--backend", "memory", "--mongodb-uri", "nonsense"]);

        assert!(config.validate().is_ok());
    }
}
