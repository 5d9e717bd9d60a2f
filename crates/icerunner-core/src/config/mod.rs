pub mod deck_config;
pub mod icerunner_config;
pub mod logging_config;
pub mod paths;

pub use deck_config::{DeckConfig, DEFAULT_SCRIPT_PATH};
pub use icerunner_config::{ConfigLoadError, IceRunnerConfig};
pub use logging_config::LoggingConfig;
pub use paths::ProjectPaths;
