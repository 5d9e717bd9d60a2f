use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to <data_dir>/logs/icerunner.log
    #[serde(default)]
    pub file: bool,
}
