//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Write tracing output to a daily rolling file
    pub file: bool,
    /// Record each run as JSONL conversation events
    pub conversation_log: bool,
    /// Directory for both kinds of log (default: `<data dir>/duet/logs`)
    pub dir: Option<PathBuf>,
}

impl FileLoggingConfig {
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("duet").join("logs")))
    }
}
