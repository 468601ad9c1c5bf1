use crate::domain::ports::DEFAULT_PAGE_SIZE;
use crate::logging::LogFormat;
use std::path::PathBuf;

/// Runtime settings, built once from the command line and passed down
/// explicitly to whatever needs them.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// RocksDB directory; `None` selects the in-memory store.
    pub db_path: Option<PathBuf>,
    pub page_size: u32,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            log_level: "warn".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn with_db_path(mut self, db_path: Option<PathBuf>) -> Self {
        self.db_path = db_path;
        self
    }

    /// A page size of zero falls back to the default.
    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = match page_size {
            Some(0) | None => DEFAULT_PAGE_SIZE,
            Some(size) => size,
        };
        self
    }

    pub fn with_logging(mut self, level: impl Into<String>, format: LogFormat) -> Self {
        self.log_level = level.into();
        self.log_format = format;
        self
    }
}
