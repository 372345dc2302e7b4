//! Runtime configuration.
//!
//! Values come from the environment (a `.env` file is loaded first by the
//! CLI) and can be overridden by command-line flags.
//!
//! | Variable               | Default   | Meaning                          |
//! |------------------------|-----------|----------------------------------|
//! | `EDI_SEPARATORS`       | `~*\|`    | Candidate separator characters   |
//! | `EDI_PROFILE`          | `lenient` | `lenient` or `strict`            |
//! | `EDI_PORT`             | `3000`    | HTTP server port                 |
//! | `EDI_LOG` / `RUST_LOG` | `info`    | Log filter                       |
//! | `EDI_LOG_FORMAT`       | `pretty`  | `pretty` or `json`               |
//! | `EDI_MAX_UPLOAD_BYTES` | 50 MB     | Upload size limit                |

use std::path::Path;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult, IngestError, IngestResult};
use crate::parser::DelimiterSet;
use crate::pipeline::ParseOptions;
use crate::validation::ValidationProfile;

/// File extensions accepted by the upload surfaces.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["edi", "x12", "txt"];

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Maximum upload size (in bytes).
///
/// 50 MB limit.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::UnknownLogFormat(other.to_string())),
        }
    }
}

/// Complete configuration for the CLI and server.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub separators: DelimiterSet,
    pub profile: ValidationProfile,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub max_upload_bytes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            separators: DelimiterSet::default(),
            profile: ValidationProfile::default(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl IngestConfig {
    /// Load from process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("EDI_SEPARATORS") {
            config.separators = v.parse()?;
        }
        if let Some(v) = lookup("EDI_PROFILE") {
            config.profile = v.parse()?;
        }
        if let Some(v) = lookup("EDI_PORT") {
            config.port = parse_number("EDI_PORT", &v)?;
        }
        if let Some(v) = lookup("EDI_LOG").or_else(|| lookup("RUST_LOG")) {
            config.log_level = v;
        }
        if let Some(v) = lookup("EDI_LOG_FORMAT") {
            config.log_format = v.parse()?;
        }
        if let Some(v) = lookup("EDI_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse_number("EDI_MAX_UPLOAD_BYTES", &v)?;
        }

        Ok(config)
    }

    /// Parse options derived from this configuration.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::default()
            .with_separators(self.separators.clone())
            .with_profile(self.profile)
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Whether `file_name` has one of the [`SUPPORTED_EXTENSIONS`] (case-insensitive).
pub fn is_supported_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

/// Reject file names without a supported extension.
pub fn check_extension(file_name: &str) -> IngestResult<()> {
    if is_supported_extension(file_name) {
        return Ok(());
    }
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    Err(IngestError::UnsupportedExtension(ext))
}
