use serde::Deserialize;
use std::env;
use std::path::PathBuf;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory transient upload artifacts are written to.
    pub upload_dir: PathBuf,
    /// Interval between stale-file sweeps.
    pub sweep_interval_secs: u64,
    /// Age after which an orphaned upload file is considered stale.
    pub stale_after_secs: u64,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Tesseract data path override. `None` uses the system default
    /// (`TESSDATA_PREFIX` or the compiled-in location).
    pub data_path: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("YOMI_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("YOMI_PORT", 5000),
            },
            storage: StorageConfig {
                upload_dir: env::var("YOMI_UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| env::temp_dir().join("yomi_uploads")),
                sweep_interval_secs: parse_env_or("YOMI_SWEEP_INTERVAL", 600),
                stale_after_secs: parse_env_or("YOMI_STALE_AFTER", 3600),
                max_upload_bytes: parse_env_or("YOMI_MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
            },
            ocr: OcrConfig {
                data_path: env::var("TESSDATA_PREFIX").ok(),
                timeout_secs: parse_env_or("OCR_TIMEOUT", 60),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
