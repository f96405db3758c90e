//! Configuration management for Course Host Server

use std::env;
use std::path::PathBuf;

/// Default upload limit: 500MB
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 500;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL advertised to launched xAPI content for statement delivery
    pub public_base_url: String,
    /// Directory with the browser UI, served as a fallback when present
    pub public_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root holding the uploads, courses and sandbox directories
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                public_base_url: "http://localhost:3000".to_string(),
                public_dir: PathBuf::from("./public"),
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("./data"),
                max_upload_bytes: default_upload_limit_bytes(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .or_else(|_| env::var("SERVER_PORT"))
            .ok()
            .and_then(|p| match p.parse() {
                Ok(port) => Some(port),
                Err(_) => {
                    tracing::warn!("Ignoring invalid port {:?}, using 3000", p);
                    None
                }
            })
            .unwrap_or(3000);

        let max_upload_bytes = match env::var("MAX_UPLOAD_MB") {
            Ok(v) => v
                .parse::<u64>()
                .ok()
                .and_then(upload_limit_bytes)
                .unwrap_or_else(|| {
                    tracing::warn!(
                        "Ignoring invalid MAX_UPLOAD_MB {:?}, using {}",
                        v,
                        DEFAULT_MAX_UPLOAD_MB
                    );
                    default_upload_limit_bytes()
                }),
            Err(_) => default_upload_limit_bytes(),
        };

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
                public_base_url: env::var("PUBLIC_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|_| format!("http://localhost:{}", port)),
                public_dir: env::var("PUBLIC_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./public")),
            },
            storage: StorageConfig {
                data_dir: env::var("DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./data")),
                max_upload_bytes,
            },
        }
    }

    /// Configuration rooted at a specific data directory
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let mut config = Config::default();
        config.storage.data_dir = data_dir.into();
        config
    }
}

/// Upload limit in bytes for a limit in megabytes; `None` when zero or
/// too large for this platform
fn upload_limit_bytes(mb: u64) -> Option<usize> {
    if mb == 0 {
        return None;
    }
    mb.checked_mul(1024 * 1024)
        .and_then(|bytes| usize::try_from(bytes).ok())
}

fn default_upload_limit_bytes() -> usize {
    (DEFAULT_MAX_UPLOAD_MB * 1024 * 1024) as usize
}
