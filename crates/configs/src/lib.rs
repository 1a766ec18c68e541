use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8080 }
    }
}

/// Object storage settings. `backend` selects the implementation:
/// `"s3"` (default) or `"local"` for the filesystem store used in
/// development and tests.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Custom S3 endpoint for MinIO and other S3-compatible stores.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Root directory for the local backend.
    #[serde(default = "default_local_root")]
    pub local_root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            bucket: default_bucket(),
            endpoint: None,
            local_root: default_local_root(),
        }
    }
}

fn default_backend() -> String { "s3".to_string() }
fn default_bucket() -> String { "hud-editor-data".to_string() }
fn default_local_root() -> String { "data".to_string() }

/// Load from `CONFIG_PATH` (default `config.toml`); a missing file yields
/// the built-in defaults so the service runs on env vars alone.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !std::path::Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.validate()?;
        self.storage.normalize_from_env();
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    /// `PORT` and `SERVER_HOST` override whatever the file provided.
    pub fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            if !host.trim().is_empty() {
                self.host = host;
            }
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(anyhow!("server.host must not be empty"));
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        Ok(())
    }
}

impl StorageConfig {
    /// `BUCKET_NAME`, `S3_ENDPOINT`, `STORAGE_BACKEND` and `DATA_DIR`
    /// override the file values.
    pub fn normalize_from_env(&mut self) {
        if let Ok(bucket) = std::env::var("BUCKET_NAME") {
            if !bucket.trim().is_empty() {
                self.bucket = bucket;
            }
        }
        if let Ok(endpoint) = std::env::var("S3_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                self.endpoint = Some(endpoint);
            }
        }
        if let Ok(backend) = std::env::var("STORAGE_BACKEND") {
            if !backend.trim().is_empty() {
                self.backend = backend;
            }
        }
        if let Ok(root) = std::env::var("DATA_DIR") {
            if !root.trim().is_empty() {
                self.local_root = root;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(anyhow!("storage.bucket must not be empty; set BUCKET_NAME"));
        }
        match self.backend.as_str() {
            "s3" | "local" => Ok(()),
            other => Err(anyhow!("storage.backend must be \"s3\" or \"local\", got {other:?}")),
        }
    }
}
