use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
    /// Mark the session cookie `Secure`. Enable behind HTTPS.
    pub secure_cookies: bool,
    /// Request body limit for image uploads, in bytes.
    pub max_upload_bytes: usize,
}

/// 16 MiB, enough for full-size camera photos.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

impl Server {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            secure_cookies: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: "sqlite://anomaly.db".into(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
    /// Served under `/static`; uploads live in `<static_dir>/images/`.
    pub static_dir: String,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            static_dir: "static".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Models {
    /// ONNX classifier. Without it every upload gets uniform scores.
    pub classifier: Option<String>,
    /// ONNX detector. Without it no localized image is produced.
    pub localizer: Option<String>,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub localizer_input: u32,
}

impl Default for Models {
    fn default() -> Self {
        Self {
            classifier: None,
            localizer: None,
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            localizer_input: 640,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub storage: Storage,
    pub models: Models,
}

impl Settings {
    /// Defaults, then `config.toml`, then `ANOMALY__SECTION__KEY` variables.
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.secure_cookies", false)?
            .set_default("server.max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES as u64)?
            .set_default("database.url", "sqlite://anomaly.db")?
            .set_default("database.max_connections", 5)?
            .set_default("storage.static_dir", "static")?
            .set_default("models.confidence_threshold", 0.25)?
            .set_default("models.iou_threshold", 0.45)?
            .set_default("models.localizer_input", 640)?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix("ANOMALY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::set_var;

    #[test]
    fn test_settings() {
        set_var("ANOMALY__DATABASE__URL", "sqlite::memory:");
        set_var("ANOMALY__MODELS__CONFIDENCE_THRESHOLD", "0.6");
        let settings = Settings::new().unwrap();
        assert_eq!(settings.database.url, "sqlite::memory:");
        assert_eq!(settings.database.max_connections, 5);
        assert!((settings.models.confidence_threshold - 0.6).abs() < 1e-6);
        assert_eq!(settings.models.classifier, None);
        assert_eq!(settings.server.addr(), "127.0.0.1:8080");
        assert_eq!(settings.server.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_defaults_match_builder() {
        let settings = Settings::default();
        assert_eq!(settings.storage.static_dir, "static");
        assert_eq!(settings.models.localizer_input, 640);
        assert!(!settings.server.secure_cookies);
        assert_eq!(settings.server.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }
}
