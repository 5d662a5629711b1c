use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upload preset used when none is configured
pub const DEFAULT_UPLOAD_PRESET: &str = "ml_default";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("missing {0}; set it in LandDesk.toml or the environment")]
    Missing(&'static str),
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub supabase: SupabaseConfig,
    pub cloudinary: CloudinaryConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub table: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            table: "properties".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CloudinaryConfig {
    /// Configured preset, falling back to `ml_default`
    pub fn preset(&self) -> &str {
        let preset = self.upload_preset.trim();
        if preset.is_empty() {
            DEFAULT_UPLOAD_PRESET
        } else {
            preset
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. LandDesk.toml
    /// 2. Environment variables prefixed with LAND_DESK_ (`__` separates sections)
    /// 3. The `PUBLIC_*` variables shared with the web front end
    ///
    /// A `.env` file is read first if one exists.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("LandDesk.toml"))
            .merge(Env::prefixed("LAND_DESK_").split("__"))
            .merge(public_var("PUBLIC_SUPABASE_URL", "supabase.url"))
            .merge(public_var("PUBLIC_SUPABASE_ANON_KEY", "supabase.anon_key"))
            .merge(public_var("PUBLIC_CLOUDINARY_CLOUD_NAME", "cloudinary.cloud_name"))
            .merge(public_var("PUBLIC_CLOUDINARY_UPLOAD_PRESET", "cloudinary.upload_preset"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract().map_err(Box::new)?;
        config.ensure_backend()?;
        Ok(config)
    }

    /// Both binaries need the row store; the media host is checked on upload
    fn ensure_backend(&self) -> Result<(), ConfigError> {
        if self.supabase.url.trim().is_empty() {
            return Err(ConfigError::Missing("Supabase URL (PUBLIC_SUPABASE_URL)"));
        }
        if self.supabase.anon_key.trim().is_empty() {
            return Err(ConfigError::Missing(
                "Supabase anon key (PUBLIC_SUPABASE_ANON_KEY)",
            ));
        }
        Ok(())
    }
}

fn public_var(name: &'static str, key: &'static str) -> Env {
    Env::raw().only(&[name]).map(move |_| key.into())
}
