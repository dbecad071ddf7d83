use serde::Deserialize;
use std::fs;
use time::{macros::format_description, UtcOffset};

#[derive(Debug, Clone, Deserialize)]
pub struct QuestDbConfig {
    pub uri: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurvesConfig {
    /// Offset of the local time the anchor months are expressed in, `+HH:MM`.
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
}

impl Default for CurvesConfig {
    fn default() -> Self {
        Self {
            utc_offset: default_utc_offset(),
        }
    }
}

fn default_utc_offset() -> String {
    "+00:00".to_string()
}

impl CurvesConfig {
    pub fn offset(&self) -> anyhow::Result<UtcOffset> {
        parse_utc_offset(&self.utc_offset)
    }
}

pub fn parse_utc_offset(s: &str) -> anyhow::Result<UtcOffset> {
    UtcOffset::parse(
        s.trim(),
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .map_err(|e| anyhow::anyhow!("invalid curves.utc_offset '{s}': {e}"))
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    pub token: String,
    #[serde(default)]
    pub allowed_cups: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub questdb: QuestDbConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub curves: CurvesConfig,
    pub auth: Option<AuthConfig>,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("CURVE_CONFIG").unwrap_or_else(|_| "curve-config.toml".to_string());
        let contents = fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read config '{path}': {e}"))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        // Fail at startup rather than on the first request.
        cfg.curves.offset()?;
        Ok(cfg)
    }
}
