//! sales-config - 配置加载库
//!
//! 加载顺序: `default.toml` → `{APP_ENV}.toml` → `SALES_` 前缀环境变量（`__` 分隔层级）

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use secrecy::Secret;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "SALES_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    30
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 强制 JSON 日志；未设置时生产环境自动启用
    #[serde(default)]
    pub json: Option<bool>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        load(config_dir)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否输出 JSON 日志
    pub fn json_logs(&self) -> bool {
        self.telemetry.json.unwrap_or_else(|| self.is_production())
    }
}

/// 当前运行环境名
pub fn current_env() -> String {
    std::env::var("APP_ENV").unwrap_or_else(|_| default_app_env())
}

/// 构造分层配置源
pub fn layered(config_dir: &str) -> Figment {
    let env = current_env();

    Figment::new()
        .merge(Toml::file(format!("{}/default.toml", config_dir)))
        .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// 加载任意配置结构（服务可在 [`AppConfig`] 之上扩展自己的段）
pub fn load<T: DeserializeOwned>(config_dir: &str) -> Result<T, ConfigError> {
    Ok(layered(config_dir).extract()?)
}

#[cfg(test)]
mod tests;
