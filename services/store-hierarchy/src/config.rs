//! 服务配置
//!
//! 在公共 [`AppConfig`] 之上增加编码分配的重试参数。

use sales_common::RetryConfig;
use sales_config::{AppConfig, ConfigError};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct StoreServiceConfig {
    #[serde(flatten)]
    pub app: AppConfig,
    #[serde(default)]
    pub allocation: AllocationConfig,
}

impl StoreServiceConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        sales_config::load(config_dir)
    }
}

/// 编码冲突时重试创建的参数
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_delay_ms() -> u64 {
    20
}

fn default_max_delay_ms() -> u64 {
    500
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl AllocationConfig {
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::from_millis(self.max_attempts, self.initial_delay_ms, self.max_delay_ms)
    }
}
