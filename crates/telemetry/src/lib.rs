//! sales-telemetry - 日志与启动自检

use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

fn env_filter(log_level: &str) -> EnvFilter {
    // RUST_LOG 优先于配置文件
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// 初始化 tracing
pub fn init_tracing(log_level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// 初始化 JSON 格式的 tracing（生产环境）
pub fn init_tracing_json(log_level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
}

/// 按输出格式初始化
pub fn init(log_level: &str, json: bool) -> Result<(), TryInitError> {
    if json {
        init_tracing_json(log_level)?;
    } else {
        init_tracing(log_level)?;
    }
    tracing::debug!(log_level, json, "Tracing initialized");
    Ok(())
}

/// 健康检查状态
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    pub checks: Vec<HealthCheck>,
}

#[derive(Debug, Clone)]
pub struct HealthCheck {
    pub name: String,
    pub healthy: bool,
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn new() -> Self {
        Self {
            healthy: true,
            checks: Vec::new(),
        }
    }

    pub fn add_check(&mut self, name: impl Into<String>, healthy: bool, message: Option<String>) {
        if !healthy {
            self.healthy = false;
        }
        self.checks.push(HealthCheck {
            name: name.into(),
            healthy,
            message,
        });
    }

    /// 记录一个 `Result` 形式的检查结果
    pub fn record<T, E: std::fmt::Display>(&mut self, name: impl Into<String>, result: &Result<T, E>) {
        match result {
            Ok(_) => self.add_check(name, true, None),
            Err(e) => self.add_check(name, false, Some(e.to_string())),
        }
    }

    /// 失败检查的名称
    pub fn failed(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| !c.healthy)
            .map(|c| c.name.as_str())
            .collect()
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::new()
    }
}
