use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::{EnsembleError, Result};

/// HTTP 监听配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// 可接受的批次文档最大字节数
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            body_limit: 1024 * 1024,
        }
    }
}

/// 批次执行配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 单次出站调用的超时
    pub call_timeout_ms: u64,
    /// 工作负载未指定时使用的批次截止时间
    pub batch_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 1_000,
            batch_timeout_ms: 10_000,
        }
    }
}

impl EngineConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn batch_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_timeout_ms)
    }
}

/// `ensemble.toml` 的内容
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    pub server: ServerConfig,
    pub engine: EngineConfig,
}

/// 配置文件查找与加载
pub struct ConfigLoader;

impl ConfigLoader {
    const CONFIG_FILE: &'static str = "ensemble.toml";
    const CONFIG_ENV: &'static str = "ENSEMBLE_CONFIG";

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<EnsembleConfig> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            EnsembleError::Config(format!(
                "failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: EnsembleConfig = toml::from_str(&content)?;
        Self::check(&config);
        Ok(config)
    }

    /// 确定要使用的配置
    ///
    /// 显式指定的路径（参数，其次 `ENSEMBLE_CONFIG`）必须能加载成功。
    /// 未指定时依次在当前目录及其父目录、`~/.config/ensemble/` 中查找
    /// `ensemble.toml`，都不存在则使用默认配置。
    pub fn resolve(explicit: Option<&Path>) -> Result<EnsembleConfig> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }
        if let Ok(path) = std::env::var(Self::CONFIG_ENV) {
            return Self::load_from_path(path);
        }
        Ok(Self::find_and_load().unwrap_or_default())
    }

    pub fn find_and_load() -> Option<EnsembleConfig> {
        if let Some(config) = Self::try_load_from_current_dir() {
            return Some(config);
        }

        Self::try_load_from_user_dir()
    }

    fn try_load_from_current_dir() -> Option<EnsembleConfig> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                debug!(path = %config_path.display(), "loading config");
                return Self::load_or_warn(&config_path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    fn try_load_from_user_dir() -> Option<EnsembleConfig> {
        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("ensemble").join(Self::CONFIG_FILE);

        if config_path.exists() {
            Self::load_or_warn(&config_path)
        } else {
            None
        }
    }

    fn load_or_warn(path: &Path) -> Option<EnsembleConfig> {
        match Self::load_from_path(path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    fn check(config: &EnsembleConfig) {
        if config.engine.call_timeout_ms >= config.engine.batch_timeout_ms {
            warn!(
                call_timeout_ms = config.engine.call_timeout_ms,
                batch_timeout_ms = config.engine.batch_timeout_ms,
                "per-call timeout is not shorter than the batch deadline"
            );
        }
    }
}
