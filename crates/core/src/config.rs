//! Plog 配置系统
//!
//! 支持 YAML 配置文件

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Level, PlogError, Result};

/// Plog 主配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlogConfig {
    /// Writer 配置
    #[serde(default)]
    pub logger: LoggerConfig,

    /// tracing 配置
    #[serde(default)]
    pub tracing: TracingConfig,

    /// 存储后端列表（按注册顺序写入）
    #[serde(default)]
    pub backends: Vec<BackendConfig>,
}

impl PlogConfig {
    /// 从 YAML 文本解析
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| PlogError::Configuration(e.to_string()))
    }

    /// 从 YAML 文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PlogError::Configuration(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&content)
    }
}

/// Writer 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// 最低记录级别
    #[serde(default)]
    pub min_level: Level,
}

/// tracing 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    /// 最高输出级别 (trace/debug/info/warn/error)
    #[serde(default = "default_tracing_level")]
    pub level: String,
}

fn default_tracing_level() -> String {
    "info".to_string()
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: default_tracing_level(),
        }
    }
}

/// 文件后端的写入方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// 原地整体重写（默认，兼容行为）
    #[default]
    Rewrite,
    /// 先写临时文件再重命名
    Atomic,
}

/// 存储后端
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    /// JSON 数组文件
    Json {
        path: PathBuf,
        #[serde(default)]
        write_mode: WriteMode,
    },

    /// CSV 表格文件
    Csv {
        path: PathBuf,
        #[serde(default)]
        write_mode: WriteMode,
    },

    /// SQLite 数据库
    Sqlite { path: PathBuf },

    /// 进程内存储
    Memory,
}
