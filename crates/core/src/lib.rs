// Plog Core - 核心数据模型
//!
//! 包含：
//! - LogEntry / StoredRecord: 日志记录与其存储形式
//! - Level: 五级严重度
//! - date: 日期解析与格式化
//! - Clock: 可替换时钟
//! - PlogConfig: YAML 配置

mod clock;
mod entry;
mod error;
mod level;

pub mod config;
pub mod date;
pub mod telemetry;

pub use clock::*;
pub use entry::*;
pub use error::*;
pub use level::*;
pub use config::{BackendConfig, LoggerConfig, PlogConfig, TracingConfig, WriteMode};
