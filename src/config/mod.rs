// ==========================================
// 维修服务报表引擎 - 配置层
// ==========================================
// 职责: 报表配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod report_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigError, ConfigManager, ConfigResult};
pub use report_config::ReportConfig;
