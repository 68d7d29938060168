// ==========================================
// 维修服务报表引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::report_config::ReportConfig;
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// 全局作用域标识
pub const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigError - 配置层错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("数据库连接失败: {0}")]
    Connection(String),

    #[error("数据库锁获取失败: {0}")]
    Lock(String),

    #[error("配置读写失败: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("配置值无效 (key={key}): {value}")]
    InvalidValue { key: String, value: String },

    #[error("配置序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn =
            open_sqlite_connection(db_path).map_err(|e| ConfigError::Connection(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::Lock(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON 对象字符串，键有序）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== 报表配置 =====

    /// 加载报表配置；缺失的键使用默认值，格式错误的值报错
    pub fn load_report_config(&self) -> ConfigResult<ReportConfig> {
        let defaults = ReportConfig::default();

        let default_rating_limit = match self.get_global_value(config_keys::DEFAULT_RATING_LIMIT)? {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: config_keys::DEFAULT_RATING_LIMIT.to_string(),
                    value: raw.clone(),
                })?,
            None => defaults.default_rating_limit,
        };

        let all_categories_label = match self.get_global_value(config_keys::ALL_CATEGORIES_LABEL)? {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    key: config_keys::ALL_CATEGORIES_LABEL.to_string(),
                    value: raw,
                });
            }
            Some(raw) => raw,
            None => defaults.all_categories_label,
        };

        Ok(ReportConfig {
            default_rating_limit,
            all_categories_label,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 亏损排名
    pub const DEFAULT_RATING_LIMIT: &str = "report.unprofitability.default_limit";

    // 城市覆盖率
    pub const ALL_CATEGORIES_LABEL: &str = "report.coverage.all_categories_label";
}
