// ==========================================
// 维修服务报表引擎 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键、busy_timeout）
// - 提供幂等的建表脚本（仅用于初始化/测试，不做版本迁移）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前建表脚本对应的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "REPAIR_REPORTS_DB_PATH";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let mut conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    crate::perf::install_sqlite_tracing(&mut conn);
    Ok(conn)
}

/// 打开内存数据库（测试/嵌入场景），并完成建表
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化数据库 schema（幂等）
///
/// 金额字段以十进制文本存储，日期字段为 `YYYY-MM-DD` 文本。
/// 约束由存储层负责拒绝：金额必须是非负十进制文本，保修期 > 0，结束日期不早于开始日期。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS manufacturers (
            manufacturer_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            contact_info TEXT
        );

        CREATE TABLE IF NOT EXISTS products (
            product_id INTEGER PRIMARY KEY AUTOINCREMENT,
            manufacturer_id INTEGER NOT NULL REFERENCES manufacturers(manufacturer_id),
            model_name TEXT NOT NULL,
            category TEXT NOT NULL,
            warranty_period INTEGER NOT NULL CHECK (warranty_period > 0),
            base_repair_cost TEXT NOT NULL CHECK (
                base_repair_cost GLOB '[0-9]*'
                AND base_repair_cost NOT GLOB '*[^0-9.]*'
                AND base_repair_cost NOT GLOB '*.*.*'
                AND base_repair_cost NOT GLOB '*.'
            )
        );

        CREATE TABLE IF NOT EXISTS cities (
            city_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS repair_shops (
            shop_id INTEGER PRIMARY KEY AUTOINCREMENT,
            city_id INTEGER NOT NULL REFERENCES cities(city_id),
            address TEXT NOT NULL,
            contact_phone TEXT
        );

        CREATE TABLE IF NOT EXISTS shop_specializations (
            specialization_id INTEGER PRIMARY KEY AUTOINCREMENT,
            shop_id INTEGER NOT NULL REFERENCES repair_shops(shop_id),
            product_id INTEGER NOT NULL REFERENCES products(product_id),
            UNIQUE (shop_id, product_id)
        );

        CREATE TABLE IF NOT EXISTS repairs (
            repair_id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER NOT NULL REFERENCES products(product_id),
            shop_id INTEGER NOT NULL REFERENCES repair_shops(shop_id),
            start_date TEXT NOT NULL,
            end_date TEXT,
            actual_repair_cost TEXT NOT NULL CHECK (
                actual_repair_cost GLOB '[0-9]*'
                AND actual_repair_cost NOT GLOB '*[^0-9.]*'
                AND actual_repair_cost NOT GLOB '*.*.*'
                AND actual_repair_cost NOT GLOB '*.'
            ),
            client_cost TEXT NOT NULL CHECK (
                client_cost GLOB '[0-9]*'
                AND client_cost NOT GLOB '*[^0-9.]*'
                AND client_cost NOT GLOB '*.*.*'
                AND client_cost NOT GLOB '*.'
            ),
            serial_number TEXT,
            defect_description TEXT,
            CHECK (end_date IS NULL OR end_date >= start_date)
        );

        CREATE INDEX IF NOT EXISTS idx_products_manufacturer ON products(manufacturer_id);
        CREATE INDEX IF NOT EXISTS idx_repair_shops_city ON repair_shops(city_id);
        CREATE INDEX IF NOT EXISTS idx_repairs_product ON repairs(product_id);
        CREATE INDEX IF NOT EXISTS idx_repairs_shop ON repairs(shop_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 `REPAIR_REPORTS_DB_PATH` > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./repair_service.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("repair-reports");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("repair_service.db");
        }
    }

    path.to_string_lossy().to_string()
}
