// ==========================================
// 维修服务报表引擎 - 报表事实仓储
// ==========================================
// 红线: Repository 不含业务逻辑（不聚合、不排名、不取整）
// 职责: 每个报表一条 SQL，返回连接展开后的事实行
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::facts::{
    CatalogCounts, CategoryRepairFact, CoverageFact, ProductRepairFact, RepairStatusFact,
    RepairSummaryFacts,
};
use crate::repository::codec::{decimal_at, optional_decimal_at};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// Trait: ReportFactSource
// ==========================================
// 用途: 报表引擎与存储之间的只读契约，便于替换存储实现
pub trait ReportFactSource: Send + Sync {
    /// 产品维修事实（仅包含有维修记录的产品）
    fn product_repair_facts(&self) -> RepositoryResult<Vec<ProductRepairFact>>;

    /// 城市覆盖事实（所有城市，左连接展开）
    fn coverage_facts(&self) -> RepositoryResult<Vec<CoverageFact>>;

    /// 类别维修事实（所有产品，左连接维修）
    fn category_repair_facts(&self) -> RepositoryResult<Vec<CategoryRepairFact>>;

    /// 维修状态事实 + 目录规模（同一快照）
    fn repair_summary_facts(&self) -> RepositoryResult<RepairSummaryFacts>;
}

// ==========================================
// SqliteReportFactSource - SQLite 实现
// ==========================================
pub struct SqliteReportFactSource {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteReportFactSource {
    /// 创建新的报表事实仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl ReportFactSource for SqliteReportFactSource {
    fn product_repair_facts(&self) -> RepositoryResult<Vec<ProductRepairFact>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                p.product_id, p.model_name, m.name, p.category,
                r.repair_id, r.actual_repair_cost, r.client_cost
            FROM products p
            JOIN manufacturers m ON p.manufacturer_id = m.manufacturer_id
            JOIN repairs r ON p.product_id = r.product_id
            ORDER BY p.product_id, r.repair_id
            "#,
        )?;

        let facts = stmt
            .query_map([], |row| {
                Ok(ProductRepairFact {
                    product_id: row.get(0)?,
                    model_name: row.get(1)?,
                    manufacturer: row.get(2)?,
                    category: row.get(3)?,
                    repair_id: row.get(4)?,
                    actual_repair_cost: decimal_at(row, 5)?,
                    client_cost: decimal_at(row, 6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(count = facts.len(), "product repair facts loaded");
        Ok(facts)
    }

    fn coverage_facts(&self) -> RepositoryResult<Vec<CoverageFact>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                c.city_id, c.name, s.shop_id, p.product_id, p.category, r.repair_id
            FROM cities c
            LEFT JOIN repair_shops s ON c.city_id = s.city_id
            LEFT JOIN shop_specializations sp ON s.shop_id = sp.shop_id
            LEFT JOIN products p ON sp.product_id = p.product_id
            LEFT JOIN repairs r ON s.shop_id = r.shop_id AND r.product_id = p.product_id
            ORDER BY c.city_id, s.shop_id
            "#,
        )?;

        let facts = stmt
            .query_map([], |row| {
                Ok(CoverageFact {
                    city_id: row.get(0)?,
                    city_name: row.get(1)?,
                    shop_id: row.get(2)?,
                    product_id: row.get(3)?,
                    category: row.get(4)?,
                    repair_id: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(count = facts.len(), "coverage facts loaded");
        Ok(facts)
    }

    fn category_repair_facts(&self) -> RepositoryResult<Vec<CategoryRepairFact>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT p.category, p.product_id, r.repair_id, r.actual_repair_cost
            FROM products p
            LEFT JOIN repairs r ON p.product_id = r.product_id
            ORDER BY p.category, p.product_id
            "#,
        )?;

        let facts = stmt
            .query_map([], |row| {
                Ok(CategoryRepairFact {
                    category: row.get(0)?,
                    product_id: row.get(1)?,
                    repair_id: row.get(2)?,
                    actual_repair_cost: optional_decimal_at(row, 3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(count = facts.len(), "category repair facts loaded");
        Ok(facts)
    }

    fn repair_summary_facts(&self) -> RepositoryResult<RepairSummaryFacts> {
        let conn = self.get_conn()?;

        // 同一读事务内读取
        let tx = conn.unchecked_transaction()?;
        let repairs = load_repair_status(&tx)?;
        let counts = load_catalog_counts(&tx)?;
        tx.commit()?;

        tracing::debug!(count = repairs.len(), "repair status facts loaded");
        Ok(RepairSummaryFacts { repairs, counts })
    }
}

fn load_repair_status(conn: &Connection) -> RepositoryResult<Vec<RepairStatusFact>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT repair_id, end_date IS NULL, actual_repair_cost, client_cost
        FROM repairs
        ORDER BY repair_id
        "#,
    )?;

    let facts = stmt
        .query_map([], |row| {
            Ok(RepairStatusFact {
                repair_id: row.get(0)?,
                is_open: row.get(1)?,
                actual_repair_cost: decimal_at(row, 2)?,
                client_cost: decimal_at(row, 3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(facts)
}

fn load_catalog_counts(conn: &Connection) -> RepositoryResult<CatalogCounts> {
    let (products_count, shops_count): (i64, i64) = conn.query_row(
        r#"
        SELECT
            (SELECT COUNT(*) FROM products),
            (SELECT COUNT(*) FROM repair_shops)
        "#,
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(CatalogCounts {
        products_count: products_count.max(0) as u64,
        shops_count: shops_count.max(0) as u64,
    })
}
