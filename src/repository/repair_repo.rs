// ==========================================
// 维修服务报表引擎 - 维修单数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（费用规则在 domain::repair 中定义）
// 职责: repairs 表的开单、完工、查询
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::money::to_storage_text;
use crate::domain::repair::{ActiveRepair, NewRepair, NewRepairRecord, Repair};
use crate::repository::codec::decimal_at;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard};

const REPAIR_COLUMNS: &str = r#"
    repair_id, product_id, shop_id, start_date, end_date,
    actual_repair_cost, client_cost, serial_number, defect_description
"#;

fn map_repair(row: &Row<'_>) -> rusqlite::Result<Repair> {
    Ok(Repair {
        repair_id: row.get(0)?,
        product_id: row.get(1)?,
        shop_id: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        actual_repair_cost: decimal_at(row, 5)?,
        client_cost: decimal_at(row, 6)?,
        serial_number: row.get(7)?,
        defect_description: row.get(8)?,
    })
}

fn find_repair(conn: &Connection, repair_id: i64) -> RepositoryResult<Option<Repair>> {
    let sql = format!("SELECT {} FROM repairs WHERE repair_id = ?1", REPAIR_COLUMNS);
    let repair = conn
        .query_row(&sql, params![repair_id], map_repair)
        .optional()?;
    Ok(repair)
}

fn not_found(entity: &str, id: i64) -> RepositoryError {
    RepositoryError::NotFound {
        entity: entity.to_string(),
        id: id.to_string(),
    }
}

// ==========================================
// RepairRepository - 维修单仓储
// ==========================================
pub struct RepairRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RepairRepository {
    /// 创建新的维修单仓储实例
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

    /// 开单
    ///
    /// 费用取自产品的 base_repair_cost，规则见 [`NewRepair::initial_costs`]。
    ///
    /// # 返回
    /// - Ok(Repair): 新建的维修单
    /// - Err(NotFound): 产品不存在
    /// - Err(ForeignKeyViolation): 维修点不存在
    pub fn create_repair(
        &self,
        new_repair: &NewRepair,
        start_date: NaiveDate,
    ) -> RepositoryResult<Repair> {
        let conn = self.get_conn()?;

        let base_cost = conn
            .query_row(
                "SELECT base_repair_cost FROM products WHERE product_id = ?1",
                params![new_repair.product_id],
                |row| decimal_at(row, 0),
            )
            .optional()?
            .ok_or_else(|| not_found("Product", new_repair.product_id))?;

        let (actual_cost, client_cost) = new_repair.initial_costs(base_cost);

        conn.execute(
            r#"
            INSERT INTO repairs (
                product_id, shop_id, start_date, actual_repair_cost, client_cost,
                serial_number, defect_description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                new_repair.product_id,
                new_repair.shop_id,
                start_date,
                to_storage_text(actual_cost),
                to_storage_text(client_cost),
                new_repair.serial_number,
                new_repair.defect_description,
            ],
        )?;
        let repair_id = conn.last_insert_rowid();

        tracing::info!(
            repair_id,
            product_id = new_repair.product_id,
            shop_id = new_repair.shop_id,
            is_warranty = new_repair.is_warranty,
            "repair created"
        );

        find_repair(&conn, repair_id)?.ok_or_else(|| not_found("Repair", repair_id))
    }

    /// 完工
    ///
    /// 仅允许对进行中的维修单操作；客户费用规则见 [`Repair::completion_client_cost`]。
    /// 结束日期早于开始日期时由表约束拒绝。
    pub fn complete_repair(
        &self,
        repair_id: i64,
        actual_cost: Decimal,
        end_date: NaiveDate,
    ) -> RepositoryResult<Repair> {
        if actual_cost < Decimal::ZERO {
            tracing::warn!(repair_id, %actual_cost, "negative repair cost rejected");
            return Err(RepositoryError::ValidationError(format!(
                "actual_cost must be non-negative: {}",
                actual_cost
            )));
        }

        let conn = self.get_conn()?;

        let repair = find_repair(&conn, repair_id)?.ok_or_else(|| not_found("Repair", repair_id))?;
        if !repair.is_open() {
            tracing::warn!(repair_id, "repair already completed");
            return Err(RepositoryError::InvalidStateTransition {
                from: "COMPLETED".to_string(),
                to: "COMPLETED".to_string(),
            });
        }

        let client_cost = repair.completion_client_cost(actual_cost);

        let updated = conn.execute(
            r#"
            UPDATE repairs
            SET end_date = ?1, actual_repair_cost = ?2, client_cost = ?3
            WHERE repair_id = ?4 AND end_date IS NULL
            "#,
            params![
                end_date,
                to_storage_text(actual_cost),
                to_storage_text(client_cost),
                repair_id,
            ],
        )?;
        if updated == 0 {
            return Err(not_found("Repair", repair_id));
        }

        tracing::info!(repair_id, %actual_cost, %end_date, "repair completed");

        find_repair(&conn, repair_id)?.ok_or_else(|| not_found("Repair", repair_id))
    }

    /// 写入历史维修记录（显式费用与日期），返回 repair_id
    pub fn insert_repair_record(&self, record: &NewRepairRecord) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO repairs (
                product_id, shop_id, start_date, end_date, actual_repair_cost, client_cost,
                serial_number, defect_description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.product_id,
                record.shop_id,
                record.start_date,
                record.end_date,
                to_storage_text(record.actual_repair_cost),
                to_storage_text(record.client_cost),
                record.serial_number,
                record.defect_description,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按 ID 查询维修单
    pub fn find_by_id(&self, repair_id: i64) -> RepositoryResult<Option<Repair>> {
        let conn = self.get_conn()?;
        find_repair(&conn, repair_id)
    }

    /// 进行中的维修单（按开始日期、ID 升序）
    pub fn list_active(&self) -> RepositoryResult<Vec<ActiveRepair>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                r.repair_id, p.model_name, m.name, c.name, s.address, r.start_date,
                r.serial_number, r.defect_description, r.actual_repair_cost, r.client_cost
            FROM repairs r
            JOIN products p ON r.product_id = p.product_id
            JOIN manufacturers m ON p.manufacturer_id = m.manufacturer_id
            JOIN repair_shops s ON r.shop_id = s.shop_id
            JOIN cities c ON s.city_id = c.city_id
            WHERE r.end_date IS NULL
            ORDER BY r.start_date, r.repair_id
            "#,
        )?;

        let repairs = stmt
            .query_map([], |row| {
                Ok(ActiveRepair {
                    repair_id: row.get(0)?,
                    model_name: row.get(1)?,
                    manufacturer: row.get(2)?,
                    city: row.get(3)?,
                    shop_address: row.get(4)?,
                    start_date: row.get(5)?,
                    serial_number: row.get(6)?,
                    defect_description: row.get(7)?,
                    actual_repair_cost: decimal_at(row, 8)?,
                    is_warranty: decimal_at(row, 9)?.is_zero(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(repairs)
    }
}
