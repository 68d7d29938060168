// ==========================================
// 维修服务报表引擎 - 目录数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: manufacturers / products / cities / repair_shops / shop_specializations 的读写
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::catalog::{NewProduct, Product, ProductListing, ShopListing};
use crate::domain::money::to_storage_text;
use crate::repository::codec::decimal_at;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// CatalogRepository - 目录仓储
// ==========================================
pub struct CatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogRepository {
    /// 创建新的目录仓储实例
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

    // ==========================================
    // 写入
    // ==========================================

    /// 新增制造商，返回 manufacturer_id
    pub fn insert_manufacturer(
        &self,
        name: &str,
        contact_info: Option<&str>,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO manufacturers (name, contact_info) VALUES (?1, ?2)",
            params![name, contact_info],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 新增产品，返回 product_id
    ///
    /// 保修期 <= 0 或基础费用为负时由表约束拒绝
    pub fn insert_product(&self, product: &NewProduct) -> RepositoryResult<i64> {
        if product.base_repair_cost < Decimal::ZERO {
            return Err(RepositoryError::ValidationError(format!(
                "base_repair_cost must be non-negative: {}",
                product.base_repair_cost
            )));
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO products
                (manufacturer_id, model_name, category, warranty_period, base_repair_cost)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                product.manufacturer_id,
                product.model_name,
                product.category,
                product.warranty_period,
                to_storage_text(product.base_repair_cost),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按 ID 查询产品
    pub fn find_product(&self, product_id: i64) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let product = conn
            .query_row(
                r#"
                SELECT product_id, manufacturer_id, model_name, category,
                       warranty_period, base_repair_cost
                FROM products
                WHERE product_id = ?1
                "#,
                params![product_id],
                |row| {
                    Ok(Product {
                        product_id: row.get(0)?,
                        manufacturer_id: row.get(1)?,
                        model_name: row.get(2)?,
                        category: row.get(3)?,
                        warranty_period: row.get(4)?,
                        base_repair_cost: decimal_at(row, 5)?,
                    })
                },
            )
            .optional()?;
        Ok(product)
    }

    /// 新增城市，返回 city_id
    pub fn insert_city(&self, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO cities (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    /// 新增维修点，返回 shop_id
    pub fn insert_shop(
        &self,
        city_id: i64,
        address: &str,
        contact_phone: Option<&str>,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO repair_shops (city_id, address, contact_phone) VALUES (?1, ?2, ?3)",
            params![city_id, address, contact_phone],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 登记维修点专长（幂等）
    ///
    /// # 返回
    /// - Ok(true): 新增
    /// - Ok(false): 已存在
    pub fn add_specialization(&self, shop_id: i64, product_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO shop_specializations (shop_id, product_id) VALUES (?1, ?2)",
            params![shop_id, product_id],
        )?;
        Ok(inserted > 0)
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 产品列表（按类别、型号排序）
    pub fn list_products(&self) -> RepositoryResult<Vec<ProductListing>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT p.product_id, p.model_name, p.category, m.name
            FROM products p
            JOIN manufacturers m ON p.manufacturer_id = m.manufacturer_id
            ORDER BY p.category, p.model_name, p.product_id
            "#,
        )?;

        let products = stmt
            .query_map([], |row| {
                Ok(ProductListing {
                    product_id: row.get(0)?,
                    model_name: row.get(1)?,
                    category: row.get(2)?,
                    manufacturer: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(products)
    }

    /// 维修点列表（按城市、地址排序），附带去重后的专长类别
    pub fn list_shops(&self) -> RepositoryResult<Vec<ShopListing>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT s.shop_id, s.address, c.name, s.contact_phone, p.category
            FROM repair_shops s
            JOIN cities c ON s.city_id = c.city_id
            LEFT JOIN shop_specializations sp ON s.shop_id = sp.shop_id
            LEFT JOIN products p ON sp.product_id = p.product_id
            ORDER BY c.name, s.address, s.shop_id, p.category
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut shops: Vec<ShopListing> = Vec::new();
        for row in rows {
            let (shop_id, address, city, contact_phone, category) = row?;
            if let Some(last) = shops.last_mut().filter(|last| last.shop_id == shop_id) {
                last.categories.extend(category);
                continue;
            }
            shops.push(ShopListing {
                shop_id,
                address,
                city,
                contact_phone,
                categories: category.into_iter().collect(),
            });
        }

        Ok(shops)
    }

    /// 目录中出现的全部类别（去重、升序）
    pub fn list_categories(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT DISTINCT category FROM products ORDER BY category")?;
        let categories = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }
}
