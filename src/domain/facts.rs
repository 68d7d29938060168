// ==========================================
// 维修服务报表引擎 - 报表事实行
// ==========================================
// 职责: 仓储层查询结果（连接展开后的扁平行）
// 红线: 事实行只做搬运，不做聚合；聚合与去重在引擎层完成
// ==========================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 产品维修事实（products ⋈ manufacturers ⋈ repairs，每条维修一行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRepairFact {
    pub product_id: i64,
    pub model_name: String,
    pub manufacturer: String,
    pub category: String,
    pub repair_id: i64,
    pub actual_repair_cost: Decimal,
    pub client_cost: Decimal,
}

/// 城市覆盖事实
///
/// cities ⟕ repair_shops ⟕ shop_specializations ⟕ products ⟕ repairs 的展开行。
/// 左连接的每一级都可能为空；同一维修点/维修单可能因扇出出现多次。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageFact {
    pub city_id: i64,
    pub city_name: String,
    pub shop_id: Option<i64>,
    pub product_id: Option<i64>,
    pub category: Option<String>,
    pub repair_id: Option<i64>,
}

/// 类别维修事实（products ⟕ repairs）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRepairFact {
    pub category: String,
    pub product_id: i64,
    pub repair_id: Option<i64>,
    pub actual_repair_cost: Option<Decimal>,
}

/// 维修状态事实（每条维修一行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairStatusFact {
    pub repair_id: i64,
    pub is_open: bool,
    pub actual_repair_cost: Decimal,
    pub client_cost: Decimal,
}

/// 目录规模统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCounts {
    pub products_count: u64,
    pub shops_count: u64,
}

/// 维修总览事实（同一读事务内取得的维修状态与目录规模）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairSummaryFacts {
    pub repairs: Vec<RepairStatusFact>,
    pub counts: CatalogCounts,
}
