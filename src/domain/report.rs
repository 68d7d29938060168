// ==========================================
// 维修服务报表引擎 - 报表输出模型
// ==========================================
// 职责: 计算得到的报表行，不落库
// 序列化: 金额/百分比按十进制字符串输出
// ==========================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// UnprofitabilityRow - 产品亏损排名行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnprofitabilityRow {
    pub model_name: String,
    pub manufacturer: String,
    pub category: String,
    pub repair_count: u64,
    pub total_repair_cost: Decimal,
    pub avg_repair_cost: Decimal, // 2 位小数
    pub warranty_costs: Decimal,  // client_cost = 0 的维修成本合计
    pub problem_rank: u64,        // 并列同名次，后续名次跳号
}

// ==========================================
// CoverageCategory - 覆盖率报表类别键
// ==========================================
// 排序: AllCategories 永远排在任何具体类别之前
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoverageCategory {
    AllCategories,
    Named(String),
}

impl CoverageCategory {
    /// 展示标签（AllCategories 使用配置的哨兵标签）
    pub fn label(&self, all_categories_label: &str) -> String {
        match self {
            CoverageCategory::AllCategories => all_categories_label.to_string(),
            CoverageCategory::Named(name) => name.clone(),
        }
    }
}

// ==========================================
// CityCoverageRow - 城市覆盖率行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCoverageRow {
    pub city_name: String,
    pub category: String,      // 类别名称或“全部类别”哨兵标签
    pub all_categories: bool,  // 是否哨兵行
    pub total_shops: u64,
    pub specialized_shops: u64,
    pub repairs_done: u64,
    pub coverage_percentage: Decimal, // 1 位小数，[0, 100]
}

// ==========================================
// CategoryStatsRow - 类别统计行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStatsRow {
    pub category: String,
    pub product_count: u64,
    pub repair_count: u64,
    pub total_repair_cost: Decimal,
    pub avg_repair_cost: Decimal,
}

// ==========================================
// RepairSummary - 维修总览
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairSummary {
    pub active_repairs: u64,
    pub completed_repairs: u64,
    pub warranty_repairs: u64,
    pub total_repair_cost: Decimal,
    pub products_count: u64,
    pub shops_count: u64,
}
