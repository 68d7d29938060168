// ==========================================
// 维修服务报表引擎 - 领域模型层
// ==========================================
// 职责: 定义领域实体、报表事实行、报表输出行、金额运算
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod catalog;
pub mod facts;
pub mod money;
pub mod repair;
pub mod report;

// 重导出核心类型
pub use catalog::{NewProduct, Product, ProductListing, ShopListing};
pub use facts::{
    CatalogCounts, CategoryRepairFact, CoverageFact, ProductRepairFact, RepairStatusFact,
    RepairSummaryFacts,
};
pub use repair::{ActiveRepair, NewRepair, NewRepairRecord, Repair};
pub use report::{
    CategoryStatsRow, CityCoverageRow, CoverageCategory, RepairSummary, UnprofitabilityRow,
};
