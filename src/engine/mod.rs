// ==========================================
// 维修服务报表引擎 - 引擎层
// ==========================================
// 职责: 对仓储层事实行做分组、去重、排名与取舍
// 红线: Engine 不拼 SQL，不访问数据库
// ==========================================

pub mod category_stats;
pub mod coverage;
pub mod ranking;
pub mod repair_summary;
pub mod unprofitability;

// 重导出核心引擎
pub use category_stats::CategoryStatsCalculator;
pub use coverage::{CoverageCalculator, DEFAULT_ALL_CATEGORIES_LABEL};
pub use ranking::assign_shared_ranks;
pub use repair_summary::RepairSummaryCalculator;
pub use unprofitability::{UnprofitabilityRanker, DEFAULT_RATING_LIMIT};
