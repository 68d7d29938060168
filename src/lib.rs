// ==========================================
// 维修服务报表引擎 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 维修服务运营报表（亏损排名 / 城市覆盖率）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与报表模型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 报表计算
pub mod engine;

// 配置层 - 报表配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 报表接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 报表模型
pub use domain::{
    CategoryStatsRow, CityCoverageRow, CoverageCategory, RepairSummary, UnprofitabilityRow,
};

// 引擎
pub use engine::{
    CategoryStatsCalculator, CoverageCalculator, RepairSummaryCalculator, UnprofitabilityRanker,
};

// 仓储
pub use repository::{
    CatalogRepository, RepairRepository, ReportFactSource, RepositoryError, SqliteReportFactSource,
};

// 配置
pub use config::{ConfigManager, ReportConfig};

// API
pub use api::{ApiError, ApiResult, ReportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
