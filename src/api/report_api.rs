// ==========================================
// 维修服务报表引擎 - 报表 API
// ==========================================
// 职责: 读取事实行 → 调用引擎计算 → 返回报表行
// 架构: API 层 → Engine 层 + Repository 层
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::error::ApiResult;
use crate::config::{ConfigManager, ReportConfig};
use crate::domain::report::{
    CategoryStatsRow, CityCoverageRow, RepairSummary, UnprofitabilityRow,
};
use crate::engine::{
    CategoryStatsCalculator, CoverageCalculator, RepairSummaryCalculator, UnprofitabilityRanker,
};
use crate::perf::PerfGuard;
use crate::repository::{ReportFactSource, SqliteReportFactSource};

// ==========================================
// ReportApi - 报表 API
// ==========================================
pub struct ReportApi {
    facts: Arc<dyn ReportFactSource>,
    config: ReportConfig,
    ranker: UnprofitabilityRanker,
    coverage: CoverageCalculator,
    category_stats: CategoryStatsCalculator,
    summary: RepairSummaryCalculator,
}

impl ReportApi {
    /// 创建新的ReportApi实例
    ///
    /// # 参数
    /// - facts: 报表事实来源
    /// - config: 报表配置
    pub fn new(facts: Arc<dyn ReportFactSource>, config: ReportConfig) -> Self {
        Self {
            facts,
            config,
            ranker: UnprofitabilityRanker::new(),
            coverage: CoverageCalculator::new(),
            category_stats: CategoryStatsCalculator::new(),
            summary: RepairSummaryCalculator::new(),
        }
    }

    /// 基于共享连接装配：事实仓储 + config_kv 中的报表配置
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        let config = ConfigManager::from_connection(conn.clone()).load_report_config()?;
        let facts = Arc::new(SqliteReportFactSource::from_connection(conn));
        Ok(Self::new(facts, config))
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// 产品亏损排名
    ///
    /// # 参数
    /// - limit: 返回条数上限；None 使用配置默认值
    pub fn unprofitability_rating(
        &self,
        limit: Option<usize>,
    ) -> ApiResult<Vec<UnprofitabilityRow>> {
        let mut perf = PerfGuard::new("report.unprofitability_rating");
        let limit = limit.unwrap_or(self.config.default_rating_limit);

        let facts = self.facts.product_repair_facts()?;
        let rows = self.ranker.rank(&facts, limit);
        perf.record_rows(facts.len(), rows.len());

        tracing::info!(limit, "亏损排名计算完成");
        Ok(rows)
    }

    /// 城市覆盖率
    pub fn city_coverage(&self) -> ApiResult<Vec<CityCoverageRow>> {
        let mut perf = PerfGuard::new("report.city_coverage");

        let facts = self.facts.coverage_facts()?;
        let rows = self
            .coverage
            .calculate(&facts, &self.config.all_categories_label);
        perf.record_rows(facts.len(), rows.len());

        tracing::info!("城市覆盖率计算完成");
        Ok(rows)
    }

    /// 类别统计
    pub fn category_statistics(&self) -> ApiResult<Vec<CategoryStatsRow>> {
        let mut perf = PerfGuard::new("report.category_statistics");

        let facts = self.facts.category_repair_facts()?;
        let rows = self.category_stats.calculate(&facts);
        perf.record_rows(facts.len(), rows.len());

        tracing::info!("类别统计计算完成");
        Ok(rows)
    }

    /// 维修总览
    pub fn repair_summary(&self) -> ApiResult<RepairSummary> {
        let mut perf = PerfGuard::new("report.repair_summary");

        let facts = self.facts.repair_summary_facts()?;
        let summary = self.summary.calculate(&facts.repairs, facts.counts);
        perf.record_rows(facts.repairs.len(), 1);

        tracing::info!(
            active = summary.active_repairs,
            completed = summary.completed_repairs,
            "维修总览计算完成"
        );
        Ok(summary)
    }
}
