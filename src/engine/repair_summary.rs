// ==========================================
// 维修服务报表引擎 - 维修总览引擎
// ==========================================
// 口径:
// - active_repairs: end_date 为空
// - warranty_repairs: client_cost = 0
// - total_repair_cost: 全部维修的实际成本合计（不取舍）
// ==========================================

use crate::domain::facts::{CatalogCounts, RepairStatusFact};
use crate::domain::report::RepairSummary;
use rust_decimal::Decimal;

#[derive(Debug, Default, Clone, Copy)]
pub struct RepairSummaryCalculator {
    // 无状态引擎
}

impl RepairSummaryCalculator {
    pub fn new() -> Self {
        Self {}
    }

    pub fn calculate(&self, facts: &[RepairStatusFact], counts: CatalogCounts) -> RepairSummary {
        let mut summary = RepairSummary {
            active_repairs: 0,
            completed_repairs: 0,
            warranty_repairs: 0,
            total_repair_cost: Decimal::ZERO,
            products_count: counts.products_count,
            shops_count: counts.shops_count,
        };

        for fact in facts {
            if fact.is_open {
                summary.active_repairs += 1;
            } else {
                summary.completed_repairs += 1;
            }
            if fact.client_cost.is_zero() {
                summary.warranty_repairs += 1;
            }
            summary.total_repair_cost += fact.actual_repair_cost;
        }

        summary
    }
}
