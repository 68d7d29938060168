// ==========================================
// 维修服务报表引擎 - 类别统计引擎
// ==========================================
// 口径:
// - product_count: 类别下去重产品数（含无维修产品）
// - repair_count / total_repair_cost: 去重维修单的次数与实际成本合计
// - avg_repair_cost: 无维修为 0，否则保留 2 位
// 排序: repair_count 降序 → total_repair_cost 降序 → category 升序
// ==========================================

use crate::domain::facts::CategoryRepairFact;
use crate::domain::money::average;
use crate::domain::report::CategoryStatsRow;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Default)]
struct CategoryAggregate {
    product_ids: HashSet<i64>,
    repair_ids: HashSet<i64>,
    total_cost: Decimal,
}

impl CategoryAggregate {
    fn add(&mut self, fact: &CategoryRepairFact) {
        self.product_ids.insert(fact.product_id);
        if let Some(repair_id) = fact.repair_id {
            if self.repair_ids.insert(repair_id) {
                self.total_cost += fact.actual_repair_cost.unwrap_or(Decimal::ZERO);
            }
        }
    }
}

// ==========================================
// CategoryStatsCalculator - 类别统计引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct CategoryStatsCalculator {
    // 无状态引擎
}

impl CategoryStatsCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// 按产品类别汇总维修情况
    pub fn calculate(&self, facts: &[CategoryRepairFact]) -> Vec<CategoryStatsRow> {
        let mut groups: BTreeMap<String, CategoryAggregate> = BTreeMap::new();
        for fact in facts {
            groups.entry(fact.category.clone()).or_default().add(fact);
        }

        let mut rows: Vec<CategoryStatsRow> = groups
            .into_iter()
            .map(|(category, agg)| {
                let repair_count = agg.repair_ids.len() as u64;
                CategoryStatsRow {
                    category,
                    product_count: agg.product_ids.len() as u64,
                    repair_count,
                    total_repair_cost: agg.total_cost,
                    avg_repair_cost: average(agg.total_cost, repair_count),
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.repair_count
                .cmp(&a.repair_count)
                .then_with(|| b.total_repair_cost.cmp(&a.total_repair_cost))
                .then_with(|| a.category.cmp(&b.category))
        });
        rows
    }
}
