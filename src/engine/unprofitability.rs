// ==========================================
// 维修服务报表引擎 - 产品亏损排名引擎
// ==========================================
// 排名键:
// 1) repair_count 降序
// 2) total_repair_cost 降序
// 并列同名次，后续名次跳号；product_id 升序仅用于稳定输出顺序
// ==========================================
// 红线: Engine 不拼 SQL；先对全量分组排名，再截断
// ==========================================

use crate::domain::facts::ProductRepairFact;
use crate::domain::money::average;
use crate::domain::report::UnprofitabilityRow;
use crate::engine::ranking::assign_shared_ranks;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// 默认返回条数
pub const DEFAULT_RATING_LIMIT: usize = 15;

/// 单个产品的聚合中间结构
#[derive(Debug, Clone)]
struct ProductAggregate {
    product_id: i64,
    model_name: String,
    manufacturer: String,
    category: String,
    repair_ids: HashSet<i64>,
    total_cost: Decimal,
    warranty_cost: Decimal,
}

impl ProductAggregate {
    fn new(fact: &ProductRepairFact) -> Self {
        Self {
            product_id: fact.product_id,
            model_name: fact.model_name.clone(),
            manufacturer: fact.manufacturer.clone(),
            category: fact.category.clone(),
            repair_ids: HashSet::new(),
            total_cost: Decimal::ZERO,
            warranty_cost: Decimal::ZERO,
        }
    }

    fn add(&mut self, fact: &ProductRepairFact) {
        // 同一维修单只计一次
        if !self.repair_ids.insert(fact.repair_id) {
            return;
        }
        self.total_cost += fact.actual_repair_cost;
        if fact.client_cost.is_zero() {
            self.warranty_cost += fact.actual_repair_cost;
        }
    }

    fn repair_count(&self) -> u64 {
        self.repair_ids.len() as u64
    }

    fn rank_key(&self) -> (u64, Decimal) {
        (self.repair_count(), self.total_cost)
    }
}

// ==========================================
// UnprofitabilityRanker - 亏损排名引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct UnprofitabilityRanker {
    // 无状态引擎
}

impl UnprofitabilityRanker {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算产品亏损排名
    ///
    /// # 参数
    /// - `facts`: 产品维修事实（每条维修一行，无维修的产品不会出现）
    /// - `limit`: 返回条数上限（0 返回空）
    ///
    /// # 返回
    /// 按名次排序的排名行
    pub fn rank(&self, facts: &[ProductRepairFact], limit: usize) -> Vec<UnprofitabilityRow> {
        let mut groups: BTreeMap<i64, ProductAggregate> = BTreeMap::new();
        for fact in facts {
            groups
                .entry(fact.product_id)
                .or_insert_with(|| ProductAggregate::new(fact))
                .add(fact);
        }

        let mut aggregates: Vec<ProductAggregate> = groups.into_values().collect();
        aggregates.sort_by(compare_severity);

        let ranks = assign_shared_ranks(&aggregates, ProductAggregate::rank_key);

        aggregates
            .into_iter()
            .zip(ranks)
            .take(limit)
            .map(|(agg, rank)| {
                let repair_count = agg.repair_count();
                UnprofitabilityRow {
                    avg_repair_cost: average(agg.total_cost, repair_count),
                    total_repair_cost: agg.total_cost,
                    warranty_costs: agg.warranty_cost,
                    model_name: agg.model_name,
                    manufacturer: agg.manufacturer,
                    category: agg.category,
                    repair_count,
                    problem_rank: rank,
                }
            })
            .collect()
    }
}

/// 严重度比较：维修次数降序 → 总成本降序 → product_id 升序
fn compare_severity(a: &ProductAggregate, b: &ProductAggregate) -> Ordering {
    b.repair_count()
        .cmp(&a.repair_count())
        .then_with(|| b.total_cost.cmp(&a.total_cost))
        .then_with(|| a.product_id.cmp(&b.product_id))
}
