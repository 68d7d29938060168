// ==========================================
// 维修服务报表引擎 - 城市覆盖率引擎
// ==========================================
// 口径:
// - total_shops: 城市内去重维修点数（无维修点 = 0）
// - specialized_shops: 对该类别任一产品有专长的去重维修点数
// - repairs_done: 维修点与产品之间存在专长关联的去重维修单数
// - coverage_percentage: total_shops = 0 时为 0，否则 100 × specialized / total，保留 1 位
// ==========================================
// 红线: 左连接扇出的事实行只做集合计数，不做行计数
// ==========================================

use crate::domain::facts::CoverageFact;
use crate::domain::money::percentage;
use crate::domain::report::{CityCoverageRow, CoverageCategory};
use std::collections::{BTreeMap, HashSet};

/// “全部类别”哨兵标签默认值
pub const DEFAULT_ALL_CATEGORIES_LABEL: &str = "Все категории";

#[derive(Debug, Default)]
struct CategoryAggregate {
    shop_ids: HashSet<i64>,
    repair_ids: HashSet<i64>,
}

#[derive(Debug)]
struct CityAggregate {
    city_id: i64,
    city_name: String,
    shop_ids: HashSet<i64>,
    categories: BTreeMap<String, CategoryAggregate>,
}

impl CityAggregate {
    fn new(fact: &CoverageFact) -> Self {
        Self {
            city_id: fact.city_id,
            city_name: fact.city_name.clone(),
            shop_ids: HashSet::new(),
            categories: BTreeMap::new(),
        }
    }

    fn add(&mut self, fact: &CoverageFact) {
        let Some(shop_id) = fact.shop_id else {
            return;
        };
        self.shop_ids.insert(shop_id);

        let Some(category) = fact.category.as_ref() else {
            return;
        };
        let entry = self.categories.entry(category.clone()).or_default();
        entry.shop_ids.insert(shop_id);
        if let Some(repair_id) = fact.repair_id {
            entry.repair_ids.insert(repair_id);
        }
    }

    fn into_rows(
        self,
        all_categories_label: &str,
    ) -> Vec<(i64, CoverageCategory, CityCoverageRow)> {
        let total_shops = self.shop_ids.len() as u64;

        if self.categories.is_empty() {
            let key = CoverageCategory::AllCategories;
            let row = CityCoverageRow {
                city_name: self.city_name,
                category: key.label(all_categories_label),
                all_categories: true,
                total_shops,
                specialized_shops: 0,
                repairs_done: 0,
                coverage_percentage: percentage(0, total_shops),
            };
            return vec![(self.city_id, key, row)];
        }

        let city_id = self.city_id;
        let city_name = self.city_name;
        self.categories
            .into_iter()
            .map(|(category, agg)| {
                let specialized_shops = agg.shop_ids.len() as u64;
                let key = CoverageCategory::Named(category);
                let row = CityCoverageRow {
                    city_name: city_name.clone(),
                    category: key.label(all_categories_label),
                    all_categories: false,
                    total_shops,
                    specialized_shops,
                    repairs_done: agg.repair_ids.len() as u64,
                    coverage_percentage: percentage(specialized_shops, total_shops),
                };
                (city_id, key, row)
            })
            .collect()
    }
}

// ==========================================
// CoverageCalculator - 城市覆盖率引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct CoverageCalculator {
    // 无状态引擎
}

impl CoverageCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算城市覆盖率
    ///
    /// # 参数
    /// - `facts`: 城市覆盖事实（左连接展开行）
    /// - `all_categories_label`: 无类别数据时哨兵行的类别标签
    ///
    /// # 返回
    /// 按 城市名称 → 类别（哨兵在前）排序的覆盖率行
    pub fn calculate(
        &self,
        facts: &[CoverageFact],
        all_categories_label: &str,
    ) -> Vec<CityCoverageRow> {
        let mut cities: BTreeMap<i64, CityAggregate> = BTreeMap::new();
        for fact in facts {
            cities
                .entry(fact.city_id)
                .or_insert_with(|| CityAggregate::new(fact))
                .add(fact);
        }

        let mut keyed: Vec<(i64, CoverageCategory, CityCoverageRow)> = cities
            .into_values()
            .flat_map(|city| city.into_rows(all_categories_label))
            .collect();

        keyed.sort_by(|(a_id, a_key, a_row), (b_id, b_key, b_row)| {
            a_row
                .city_name
                .cmp(&b_row.city_name)
                .then_with(|| a_id.cmp(b_id))
                .then_with(|| a_key.cmp(b_key))
        });

        keyed.into_iter().map(|(_, _, row)| row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn fact(
        city_id: i64,
        city_name: &str,
        shop_id: Option<i64>,
        product: Option<(i64, &str)>,
        repair_id: Option<i64>,
    ) -> CoverageFact {
        CoverageFact {
            city_id,
            city_name: city_name.to_string(),
            shop_id,
            product_id: product.map(|(id, _)| id),
            category: product.map(|(_, c)| c.to_string()),
            repair_id,
        }
    }

    fn calc(facts: &[CoverageFact]) -> Vec<CityCoverageRow> {
        CoverageCalculator::new().calculate(facts, DEFAULT_ALL_CATEGORIES_LABEL)
    }

    #[test]
    fn test_city_without_shops_yields_single_sentinel_row() {
        let rows = calc(&[fact(1, "Омск", None, None, None)]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, DEFAULT_ALL_CATEGORIES_LABEL);
        assert!(rows[0].all_categories);
        assert_eq!(rows[0].total_shops, 0);
        assert_eq!(rows[0].specialized_shops, 0);
        assert_eq!(rows[0].repairs_done, 0);
        assert_eq!(rows[0].coverage_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_two_shops_one_specialized() {
        let rows = calc(&[
            fact(1, "Томск", Some(1), Some((10, "smartphones")), None),
            fact(1, "Томск", Some(2), None, None),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "smartphones");
        assert_eq!(rows[0].total_shops, 2);
        assert_eq!(rows[0].specialized_shops, 1);
        assert_eq!(rows[0].repairs_done, 0);
        assert_eq!(rows[0].coverage_percentage.to_string(), "50.0");
    }

    #[test]
    fn test_shops_without_specializations_yield_sentinel_with_total() {
        let rows = calc(&[
            fact(1, "Бийск", Some(1), None, None),
            fact(1, "Бийск", Some(2), None, None),
        ]);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].all_categories);
        assert_eq!(rows[0].total_shops, 2);
        assert_eq!(rows[0].coverage_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_fan_out_is_counted_by_set() {
        // 维修点 1 对同类别两个产品有专长，每个产品各有两条维修
        let rows = calc(&[
            fact(1, "Иркутск", Some(1), Some((10, "tv")), Some(100)),
            fact(1, "Иркутск", Some(1), Some((10, "tv")), Some(101)),
            fact(1, "Иркутск", Some(1), Some((11, "tv")), Some(102)),
            fact(1, "Иркутск", Some(1), Some((11, "tv")), Some(103)),
            fact(1, "Иркутск", Some(2), Some((11, "tv")), None),
            fact(1, "Иркутск", Some(3), None, None),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_shops, 3);
        assert_eq!(rows[0].specialized_shops, 2);
        assert_eq!(rows[0].repairs_done, 4);
        assert_eq!(rows[0].coverage_percentage.to_string(), "66.7");
    }

    #[test]
    fn test_ordering_by_city_then_category() {
        let rows = calc(&[
            fact(2, "Чита", Some(5), Some((1, "телевизоры")), None),
            fact(2, "Чита", Some(5), Some((2, "ноутбуки")), None),
            fact(1, "Абакан", None, None, None),
            fact(3, "Братск", Some(6), Some((1, "телевизоры")), Some(9)),
        ]);
        let order: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.city_name.as_str(), r.category.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Абакан", DEFAULT_ALL_CATEGORIES_LABEL),
                ("Братск", "телевизоры"),
                ("Чита", "ноутбуки"),
                ("Чита", "телевизоры"),
            ]
        );
        assert_eq!(rows[1].repairs_done, 1);
        assert_eq!(rows[1].coverage_percentage.to_string(), "100.0");
    }

    #[test]
    fn test_percentage_bounds() {
        let rows = calc(&[
            fact(1, "Курган", Some(1), Some((1, "a")), None),
            fact(1, "Курган", Some(2), Some((1, "a")), None),
            fact(1, "Курган", Some(3), Some((2, "b")), None),
            fact(2, "Тюмень", None, None, None),
        ]);
        for row in &rows {
            assert!(row.coverage_percentage >= Decimal::ZERO);
            assert!(row.coverage_percentage <= Decimal::ONE_HUNDRED);
            if row.total_shops == 0 {
                assert_eq!(row.coverage_percentage, Decimal::ZERO);
            }
        }
    }

    #[test]
    fn test_custom_sentinel_label() {
        let facts = [fact(1, "X", None, None, None)];
        let rows = CoverageCalculator::new().calculate(&facts, "All categories");
        assert_eq!(rows[0].category, "All categories");
    }
}
