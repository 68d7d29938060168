// ==========================================
// 维修服务报表引擎 - 维修记录领域模型
// ==========================================
// 红线: client_cost = 0 即保修维修（费用由服务方承担）
// 红线: end_date 为空 = 维修进行中
// ==========================================

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 维修记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repair {
    pub repair_id: i64,
    pub product_id: i64,
    pub shop_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub actual_repair_cost: Decimal, // 服务方实际承担的维修成本
    pub client_cost: Decimal,        // 向客户收取的费用
    pub serial_number: Option<String>,
    pub defect_description: Option<String>,
}

impl Repair {
    /// 是否仍在维修中
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    /// 是否保修维修
    pub fn is_warranty(&self) -> bool {
        self.client_cost.is_zero()
    }

    /// 完工时的客户费用：保修维修保持 0，否则随实际成本
    pub fn completion_client_cost(&self, actual_cost: Decimal) -> Decimal {
        if self.is_warranty() {
            self.client_cost
        } else {
            actual_cost
        }
    }
}

/// 新建维修单参数（费用取自产品基础维修费用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRepair {
    pub product_id: i64,
    pub shop_id: i64,
    pub serial_number: Option<String>,
    pub defect_description: Option<String>,
    pub is_warranty: bool,
}

impl NewRepair {
    /// 开单费用 (actual, client)
    ///
    /// 保修维修: 双方均为 0（实际成本在完工时填写）
    /// 付费维修: 实际成本 = 客户费用 = 产品基础维修费用
    pub fn initial_costs(&self, base_repair_cost: Decimal) -> (Decimal, Decimal) {
        if self.is_warranty {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            (base_repair_cost, base_repair_cost)
        }
    }
}

/// 历史维修记录（显式给定费用与日期，用于数据导入/初始化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRepairRecord {
    pub product_id: i64,
    pub shop_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub actual_repair_cost: Decimal,
    pub client_cost: Decimal,
    pub serial_number: Option<String>,
    pub defect_description: Option<String>,
}

/// 进行中的维修单（列表视图）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveRepair {
    pub repair_id: i64,
    pub model_name: String,
    pub manufacturer: String,
    pub city: String,
    pub shop_address: String,
    pub start_date: NaiveDate,
    pub serial_number: Option<String>,
    pub defect_description: Option<String>,
    pub actual_repair_cost: Decimal,
    pub is_warranty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_warranty_flags() {
        let repair = Repair {
            repair_id: 1,
            product_id: 1,
            shop_id: 1,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: None,
            actual_repair_cost: Decimal::new(150000, 2),
            client_cost: Decimal::ZERO,
            serial_number: None,
            defect_description: None,
        };
        assert!(repair.is_open());
        assert!(repair.is_warranty());

        let closed = Repair {
            end_date: Some(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()),
            client_cost: Decimal::new(150000, 2),
            ..repair
        };
        assert!(!closed.is_open());
        assert!(!closed.is_warranty());
    }

    #[test]
    fn test_cost_rules() {
        let base = Decimal::new(3500, 0);
        let mut new_repair = NewRepair {
            product_id: 1,
            shop_id: 1,
            serial_number: None,
            defect_description: None,
            is_warranty: true,
        };
        assert_eq!(new_repair.initial_costs(base), (Decimal::ZERO, Decimal::ZERO));
        new_repair.is_warranty = false;
        assert_eq!(new_repair.initial_costs(base), (base, base));

        let paid = Repair {
            repair_id: 7,
            product_id: 1,
            shop_id: 1,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: None,
            actual_repair_cost: base,
            client_cost: base,
            serial_number: None,
            defect_description: None,
        };
        assert_eq!(paid.completion_client_cost(Decimal::new(4200, 0)), Decimal::new(4200, 0));

        let warranty = Repair {
            client_cost: Decimal::ZERO,
            ..paid
        };
        assert_eq!(warranty.completion_client_cost(Decimal::new(4200, 0)), Decimal::ZERO);
    }
}
