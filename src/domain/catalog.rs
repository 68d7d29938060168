// ==========================================
// 维修服务报表引擎 - 目录领域模型
// ==========================================
// 实体: 产品，以及产品/维修点列表视图
// ==========================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 产品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub manufacturer_id: i64,
    pub model_name: String,
    pub category: String,         // 产品类别（自由文本）
    pub warranty_period: i32,     // 保修期（天，> 0）
    pub base_repair_cost: Decimal, // 基础维修费用（>= 0）
}

/// 新建产品参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub manufacturer_id: i64,
    pub model_name: String,
    pub category: String,
    pub warranty_period: i32,
    pub base_repair_cost: Decimal,
}

/// 产品列表项（含制造商名称）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListing {
    pub product_id: i64,
    pub model_name: String,
    pub category: String,
    pub manufacturer: String,
}

/// 维修点列表项（含城市名称与专长类别）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopListing {
    pub shop_id: i64,
    pub address: String,
    pub city: String,
    pub contact_phone: Option<String>,
    pub categories: Vec<String>,
}
