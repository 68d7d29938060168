// ==========================================
// 维修服务报表引擎 - 金额与百分比计算
// ==========================================
// 红线: 金额一律使用十进制，禁止 f64 参与累加
// 红线: 只在生成最终报表行时取整，中间计算不取整
// ==========================================

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// 金额保留小数位
pub const MONEY_SCALE: u32 = 2;

/// 百分比保留小数位
pub const PERCENT_SCALE: u32 = 1;

/// 四舍五入（.5 远离零进位，非负值即为 half-up），并固定小数位
pub fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}

/// 平均值（count = 0 时为 0），保留 2 位小数
pub fn average(total: Decimal, count: u64) -> Decimal {
    if count == 0 {
        return round_half_up(Decimal::ZERO, MONEY_SCALE);
    }
    round_half_up(total / Decimal::from(count), MONEY_SCALE)
}

/// 百分比 100 × part / whole（whole = 0 时为 0），保留 1 位小数
pub fn percentage(part: u64, whole: u64) -> Decimal {
    if whole == 0 {
        return round_half_up(Decimal::ZERO, PERCENT_SCALE);
    }
    round_half_up(
        Decimal::ONE_HUNDRED * Decimal::from(part) / Decimal::from(whole),
        PERCENT_SCALE,
    )
}

/// 解析十进制金额文本
pub fn parse_money(text: &str) -> Result<Decimal, rust_decimal::Error> {
    Decimal::from_str(text.trim())
}

/// 金额的存储格式（完整十进制文本，不取整）
pub fn to_storage_text(value: Decimal) -> String {
    value.to_string()
}
