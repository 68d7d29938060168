// ==========================================
// 维修服务报表引擎 - 列值解码工具
// ==========================================
// 职责: 将 SQLite 列值解码为十进制金额
// 说明: 金额列按十进制文本存储；兼容外部写入的 INTEGER/REAL
// ==========================================

use crate::domain::money::parse_money;
use rusqlite::types::{Type, ValueRef};
use rusqlite::Row;
use rust_decimal::Decimal;

fn conversion_error<E>(idx: usize, ty: Type, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(err))
}

/// 读取可空十进制列
pub fn optional_decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(Decimal::from(i))),
        ValueRef::Real(f) => Decimal::try_from(f)
            .map(Some)
            .map_err(|e| conversion_error(idx, Type::Real, e)),
        ValueRef::Text(bytes) => {
            let text =
                std::str::from_utf8(bytes).map_err(|e| conversion_error(idx, Type::Text, e))?;
            parse_money(text)
                .map(Some)
                .map_err(|e| conversion_error(idx, Type::Text, e))
        }
        ValueRef::Blob(_) => Err(rusqlite::Error::InvalidColumnType(
            idx,
            "decimal".to_string(),
            Type::Blob,
        )),
    }
}

/// 读取非空十进制列
pub fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    optional_decimal_at(row, idx)?.ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(idx, "decimal".to_string(), Type::Null)
    })
}
