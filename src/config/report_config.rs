// ==========================================
// 维修服务报表引擎 - 报表配置
// ==========================================

use crate::engine::coverage::DEFAULT_ALL_CATEGORIES_LABEL;
use crate::engine::unprofitability::DEFAULT_RATING_LIMIT;
use serde::{Deserialize, Serialize};

/// 报表运行参数（由 ConfigManager 从 config_kv 加载）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// 亏损排名默认返回条数
    pub default_rating_limit: usize,
    /// 覆盖率报表“全部类别”哨兵标签
    pub all_categories_label: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_rating_limit: DEFAULT_RATING_LIMIT,
            all_categories_label: DEFAULT_ALL_CATEGORIES_LABEL.to_string(),
        }
    }
}
