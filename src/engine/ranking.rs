// ==========================================
// 维修服务报表引擎 - 并列名次分配
// ==========================================
// 规则 (SQL RANK 语义):
// - 输入已按排名键排好序
// - 排名键相同者名次相同
// - 名次 = 1 + 严格排在前面的条目数（并列后跳号，如 1,1,3）
// ==========================================

/// 为已排序的序列分配并列名次
///
/// # 参数
/// - `items`: 已按排名键降序（或任意稳定顺序）排好的条目
/// - `key`: 排名键提取函数，键相等视为并列
///
/// # 返回
/// 与 `items` 一一对应的名次
pub fn assign_shared_ranks<T, K, F>(items: &[T], key: F) -> Vec<u64>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut ranks = Vec::with_capacity(items.len());
    let mut previous: Option<K> = None;
    let mut current_rank = 0u64;

    for (idx, item) in items.iter().enumerate() {
        let k = key(item);
        if previous.as_ref() != Some(&k) {
            current_rank = idx as u64 + 1;
        }
        ranks.push(current_rank);
        previous = Some(k);
    }

    ranks
}
