// ==========================================
// NAF 事故统计系统 - 比率派生
// ==========================================
// 红线: 比率只由汇总后的分子/分母计算，不对子节点比率求平均
// 红线: 分母为 0 时比率定义为 0
// ==========================================

use crate::domain::aggregate::DerivedRates;
use crate::domain::record::RawCounts;
use crate::domain::types::Category;
use std::collections::BTreeMap;

pub const FREQUENCY_DECIMALS: i32 = 1;
pub const SEVERITY_DECIMALS: i32 = 2;
pub const SHARE_DECIMALS: i32 = 1;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// 频率指数: 每千名雇员的事件数
pub fn frequency_index(events: u64, workforce: u64) -> f64 {
    if workforce == 0 {
        return 0.0;
    }
    round_to(events as f64 / workforce as f64 * 1000.0, FREQUENCY_DECIMALS)
}

/// 严重率: 每千工时的损失工作日
pub fn severity_rate(lost_days: u64, hours: u64) -> f64 {
    if hours == 0 {
        return 0.0;
    }
    round_to(lost_days as f64 / (hours as f64 / 1000.0), SEVERITY_DECIMALS)
}

pub fn derive_rates(category: Category, counts: &RawCounts) -> DerivedRates {
    DerivedRates {
        frequency_index: frequency_index(counts.event_count(category), counts.workforce),
        severity_rate: category
            .has_severity_rate()
            .then(|| severity_rate(counts.lost_days, counts.hours)),
    }
}

/// 原因份额（百分比）；事件总数为 0 时全部为 0
pub fn cause_shares(raw: &BTreeMap<String, u64>, total_events: u64) -> BTreeMap<String, f64> {
    raw.iter()
        .map(|(cause, count)| {
            let share = if total_events == 0 {
                0.0
            } else {
                round_to(*count as f64 / total_events as f64 * 100.0, SHARE_DECIMALS)
            };
            (cause.clone(), share)
        })
        .collect()
}
