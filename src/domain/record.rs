// ==========================================
// NAF 事故统计系统 - 叶子记录模型
// ==========================================
// 用途: 导入层写入，聚合引擎只读
// 红线: 所有计数字段均为可加原始计数，比率一律由聚合引擎派生
// ==========================================

use crate::domain::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::AddAssign;

// ==========================================
// RawCounts - 可加原始计数
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCounts {
    pub workforce: u64,             // 雇员数 (nb_salaries)
    pub hours: u64,                 // 工时 (nb_heures)
    pub establishments: u64,        // 机构数 (nb_siret)
    pub first_settlements: u64,     // 首次赔付数 (1er règlement)
    pub lost_time_events: u64,      // 停工 4 天以上事故数（仅 AT）
    pub new_disabilities: u64,      // 新增永久伤残 (IP)
    pub disabilities_below_10: u64, // IP 伤残率 < 10%（仅 MP）
    pub disabilities_above_10: u64, // IP 伤残率 >= 10%（仅 MP）
    pub disability_rate_sum: u64,   // IP 伤残率合计（仅 MP）
    pub deaths: u64,                // 死亡
    pub lost_days: u64,             // 损失工作日 (journées IT)
}

impl RawCounts {
    pub const FIELD_NAMES: [&'static str; 11] = [
        "workforce",
        "hours",
        "establishments",
        "first_settlements",
        "lost_time_events",
        "new_disabilities",
        "disabilities_below_10",
        "disabilities_above_10",
        "disability_rate_sum",
        "deaths",
        "lost_days",
    ];

    /// 按固定顺序列出所有字段（与 FIELD_NAMES 对齐）
    pub fn values(&self) -> [u64; 11] {
        [
            self.workforce,
            self.hours,
            self.establishments,
            self.first_settlements,
            self.lost_time_events,
            self.new_disabilities,
            self.disabilities_below_10,
            self.disabilities_above_10,
            self.disability_rate_sum,
            self.deaths,
            self.lost_days,
        ]
    }

    /// 频率指数所用的事件计数
    ///
    /// - AT: 停工 4 天以上事故
    /// - MP / 通勤: 首次赔付
    pub fn event_count(&self, category: Category) -> u64 {
        match category {
            Category::OccupationalAccident => self.lost_time_events,
            Category::OccupationalDisease | Category::Commuting => self.first_settlements,
        }
    }

    /// 按险种口径写入事件计数（event_count 的逆操作）
    pub fn with_event_count(mut self, category: Category, events: u64) -> Self {
        match category {
            Category::OccupationalAccident => self.lost_time_events = events,
            Category::OccupationalDisease | Category::Commuting => self.first_settlements = events,
        }
        self
    }
}

impl AddAssign<&RawCounts> for RawCounts {
    fn add_assign(&mut self, rhs: &RawCounts) {
        self.workforce += rhs.workforce;
        self.hours += rhs.hours;
        self.establishments += rhs.establishments;
        self.first_settlements += rhs.first_settlements;
        self.lost_time_events += rhs.lost_time_events;
        self.new_disabilities += rhs.new_disabilities;
        self.disabilities_below_10 += rhs.disabilities_below_10;
        self.disabilities_above_10 += rhs.disabilities_above_10;
        self.disability_rate_sum += rhs.disability_rate_sum;
        self.deaths += rhs.deaths;
        self.lost_days += rhs.lost_days;
    }
}

impl<'a> std::iter::Sum<&'a RawCounts> for RawCounts {
    fn sum<I: Iterator<Item = &'a RawCounts>>(iter: I) -> Self {
        let mut total = RawCounts::default();
        for counts in iter {
            total += counts;
        }
        total
    }
}

// ==========================================
// LeafRecord - 细码叶子记录
// ==========================================
// 一个来源行（或一份文档）对应一条；同一细码可出现多条（按 CTN 拆分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafRecord {
    pub code: String,                // NAF5 细码
    pub label: String,               // 细码名称
    pub coarse_code: Option<String>, // 来源表内声明的 NAF2（缺省时按前缀推导）
    pub coarse_label: String,        // NAF2 名称
    pub counts: RawCounts,
    pub causes: BTreeMap<String, u64>, // 原因分类原始计数
}

impl LeafRecord {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            coarse_code: None,
            coarse_label: String::new(),
            counts: RawCounts::default(),
            causes: BTreeMap::new(),
        }
    }

    pub fn with_counts(mut self, counts: RawCounts) -> Self {
        self.counts = counts;
        self
    }

    pub fn with_coarse(mut self, code: Option<String>, label: impl Into<String>) -> Self {
        self.coarse_code = code;
        self.coarse_label = label.into();
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>, count: u64) -> Self {
        *self.causes.entry(cause.into()).or_insert(0) += count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_counts_sum() {
        let a = RawCounts {
            workforce: 10,
            deaths: 1,
            ..Default::default()
        };
        let b = RawCounts {
            workforce: 5,
            lost_days: 7,
            ..Default::default()
        };
        let total: RawCounts = [a, b].iter().sum();
        assert_eq!(total.workforce, 15);
        assert_eq!(total.deaths, 1);
        assert_eq!(total.lost_days, 7);
    }

    #[test]
    fn test_event_count_by_category() {
        let counts = RawCounts {
            first_settlements: 12,
            lost_time_events: 9,
            ..Default::default()
        };
        assert_eq!(counts.event_count(Category::OccupationalAccident), 9);
        assert_eq!(counts.event_count(Category::OccupationalDisease), 12);
        assert_eq!(counts.event_count(Category::Commuting), 12);
    }

    #[test]
    fn test_with_cause_accumulates() {
        let leaf = LeafRecord::new("1101A", "")
            .with_cause("TMS", 3)
            .with_cause("TMS", 2);
        assert_eq!(leaf.causes.get("TMS"), Some(&5));
    }
}
