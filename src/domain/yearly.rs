// ==========================================
// NAF 事故统计系统 - 年度记录
// ==========================================
// 红线: 五个年度槽必须全部填充，缺任意一年则整条丢弃
// ==========================================

use crate::domain::types::{TREND_YEARS, YEAR_SLOTS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单一年度的可加字段
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSlot {
    pub count: u64,
    pub new_disabilities: u64,
    pub deaths: u64,
    pub lost_days: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workforce: Option<u64>,
}

/// 五年趋势记录（一份文档 × 一个险种）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearlyRecord {
    slots: BTreeMap<u16, YearSlot>,
}

impl YearlyRecord {
    /// 由四/五列解析结果组装
    ///
    /// 任一必需行长度不为 5 则返回 None；雇员行长度不为 5 时忽略该行。
    pub fn from_columns(
        count: &[u64],
        new_disabilities: &[u64],
        deaths: &[u64],
        lost_days: &[u64],
        workforce: Option<&[u64]>,
    ) -> Option<Self> {
        let required = [count, new_disabilities, deaths, lost_days];
        if required.iter().any(|row| row.len() != YEAR_SLOTS) {
            return None;
        }
        let workforce = workforce.filter(|row| row.len() == YEAR_SLOTS);

        let slots = TREND_YEARS
            .iter()
            .enumerate()
            .map(|(i, year)| {
                (
                    *year,
                    YearSlot {
                        count: count[i],
                        new_disabilities: new_disabilities[i],
                        deaths: deaths[i],
                        lost_days: lost_days[i],
                        workforce: workforce.map(|w| w[i]),
                    },
                )
            })
            .collect();
        Some(Self { slots })
    }

    pub fn get(&self, year: u16) -> Option<&YearSlot> {
        self.slots.get(&year)
    }

    /// 最近一年（趋势表最后一列）
    pub fn latest(&self) -> Option<(u16, &YearSlot)> {
        self.slots.iter().next_back().map(|(y, s)| (*y, s))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &YearSlot)> {
        self.slots.iter().map(|(y, s)| (*y, s))
    }

    pub fn has_workforce(&self) -> bool {
        self.slots.values().all(|s| s.workforce.is_some())
    }
}
