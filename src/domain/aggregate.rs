// ==========================================
// NAF 事故统计系统 - 聚合树模型
// ==========================================
// 红线: 可加字段只由聚合引擎写入；合并步骤只追加可选属性
// ==========================================

use crate::domain::document::{Demographics, InjuryDetails};
use crate::domain::record::RawCounts;
use crate::domain::types::{Category, Level};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const NATIONAL_CODE: &str = "national";

/// 由汇总分子/分母派生的比率
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedRates {
    pub frequency_index: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_rate: Option<f64>,
}

/// 单一年度的汇总统计（趋势用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlyStats {
    pub events: u64,
    pub workforce: u64,
    pub hours: u64,
    pub establishments: u64,
    pub new_disabilities: u64,
    pub deaths: u64,
    pub lost_days: u64,
    pub frequency_index: f64,
    pub severity_rate: f64,
}

/// 通勤事故概要计数（挂在 AT 树上）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommutingCount {
    pub count: u64,
}

// ==========================================
// AggregateNode - 层级节点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateNode {
    pub code: String,
    pub label: String,
    pub level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coarse_code: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub children: BTreeSet<String>,
    pub counts: RawCounts,
    pub rates: DerivedRates,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub causes_raw: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cause_shares: BTreeMap<String, f64>,

    // ===== 跨源叠加属性（缺数据时保持 None）=====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographics: Option<Demographics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commuting: Option<CommutingCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injury_details: Option<InjuryDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly: Option<BTreeMap<u16, YearlyStats>>,
}

impl AggregateNode {
    pub fn new(code: impl Into<String>, label: impl Into<String>, level: Level) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            level,
            mid_code: None,
            coarse_code: None,
            children: BTreeSet::new(),
            counts: RawCounts::default(),
            rates: DerivedRates::default(),
            causes_raw: BTreeMap::new(),
            cause_shares: BTreeMap::new(),
            demographics: None,
            commuting: None,
            injury_details: None,
            yearly: None,
        }
    }
}

// ==========================================
// AggregateTree - 三级 + 全国
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateTree {
    pub category: Category,
    pub fine: BTreeMap<String, AggregateNode>,
    pub mid: BTreeMap<String, AggregateNode>,
    pub coarse: BTreeMap<String, AggregateNode>,
    pub national: AggregateNode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trend_years: Vec<u16>,
}

impl AggregateTree {
    /// 取某一编码层级（全国层级无编码映射，返回 None）
    pub fn level(&self, level: Level) -> Option<&BTreeMap<String, AggregateNode>> {
        match level {
            Level::Fine => Some(&self.fine),
            Level::Mid => Some(&self.mid),
            Level::Coarse => Some(&self.coarse),
            Level::National => None,
        }
    }

    pub fn level_mut(&mut self, level: Level) -> Option<&mut BTreeMap<String, AggregateNode>> {
        match level {
            Level::Fine => Some(&mut self.fine),
            Level::Mid => Some(&mut self.mid),
            Level::Coarse => Some(&mut self.coarse),
            Level::National => None,
        }
    }

    pub fn node(&self, level: Level, code: &str) -> Option<&AggregateNode> {
        match level {
            Level::National => Some(&self.national),
            _ => self.level(level)?.get(code),
        }
    }

    /// 扁平检索索引：按层级名、再按编码排序
    pub fn index(&self) -> Vec<IndexEntry> {
        let mut entries: Vec<IndexEntry> = Level::CODED
            .iter()
            .filter_map(|level| self.level(*level))
            .flat_map(|nodes| nodes.values())
            .map(|node| IndexEntry {
                code: node.code.clone(),
                label: node.label.clone(),
                level: node.level,
            })
            .collect();
        entries.sort_by(|a, b| {
            a.level
                .as_str()
                .cmp(b.level.as_str())
                .then_with(|| a.code.cmp(&b.code))
        });
        entries
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub code: String,
    pub label: String,
    pub level: Level,
}
