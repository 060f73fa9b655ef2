// ==========================================
// NAF 事故统计系统 - 跨源叠加
// ==========================================
// 职责: 把文档派生的可选属性叠加到聚合树各级节点
// - 细码: 直接挂载
// - 中码/粗码/全国: 对下属细码的贡献求和
// 红线: 只写可选属性，不改可加字段；无贡献的节点保持 None
// ==========================================

use crate::domain::aggregate::{AggregateNode, AggregateTree, CommutingCount, YearlyStats};
use crate::domain::document::{Demographics, DocumentRecord, InjuryDetails};
use crate::domain::types::Category;
use crate::engine::trend::TrendTable;
use std::collections::BTreeMap;
use tracing::{debug, info};

// ==========================================
// Additive - 可求和的叠加属性
// ==========================================
pub trait Additive: Clone {
    fn add(&mut self, other: &Self);
}

impl Additive for Demographics {
    fn add(&mut self, other: &Self) {
        self.absorb(other);
    }
}

impl Additive for InjuryDetails {
    fn add(&mut self, other: &Self) {
        self.absorb(other);
    }
}

impl Additive for CommutingCount {
    fn add(&mut self, other: &Self) {
        self.count += other.count;
    }
}

fn accumulate<T: Additive>(target: &mut Option<T>, value: &T) {
    match target {
        Some(existing) => existing.add(value),
        None => *target = Some(value.clone()),
    }
}

/// 叠加一种属性；只接受树中已存在的细码，返回挂载的细码数
pub fn overlay_attribute<T, I>(
    tree: &mut AggregateTree,
    contributions: I,
    slot: fn(&mut AggregateNode) -> &mut Option<T>,
) -> usize
where
    T: Additive,
    I: IntoIterator<Item = (String, T)>,
{
    let mut mid_totals: BTreeMap<String, T> = BTreeMap::new();
    let mut coarse_totals: BTreeMap<String, T> = BTreeMap::new();
    let mut national_total: Option<T> = None;
    let mut attached = 0usize;

    for (code, value) in contributions {
        let Some(fine) = tree.fine.get_mut(&code) else {
            continue;
        };
        attached += 1;

        if let Some(mid_code) = fine.mid_code.clone() {
            accumulate_keyed(&mut mid_totals, mid_code, &value);
        }
        if let Some(coarse_code) = fine.coarse_code.clone() {
            accumulate_keyed(&mut coarse_totals, coarse_code, &value);
        }
        accumulate(&mut national_total, &value);
        *slot(fine) = Some(value);
    }

    for (code, total) in mid_totals {
        if let Some(node) = tree.mid.get_mut(&code) {
            *slot(node) = Some(total);
        }
    }
    for (code, total) in coarse_totals {
        if let Some(node) = tree.coarse.get_mut(&code) {
            *slot(node) = Some(total);
        }
    }
    if national_total.is_some() {
        *slot(&mut tree.national) = national_total;
    }
    attached
}

fn accumulate_keyed<T: Additive>(totals: &mut BTreeMap<String, T>, key: String, value: &T) {
    match totals.get_mut(&key) {
        Some(existing) => existing.add(value),
        None => {
            totals.insert(key, value.clone());
        }
    }
}

fn demographics_slot(node: &mut AggregateNode) -> &mut Option<Demographics> {
    &mut node.demographics
}

fn commuting_slot(node: &mut AggregateNode) -> &mut Option<CommutingCount> {
    &mut node.commuting
}

fn injury_slot(node: &mut AggregateNode) -> &mut Option<InjuryDetails> {
    &mut node.injury_details
}

// ==========================================
// CrossSourceMerge
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossSourceMerge;

impl CrossSourceMerge {
    pub fn new() -> Self {
        Self
    }

    /// AT 树: 人口统计 + 通勤概要计数 + 伤害细分
    pub fn overlay_accident(
        &self,
        tree: &mut AggregateTree,
        documents: &BTreeMap<String, DocumentRecord>,
    ) {
        let demographics = overlay_attribute(
            tree,
            documents.iter().filter_map(|(code, doc)| {
                doc.accident_demographics.clone().map(|d| (code.clone(), d))
            }),
            demographics_slot,
        );
        let commuting = overlay_attribute(
            tree,
            documents.iter().filter_map(|(code, doc)| {
                doc.synthesis
                    .get(&Category::Commuting)
                    .map(|entry| (code.clone(), CommutingCount { count: entry.count }))
            }),
            commuting_slot,
        );
        let injury = overlay_attribute(
            tree,
            documents.iter().filter_map(|(code, doc)| {
                doc.injury_details.clone().map(|d| (code.clone(), d))
            }),
            injury_slot,
        );
        info!(
            demographics = demographics,
            commuting = commuting,
            injury_details = injury,
            "AT 文档属性叠加完成"
        );
    }

    /// MP 树: 职业病人口统计
    pub fn overlay_disease(
        &self,
        tree: &mut AggregateTree,
        documents: &BTreeMap<String, DocumentRecord>,
    ) {
        let demographics = overlay_attribute(
            tree,
            documents.iter().filter_map(|(code, doc)| {
                doc.disease_demographics.clone().map(|d| (code.clone(), d))
            }),
            demographics_slot,
        );
        info!(demographics = demographics, "MP 文档属性叠加完成");
    }

    /// 挂载趋势: 各级节点按年写入，全国节点写入全国年度统计
    pub fn overlay_trend(&self, tree: &mut AggregateTree, trend: &TrendTable) {
        if trend.is_empty() {
            return;
        }
        for (year, levels) in &trend.years {
            attach_year(&mut tree.fine, *year, &levels.fine);
            attach_year(&mut tree.mid, *year, &levels.mid);
            attach_year(&mut tree.coarse, *year, &levels.coarse);
            tree.national
                .yearly
                .get_or_insert_with(BTreeMap::new)
                .insert(*year, levels.national);
        }
        tree.trend_years = trend.year_list();
        debug!(category = %tree.category, years = tree.trend_years.len(), "趋势挂载完成");
    }
}

fn attach_year(
    nodes: &mut BTreeMap<String, AggregateNode>,
    year: u16,
    stats: &BTreeMap<String, YearlyStats>,
) {
    for (code, year_stats) in stats {
        if let Some(node) = nodes.get_mut(code) {
            node.yearly
                .get_or_insert_with(BTreeMap::new)
                .insert(year, *year_stats);
        }
    }
}
