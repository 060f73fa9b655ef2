// ==========================================
// NAF 事故统计系统 - 五年趋势聚合
// ==========================================
// 输入: 文档年度表 + AT 聚合树（雇员/工时兜底）
// 输出: 每年一套 细码/中码/粗码/全国 统计
// 红线: 每年独立走分层聚合，沿用同一套可加性校验
// ==========================================

use crate::domain::aggregate::{AggregateNode, AggregateTree, YearlyStats};
use crate::domain::document::DocumentRecord;
use crate::domain::record::{LeafRecord, RawCounts};
use crate::domain::types::Category;
use crate::domain::yearly::YearSlot;
use crate::engine::aggregator::{AggregationError, HierarchicalAggregator};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// 单一年度的各级统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearLevels {
    pub fine: BTreeMap<String, YearlyStats>,
    pub mid: BTreeMap<String, YearlyStats>,
    pub coarse: BTreeMap<String, YearlyStats>,
    pub national: YearlyStats,
}

/// 年度 → 各级统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendTable {
    pub years: BTreeMap<u16, YearLevels>,
}

impl TrendTable {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn year_list(&self) -> Vec<u16> {
        self.years.keys().copied().collect()
    }
}

pub fn yearly_stats(category: Category, node: &AggregateNode) -> YearlyStats {
    YearlyStats {
        events: node.counts.event_count(category),
        workforce: node.counts.workforce,
        hours: node.counts.hours,
        establishments: node.counts.establishments,
        new_disabilities: node.counts.new_disabilities,
        deaths: node.counts.deaths,
        lost_days: node.counts.lost_days,
        frequency_index: node.rates.frequency_index,
        severity_rate: node.rates.severity_rate.unwrap_or(0.0),
    }
}

/// 年度槽 → 叶子记录（机构数不随年度提供，记 0）
pub fn year_leaf(
    category: Category,
    code: &str,
    label: &str,
    slot: &YearSlot,
    workforce: u64,
    hours: u64,
) -> LeafRecord {
    let counts = RawCounts {
        workforce,
        hours,
        new_disabilities: slot.new_disabilities,
        deaths: slot.deaths,
        lost_days: slot.lost_days,
        ..Default::default()
    }
    .with_event_count(category, slot.count);
    LeafRecord::new(code, label).with_counts(counts)
}

/// 每年的叶子记录独立聚合
pub fn aggregate_years(
    aggregator: &HierarchicalAggregator,
    category: Category,
    leaves_by_year: BTreeMap<u16, Vec<LeafRecord>>,
) -> Result<TrendTable, AggregationError> {
    let mut table = TrendTable::default();
    for (year, leaves) in leaves_by_year {
        if leaves.is_empty() {
            continue;
        }
        let tree = aggregator.build(category, &leaves)?;
        let to_stats = |nodes: &BTreeMap<String, AggregateNode>| -> BTreeMap<String, YearlyStats> {
            nodes
                .iter()
                .map(|(code, node)| (code.clone(), yearly_stats(category, node)))
                .collect()
        };
        table.years.insert(
            year,
            YearLevels {
                fine: to_stats(&tree.fine),
                mid: to_stats(&tree.mid),
                coarse: to_stats(&tree.coarse),
                national: yearly_stats(category, &tree.national),
            },
        );
    }
    Ok(table)
}

// ==========================================
// TrendBuilder - AT / MP 趋势
// ==========================================
pub struct TrendBuilder<'a> {
    accident: &'a AggregateTree,
    aggregator: HierarchicalAggregator,
}

impl<'a> TrendBuilder<'a> {
    pub fn new(accident: &'a AggregateTree, aggregator: HierarchicalAggregator) -> Self {
        Self {
            accident,
            aggregator,
        }
    }

    /// 由文档年度表构建趋势
    ///
    /// 雇员数: 同一文档 AT 年度表当年雇员数（非 0 时），否则 AT 树细码当前雇员数
    /// 工时: AT 树细码工时（MP 同样使用 AT 口径）
    /// 编码无法按层级截取的文档记录告警后跳过，不影响其余文档
    pub fn build(
        &self,
        category: Category,
        documents: &BTreeMap<String, DocumentRecord>,
    ) -> Result<TrendTable, AggregationError> {
        let mut leaves_by_year: BTreeMap<u16, Vec<LeafRecord>> = BTreeMap::new();
        let mut contributing = 0usize;
        let keys = self.aggregator.keys();

        for (code, document) in documents {
            let Some(yearly) = document.yearly(category) else {
                continue;
            };
            if let Err(e) = keys.mid_key(code).and_then(|_| keys.coarse_key(code)) {
                warn!(category = %category, code = %code, error = %e, "文档编码不符合层级，跳过趋势");
                continue;
            }
            contributing += 1;
            let base = self.accident.fine.get(code);
            let base_workforce = base.map(|n| n.counts.workforce).unwrap_or(0);
            let hours = base.map(|n| n.counts.hours).unwrap_or(0);
            let label = base.map(|n| n.label.as_str()).unwrap_or("");

            for (year, slot) in yearly.iter() {
                let workforce = document
                    .accident_yearly
                    .as_ref()
                    .and_then(|at| at.get(year))
                    .and_then(|at_slot| at_slot.workforce)
                    .filter(|w| *w > 0)
                    .unwrap_or(base_workforce);
                leaves_by_year
                    .entry(year)
                    .or_default()
                    .push(year_leaf(category, code, label, slot, workforce, hours));
            }
        }

        let table = aggregate_years(&self.aggregator, category, leaves_by_year)?;
        info!(
            category = %category,
            documents = contributing,
            years = table.years.len(),
            "五年趋势构建完成"
        );
        Ok(table)
    }
}
