// ==========================================
// NAF 事故统计系统 - 通勤事故聚合树
// ==========================================
// 来源: 仅文档（通勤年度表）+ AT 树提供劳动力口径
// - 细码: 文档编码须同时存在于 AT 树
// - 当期计数: 年度表最近一年
// - 雇员/机构数: AT 树细码
// - 年度雇员数: AT 细码当年趋势雇员数，缺失时用当前雇员数
// ==========================================

use crate::domain::aggregate::AggregateTree;
use crate::domain::document::DocumentRecord;
use crate::domain::record::{LeafRecord, RawCounts};
use crate::domain::types::Category;
use crate::engine::aggregator::{AggregationError, HierarchicalAggregator};
use crate::engine::merge::CrossSourceMerge;
use crate::engine::trend::{aggregate_years, year_leaf};
use std::collections::BTreeMap;
use tracing::{info, instrument};

pub struct CommutingTreeBuilder<'a> {
    accident: &'a AggregateTree,
    aggregator: HierarchicalAggregator,
}

impl<'a> CommutingTreeBuilder<'a> {
    /// accident: 已挂载趋势的 AT 树
    pub fn new(accident: &'a AggregateTree, aggregator: HierarchicalAggregator) -> Self {
        Self {
            accident,
            aggregator,
        }
    }

    /// 没有任何可用的通勤年度表时返回 None
    #[instrument(skip(self, documents), fields(documents = documents.len()))]
    pub fn build(
        &self,
        documents: &BTreeMap<String, DocumentRecord>,
    ) -> Result<Option<AggregateTree>, AggregationError> {
        let category = Category::Commuting;
        let mut leaves = Vec::new();
        let mut leaves_by_year: BTreeMap<u16, Vec<LeafRecord>> = BTreeMap::new();

        for (code, document) in documents {
            let Some(yearly) = document.commuting_yearly.as_ref() else {
                continue;
            };
            let Some(at_node) = self.accident.fine.get(code) else {
                continue;
            };
            let Some((_, latest)) = yearly.latest() else {
                continue;
            };

            let coarse_label = at_node
                .coarse_code
                .as_ref()
                .and_then(|coarse| self.accident.coarse.get(coarse))
                .map(|node| node.label.clone())
                .unwrap_or_default();

            let counts = RawCounts {
                workforce: at_node.counts.workforce,
                establishments: at_node.counts.establishments,
                new_disabilities: latest.new_disabilities,
                deaths: latest.deaths,
                lost_days: latest.lost_days,
                ..Default::default()
            }
            .with_event_count(category, latest.count);
            leaves.push(
                LeafRecord::new(code.as_str(), at_node.label.as_str())
                    .with_counts(counts)
                    .with_coarse(at_node.coarse_code.clone(), coarse_label),
            );

            for (year, slot) in yearly.iter() {
                let workforce = at_node
                    .yearly
                    .as_ref()
                    .and_then(|years| years.get(&year))
                    .map(|stats| stats.workforce)
                    .unwrap_or(at_node.counts.workforce);
                leaves_by_year
                    .entry(year)
                    .or_default()
                    .push(year_leaf(category, code, &at_node.label, slot, workforce, 0));
            }
        }

        if leaves.is_empty() {
            info!("无可用的通勤年度表，跳过通勤树");
            return Ok(None);
        }

        let mut tree = self.aggregator.build(category, &leaves)?;
        let trend = aggregate_years(&self.aggregator, category, leaves_by_year)?;
        CrossSourceMerge.overlay_trend(&mut tree, &trend);

        info!(
            fine = tree.fine.len(),
            mid = tree.mid.len(),
            coarse = tree.coarse.len(),
            "通勤树构建完成"
        );
        Ok(Some(tree))
    }
}
