// ==========================================
// 分层聚合集成测试
// ==========================================
// 测试目标: 比率一律由汇总分子/分母重算，各级计数可加
// ==========================================

mod test_helpers;

use naf_risk_stats::domain::{Category, Level, RawCounts};
use naf_risk_stats::engine::{verify_additivity, AggregationError, HierarchicalAggregator};
use test_helpers::{at_leaf, at_leaf_with_hours, mp_leaf};

fn build_at(leaves: &[naf_risk_stats::LeafRecord]) -> naf_risk_stats::AggregateTree {
    HierarchicalAggregator::default()
        .build(Category::OccupationalAccident, leaves)
        .unwrap()
}

#[test]
fn test_rates_recomputed_at_every_level() {
    let tree = build_at(&[
        at_leaf("1101A", 50, 2),
        at_leaf("1101B", 150, 3),
        at_leaf("1102A", 300, 9),
    ]);

    assert_eq!(tree.fine["1101A"].rates.frequency_index, 40.0);
    assert_eq!(tree.fine["1101B"].rates.frequency_index, 20.0);
    assert_eq!(tree.mid["1101"].rates.frequency_index, 25.0);
    assert_eq!(tree.mid["1102"].rates.frequency_index, 30.0);
    assert_eq!(tree.coarse["11"].rates.frequency_index, 28.0);
    assert_eq!(tree.national.rates.frequency_index, 28.0);
    assert_eq!(tree.national.counts.workforce, 500);
    assert_eq!(tree.national.counts.lost_time_events, 14);
}

#[test]
fn test_weighted_rate_is_not_mean_of_child_rates() {
    // 子级指数 100 / 10，简单平均为 55，正确的加权结果为 19
    let tree = build_at(&[at_leaf("2201A", 100, 10), at_leaf("2201B", 900, 9)]);
    assert_eq!(tree.fine["2201A"].rates.frequency_index, 100.0);
    assert_eq!(tree.fine["2201B"].rates.frequency_index, 10.0);
    assert_eq!(tree.mid["2201"].rates.frequency_index, 19.0);
    assert_eq!(tree.coarse["22"].rates.frequency_index, 19.0);
}

#[test]
fn test_zero_denominators_yield_zero_rates() {
    let tree = build_at(&[at_leaf_with_hours("3311Z", 0, 5, 0, 40)]);
    let node = &tree.fine["3311Z"];
    assert_eq!(node.rates.frequency_index, 0.0);
    assert_eq!(node.rates.severity_rate, Some(0.0));
    assert_eq!(tree.national.rates.frequency_index, 0.0);
}

#[test]
fn test_severity_rate_from_summed_hours() {
    let tree = build_at(&[
        at_leaf_with_hours("4711A", 100, 4, 150_000, 300),
        at_leaf_with_hours("4711B", 100, 2, 50_000, 100),
    ]);
    // 400 / 200000 × 1000 = 2.0
    assert_eq!(tree.mid["4711"].rates.severity_rate, Some(2.0));
    assert_eq!(tree.fine["4711A"].rates.severity_rate, Some(2.0));
    assert_eq!(tree.fine["4711B"].rates.severity_rate, Some(2.0));
}

#[test]
fn test_disease_frequency_uses_first_settlements() {
    let tree = HierarchicalAggregator::default()
        .build(
            Category::OccupationalDisease,
            &[mp_leaf("1013A", 400, 2), mp_leaf("1013B", 600, 8)],
        )
        .unwrap();
    assert_eq!(tree.mid["1013"].rates.frequency_index, 10.0);
    assert_eq!(tree.national.counts.first_settlements, 10);
}

#[test]
fn test_counts_are_additive_across_levels() {
    let leaves = vec![
        at_leaf("0111Z", 30, 1),
        at_leaf("0112Z", 70, 3),
        at_leaf("0121Z", 20, 0),
        at_leaf("1011Z", 500, 25),
        at_leaf("1012Z", 80, 4),
        at_leaf("1011Z", 120, 6),
    ];
    let tree = build_at(&leaves);
    assert!(verify_additivity(&tree).is_ok());

    for (code, mid) in &tree.mid {
        let children: RawCounts = mid
            .children
            .iter()
            .map(|child| &tree.fine[child].counts)
            .sum();
        assert_eq!(mid.counts, children, "中码 {} 不可加", code);
    }
    for (code, coarse) in &tree.coarse {
        let children: RawCounts = coarse
            .children
            .iter()
            .map(|child| &tree.mid[child].counts)
            .sum();
        assert_eq!(coarse.counts, children, "粗码 {} 不可加", code);
    }
    let coarse_total: RawCounts = tree.coarse.values().map(|n| &n.counts).sum();
    assert_eq!(tree.national.counts, coarse_total);

    // 同一细码多行（按 CTN 拆分）先求和
    assert_eq!(tree.fine["1011Z"].counts.workforce, 620);
    assert_eq!(tree.fine["1011Z"].counts.lost_time_events, 31);
}

#[test]
fn test_every_node_has_single_parent() {
    let tree = build_at(&[
        at_leaf("0111Z", 30, 1),
        at_leaf("0112Z", 70, 3),
        at_leaf("0121Z", 20, 0),
    ]);
    for node in tree.fine.values() {
        assert_eq!(node.level, Level::Fine);
        let mid = node.mid_code.as_deref().unwrap();
        assert!(tree.mid[mid].children.contains(&node.code));
        assert_eq!(node.coarse_code.as_deref(), Some("01"));
    }
    assert_eq!(tree.coarse["01"].children.len(), 2);
    assert_eq!(tree.national.children.len(), 1);
}

#[test]
fn test_declared_coarse_code_must_match_prefix() {
    let leaf = at_leaf("4711D", 10, 1).with_coarse(Some("46".to_string()), "Commerce de gros");
    let err = HierarchicalAggregator::default()
        .build(Category::OccupationalAccident, &[leaf])
        .unwrap_err();
    assert!(matches!(err, AggregationError::HierarchyMismatch { .. }));
}

#[test]
fn test_empty_input_builds_empty_tree() {
    let tree = build_at(&[]);
    assert!(tree.fine.is_empty());
    assert!(tree.mid.is_empty());
    assert!(tree.coarse.is_empty());
    assert_eq!(tree.national.counts, RawCounts::default());
    assert_eq!(tree.national.rates.frequency_index, 0.0);
}
