// ==========================================
// NAF 事故统计系统 - 分层聚合引擎
// ==========================================
// 细码(NAF5) → 中码(前 4 位) → 粗码(前 2 位) → 全国
// 输入: 叶子记录（同一细码可多条）
// 输出: AggregateTree
// 红线: 可加字段逐级整数求和；比率由本节点的和重新派生
// 红线: 名称首个非空者为准（first-wins）
// ==========================================

use crate::domain::aggregate::{AggregateNode, AggregateTree, NATIONAL_CODE};
use crate::domain::record::{LeafRecord, RawCounts};
use crate::domain::types::{Category, Level};
use crate::engine::rates::{cause_shares, derive_rates};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, instrument};

pub const NATIONAL_LABEL: &str = "Toutes activités";

// ==========================================
// 错误类型
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("层级不一致: 细码 {code} 声明的粗码 {declared} 不是其前缀 {expected}")]
    HierarchyMismatch {
        code: String,
        declared: String,
        expected: String,
    },

    #[error("编码过短: {code}（至少需要 {required} 个字符）")]
    CodeTooShort { code: String, required: usize },

    #[error("可加性校验失败: {level} {code} 字段 {field} = {parent_value}，子节点合计 {children_sum}")]
    AdditivityViolation {
        level: Level,
        code: String,
        field: &'static str,
        parent_value: u64,
        children_sum: u64,
    },
}

// ==========================================
// HierarchyKeys - 前缀截断规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyKeys {
    pub mid_len: usize,
    pub coarse_len: usize,
}

impl Default for HierarchyKeys {
    fn default() -> Self {
        Self {
            mid_len: 4,
            coarse_len: 2,
        }
    }
}

impl HierarchyKeys {
    fn prefix<'a>(&self, code: &'a str, len: usize) -> Result<&'a str, AggregationError> {
        code.get(..len).ok_or_else(|| AggregationError::CodeTooShort {
            code: code.to_string(),
            required: len,
        })
    }

    pub fn mid_key<'a>(&self, code: &'a str) -> Result<&'a str, AggregationError> {
        self.prefix(code, self.mid_len)
    }

    pub fn coarse_key<'a>(&self, code: &'a str) -> Result<&'a str, AggregationError> {
        self.prefix(code, self.coarse_len)
    }

    /// 粗码: 记录声明值优先，但必须与前缀一致
    pub fn coarse_for(&self, leaf: &LeafRecord) -> Result<String, AggregationError> {
        let expected = self.coarse_key(&leaf.code)?;
        match leaf.coarse_code.as_deref() {
            Some(declared) if declared != expected => Err(AggregationError::HierarchyMismatch {
                code: leaf.code.clone(),
                declared: declared.to_string(),
                expected: expected.to_string(),
            }),
            _ => Ok(expected.to_string()),
        }
    }
}

// ==========================================
// HierarchicalAggregator
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchicalAggregator {
    keys: HierarchyKeys,
}

impl HierarchicalAggregator {
    pub fn new(keys: HierarchyKeys) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> HierarchyKeys {
        self.keys
    }

    /// 由叶子记录构建聚合树（构建完成后校验可加性）
    #[instrument(skip(self, category, leaves), fields(category = %category, leaves = leaves.len()))]
    pub fn build(
        &self,
        category: Category,
        leaves: &[LeafRecord],
    ) -> Result<AggregateTree, AggregationError> {
        let mut tree = AggregateTree {
            category,
            fine: BTreeMap::new(),
            mid: BTreeMap::new(),
            coarse: BTreeMap::new(),
            national: AggregateNode::new(NATIONAL_CODE, NATIONAL_LABEL, Level::National),
            trend_years: Vec::new(),
        };

        // 全部成员都没有粗码名称时，退回首个非空细码名称
        let mut fallback_labels: BTreeMap<String, String> = BTreeMap::new();

        for leaf in leaves {
            let mid_code = self.keys.mid_key(&leaf.code)?.to_string();
            let coarse_code = self.keys.coarse_for(leaf)?;

            let fine = tree
                .fine
                .entry(leaf.code.clone())
                .or_insert_with(|| AggregateNode::new(leaf.code.as_str(), "", Level::Fine));
            fine.mid_code = Some(mid_code.clone());
            fine.coarse_code = Some(coarse_code.clone());
            absorb(fine, leaf, &leaf.label);

            let mid = tree
                .mid
                .entry(mid_code.clone())
                .or_insert_with(|| AggregateNode::new(mid_code.as_str(), "", Level::Mid));
            mid.coarse_code = Some(coarse_code.clone());
            mid.children.insert(leaf.code.clone());
            absorb(mid, leaf, &leaf.label);

            if !leaf.label.is_empty() {
                fallback_labels
                    .entry(coarse_code.clone())
                    .or_insert_with(|| leaf.label.clone());
            }
            let coarse = tree
                .coarse
                .entry(coarse_code.clone())
                .or_insert_with(|| AggregateNode::new(coarse_code.as_str(), "", Level::Coarse));
            coarse.children.insert(mid_code);
            absorb(coarse, leaf, &leaf.coarse_label);

            tree.national.children.insert(coarse_code);
            tree.national.counts += &leaf.counts;
            add_causes(&mut tree.national, leaf);
        }

        for (code, label) in fallback_labels {
            if let Some(coarse) = tree.coarse.get_mut(&code).filter(|n| n.label.is_empty()) {
                coarse.label = label;
            }
        }

        for level in Level::CODED {
            if let Some(nodes) = tree.level_mut(level) {
                nodes.values_mut().for_each(|node| finalize(category, node));
            }
        }
        finalize(category, &mut tree.national);

        verify_additivity(&tree)?;
        debug!(
            fine = tree.fine.len(),
            mid = tree.mid.len(),
            coarse = tree.coarse.len(),
            "聚合树构建完成"
        );
        Ok(tree)
    }
}

fn absorb(node: &mut AggregateNode, leaf: &LeafRecord, label: &str) {
    node.counts += &leaf.counts;
    add_causes(node, leaf);
    if node.label.is_empty() && !label.is_empty() {
        node.label = label.to_string();
    }
}

fn add_causes(node: &mut AggregateNode, leaf: &LeafRecord) {
    for (cause, count) in &leaf.causes {
        *node.causes_raw.entry(cause.clone()).or_insert(0) += count;
    }
}

fn finalize(category: Category, node: &mut AggregateNode) {
    node.rates = derive_rates(category, &node.counts);
    node.cause_shares = cause_shares(&node.causes_raw, node.counts.event_count(category));
}

// ==========================================
// 可加性校验
// ==========================================

/// 相邻两级之间，子节点各可加字段之和必须等于父节点
pub fn verify_additivity(tree: &AggregateTree) -> Result<(), AggregationError> {
    for mid in tree.mid.values() {
        check_children(mid, mid.children.iter().filter_map(|c| tree.fine.get(c)))?;
    }
    for coarse in tree.coarse.values() {
        check_children(coarse, coarse.children.iter().filter_map(|c| tree.mid.get(c)))?;
    }
    check_children(
        &tree.national,
        tree.national.children.iter().filter_map(|c| tree.coarse.get(c)),
    )
}

fn check_children<'a>(
    parent: &AggregateNode,
    children: impl Iterator<Item = &'a AggregateNode>,
) -> Result<(), AggregationError> {
    let sum: RawCounts = children.map(|child| &child.counts).sum();
    let expected = parent.counts.values();
    let actual = sum.values();

    match RawCounts::FIELD_NAMES
        .iter()
        .zip(expected.iter().zip(actual.iter()))
        .find(|(_, (parent_value, children_sum))| parent_value != children_sum)
    {
        Some((field, (parent_value, children_sum))) => Err(AggregationError::AdditivityViolation {
            level: parent.level,
            code: parent.code.clone(),
            field: *field,
            parent_value: *parent_value,
            children_sum: *children_sum,
        }),
        None => Ok(()),
    }
}
