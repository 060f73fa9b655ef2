// ==========================================
// NAF 事故统计系统 - 输出文档模型
// ==========================================
// 每个险种一份: meta + by_naf5 / by_naf4 / by_naf2 + naf_index
// ==========================================

use crate::config::SourceInfo;
use crate::domain::aggregate::{AggregateNode, AggregateTree, IndexEntry};
use crate::domain::types::Category;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub category: Category,
    pub source: String,
    pub source_url: String,
    pub generated_on: NaiveDate,
    pub generator_version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub years: Vec<u16>,
    pub national: AggregateNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateDocument {
    pub meta: DocumentMeta,
    pub by_naf5: BTreeMap<String, AggregateNode>,
    pub by_naf4: BTreeMap<String, AggregateNode>,
    pub by_naf2: BTreeMap<String, AggregateNode>,
    pub naf_index: Vec<IndexEntry>,
}

impl AggregateDocument {
    pub fn from_tree(tree: &AggregateTree, source: &SourceInfo, generated_on: NaiveDate) -> Self {
        Self {
            meta: DocumentMeta {
                category: tree.category,
                source: source.description.clone(),
                source_url: source.url.clone(),
                generated_on,
                generator_version: GENERATOR_VERSION.to_string(),
                years: tree.trend_years.clone(),
                national: tree.national.clone(),
            },
            naf_index: tree.index(),
            by_naf5: tree.fine.clone(),
            by_naf4: tree.mid.clone(),
            by_naf2: tree.coarse.clone(),
        }
    }
}
