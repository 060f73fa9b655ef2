// ==========================================
// NAF 事故统计系统 - 文档领域模型
// ==========================================
// 输入: 文本提取协作方给出的页面文本 + 表格单元格
// 输出: 每份文档一条结构化记录，或一个具名失败
// ==========================================

use crate::domain::types::Category;
use crate::domain::yearly::YearlyRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// ExtractedDocument - 文本提取结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    #[serde(default)]
    pub code: String,
    pub pages: Vec<ExtractedPage>,
}

/// 单页: 整页文本、可选的裁剪区域文本、表格网格 `[table][row][col]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPage {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub cropped_text: Option<String>,
    #[serde(default)]
    pub tables: Vec<Vec<Vec<Option<String>>>>,
}

impl ExtractedPage {
    /// 取单元格文本；越界或空单元格返回 None
    pub fn cell(&self, table: usize, row: usize, col: usize) -> Option<&str> {
        self.tables
            .get(table)?
            .get(row)?
            .get(col)?
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    /// 年度表所在区域文本（优先裁剪文本，避免与图形重叠）
    pub fn trend_text(&self) -> &str {
        self.cropped_text.as_deref().unwrap_or(&self.text)
    }
}

// ==========================================
// 结构化记录
// ==========================================

/// 概要页计数 + 同比百分比（来源缺失百分比时为 None）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthesisEntry {
    pub count: u64,
    pub evolution_pct: Option<f64>,
}

/// 性别 + 年龄段分布
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    pub sex: BTreeMap<String, u64>,
    pub age: BTreeMap<String, u64>,
}

impl Demographics {
    pub fn absorb(&mut self, other: &Demographics) {
        add_counts(&mut self.sex, &other.sex);
        add_counts(&mut self.age, &other.age);
    }
}

/// 伤害细分: 受伤部位 / 具体身体活动 / 伤害方式
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjuryDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<BTreeMap<String, u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<BTreeMap<String, u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modality: Option<BTreeMap<String, u64>>,
}

impl InjuryDetails {
    pub fn is_empty(&self) -> bool {
        self.site.is_none() && self.activity.is_none() && self.modality.is_none()
    }

    pub fn absorb(&mut self, other: &InjuryDetails) {
        absorb_optional(&mut self.site, &other.site);
        absorb_optional(&mut self.activity, &other.activity);
        absorb_optional(&mut self.modality, &other.modality);
    }
}

/// 一份文档的全部解析结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub code: String,
    pub synthesis: BTreeMap<Category, SynthesisEntry>,
    pub accident_yearly: Option<YearlyRecord>,
    pub commuting_yearly: Option<YearlyRecord>,
    pub disease_yearly: Option<YearlyRecord>,
    pub accident_demographics: Option<Demographics>,
    pub disease_demographics: Option<Demographics>,
    pub injury_details: Option<InjuryDetails>,
}

impl DocumentRecord {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    pub fn yearly(&self, category: Category) -> Option<&YearlyRecord> {
        match category {
            Category::OccupationalAccident => self.accident_yearly.as_ref(),
            Category::OccupationalDisease => self.disease_yearly.as_ref(),
            Category::Commuting => self.commuting_yearly.as_ref(),
        }
    }
}

// ==========================================
// 失败 / 结果
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentFailureReason {
    Unreadable { message: String },             // 无法打开/读取
    UnexpectedPageCount { found: usize, expected_min: usize }, // 页数不足
    Malformed { message: String },              // 内容不可用
}

impl fmt::Display for DocumentFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFailureReason::Unreadable { message } => write!(f, "文档不可读: {}", message),
            DocumentFailureReason::UnexpectedPageCount {
                found,
                expected_min,
            } => write!(f, "页数异常: 实际 {}，至少需要 {}", found, expected_min),
            DocumentFailureReason::Malformed { message } => write!(f, "文档内容异常: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub code: String,
    pub reason: DocumentFailureReason,
}

/// 文档边界的结果类型：成功记录或具名失败
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    Parsed(Box<DocumentRecord>),
    Failed(DocumentFailure),
}

impl DocumentOutcome {
    pub fn code(&self) -> &str {
        match self {
            DocumentOutcome::Parsed(record) => &record.code,
            DocumentOutcome::Failed(failure) => &failure.code,
        }
    }
}

fn add_counts(target: &mut BTreeMap<String, u64>, source: &BTreeMap<String, u64>) {
    for (key, value) in source {
        *target.entry(key.clone()).or_insert(0) += value;
    }
}

fn absorb_optional(
    target: &mut Option<BTreeMap<String, u64>>,
    source: &Option<BTreeMap<String, u64>>,
) {
    if let Some(source) = source {
        add_counts(target.get_or_insert_with(BTreeMap::new), source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_lookup_out_of_bounds() {
        let page = ExtractedPage {
            tables: vec![vec![vec![Some("a".to_string()), None]]],
            ..Default::default()
        };
        assert_eq!(page.cell(0, 0, 0), Some("a"));
        assert_eq!(page.cell(0, 0, 1), None);
        assert_eq!(page.cell(1, 0, 0), None);
        assert_eq!(page.cell(0, 3, 0), None);
    }

    #[test]
    fn test_injury_details_absorb_keeps_absence() {
        let mut total = InjuryDetails::default();
        let other = InjuryDetails {
            site: Some(BTreeMap::from([("dos".to_string(), 4)])),
            ..Default::default()
        };
        total.absorb(&other);
        total.absorb(&other);
        assert_eq!(total.site.as_ref().unwrap()["dos"], 8);
        assert!(total.activity.is_none());
    }

    #[test]
    fn test_trend_text_prefers_cropped() {
        let page = ExtractedPage {
            text: "full".to_string(),
            cropped_text: Some("crop".to_string()),
            tables: vec![],
        };
        assert_eq!(page.trend_text(), "crop");
    }
}
