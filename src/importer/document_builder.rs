// ==========================================
// NAF 事故统计系统 - 单文档记录构建
// ==========================================
// 版式（固定）:
// - 第 1 页: 概要计数 + 三张五年趋势表
// - 第 2 页: 表格 2 行 1 → 列 0 性别/年龄/受伤部位，列 6 身体活动/伤害方式
// - 第 3 页（可选）: 表格 1 行 1 列 0 → 职业病性别/年龄
// 红线: 只有页数不足/首页为空才算失败；缺小节只留空
// ==========================================

use crate::domain::document::{
    Demographics, DocumentFailure, DocumentFailureReason, DocumentOutcome, DocumentRecord,
    ExtractedDocument, ExtractedPage, InjuryDetails,
};
use crate::domain::types::Category;
use crate::extract::patterns::{
    ACTIVITY_ROWS, ACTIVITY_SECTION, AGE_ROWS, MODALITY_ROWS, MODALITY_SECTION, SEX_ROWS,
    SITE_ROWS,
};
use crate::extract::{extract_breakdown, extract_present, extract_section_breakdown};
use crate::extract::{extract_synthesis, extract_yearly};
use tracing::debug;

/// 概要页 + 细分页
pub const MIN_PAGES: usize = 2;

/// 单元格位置 (表格, 行, 列)
type CellRef = (usize, usize, usize);

const ACCIDENT_DEMOGRAPHICS_CELL: CellRef = (2, 1, 0);
const ACCIDENT_DETAILS_CELL: CellRef = (2, 1, 6);
const DISEASE_DEMOGRAPHICS_CELL: CellRef = (1, 1, 0);

fn cell_text(page: &ExtractedPage, (table, row, col): CellRef) -> Option<&str> {
    page.cell(table, row, col)
}

// ==========================================
// DocumentRecordBuilder
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentRecordBuilder;

impl DocumentRecordBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 解析一份文档；纯函数，可在任意线程并发调用
    pub fn build(&self, document: &ExtractedDocument) -> DocumentOutcome {
        let code = document.code.clone();

        if document.pages.len() < MIN_PAGES {
            return DocumentOutcome::Failed(DocumentFailure {
                code,
                reason: DocumentFailureReason::UnexpectedPageCount {
                    found: document.pages.len(),
                    expected_min: MIN_PAGES,
                },
            });
        }

        let summary_page = &document.pages[0];
        if summary_page.text.trim().is_empty() {
            return DocumentOutcome::Failed(DocumentFailure {
                code,
                reason: DocumentFailureReason::Malformed {
                    message: "概要页无文本".to_string(),
                },
            });
        }

        let mut record = DocumentRecord::new(code);

        // ===== 第 1 页: 概要 + 趋势 =====
        record.synthesis = extract_synthesis(&summary_page.text);
        let trend_text = summary_page.trend_text();
        record.accident_yearly = extract_yearly(trend_text, Category::OccupationalAccident);
        record.commuting_yearly = extract_yearly(trend_text, Category::Commuting);
        record.disease_yearly = extract_yearly(trend_text, Category::OccupationalDisease);

        // ===== 第 2 页: AT 细分 =====
        let detail_page = &document.pages[1];
        let mut injury = InjuryDetails::default();
        if let Some(cell) = cell_text(detail_page, ACCIDENT_DEMOGRAPHICS_CELL) {
            let sex = extract_present(cell, &SEX_ROWS);
            if !sex.is_empty() {
                record.accident_demographics = Some(Demographics {
                    sex,
                    age: extract_breakdown(cell, &AGE_ROWS),
                });
            }
            injury.site = Some(extract_breakdown(cell, &SITE_ROWS));
        }
        if let Some(cell) = cell_text(detail_page, ACCIDENT_DETAILS_CELL) {
            injury.activity = extract_section_breakdown(cell, &ACTIVITY_SECTION, &ACTIVITY_ROWS);
            injury.modality = extract_section_breakdown(cell, &MODALITY_SECTION, &MODALITY_ROWS);
        }
        if !injury.is_empty() {
            record.injury_details = Some(injury);
        }

        // ===== 第 3 页: MP 人口统计（可选）=====
        if let Some(cell) = document
            .pages
            .get(2)
            .and_then(|page| cell_text(page, DISEASE_DEMOGRAPHICS_CELL))
        {
            let sex = extract_present(cell, &SEX_ROWS);
            if !sex.is_empty() {
                record.disease_demographics = Some(Demographics {
                    sex,
                    age: extract_breakdown(cell, &AGE_ROWS),
                });
            }
        }

        debug!(
            code = %record.code,
            at_yearly = record.accident_yearly.is_some(),
            trajet_yearly = record.commuting_yearly.is_some(),
            mp_yearly = record.disease_yearly.is_some(),
            demographics = record.accident_demographics.is_some(),
            "文档解析完成"
        );
        DocumentOutcome::Parsed(Box::new(record))
    }
}
