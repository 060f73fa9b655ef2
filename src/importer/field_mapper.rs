// ==========================================
// NAF 事故统计系统 - 字段映射器实现
// ==========================================
// 职责: 按固定列位把 AT 原始行映射为叶子记录
// 红线: 细码为空的行跳过；数值列容错为 0
// ==========================================

use crate::config::column_maps::{AtColumns, AT_COLUMNS, AT_RISK_CAUSES};
use crate::domain::record::{LeafRecord, RawCounts};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::file_parser::RawRow;

pub const FINE_CODE_WIDTH: usize = 5;
pub const COARSE_CODE_WIDTH: usize = 2;

// ==========================================
// FieldMapper Trait
// ==========================================
pub trait FieldMapper: Send + Sync {
    /// 将原始行映射为叶子记录；无细码的行返回 None
    fn map_row(&self, row: &RawRow) -> Option<LeafRecord>;
}

// ==========================================
// AtRowMapper - 工伤事故表
// ==========================================
pub struct AtRowMapper {
    columns: AtColumns,
    cleaner: DataCleaner,
}

impl Default for AtRowMapper {
    fn default() -> Self {
        Self {
            columns: AT_COLUMNS,
            cleaner: DataCleaner,
        }
    }
}

impl FieldMapper for AtRowMapper {
    fn map_row(&self, row: &RawRow) -> Option<LeafRecord> {
        let c = &self.columns;
        let code = self.cleaner.code(row.cell(c.fine_code), FINE_CODE_WIDTH)?;
        let count = |idx: usize| self.cleaner.safe_count(row.cell(idx));

        let counts = RawCounts {
            workforce: count(c.workforce),
            hours: count(c.hours),
            establishments: count(c.establishments),
            first_settlements: count(c.first_settlements),
            lost_time_events: count(c.lost_time_events),
            new_disabilities: count(c.new_disabilities),
            deaths: count(c.deaths),
            lost_days: count(c.lost_days),
            ..Default::default()
        };

        let record = LeafRecord::new(code, self.cleaner.clean_text(row.cell(c.fine_label)))
            .with_counts(counts)
            .with_coarse(
                self.cleaner.code(row.cell(c.coarse_code), COARSE_CODE_WIDTH),
                self.cleaner.clean_text(row.cell(c.coarse_label)),
            );

        // 十二类风险成因全部保留（含 0），保证份额表结构一致
        let record = AT_RISK_CAUSES
            .iter()
            .fold(record, |record, (idx, cause)| record.with_cause(*cause, count(*idx)));

        Some(record)
    }
}
