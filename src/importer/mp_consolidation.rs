// ==========================================
// NAF 事故统计系统 - 职业病表合并
// ==========================================
// 源表按 (CTN × 细码 × 病种表 × 症候) 拆行:
// - 劳动力字段在同一 (CTN, 细码) 的各行重复 → 首行为准，再跨 CTN 求和
// - 病例字段逐行累加
// - 成因: 标记列优先，无标记时按病种表名前缀归类
// ==========================================

use crate::config::column_maps::{
    cause_for_table_title, MpColumns, MP_CAUSE_FLAGS, MP_COLUMNS, MP_FLAG_SET,
};
use crate::domain::record::{LeafRecord, RawCounts};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::field_mapper::{COARSE_CODE_WIDTH, FINE_CODE_WIDTH};
use crate::importer::file_parser::RawRow;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
struct Workforce {
    workforce: u64,
    hours: u64,
    establishments: u64,
}

#[derive(Debug, Default)]
struct DiseaseAccumulator {
    label: String,
    coarse_code: Option<String>,
    coarse_label: String,
    counts: RawCounts,
    causes: BTreeMap<String, u64>,
}

// ==========================================
// MpConsolidator
// ==========================================
pub struct MpConsolidator {
    columns: MpColumns,
    cleaner: DataCleaner,
    workforce: BTreeMap<(String, String), Workforce>,
    by_code: BTreeMap<String, DiseaseAccumulator>,
}

impl Default for MpConsolidator {
    fn default() -> Self {
        Self {
            columns: MP_COLUMNS,
            cleaner: DataCleaner,
            workforce: BTreeMap::new(),
            by_code: BTreeMap::new(),
        }
    }
}

impl MpConsolidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 吸收一行；无细码的行返回 false
    pub fn push(&mut self, row: &RawRow) -> bool {
        let c = self.columns;
        let Some(code) = self.cleaner.code(row.cell(c.fine_code), FINE_CODE_WIDTH) else {
            return false;
        };
        let count = |idx: usize| self.cleaner.safe_count(row.cell(idx));
        let committee = self.cleaner.clean_text(row.cell(c.committee));

        // 劳动力: 首次出现为准
        if let Entry::Vacant(slot) = self.workforce.entry((committee, code.clone())) {
            slot.insert(Workforce {
                workforce: count(c.workforce),
                hours: count(c.hours),
                establishments: count(c.establishments),
            });
        }

        let first_settlements = count(c.first_settlements);
        let row_counts = RawCounts {
            first_settlements,
            new_disabilities: count(c.new_disabilities),
            disabilities_below_10: count(c.disabilities_below_10),
            disabilities_above_10: count(c.disabilities_above_10),
            deaths: count(c.deaths),
            lost_days: count(c.lost_days),
            disability_rate_sum: count(c.disability_rate_sum),
            ..Default::default()
        };
        let causes = self.categorize(row, first_settlements);

        let acc = self.by_code.entry(code).or_default();
        acc.counts += &row_counts;
        for cause in causes {
            *acc.causes.entry(cause.to_string()).or_insert(0) += first_settlements;
        }
        if acc.label.is_empty() {
            acc.label = self.cleaner.clean_text(row.cell(c.fine_label));
        }
        if acc.coarse_code.is_none() {
            acc.coarse_code = self.cleaner.code(row.cell(c.coarse_code), COARSE_CODE_WIDTH);
        }
        if acc.coarse_label.is_empty() {
            acc.coarse_label = self.cleaner.clean_text(row.cell(c.coarse_label));
        }
        true
    }

    fn categorize(&self, row: &RawRow, first_settlements: u64) -> Vec<&'static str> {
        if first_settlements == 0 {
            return Vec::new();
        }
        let flagged: Vec<&'static str> = MP_CAUSE_FLAGS
            .iter()
            .filter(|(_, idx)| self.cleaner.is_flag_set(row.cell(*idx), MP_FLAG_SET))
            .map(|(cause, _)| *cause)
            .collect();
        if !flagged.is_empty() {
            return flagged;
        }
        let title = self.cleaner.clean_text(row.cell(self.columns.table_title));
        vec![cause_for_table_title(&title)]
    }

    /// 输出每个细码一条叶子记录（按细码排序）
    pub fn finish(self) -> Vec<LeafRecord> {
        let mut totals: BTreeMap<String, Workforce> = BTreeMap::new();
        for ((_, code), wf) in &self.workforce {
            let total = totals.entry(code.clone()).or_default();
            total.workforce += wf.workforce;
            total.hours += wf.hours;
            total.establishments += wf.establishments;
        }
        debug!(
            committee_pairs = self.workforce.len(),
            codes = self.by_code.len(),
            "MP 劳动力去重完成"
        );

        self.by_code
            .into_iter()
            .map(|(code, acc)| {
                let wf = totals.get(&code).copied().unwrap_or_default();
                let counts = RawCounts {
                    workforce: wf.workforce,
                    hours: wf.hours,
                    establishments: wf.establishments,
                    ..acc.counts
                };
                let mut record = LeafRecord::new(code, acc.label)
                    .with_counts(counts)
                    .with_coarse(acc.coarse_code, acc.coarse_label);
                record.causes = acc.causes;
                record
            })
            .collect()
    }
}
