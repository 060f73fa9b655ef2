// ==========================================
// NAF 事故统计系统 - 源表导入器
// ==========================================
// 流程: 解析 → 映射（AT）/ 合并（MP）→ 叶子记录
// ==========================================

use crate::domain::record::LeafRecord;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{AtRowMapper, FieldMapper};
use crate::importer::file_parser::{FileParser, UniversalFileParser};
use crate::importer::mp_consolidation::MpConsolidator;
use std::path::Path;
use tracing::{debug, info, instrument};

pub struct WorkbookImporter {
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    header_row: usize,
}

impl WorkbookImporter {
    pub fn new(header_row: usize) -> Self {
        Self::with_components(
            Box::new(UniversalFileParser),
            Box::new(AtRowMapper::default()),
            header_row,
        )
    }

    pub fn with_components(
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
        header_row: usize,
    ) -> Self {
        Self {
            file_parser,
            field_mapper,
            header_row,
        }
    }

    /// 导入 AT 表：一行一条叶子记录
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_accidents(&self, path: impl AsRef<Path>) -> ImportResult<Vec<LeafRecord>> {
        let rows = self.file_parser.parse_rows(path.as_ref(), self.header_row)?;
        let total_rows = rows.len();

        let records: Vec<LeafRecord> = rows
            .iter()
            .filter_map(|row| {
                let record = self.field_mapper.map_row(row);
                if record.is_none() {
                    debug!(row_number = row.row_number, "细码为空，跳过");
                }
                record
            })
            .collect();

        info!(
            total_rows = total_rows,
            records = records.len(),
            skipped = total_rows - records.len(),
            "AT 表导入完成"
        );
        Ok(records)
    }

    /// 导入 MP 表：按细码合并
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_diseases(&self, path: impl AsRef<Path>) -> ImportResult<Vec<LeafRecord>> {
        let rows = self.file_parser.parse_rows(path.as_ref(), self.header_row)?;
        let total_rows = rows.len();

        let mut consolidator = MpConsolidator::new();
        let accepted = rows.iter().filter(|row| consolidator.push(row)).count();
        let records = consolidator.finish();

        info!(
            total_rows = total_rows,
            accepted_rows = accepted,
            codes = records.len(),
            "MP 表导入完成"
        );
        Ok(records)
    }
}
