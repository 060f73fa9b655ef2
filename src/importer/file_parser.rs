// ==========================================
// NAF 事故统计系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 按列位访问的原始行（表头行及之前的行跳过）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// RawRow - 原始行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 工作表中的行号（1 基）
    pub row_number: usize,
    pub cells: Vec<String>,
}

impl RawRow {
    /// 取列值；越界视为空
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(|s| s.as_str()).unwrap_or("")
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - header_row: 表头行号（1 基），该行及之前各行不输出
    fn parse_rows(&self, file_path: &Path, header_row: usize) -> ImportResult<Vec<RawRow>>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_rows(&self, file_path: &Path, header_row: usize) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let row = RawRow {
                row_number: idx + 1,
                cells: record.iter().map(|v| v.trim().to_string()).collect(),
            };
            if row.row_number <= header_row || row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_rows(&self, file_path: &Path, header_row: usize) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::MissingWorksheet(file_path.display().to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // 区域可能不从 A1 开始，行号/列位需换算为绝对位置
        let (start_row, start_col) = range.start().unwrap_or((0, 0));

        let mut rows = Vec::new();
        for (offset, data_row) in range.rows().enumerate() {
            let row_number = start_row as usize + offset + 1;
            if row_number <= header_row {
                continue;
            }

            let mut cells = vec![String::new(); start_col as usize];
            cells.extend(data_row.iter().map(|cell| cell.to_string().trim().to_string()));
            let row = RawRow { row_number, cells };

            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_rows(&self, file_path: &Path, header_row: usize) -> ImportResult<Vec<RawRow>> {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_rows(file_path, header_row),
            "xlsx" | "xls" | "xlsm" => ExcelParser.parse_rows(file_path, header_row),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
