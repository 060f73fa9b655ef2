// ==========================================
// NAF 事故统计系统 - 导入层
// ==========================================
// 职责: 外部数据导入，生成叶子记录 / 文档记录
// 支持: Excel, CSV（源表）；JSON 转储（文档文本）
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod document_batch;
pub mod document_builder;
pub mod document_source;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod mp_consolidation;
pub mod workbook_importer;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use document_batch::{BatchReport, DocumentBatch};
pub use document_builder::DocumentRecordBuilder;
pub use document_source::{DocumentSource, JsonDumpSource, MemoryDocumentSource};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{AtRowMapper, FieldMapper};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser};
pub use mp_consolidation::MpConsolidator;
pub use workbook_importer::WorkbookImporter;
