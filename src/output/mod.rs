// ==========================================
// NAF 事故统计系统 - 输出层
// ==========================================
// 职责: 聚合树 → 持久化交换格式（JSON）
// ==========================================

pub mod document;
pub mod writer;

pub use document::{AggregateDocument, DocumentMeta, GENERATOR_VERSION};
pub use writer::{write_document, OutputError};
