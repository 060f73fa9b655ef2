// ==========================================
// NAF 事故统计系统 - 领域模型层
// ==========================================
// 职责: 定义叶子记录、文档记录、聚合树及基础类型
// 红线: 不含解析逻辑,不含聚合逻辑
// ==========================================

pub mod aggregate;
pub mod document;
pub mod record;
pub mod types;
pub mod yearly;

// 重导出核心类型
pub use aggregate::{
    AggregateNode, AggregateTree, CommutingCount, DerivedRates, IndexEntry, YearlyStats,
    NATIONAL_CODE,
};
pub use document::{
    Demographics, DocumentFailure, DocumentFailureReason, DocumentOutcome, DocumentRecord,
    ExtractedDocument, ExtractedPage, InjuryDetails, SynthesisEntry,
};
pub use record::{LeafRecord, RawCounts};
pub use types::{Category, Level, RowKind, ToleranceLevel, TREND_YEARS, YEAR_SLOTS};
pub use yearly::{YearSlot, YearlyRecord};
