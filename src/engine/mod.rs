// ==========================================
// NAF 事故统计系统 - 引擎层
// ==========================================
// 职责: 分层聚合、比率派生、跨源叠加、趋势、全量编排
// 红线: 不读源文件，不写输出（编排器除外）
// ==========================================

pub mod aggregator;
pub mod commuting;
pub mod merge;
pub mod orchestrator;
pub mod rates;
pub mod trend;

// 重导出核心引擎
pub use aggregator::{verify_additivity, AggregationError, HierarchicalAggregator, HierarchyKeys};
pub use commuting::CommutingTreeBuilder;
pub use merge::{Additive, CrossSourceMerge};
pub use orchestrator::{log_validation_summary, PipelineError, RefreshOrchestrator, RefreshOutput};
pub use rates::{cause_shares, derive_rates, frequency_index, severity_rate};
pub use trend::{TrendBuilder, TrendTable, YearLevels};
