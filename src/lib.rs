// ==========================================
// NAF 事故统计系统 - 核心库
// ==========================================
// 输入: AT / MP 源表（按 CTN × NAF5 拆行）+ 每个 NAF5 的 PDF 概况（文本转储）
// 输出: 每个险种一棵 NAF5 → NAF4 → NAF2 → 全国 聚合树
// 系统定位: 批处理，每次全量重算
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与聚合树
pub mod domain;

// 抽取层 - 数字流消歧 / 容差阶梯 / 小节抽取
pub mod extract;

// 导入层 - 源表与文档
pub mod importer;

// 引擎层 - 聚合 / 叠加 / 趋势 / 编排
pub mod engine;

// 配置层 - 运行配置与列位
pub mod config;

// 输出层 - JSON 交换格式
pub mod output;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AggregateNode, AggregateTree, Category, DocumentOutcome, DocumentRecord, LeafRecord, Level,
    RawCounts, YearlyRecord,
};

// 抽取
pub use extract::{disambiguate, run_ladder, Disambiguated, RowParse};

// 引擎
pub use engine::{
    AggregationError, CrossSourceMerge, HierarchicalAggregator, HierarchyKeys, PipelineError,
    RefreshOrchestrator, RefreshOutput,
};

// 导入
pub use importer::{DocumentBatch, DocumentRecordBuilder, ImportError, WorkbookImporter};

// 配置
pub use config::PipelineConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "NAF 事故统计系统";
