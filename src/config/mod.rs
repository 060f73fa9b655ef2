// ==========================================
// NAF 事故统计系统 - 配置层
// ==========================================
// 职责: 运行配置加载 + 源表固定列位
// 红线: 全部只读，运行期不可变
// ==========================================

pub mod column_maps;
pub mod pipeline_config;

pub use column_maps::{AT_COLUMNS, MP_COLUMNS};
pub use pipeline_config::{ConfigError, PipelineConfig, SourceInfo, SourcesConfig, CONFIG_ENV_VAR};
