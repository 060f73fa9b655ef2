// ==========================================
// NAF 事故统计系统 - 文本抽取层
// ==========================================
// 职责: 从线性化的页面文本中恢复整数列
// 分层: disambiguator → tolerance → section
// 红线: 不读文件，不做聚合
// ==========================================

pub mod disambiguator;
pub mod patterns;
pub mod section;
pub mod text;
pub mod tolerance;

pub use disambiguator::{disambiguate, Disambiguated};
pub use section::{
    extract_breakdown, extract_present, extract_section_breakdown, extract_synthesis,
    extract_yearly, isolate_section,
};
pub use tolerance::{parse_table_row, parse_yearly_row, run_ladder, RowParse, ROW_CEILINGS};
