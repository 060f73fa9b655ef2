// ==========================================
// NAF 事故统计系统 - 领域类型定义
// ==========================================
// 职责: 险种 / 层级 / 趋势年度 / 行类型 / 容差档位
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 险种 (Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    OccupationalAccident, // AT 工伤事故
    OccupationalDisease,  // MP 职业病
    Commuting,            // 通勤事故 (trajet)
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::OccupationalAccident,
        Category::Commuting,
        Category::OccupationalDisease,
    ];

    /// 输出文件/日志中使用的短代码
    pub fn short_code(&self) -> &'static str {
        match self {
            Category::OccupationalAccident => "at",
            Category::OccupationalDisease => "mp",
            Category::Commuting => "trajet",
        }
    }

    /// 是否输出严重率（通勤事故无工时口径）
    pub fn has_severity_rate(&self) -> bool {
        !matches!(self, Category::Commuting)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::OccupationalAccident => write!(f, "AT"),
            Category::OccupationalDisease => write!(f, "MP"),
            Category::Commuting => write!(f, "TRAJET"),
        }
    }
}

// ==========================================
// 层级 (Level)
// ==========================================
// 细码(NAF5) → 中码(NAF4) → 粗码(NAF2) → 全国
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "naf5")]
    Fine,
    #[serde(rename = "naf4")]
    Mid,
    #[serde(rename = "naf2")]
    Coarse,
    #[serde(rename = "national")]
    National,
}

impl Level {
    pub const CODED: [Level; 3] = [Level::Fine, Level::Mid, Level::Coarse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Fine => "naf5",
            Level::Mid => "naf4",
            Level::Coarse => "naf2",
            Level::National => "national",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 趋势年度
// ==========================================
// 版式固定: 年度表恰好 5 列
pub const YEAR_SLOTS: usize = 5;
pub const TREND_YEARS: [u16; YEAR_SLOTS] = [2019, 2020, 2021, 2022, 2023];

// ==========================================
// 年度表行类型 (Row Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Count,           // 首次赔付数
    NewDisabilities, // 新增永久伤残 (IP)
    Deaths,          // 死亡
    LostDays,        // 损失工作日
    Workforce,       // 雇员数（仅 AT 表）
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKind::Count => write!(f, "count"),
            RowKind::NewDisabilities => write!(f, "ip"),
            RowKind::Deaths => write!(f, "deces"),
            RowKind::LostDays => write!(f, "journees"),
            RowKind::Workforce => write!(f, "salaries"),
        }
    }
}

// ==========================================
// 容差档位 (Tolerance Level)
// ==========================================
// 严格 → 中等 → 宽松，依次放宽列上限
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceLevel {
    Strict,
    Mid,
    Relaxed,
}

impl ToleranceLevel {
    pub const LADDER: [ToleranceLevel; 3] = [
        ToleranceLevel::Strict,
        ToleranceLevel::Mid,
        ToleranceLevel::Relaxed,
    ];
}

impl fmt::Display for ToleranceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToleranceLevel::Strict => write!(f, "strict"),
            ToleranceLevel::Mid => write!(f, "mid"),
            ToleranceLevel::Relaxed => write!(f, "relaxed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_serialization_uses_naf_names() {
        assert_eq!(serde_json::to_string(&Level::Fine).unwrap(), "\"naf5\"");
        assert_eq!(serde_json::to_string(&Level::Coarse).unwrap(), "\"naf2\"");
    }

    #[test]
    fn test_ladder_order() {
        assert!(ToleranceLevel::LADDER.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_commuting_has_no_severity() {
        assert!(!Category::Commuting.has_severity_rate());
        assert!(Category::OccupationalAccident.has_severity_rate());
    }
}
