// ==========================================
// NAF 事故统计系统 - 容差阶梯行解析器
// ==========================================
// 依次尝试 严格 → 中等 → 宽松 三档列上限，
// 取第一个恰好得到所需列数的结果；全部失败时退回严格档结果并标记降级
// ==========================================

use crate::domain::types::{Category, RowKind, ToleranceLevel, YEAR_SLOTS};
use crate::extract::disambiguator::{disambiguate, Disambiguated};
use tracing::debug;

type Profile = [u64; YEAR_SLOTS];

const STRICT: Profile = [999; YEAR_SLOTS];
const STRICT_DEATHS: Profile = [99; YEAR_SLOTS];

// ===== 工伤事故 (AT) =====
const AT_MID_COUNT: Profile = [50_000; YEAR_SLOTS];
const AT_MID_IP: Profile = [9_999; YEAR_SLOTS];
const AT_MID_DAYS: Profile = [9_999; YEAR_SLOTS];
const AT_MID_WORKFORCE: Profile = [9_999; YEAR_SLOTS];
const AT_RELAXED_COUNT: Profile = [200_000; YEAR_SLOTS];
const AT_RELAXED_IP: Profile = [20_000; YEAR_SLOTS];
const AT_RELAXED_DEATHS: Profile = [500; YEAR_SLOTS];
const AT_RELAXED_DAYS: Profile = [50_000_000; YEAR_SLOTS];
const AT_RELAXED_WORKFORCE: Profile = [999_999; YEAR_SLOTS];

// ===== 通勤事故 (trajet) =====
const TRAJET_MID_COUNT: Profile = [9_999; YEAR_SLOTS];
const TRAJET_MID_IP: Profile = [999; YEAR_SLOTS];
const TRAJET_MID_DAYS: Profile = [9_999; YEAR_SLOTS];
const TRAJET_RELAXED_COUNT: Profile = [15_000; YEAR_SLOTS];
const TRAJET_RELAXED_IP: Profile = [5_000; YEAR_SLOTS];
const TRAJET_RELAXED_DEATHS: Profile = [100; YEAR_SLOTS];
const TRAJET_RELAXED_DAYS: Profile = [999_999; YEAR_SLOTS];

// ===== 职业病 (MP) =====
const MP_MID_COUNT: Profile = [9_999; YEAR_SLOTS];
const MP_MID_IP: Profile = [9_999; YEAR_SLOTS];
const MP_MID_DAYS: Profile = [9_999; YEAR_SLOTS];
const MP_RELAXED_COUNT: Profile = [50_000; YEAR_SLOTS];
const MP_RELAXED_IP: Profile = [20_000; YEAR_SLOTS];
const MP_RELAXED_DEATHS: Profile = [100; YEAR_SLOTS];
const MP_RELAXED_DAYS: Profile = [10_000_000; YEAR_SLOTS];

/// 数据行（细码统计行）的单档上限: 计数 / IP / 死亡 / 损失工作日
pub const ROW_CEILINGS: [u64; 4] = [200_000, 20_000, 500, 50_000_000];

/// 取 (险种, 行类型, 档位) 对应的列上限
///
/// 雇员行只存在于 AT 年度表，其余组合返回 None
pub fn profile(category: Category, kind: RowKind, level: ToleranceLevel) -> Option<&'static Profile> {
    use Category::*;
    use RowKind::*;
    use ToleranceLevel::*;

    let table: &'static Profile = match (category, kind, level) {
        (Commuting | OccupationalDisease, Workforce, _) => return None,
        (_, Deaths, Strict) => &STRICT_DEATHS,
        (_, _, Strict) => &STRICT,
        (_, Deaths, ToleranceLevel::Mid) => &STRICT_DEATHS,

        (OccupationalAccident, Count, ToleranceLevel::Mid) => &AT_MID_COUNT,
        (OccupationalAccident, NewDisabilities, ToleranceLevel::Mid) => &AT_MID_IP,
        (OccupationalAccident, LostDays, ToleranceLevel::Mid) => &AT_MID_DAYS,
        (OccupationalAccident, Workforce, ToleranceLevel::Mid) => &AT_MID_WORKFORCE,
        (OccupationalAccident, Count, Relaxed) => &AT_RELAXED_COUNT,
        (OccupationalAccident, NewDisabilities, Relaxed) => &AT_RELAXED_IP,
        (OccupationalAccident, Deaths, Relaxed) => &AT_RELAXED_DEATHS,
        (OccupationalAccident, LostDays, Relaxed) => &AT_RELAXED_DAYS,
        (OccupationalAccident, Workforce, Relaxed) => &AT_RELAXED_WORKFORCE,

        (Commuting, Count, ToleranceLevel::Mid) => &TRAJET_MID_COUNT,
        (Commuting, NewDisabilities, ToleranceLevel::Mid) => &TRAJET_MID_IP,
        (Commuting, LostDays, ToleranceLevel::Mid) => &TRAJET_MID_DAYS,
        (Commuting, Count, Relaxed) => &TRAJET_RELAXED_COUNT,
        (Commuting, NewDisabilities, Relaxed) => &TRAJET_RELAXED_IP,
        (Commuting, Deaths, Relaxed) => &TRAJET_RELAXED_DEATHS,
        (Commuting, LostDays, Relaxed) => &TRAJET_RELAXED_DAYS,

        (OccupationalDisease, Count, ToleranceLevel::Mid) => &MP_MID_COUNT,
        (OccupationalDisease, NewDisabilities, ToleranceLevel::Mid) => &MP_MID_IP,
        (OccupationalDisease, LostDays, ToleranceLevel::Mid) => &MP_MID_DAYS,
        (OccupationalDisease, Count, Relaxed) => &MP_RELAXED_COUNT,
        (OccupationalDisease, NewDisabilities, Relaxed) => &MP_RELAXED_IP,
        (OccupationalDisease, Deaths, Relaxed) => &MP_RELAXED_DEATHS,
        (OccupationalDisease, LostDays, Relaxed) => &MP_RELAXED_DAYS,
    };
    Some(table)
}

// ==========================================
// RowParse - 单行解析结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowParse {
    pub values: Vec<u64>,
    /// 实际采用的档位（降级时为严格档）
    pub level: ToleranceLevel,
    /// 三档均未得到所需列数
    pub degraded: bool,
}

impl RowParse {
    pub fn is_complete(&self, required: usize) -> bool {
        !self.degraded && self.values.len() == required
    }
}

/// 通用阶梯: 由调用方提供每档的解析函数
///
/// 第一档成功即返回，后续档位不再调用
pub fn run_ladder<F>(required: usize, mut attempt: F) -> RowParse
where
    F: FnMut(ToleranceLevel) -> Option<Disambiguated>,
{
    let mut strict_result: Option<Disambiguated> = None;

    for level in ToleranceLevel::LADDER {
        let Some(result) = attempt(level) else {
            continue;
        };
        if !result.overflowed && result.values.len() == required {
            return RowParse {
                values: result.values,
                level,
                degraded: false,
            };
        }
        if level == ToleranceLevel::Strict {
            strict_result = Some(result);
        }
    }

    debug!(required = required, "容差阶梯未命中，退回严格档结果");
    RowParse {
        values: strict_result.map(|r| r.values).unwrap_or_default(),
        level: ToleranceLevel::Strict,
        degraded: true,
    }
}

/// 年度表行解析（五列）
pub fn parse_yearly_row<S: AsRef<str>>(
    groups: &[S],
    category: Category,
    kind: RowKind,
) -> RowParse {
    run_ladder(YEAR_SLOTS, |level| {
        profile(category, kind, level).map(|ceilings| disambiguate(groups, ceilings))
    })
}

/// 数据行解析（单档上限，无阶梯）
pub fn parse_table_row<S: AsRef<str>>(groups: &[S]) -> Disambiguated {
    disambiguate(groups, &ROW_CEILINGS)
}
