// ==========================================
// NAF 事故统计系统 - 标签小节提取器
// ==========================================
// 流程: 按标题/终止标记截取小节 → 按行标签定位 → 截断字母尾巴 → 数字组 → 容差阶梯
// 红线: 缺行给默认值，缺标题给“未找到”，均不报错
// ==========================================

use crate::domain::document::SynthesisEntry;
use crate::domain::types::{Category, RowKind, YEAR_SLOTS};
use crate::domain::yearly::YearlyRecord;
use crate::extract::patterns::{
    yearly_layout, LabeledRow, SectionBounds, StopRule, YearlyLayout, DEATH_MARKER,
    LOST_DAYS_MARKER, NEW_DISABILITY_MARKER, RE_ALPHA_TAIL, RE_WORKFORCE_LABEL,
    SYNTHESIS_PATTERNS,
};
use crate::extract::text::{digit_groups, fold_upper, parse_decimal_comma, parse_grouped_number};
use crate::extract::tolerance::{parse_table_row, parse_yearly_row, RowParse};
use regex::Captures;
use std::collections::BTreeMap;
use tracing::debug;

// ==========================================
// 小节截取
// ==========================================

/// 返回标题行之后、第一条终止行之前的所有行
///
/// 标题从未出现时返回 None
pub fn isolate_section<'a>(text: &'a str, bounds: &SectionBounds) -> Option<Vec<&'a str>> {
    let header = fold_upper(bounds.header);
    let mut lines = text.lines();

    lines.by_ref().find(|line| {
        let folded = fold_upper(line);
        folded.contains(&header) && bounds.required_token.map_or(true, |t| folded.contains(t))
    })?;

    let section = lines
        .take_while(|line| !is_stop_line(line, bounds))
        .collect();
    Some(section)
}

fn is_stop_line(line: &str, bounds: &SectionBounds) -> bool {
    let folded = fold_upper(line.trim_start());
    bounds.stop_markers.iter().any(|marker| match bounds.stop_rule {
        StopRule::LineStart => folded.starts_with(marker),
        StopRule::Anywhere => folded.contains(marker),
    })
}

// ==========================================
// 年度表
// ==========================================

#[derive(Debug, Default)]
struct YearlyRows {
    count: Option<RowParse>,
    new_disabilities: Option<RowParse>,
    deaths: Option<RowParse>,
    lost_days: Option<RowParse>,
    workforce: Option<RowParse>,
}

impl YearlyRows {
    fn slot(&mut self, kind: RowKind) -> &mut Option<RowParse> {
        match kind {
            RowKind::Count => &mut self.count,
            RowKind::NewDisabilities => &mut self.new_disabilities,
            RowKind::Deaths => &mut self.deaths,
            RowKind::LostDays => &mut self.lost_days,
            RowKind::Workforce => &mut self.workforce,
        }
    }
}

/// 提取某一险种的五年趋势表
///
/// 任一必需行缺失或列数不足五列时整表丢弃（返回 None）
pub fn extract_yearly(text: &str, category: Category) -> Option<YearlyRecord> {
    let layout = yearly_layout(category);
    let lines = isolate_section(text, &layout.bounds())?;
    let mut rows = YearlyRows::default();

    for line in lines {
        if layout.has_workforce_row && !line.contains(':') {
            if let Some(label) = RE_WORKFORCE_LABEL.find(line) {
                let groups = digit_groups(&line[label.end()..]);
                if !groups.is_empty() {
                    rows.workforce = Some(parse_yearly_row(&groups, category, RowKind::Workforce));
                }
                continue;
            }
        }

        let Some((_, tail)) = line.split_once(':') else {
            continue;
        };
        let numeric = RE_ALPHA_TAIL
            .find(tail)
            .map_or(tail, |m| &tail[..m.start()]);
        let groups = digit_groups(numeric);
        if groups.is_empty() {
            continue;
        }

        if let Some(kind) = classify_yearly_line(&fold_upper(line), layout) {
            let parse = parse_yearly_row(&groups, category, kind);
            if parse.degraded {
                debug!(category = %category, row = %kind, values = ?parse.values, "年度行列数不符");
            }
            *rows.slot(kind) = Some(parse);
        }

        if rows.lost_days.as_ref().is_some_and(|r| !r.values.is_empty()) {
            break;
        }
    }

    YearlyRecord::from_columns(
        complete_row(&rows.count)?,
        complete_row(&rows.new_disabilities)?,
        complete_row(&rows.deaths)?,
        complete_row(&rows.lost_days)?,
        complete_row(&rows.workforce),
    )
}

fn classify_yearly_line(folded: &str, layout: &YearlyLayout) -> Option<RowKind> {
    if layout.count_markers.iter().any(|m| folded.contains(m)) {
        Some(RowKind::Count)
    } else if folded.contains(NEW_DISABILITY_MARKER) {
        Some(RowKind::NewDisabilities)
    } else if folded.contains(DEATH_MARKER) {
        Some(RowKind::Deaths)
    } else if folded.contains(LOST_DAYS_MARKER) {
        Some(RowKind::LostDays)
    } else {
        None
    }
}

fn complete_row(row: &Option<RowParse>) -> Option<&[u64]> {
    row.as_ref()
        .filter(|r| r.is_complete(YEAR_SLOTS))
        .map(|r| r.values.as_slice())
}

// ==========================================
// 概要页
// ==========================================

/// 概要计数 + 同比；无百分比时只取计数
pub fn extract_synthesis(text: &str) -> BTreeMap<Category, SynthesisEntry> {
    let mut result = BTreeMap::new();

    for pattern in SYNTHESIS_PATTERNS.iter() {
        let with_evolution = pattern.with_evolution.captures(text).and_then(|caps| {
            let count = parse_grouped_number(caps[1].trim())?;
            Some(SynthesisEntry {
                count,
                evolution_pct: parse_decimal_comma(&caps[2]),
            })
        });

        let entry = with_evolution.or_else(|| {
            let caps = pattern.count_only.captures(text)?;
            Some(SynthesisEntry {
                count: parse_grouped_number(caps[1].trim())?,
                evolution_pct: None,
            })
        });

        if let Some(entry) = entry {
            result.insert(pattern.category, entry);
        }
    }
    result
}

// ==========================================
// 细分表
// ==========================================

fn row_value(caps: &Captures<'_>) -> Option<u64> {
    let groups = digit_groups(caps[1].trim());
    parse_table_row(&groups).values.first().copied()
}

/// 全部标签取值，缺行记 0
pub fn extract_breakdown(text: &str, rows: &[LabeledRow]) -> BTreeMap<String, u64> {
    rows.iter()
        .map(|row| {
            let value = row
                .pattern
                .captures(text)
                .and_then(|caps| row_value(&caps))
                .unwrap_or(0);
            (row.key.to_string(), value)
        })
        .collect()
}

/// 只保留实际出现的标签
pub fn extract_present(text: &str, rows: &[LabeledRow]) -> BTreeMap<String, u64> {
    rows.iter()
        .filter_map(|row| {
            let caps = row.pattern.captures(text)?;
            Some((row.key.to_string(), row_value(&caps)?))
        })
        .collect()
}

/// 先截取小节再取值；小节不存在时返回 None
pub fn extract_section_breakdown(
    text: &str,
    bounds: &SectionBounds,
    rows: &[LabeledRow],
) -> Option<BTreeMap<String, u64>> {
    let section = isolate_section(text, bounds)?.join("\n");
    Some(extract_breakdown(&section, rows))
}
