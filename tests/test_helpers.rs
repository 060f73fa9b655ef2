// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 叶子记录构造、文档文本样例、源表 CSV 生成
// ==========================================

#![allow(dead_code)]

use naf_risk_stats::domain::{ExtractedDocument, ExtractedPage, LeafRecord, RawCounts};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

// ==========================================
// 叶子记录
// ==========================================

/// AT 叶子: 雇员数 + 停工事故数
pub fn at_leaf(code: &str, workforce: u64, events: u64) -> LeafRecord {
    LeafRecord::new(code, format!("Activité {}", code)).with_counts(RawCounts {
        workforce,
        lost_time_events: events,
        ..Default::default()
    })
}

/// AT 叶子，带工时与损失工作日
pub fn at_leaf_with_hours(
    code: &str,
    workforce: u64,
    events: u64,
    hours: u64,
    lost_days: u64,
) -> LeafRecord {
    LeafRecord::new(code, format!("Activité {}", code)).with_counts(RawCounts {
        workforce,
        hours,
        lost_time_events: events,
        lost_days,
        ..Default::default()
    })
}

/// MP 叶子: 雇员数 + 首次赔付数
pub fn mp_leaf(code: &str, workforce: u64, first_settlements: u64) -> LeafRecord {
    LeafRecord::new(code, format!("Activité {}", code)).with_counts(RawCounts {
        workforce,
        first_settlements,
        ..Default::default()
    })
}

// ==========================================
// 文档文本样例
// ==========================================

pub const SUMMARY_TEXT: &str = "\
Synthèse 2023
Accidents du travail 47 +14,6 %
Accidents de trajet 8 +14,3 %
Maladies professionnelles 2 -50,0 %
";

/// 五年趋势页（AT 行带雇员数）
pub fn trend_text(at_counts: [u64; 5], workforce: [u64; 5]) -> String {
    let row = |values: &[u64; 5]| {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };
    format!(
        "\
Sinistralité sur 5 ans
Accidents du travail 2019 2020 2021 2022 2023
Nombre de salariés {workforce}
Nombre d'accidents du travail en 1er règlement : {at}
Nombre de nouvelles IP : 3 4 2 5 1
Nombre de décès : 0 1 0 0 0
Journées perdues par IT : 2 345 2 100 1 980 2 500 2 410
Accidents de trajet 2019 2020 2021 2022 2023
Nombre d'accidents de trajet en 1er règlement : 5 6 4 7 8
Nombre de nouvelles IP : 0 1 0 0 1
Nombre de décès : 0 0 0 0 0
Journées perdues par IT : 310 280 190 400 350
Maladies professionnelles 2019 2020 2021 2022 2023
Nombre de MP en 1er règlement : 2 3 1 4 2
Nombre de nouvelles IP : 1 1 0 2 1
Nombre de décès : 0 0 0 0 0
Journées perdues par IT : 1 200 900 450 1 800 760
Indice de fréquence
",
        workforce = row(&workforce),
        at = row(&at_counts),
    )
}

pub const AT_DETAIL_CELL: &str = "\
REPARTITION PAR SEXE
1 Masculin 30 1 0 200
2 Féminin 17 0 0 50
REPARTITION PAR AGE
1 Moins de 20 ans 4 0 0 12
2 de 20 à 24 ans 9 0 0 40
";

pub const AT_ACTIVITY_CELL: &str = "\
ACTIVITE PHYSIQUE SPECIFIQUE
1 Opération de machine 12 0 0 34
2 Mouvement 20 1 0 300
MODALITE DE LA BLESSURE
1 Contact courant électrique 2 0 0 10
2 Heurt par objet 30 1 0 250
(1) Hors non précisé
";

pub const MP_DETAIL_CELL: &str = "\
REPARTITION PAR SEXE
1 Masculin 1 0 0 20
2 Féminin 1 0 0 15
";

pub fn page(text: &str) -> ExtractedPage {
    ExtractedPage {
        text: text.to_string(),
        ..Default::default()
    }
}

/// 在 [table][row][col] 位置放置单元格文本
pub fn place_cell(page: &mut ExtractedPage, table: usize, row: usize, col: usize, text: &str) {
    if page.tables.len() <= table {
        page.tables.resize(table + 1, Vec::new());
    }
    let rows = &mut page.tables[table];
    if rows.len() <= row {
        rows.resize(row + 1, Vec::new());
    }
    let cells = &mut rows[row];
    if cells.len() <= col {
        cells.resize(col + 1, None);
    }
    cells[col] = Some(text.to_string());
}

/// 完整三页文档
pub fn full_document(code: &str, at_counts: [u64; 5], workforce: [u64; 5]) -> ExtractedDocument {
    let mut summary = page(SUMMARY_TEXT);
    summary.cropped_text = Some(trend_text(at_counts, workforce));

    let mut detail = page("Détail des accidents du travail");
    place_cell(&mut detail, 2, 1, 0, AT_DETAIL_CELL);
    place_cell(&mut detail, 2, 1, 6, AT_ACTIVITY_CELL);

    let mut disease = page("Détail des maladies professionnelles");
    place_cell(&mut disease, 1, 1, 0, MP_DETAIL_CELL);

    ExtractedDocument {
        code: code.to_string(),
        pages: vec![summary, detail, disease],
    }
}

/// 写出 NAF_<code>.json 文本导出
pub fn write_dump(dir: &Path, document: &ExtractedDocument) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(format!("NAF_{}.json", document.code));
    fs::write(&path, serde_json::to_string(document)?)?;
    Ok(path)
}

// ==========================================
// 源表 CSV
// ==========================================

const AT_WIDTH: usize = 32;
const MP_WIDTH: usize = 30;

fn csv_line(cells: &[String]) -> String {
    cells.join(",")
}

fn header_line(width: usize) -> String {
    csv_line(&(0..width).map(|i| format!("col{}", i)).collect::<Vec<_>>())
}

/// 一行 AT 数据（按固定列位）
pub struct AtRow<'a> {
    pub committee: &'a str,
    pub code: &'a str,
    pub label: &'a str,
    pub coarse_code: &'a str,
    pub coarse_label: &'a str,
    pub workforce: u64,
    pub hours: u64,
    pub establishments: u64,
    pub lost_time_events: u64,
    pub lost_days: u64,
    pub manual_handling: u64,
}

impl AtRow<'_> {
    fn to_line(&self) -> String {
        let mut cells = vec![String::new(); AT_WIDTH];
        cells[0] = self.committee.to_string();
        cells[2] = self.code.to_string();
        cells[3] = self.label.to_string();
        cells[4] = self.coarse_code.to_string();
        cells[5] = self.coarse_label.to_string();
        cells[8] = self.workforce.to_string();
        cells[9] = self.hours.to_string();
        cells[10] = self.establishments.to_string();
        cells[11] = self.lost_time_events.to_string();
        cells[12] = self.lost_time_events.to_string();
        cells[17] = self.lost_days.to_string();
        cells[20] = self.manual_handling.to_string();
        csv_line(&cells)
    }
}

/// 一行 MP 数据（按固定列位）
pub struct MpRow<'a> {
    pub committee: &'a str,
    pub code: &'a str,
    pub label: &'a str,
    pub coarse_code: &'a str,
    pub table_title: &'a str,
    pub workforce: u64,
    pub hours: u64,
    pub first_settlements: u64,
    pub tms_flag: bool,
}

impl MpRow<'_> {
    fn to_line(&self) -> String {
        let mut cells = vec![String::new(); MP_WIDTH];
        cells[0] = self.committee.to_string();
        cells[2] = self.code.to_string();
        cells[3] = self.label.to_string();
        cells[6] = self.coarse_code.to_string();
        cells[9] = self.table_title.to_string();
        cells[12] = self.workforce.to_string();
        cells[13] = self.hours.to_string();
        cells[15] = self.first_settlements.to_string();
        if self.tms_flag {
            cells[24] = "oui".to_string();
        }
        csv_line(&cells)
    }
}

/// 写出 AT 表（单行表头）
pub fn write_at_csv(path: &Path, rows: &[AtRow<'_>]) -> Result<(), Box<dyn Error>> {
    let mut lines = vec![header_line(AT_WIDTH)];
    lines.extend(rows.iter().map(AtRow::to_line));
    fs::write(path, lines.join("\n") + "\n")?;
    Ok(())
}

/// 写出 MP 表（单行表头）
pub fn write_mp_csv(path: &Path, rows: &[MpRow<'_>]) -> Result<(), Box<dyn Error>> {
    let mut lines = vec![header_line(MP_WIDTH)];
    lines.extend(rows.iter().map(MpRow::to_line));
    fs::write(path, lines.join("\n") + "\n")?;
    Ok(())
}
