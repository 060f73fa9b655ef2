// ==========================================
// NAF 事故统计系统 - 版式常量与正则表
// ==========================================
// 所有表均为进程级只读常量，首次使用时编译一次
// 行模式统一以前导行号类标记锚定，避免匹配正文叙述中的同名标签
// ==========================================

use crate::domain::types::Category;
use regex::Regex;
use std::sync::LazyLock;

// ==========================================
// 年度表版式
// ==========================================

/// 年度表标题行必须同时包含的首年标记
pub const YEARLY_HEADER_YEAR: &str = "2019";

/// 单一险种年度表的版式描述（全部按大写去重音比较）
#[derive(Debug)]
pub struct YearlyLayout {
    pub header: &'static str,
    pub stop_markers: &'static [&'static str],
    pub count_markers: &'static [&'static str],
    /// 仅 AT 表有“雇员”行（无冒号）
    pub has_workforce_row: bool,
}

pub const NEW_DISABILITY_MARKER: &str = "NOUVELLES IP";
pub const DEATH_MARKER: &str = "DECES";
pub const LOST_DAYS_MARKER: &str = "JOURNEES PERDUES";
pub const WORKFORCE_MARKER: &str = "SALARIES";

const AT_LAYOUT: YearlyLayout = YearlyLayout {
    header: "ACCIDENTS DU TRAVAIL",
    stop_markers: &["ACCIDENTS DE TRAJET", "INDICE DE FR"],
    count_markers: &["TRAVAIL EN 1ER", "ACC. DU TRAVAIL"],
    has_workforce_row: true,
};

const TRAJET_LAYOUT: YearlyLayout = YearlyLayout {
    header: "ACCIDENTS DE TRAJET",
    stop_markers: &["MALADIES PROFESSIONNELLES", "INDICE DE FR"],
    count_markers: &["TRAJET EN 1ER", "ACC. DE TRAJET"],
    has_workforce_row: false,
};

const MP_LAYOUT: YearlyLayout = YearlyLayout {
    header: "MALADIES PROFESSIONNELLES",
    stop_markers: &["INDICE DE FR", "*POUR LES ANN"],
    count_markers: &["MP EN 1ER"],
    has_workforce_row: false,
};

pub fn yearly_layout(category: Category) -> &'static YearlyLayout {
    match category {
        Category::OccupationalAccident => &AT_LAYOUT,
        Category::Commuting => &TRAJET_LAYOUT,
        Category::OccupationalDisease => &MP_LAYOUT,
    }
}

/// 冒号后数值尾部中混入的字母片段（脚注、下一标签）从此处截断
pub static RE_ALPHA_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-zÀ-ÿ]{2,}").expect("valid alpha tail regex"));

/// AT 雇员行标签（截取其后的数字）
pub static RE_WORKFORCE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)salari[ée]s").expect("valid workforce label regex"));

// ==========================================
// 概要页
// ==========================================

pub struct SynthesisPattern {
    pub category: Category,
    /// 计数 + 同比百分比
    pub with_evolution: Regex,
    /// 仅计数
    pub count_only: Regex,
}

pub static SYNTHESIS_PATTERNS: LazyLock<Vec<SynthesisPattern>> = LazyLock::new(|| {
    [
        (Category::OccupationalAccident, "Accidents du travail"),
        (Category::Commuting, "Accidents de trajet"),
        (Category::OccupationalDisease, "Maladies professionnelles"),
    ]
    .into_iter()
    .map(|(category, label)| SynthesisPattern {
        category,
        with_evolution: Regex::new(&format!(r"{}\s+(.+?)\s+([+-]?\d+,\d+)\s*%", label))
            .expect("valid synthesis regex"),
        count_only: Regex::new(&format!(r"{}\s+(\d[\d ]*)", label))
            .expect("valid synthesis fallback regex"),
    })
    .collect()
});

// ==========================================
// 细分表行标签
// ==========================================

/// 带键名的行模式；捕获组 1 为行尾数值文本
pub struct LabeledRow {
    pub key: &'static str,
    pub pattern: Regex,
}

fn compile_rows(rows: &[(&'static str, &str)], template: fn(&str) -> String) -> Vec<LabeledRow> {
    rows.iter()
        .map(|(key, label)| LabeledRow {
            key: *key,
            pattern: Regex::new(&template(label)).expect("valid labeled row regex"),
        })
        .collect()
}

// 标签后紧跟数值
fn exact_label(label: &str) -> String {
    format!(r"(?mi)\d+\s*{}\s+([\d\s]+?)$", label)
}

// 标签后允许残余文字（长标签被截断或带注释）
fn prefix_label(label: &str) -> String {
    format!(r"(?mi)\d+\s*{}.*?\s+([\d\s]+?)$", label)
}

pub static SEX_ROWS: LazyLock<Vec<LabeledRow>> = LazyLock::new(|| {
    compile_rows(
        &[("masculin", "masculin"), ("feminin", "f[ée]minin")],
        |label| format!(r"(?mi)\d\s+{}\s+([\d\s]+?)$", label),
    )
});

pub static AGE_ROWS: LazyLock<Vec<LabeledRow>> = LazyLock::new(|| {
    compile_rows(
        &[
            ("<20", "Moins de 20 ans"),
            ("20-24", "de 20 [àa] 24 ans"),
            ("25-29", "de 25 [àa] 29 ans"),
            ("30-34", "de 30 [àa] 34 ans"),
            ("35-39", "de 35 [àa] 39 ans"),
            ("40-49", "de 40 [àa] 49 ans"),
            ("50-59", "de 50 [àa] 59 ans"),
            ("60-64", "de 60 [àa] 64 ans"),
            ("65+", "65 ans et plus"),
        ],
        exact_label,
    )
});

pub static SITE_ROWS: LazyLock<Vec<LabeledRow>> = LazyLock::new(|| {
    compile_rows(
        &[
            ("non_determine", "Localisation de la blessure non d[ée]termin[ée]e"),
            ("tete", "T[êe]te, sans autre sp[ée]cification"),
            ("cou", "Cou, dont colonne vert[ée]brale"),
            ("dos", "Dos, dont colonne vert[ée]brale"),
            ("torse", "Torse et organes"),
            ("membres_superieurs", "Membres sup[ée]rieurs"),
            ("membres_inferieurs", "Membres inf[ée]rieurs"),
            ("corps_entier", "Ensemble du corps"),
            ("autres", "Autres parties du corps"),
        ],
        prefix_label,
    )
});

pub static ACTIVITY_ROWS: LazyLock<Vec<LabeledRow>> = LazyLock::new(|| {
    compile_rows(
        &[
            ("operation_machine", "Op[ée]ration de machine"),
            ("outils_main", "Travail avec des outils [àa] main"),
            ("conduite_transport", "Conduite/pr[ée]sence moyen de transport"),
            ("manipulation_objets", "Manipulation d.objets"),
            ("transport_manuel", "Transport manuel"),
            ("mouvement", "Mouvement"),
            ("presence", "Pr[ée]sence"),
            ("autre", "Autre ou sans information"),
        ],
        prefix_label,
    )
});

pub static MODALITY_ROWS: LazyLock<Vec<LabeledRow>> = LazyLock::new(|| {
    compile_rows(
        &[
            ("contact_electrique", "Contact courant [ée]lectrique"),
            ("noyade_ensevelissement", "Noyade, ensevelissement"),
            ("ecrasement_mouvement", "[ÉE]crasement mouvement"),
            ("heurt_objet", "Heurt par objet"),
            ("contact_coupant", "Contact agent mat[ée]riel coupant"),
            ("coincement", "Coincement, [ée]crasement"),
            ("contrainte_corps", "Contrainte du corps"),
            ("morsure", "Morsure, coup de pied"),
            ("autre", "Autre ou sans information"),
        ],
        prefix_label,
    )
});

// ==========================================
// 细分小节边界
// ==========================================

/// 小节终止规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRule {
    /// 行首匹配终止标记
    LineStart,
    /// 行内任意位置出现终止标记
    Anywhere,
}

/// 小节边界: 标题 + 可选必需标记 + 终止标记
#[derive(Debug)]
pub struct SectionBounds {
    pub header: &'static str,
    pub required_token: Option<&'static str>,
    pub stop_markers: &'static [&'static str],
    pub stop_rule: StopRule,
}

pub const ACTIVITY_SECTION: SectionBounds = SectionBounds {
    header: "ACTIVITE PHYSIQUE",
    required_token: None,
    stop_markers: &["REPARTITION", "MODALITE"],
    stop_rule: StopRule::Anywhere,
};

pub const MODALITY_SECTION: SectionBounds = SectionBounds {
    header: "MODALITE DE LA BLESSURE",
    required_token: None,
    stop_markers: &["REPARTITION", "(1)"],
    stop_rule: StopRule::Anywhere,
};

impl YearlyLayout {
    pub fn bounds(&self) -> SectionBounds {
        SectionBounds {
            header: self.header,
            required_token: Some(YEARLY_HEADER_YEAR),
            stop_markers: self.stop_markers,
            stop_rule: StopRule::LineStart,
        }
    }
}
