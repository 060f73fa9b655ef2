// ==========================================
// NAF 事故统计系统 - 表格列位映射
// ==========================================
// 两类源表（AT / MP）的固定列位，0 基
// 注意: MP 表中 NAF38 与 NAF2 列位与 AT 表互换
// ==========================================

/// 工伤事故 (AT) 表列位
#[derive(Debug, Clone, Copy)]
pub struct AtColumns {
    pub committee: usize,
    pub fine_code: usize,
    pub fine_label: usize,
    pub coarse_code: usize,
    pub coarse_label: usize,
    pub workforce: usize,
    pub hours: usize,
    pub establishments: usize,
    pub first_settlements: usize,
    pub lost_time_events: usize,
    pub new_disabilities: usize,
    pub deaths: usize,
    pub lost_days: usize,
}

pub const AT_COLUMNS: AtColumns = AtColumns {
    committee: 0,
    fine_code: 2,
    fine_label: 3,
    coarse_code: 4,
    coarse_label: 5,
    workforce: 8,
    hours: 9,
    establishments: 10,
    first_settlements: 11,
    lost_time_events: 12,
    new_disabilities: 13,
    deaths: 16,
    lost_days: 17,
};

/// AT 风险成因列 (20-31)
pub const AT_RISK_CAUSES: [(usize, &str); 12] = [
    (20, "Manutention manuelle"),
    (21, "Chutes de plain-pied"),
    (22, "Risque chimique"),
    (23, "Chutes de hauteur"),
    (24, "Risque physique"),
    (25, "Risque machines"),
    (26, "Outillage a main"),
    (27, "Risque routier"),
    (28, "Agressions"),
    (29, "Manutention mecanique"),
    (30, "Autres risques"),
    (31, "Autres vehicules"),
];

/// 职业病 (MP) 表列位
#[derive(Debug, Clone, Copy)]
pub struct MpColumns {
    pub committee: usize,
    pub fine_code: usize,
    pub fine_label: usize,
    pub coarse_code: usize,
    pub coarse_label: usize,
    pub table_title: usize,
    pub workforce: usize,
    pub hours: usize,
    pub establishments: usize,
    pub first_settlements: usize,
    pub new_disabilities: usize,
    pub disabilities_below_10: usize,
    pub disabilities_above_10: usize,
    pub deaths: usize,
    pub lost_days: usize,
    pub disability_rate_sum: usize,
}

pub const MP_COLUMNS: MpColumns = MpColumns {
    committee: 0,
    fine_code: 2,
    fine_label: 3,
    coarse_code: 6,
    coarse_label: 7,
    table_title: 9,
    workforce: 12,
    hours: 13,
    establishments: 14,
    first_settlements: 15,
    new_disabilities: 16,
    disabilities_below_10: 17,
    disabilities_above_10: 18,
    deaths: 19,
    lost_days: 20,
    disability_rate_sum: 21,
};

/// MP 成因标记列，取值 "oui" 即命中
pub const MP_CAUSE_FLAGS: [(&str, usize); 5] = [
    ("TMS", 24),
    ("Risque chimique", 26),
    ("Cancers professionnels", 27),
    ("Risque biologique", 25),
    ("Risque psychosocial", 29),
];

pub const MP_FLAG_SET: &str = "oui";

/// 无标记行按表名前缀归类
pub const MP_TABLE_TITLE_MAP: [(&str, &str); 5] = [
    ("Hors tableau", "Hors tableau"),
    ("Atteinte auditive", "Bruit"),
    ("Affections oculaire", "Autres MP"),
    ("Affections provoquees par les rayonnements", "Autres MP"),
    ("Lesions provoquees", "Autres MP"),
];

pub const MP_DEFAULT_CAUSE: &str = "Autres MP";

/// 按表名前缀查找成因类别
pub fn cause_for_table_title(title: &str) -> &'static str {
    MP_TABLE_TITLE_MAP
        .iter()
        .find(|(prefix, _)| title.starts_with(prefix))
        .map_or(MP_DEFAULT_CAUSE, |(_, cause)| cause)
}
