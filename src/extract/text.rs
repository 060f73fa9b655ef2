// ==========================================
// NAF 事故统计系统 - 文本辅助
// ==========================================
// 数字组切分 / 重音折叠 / 法式千分位数字解析
// ==========================================

use regex::Regex;
use std::sync::LazyLock;

static RE_DIGIT_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid digit group regex"));

/// 提取所有 ASCII 数字组（顺序保持）
pub fn digit_groups(text: &str) -> Vec<&str> {
    RE_DIGIT_GROUP.find_iter(text).map(|m| m.as_str()).collect()
}

/// 去重音 + 大写，用于版式标题的宽松比较
pub fn fold_upper(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' | 'À' | 'Â' | 'Ä' => 'A',
            'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'î' | 'ï' | 'Î' | 'Ï' => 'I',
            'ô' | 'ö' | 'Ô' | 'Ö' => 'O',
            'ù' | 'û' | 'ü' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ç' | 'Ç' => 'C',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// 解析法式数字（空格 / 不换行空格作千分位）
pub fn parse_grouped_number(text: &str) -> Option<u64> {
    let digits: String = text
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// 解析法式小数（逗号作小数点）
pub fn parse_decimal_comma(text: &str) -> Option<f64> {
    text.trim().replace(',', ".").parse().ok()
}
