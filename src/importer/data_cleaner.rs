// ==========================================
// NAF 事故统计系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 计数容错转换
// 红线: 空值、非数值一律按 0 处理，不报错
// ==========================================

pub struct DataCleaner;

impl DataCleaner {
    pub fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    /// 空串与字面量 "None" 视为缺失
    pub fn normalize_null(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "None" {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// 编码单元格标准化；纯数字编码按宽度左补零（数值单元格会丢失前导零）
    pub fn code(&self, value: &str, width: usize) -> Option<String> {
        let code = self.normalize_null(value)?;
        let code = code.strip_suffix(".0").map(str::to_string).unwrap_or(code);
        if code.chars().all(|c| c.is_ascii_digit()) && code.len() < width {
            return Some(format!("{:0>width$}", code, width = width));
        }
        Some(code)
    }

    /// 单元格 → 非负计数
    ///
    /// 空白、非数值、负数、非有限值 → 0；小数四舍五入
    pub fn safe_count(&self, value: &str) -> u64 {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return 0;
        }
        if let Ok(n) = trimmed.parse::<u64>() {
            return n;
        }
        match trimmed.replace(',', ".").parse::<f64>() {
            Ok(f) if f.is_finite() && f > 0.0 => f.round() as u64,
            _ => 0,
        }
    }

    /// 标记列是否命中（精确匹配）
    pub fn is_flag_set(&self, value: &str, expected: &str) -> bool {
        value.trim() == expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_basic() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_text("  Métallurgie  "), "Métallurgie");
    }

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null("  "), None);
        assert_eq!(cleaner.normalize_null("None"), None);
        assert_eq!(cleaner.normalize_null(" 4711D "), Some("4711D".to_string()));
    }

    #[test]
    fn test_code_restores_leading_zero() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.code("1", 2), Some("01".to_string()));
        assert_eq!(cleaner.code("1.0", 2), Some("01".to_string()));
        assert_eq!(cleaner.code("47", 2), Some("47".to_string()));
        assert_eq!(cleaner.code("0111Z", 5), Some("0111Z".to_string()));
        assert_eq!(cleaner.code("None", 2), None);
    }

    #[test]
    fn test_safe_count() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.safe_count("1234"), 1234);
        assert_eq!(cleaner.safe_count("12.6"), 13);
        assert_eq!(cleaner.safe_count("12,4"), 12);
        assert_eq!(cleaner.safe_count(""), 0);
        assert_eq!(cleaner.safe_count("n.d."), 0);
        assert_eq!(cleaner.safe_count("-5"), 0);
        assert_eq!(cleaner.safe_count("NaN"), 0);
        assert_eq!(cleaner.safe_count("inf"), 0);
    }

    #[test]
    fn test_is_flag_set() {
        let cleaner = DataCleaner;
        assert!(cleaner.is_flag_set("oui", "oui"));
        assert!(!cleaner.is_flag_set("non", "oui"));
        assert!(!cleaner.is_flag_set("", "oui"));
    }
}
