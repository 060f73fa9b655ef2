// ==========================================
// NAF 事故统计系统 - 数字流消歧器
// ==========================================
// 问题: 表格中的千分位分隔在线性化文本后丢失，
//       "12 345 6" 无法区分是 [12345, 6] 还是 [12, 345, 6]
// 规则: 3 位数字组可作为千分位延续，前提是合并值不超过该列上限（含）
// ==========================================

/// 消歧结果
///
/// `overflowed` 表示数字组多于列数，多出部分未输出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disambiguated {
    pub values: Vec<u64>,
    pub overflowed: bool,
}

/// 按列上限把数字组还原为列值
///
/// # 参数
/// - groups: 连续数字组（仅 ASCII 数字）
/// - ceilings: 每列最大可信值，长度即列数 k
///
/// # 返回
/// - 至多 k 个值，从左到右依次对应各列
pub fn disambiguate<S: AsRef<str>>(groups: &[S], ceilings: &[u64]) -> Disambiguated {
    let mut out = Disambiguated {
        values: Vec::with_capacity(ceilings.len()),
        overflowed: false,
    };
    let mut current: Option<u64> = None;

    for group in groups {
        let group = group.as_ref();
        let n = parse_group(group);

        if let Some(value) = current {
            // 0 不作为千分位前缀
            if value > 0 && group.len() == 3 {
                let limit = ceilings.get(out.values.len());
                let candidate = value.checked_mul(1000).and_then(|v| v.checked_add(n));
                if let (Some(limit), Some(candidate)) = (limit, candidate) {
                    if candidate <= *limit {
                        current = Some(candidate);
                        continue;
                    }
                }
            }
            close_value(&mut out, value, ceilings.len());
        }
        current = Some(n);
    }

    if let Some(value) = current {
        close_value(&mut out, value, ceilings.len());
    }
    out
}

fn close_value(out: &mut Disambiguated, value: u64, columns: usize) {
    if out.values.len() < columns {
        out.values.push(value);
    } else {
        out.overflowed = true;
    }
}

fn parse_group(group: &str) -> u64 {
    group.parse().unwrap_or(u64::MAX)
}
