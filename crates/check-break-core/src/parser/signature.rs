//! 签名过滤
//!
//! 只保留匹配语言语法的公开声明行

use regex::Regex;

/// 单个文件的签名差异
///
/// 两个序列都保持差异中的出现顺序（自上而下），不做排序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureDiff {
    pub removed: Vec<String>,
    pub added: Vec<String>,
}

impl SignatureDiff {
    /// 用同一个模式过滤删除行和新增行
    pub fn filtered(pattern: &Regex, removed: Vec<String>, added: Vec<String>) -> Self {
        Self {
            removed: filter_signatures(pattern, removed),
            added: filter_signatures(pattern, added),
        }
    }
}

/// 保留匹配模式的行，相对顺序不变
pub fn filter_signatures<I>(pattern: &Regex, lines: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    lines
        .into_iter()
        .filter(|line| pattern.is_match(line))
        .collect()
}
