//! 变更归类模块
//!
//! 比较配对后的前后两个签名的参数列表，给出破坏原因

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// 默认值标记
const DEFAULT_MARKER: char = '=';

/// 兼容性破坏的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BreakReason {
    #[serde(rename = "Deletion of method")]
    MethodDeleted,
    #[serde(rename = "Deletion of parameter")]
    ParameterDeleted,
    #[serde(rename = "Adding a parameter without default value")]
    ParameterAddedWithoutDefault,
    #[serde(rename = "Deletion of default parameter")]
    DefaultParameterDeleted,
    /// 无法说明原因，但仍视为破坏
    #[serde(rename = "Unknown signature change")]
    UnknownSignatureChange,
}

impl BreakReason {
    pub fn as_str(self) -> &'static str {
        match self {
            BreakReason::MethodDeleted => "Deletion of method",
            BreakReason::ParameterDeleted => "Deletion of parameter",
            BreakReason::ParameterAddedWithoutDefault => "Adding a parameter without default value",
            BreakReason::DefaultParameterDeleted => "Deletion of default parameter",
            BreakReason::UnknownSignatureChange => "Unknown signature change",
        }
    }
}

impl fmt::Display for BreakReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 归类一对签名
///
/// `after` 为空表示声明被删除。返回 `None` 表示变更不构成破坏，
/// 例如只新增了带默认值的参数。
pub fn classify(before: &str, after: &str, anchor: &str) -> Option<BreakReason> {
    if after.is_empty() {
        return Some(BreakReason::MethodDeleted);
    }

    let (deleted, added) = differences(&parameters(before, anchor), &parameters(after, anchor));

    match deleted.len().cmp(&added.len()) {
        Ordering::Greater => Some(BreakReason::ParameterDeleted),
        Ordering::Less => added
            .iter()
            .any(|parameter| !has_default(parameter))
            .then_some(BreakReason::ParameterAddedWithoutDefault),
        Ordering::Equal => {
            for (old, new) in deleted.iter().zip(&added) {
                if has_default(old) && !has_default(new) {
                    return Some(BreakReason::DefaultParameterDeleted);
                }
                if !has_default(new) {
                    return Some(BreakReason::ParameterAddedWithoutDefault);
                }
            }
            Some(BreakReason::UnknownSignatureChange)
        }
    }
}

fn has_default(parameter: &str) -> bool {
    parameter.contains(DEFAULT_MARKER)
}

/// 锚点之后直到与锚点左括号配对的右括号之间的文本
///
/// 括号不闭合时（多行声明）取到行尾。
fn argument_text<'a>(line: &'a str, anchor: &str) -> &'a str {
    let rest = line.strip_prefix(anchor).unwrap_or(line);

    let mut depth = 1usize;
    for (index, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return &rest[..index];
                }
            }
            _ => {}
        }
    }

    rest
}

/// 按逗号切分参数，保留原样，空白差异也算作不同
fn parameters<'a>(line: &'a str, anchor: &str) -> Vec<&'a str> {
    let text = argument_text(line, anchor);
    if text.is_empty() {
        return Vec::new();
    }

    text.split(',').collect()
}

/// 按位置比较两个参数列表
///
/// 较短的列表用空占位补齐，相同的位置跳过。返回（删除的参数，新增的参数）。
fn differences<'a>(before: &[&'a str], after: &[&'a str]) -> (Vec<&'a str>, Vec<&'a str>) {
    let length = before.len().max(after.len());
    let mut deleted = Vec::new();
    let mut added = Vec::new();

    for index in 0..length {
        let old = before.get(index).copied().unwrap_or("");
        let new = after.get(index).copied().unwrap_or("");
        if old == new {
            continue;
        }

        if !old.is_empty() {
            deleted.push(old);
        }
        if !new.is_empty() {
            added.push(new);
        }
    }

    (deleted, added)
}
