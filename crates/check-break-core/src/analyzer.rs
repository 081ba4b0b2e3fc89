//! 破坏配对模块
//!
//! 为每个被删除的签名寻找最可能的替代签名，并排除单纯的移动

use crate::classifier::{BreakReason, classify};
use crate::parser::SignatureDiff;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// 尚未归类的候选破坏
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateBreak {
    pub before: String,
    /// 为空表示声明被直接删除
    pub after: String,
    pub anchor: String,
}

/// 一个潜在的兼容性破坏
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Break {
    pub before: String,
    pub after: String,
    pub anchor: String,
    pub reason: BreakReason,
}

impl CandidateBreak {
    /// 归类候选破坏，`None` 表示实际上不构成破坏
    pub fn classify(self) -> Option<Break> {
        let reason = classify(&self.before, &self.after, &self.anchor)?;
        Some(Break {
            before: self.before,
            after: self.after,
            anchor: self.anchor,
            reason,
        })
    }
}

/// 将删除的签名与新增的签名配对
///
/// 与删除行共享锚点、且词数和字符长度都相同的新增行表示单纯移动，
/// 该删除行不产生任何候选。否则取最后一个共享锚点的新增行。
pub fn pair(diff: &SignatureDiff, pattern: &Regex) -> Vec<CandidateBreak> {
    let mut candidates = Vec::new();

    for deleted in &diff.removed {
        let Some(anchor) = pattern.find(deleted).map(|m| m.as_str()) else {
            continue;
        };

        let mut closest_adding: &str = "";
        let mut move_only = false;
        for added in diff.added.iter().filter(|added| added.starts_with(anchor)) {
            if is_same_shape(deleted, added) {
                move_only = true;
                break;
            }
            closest_adding = added.as_str();
        }

        if move_only {
            debug!("{deleted} only moved");
            continue;
        }

        candidates.push(CandidateBreak {
            before: deleted.clone(),
            after: closest_adding.to_string(),
            anchor: anchor.to_string(),
        });
    }

    candidates
}

/// 配对后归类，丢弃不构成破坏的候选
pub fn detect_breaks(diff: &SignatureDiff, pattern: &Regex) -> Vec<Break> {
    pair(diff, pattern)
        .into_iter()
        .filter_map(CandidateBreak::classify)
        .collect()
}

fn is_same_shape(deleted: &str, added: &str) -> bool {
    deleted.split_whitespace().count() == added.split_whitespace().count()
        && deleted.chars().count() == added.chars().count()
}
