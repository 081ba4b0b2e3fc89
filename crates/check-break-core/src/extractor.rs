//! 修订差异提取模块
//!
//! 从版本控制提供者获取单个文件的差异，并提取其中的公开声明行

use crate::git::{ChangedFile, RevisionPair, VcsProvider};
use crate::parser::SignatureDiff;
use regex::Regex;
use std::fmt;
use tracing::{debug, warn};

/// 单个文件的差异提取结果
#[derive(Debug, Clone)]
pub enum DiffOutcome {
    /// 过滤后的签名差异，以及过滤时使用的语言模式
    Extracted {
        diff: SignatureDiff,
        pattern: &'static Regex,
    },
    Skipped(SkipReason),
}

/// 文件被跳过的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 文件语言没有声明语法
    UnsupportedLanguage,
    /// 版本控制提供者返回了错误
    Vcs(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedLanguage => write!(f, "unsupported language"),
            SkipReason::Vcs(message) => write!(f, "no diff available: {message}"),
        }
    }
}

/// 提取文件在两个修订版本之间的签名差异
pub fn diff_signatures<P: VcsProvider + ?Sized>(
    vcs: &P,
    file: &ChangedFile,
    revisions: &RevisionPair,
) -> DiffOutcome {
    let Some(pattern) = file.language.pattern() else {
        return DiffOutcome::Skipped(SkipReason::UnsupportedLanguage);
    };

    let raw = if file.is_deleted() {
        vcs.file_contents_at(&revisions.start, &file.name)
            .map(|content| (deleted_lines(&content), Vec::new()))
    } else {
        vcs.unified_diff(&revisions.start, &revisions.end, &file.name)
            .map(|diff| changed_lines(&diff))
    };

    match raw {
        Ok((removed, added)) => {
            let diff = SignatureDiff::filtered(pattern, removed, added);
            debug!(
                "{}: {} removed and {} added signatures",
                file.name,
                diff.removed.len(),
                diff.added.len()
            );
            DiffOutcome::Extracted { diff, pattern }
        }
        Err(e) => {
            let reason = SkipReason::Vcs(e.to_string());
            warn!("Skipping {}: {reason}", file.name);
            DiffOutcome::Skipped(reason)
        }
    }
}

/// 删除文件的每个非空行都视为被删除
fn deleted_lines(content: &[String]) -> Vec<String> {
    content
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 将统一差异拆分为删除行和新增行
///
/// 第一个 hunk 之前的文件头、hunk 头以及 `\ No newline` 标记都不是候选行。
fn changed_lines(diff: &[String]) -> (Vec<String>, Vec<String>) {
    let mut removed = Vec::new();
    let mut added = Vec::new();
    let mut in_hunk = false;

    for line in diff {
        if line.starts_with("@@") {
            in_hunk = true;
            continue;
        }
        if !in_hunk {
            continue;
        }

        if let Some(content) = line.strip_prefix('-') {
            removed.push(content.trim().to_string());
        } else if let Some(content) = line.strip_prefix('+') {
            added.push(content.trim().to_string());
        }
    }

    (removed, added)
}
