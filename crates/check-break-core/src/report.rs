//! 报告汇总模块
//!
//! 逐个文件运行检测流程，并把结果分为支持、忽略和排除三类

use crate::analyzer::{Break, detect_breaks};
use crate::extractor::{DiffOutcome, SkipReason, diff_signatures};
use crate::git::{ChangedFile, RevisionPair, VcsProvider};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// 单个文件的潜在兼容性破坏，只在存在破坏时构造
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub filename: String,
    pub breaks: Vec<Break>,
}

/// 一次运行的最终结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BreakReport {
    pub supported: Vec<FileReport>,
    /// 语言不受支持的文件
    pub ignored: Vec<ChangedFile>,
    pub exclusions: BTreeSet<String>,
    /// 是否使用了配置文件
    pub configured: bool,
}

impl BreakReport {
    pub fn has_breaks(&self) -> bool {
        !self.supported.is_empty()
    }

    pub fn break_count(&self) -> usize {
        self.supported.iter().map(|file| file.breaks.len()).sum()
    }
}

/// 路径是否匹配任一排除前缀
pub fn is_excluded(name: &str, exclusions: &BTreeSet<String>) -> bool {
    exclusions.iter().any(|prefix| name.starts_with(prefix.as_str()))
}

/// 按版本控制返回的顺序逐个分析文件并汇总报告
pub fn assemble<P: VcsProvider + ?Sized>(
    vcs: &P,
    files: &[ChangedFile],
    revisions: &RevisionPair,
    exclusions: &BTreeSet<String>,
) -> BreakReport {
    let mut report = BreakReport {
        exclusions: exclusions.clone(),
        ..BreakReport::default()
    };

    for file in files {
        if !file.can_have_break() {
            continue;
        }
        if is_excluded(&file.name, exclusions) {
            debug!("{} is excluded", file.name);
            continue;
        }

        let (diff, pattern) = match diff_signatures(vcs, file, revisions) {
            DiffOutcome::Extracted { diff, pattern } => (diff, pattern),
            DiffOutcome::Skipped(SkipReason::UnsupportedLanguage) => {
                report.ignored.push(file.clone());
                continue;
            }
            DiffOutcome::Skipped(SkipReason::Vcs(_)) => continue,
        };

        let breaks = detect_breaks(&diff, pattern);
        if !breaks.is_empty() {
            report.supported.push(FileReport {
                filename: file.name.clone(),
                breaks,
            });
        }
    }

    info!(
        "{} potential breaks in {} files, {} files ignored",
        report.break_count(),
        report.supported.len(),
        report.ignored.len()
    );
    report
}
