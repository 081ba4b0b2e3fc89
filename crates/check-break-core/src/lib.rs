//! check-break-core - 兼容性破坏检测核心库
//!
//! 比较两个修订版本之间变更的文件，找出被删除或签名被修改的公开声明，
//! 并给出可能破坏兼容性的原因。

pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod error;
pub mod extractor;
pub mod formatter;
pub mod git;
pub mod parser;
pub mod report;

// 重新导出主要的公共 API
pub use analyzer::{Break, CandidateBreak, detect_breaks, pair};
pub use classifier::{BreakReason, classify};
pub use config::{Config, DEFAULT_CONFIG_FILENAME};
pub use detector::BreakDetector;
pub use error::{CheckBreakError, Result};
pub use extractor::{DiffOutcome, SkipReason, diff_signatures};
pub use formatter::{ColorTheme, FormattedOutput, FormatterConfig, OutputFormat, OutputRenderer};
pub use git::{ChangedFile, FileStatus, GitRepository, RevisionPair, VcsProvider};
pub use parser::{Language, SignatureDiff, filter_signatures};
pub use report::{BreakReport, FileReport, assemble};
