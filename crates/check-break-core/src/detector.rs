//! 检测入口
//!
//! 校验启动参数（工作路径、修订版本、配置），然后生成破坏报告

use crate::config::Config;
use crate::error::{CheckBreakError, Result};
use crate::git::{GitRepository, RevisionPair, VcsProvider};
use crate::report::{BreakReport, assemble};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// 兼容性破坏检测器
pub struct BreakDetector<P: VcsProvider> {
    vcs: P,
    revisions: RevisionPair,
    config: Option<Config>,
}

impl<P: VcsProvider> BreakDetector<P> {
    /// 基于任意版本控制提供者创建检测器，两个修订版本都必须存在
    pub fn init(vcs: P, revisions: RevisionPair, config: Option<Config>) -> Result<Self> {
        for revision in [&revisions.start, &revisions.end] {
            if !vcs.ref_exists(revision) {
                return Err(CheckBreakError::UnknownRevision(revision.clone()));
            }
        }

        Ok(Self {
            vcs,
            revisions,
            config,
        })
    }

    pub fn revisions(&self) -> &RevisionPair {
        &self.revisions
    }

    /// 是否加载了配置文件
    pub fn has_configuration(&self) -> bool {
        self.config.is_some()
    }

    pub fn exclusions(&self) -> BTreeSet<String> {
        self.config
            .as_ref()
            .map(Config::exclusions)
            .unwrap_or_default()
    }

    /// 生成两个修订版本之间的破坏报告
    pub fn report(&self) -> Result<BreakReport> {
        let files = self
            .vcs
            .changed_files(&self.revisions.start, &self.revisions.end)?;
        info!(
            "Analyzing {} changed files between {} and {}",
            files.len(),
            self.revisions.start,
            self.revisions.end
        );

        let mut report = assemble(&self.vcs, &files, &self.revisions, &self.exclusions());
        report.configured = self.has_configuration();
        Ok(report)
    }
}

impl BreakDetector<GitRepository> {
    /// 打开工作路径下的 Git 仓库并完成启动校验
    ///
    /// 配置文件在修订版本校验之后加载，未指定时查找工作路径下的默认配置文件。
    pub fn open(
        working_path: &Path,
        revisions: RevisionPair,
        config_path: Option<&Path>,
    ) -> Result<Self> {
        if !working_path.is_dir() {
            return Err(CheckBreakError::InvalidPath(
                working_path.display().to_string(),
            ));
        }

        let repo = GitRepository::open(working_path.to_path_buf())?;
        let detector = Self::init(repo, revisions, None)?;
        let config = Config::discover(working_path, config_path)?;

        Ok(Self {
            config,
            ..detector
        })
    }
}
