//! Git 仓库交互模块
//!
//! 定义抽象的版本控制接口，以及基于 gix 的 Git 实现

use crate::error::{CheckBreakError, Result};
use crate::parser::Language;
use gix::ThreadSafeRepository;
use imara_diff::{Algorithm, Diff, InternedInput};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// 一次运行中比较的两个修订版本
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionPair {
    pub start: String,
    pub end: String,
}

impl RevisionPair {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// 文件变更状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    /// 重命名，文件名为重命名前的路径
    Renamed,
}

/// 两个修订版本之间变更的文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedFile {
    pub name: String,
    pub status: FileStatus,
    pub language: Language,
}

impl ChangedFile {
    pub fn new(name: impl Into<String>, status: FileStatus) -> Self {
        let name = name.into();
        let language = Language::from_path(&name);
        Self {
            name,
            status,
            language,
        }
    }

    /// 新增文件没有可以被破坏的旧 API
    pub fn can_have_break(&self) -> bool {
        self.status != FileStatus::Added
    }

    /// 重命名后旧路径消失，按删除处理
    pub fn is_deleted(&self) -> bool {
        matches!(self.status, FileStatus::Deleted | FileStatus::Renamed)
    }
}

/// 版本控制系统提供者
pub trait VcsProvider {
    /// 修订版本引用是否存在
    fn ref_exists(&self, revision: &str) -> bool;

    /// 两个修订版本之间变更的文件列表
    fn changed_files(&self, start: &str, end: &str) -> Result<Vec<ChangedFile>>;

    /// 单个文件的零上下文统一差异（原始行）
    fn unified_diff(&self, start: &str, end: &str, filename: &str) -> Result<Vec<String>>;

    /// 文件在指定修订版本的内容（原始行）
    fn file_contents_at(&self, revision: &str, filename: &str) -> Result<Vec<String>>;
}

/// 基于 gix 的 Git 仓库
pub struct GitRepository {
    repo: ThreadSafeRepository,
}

impl GitRepository {
    /// 从工作路径（仓库根目录或其子目录）打开仓库
    pub fn open(repo_path: PathBuf) -> Result<Self> {
        let repo = ThreadSafeRepository::discover(&repo_path).map_err(|e| {
            CheckBreakError::GitError(format!(
                "Failed to open repository at {}: {}",
                repo_path.display(),
                e
            ))
        })?;

        Ok(Self { repo })
    }

    /// 将修订版本解析为它指向的树
    fn resolve_tree<'repo>(
        &self,
        repo: &'repo gix::Repository,
        revision: &str,
    ) -> Result<gix::Tree<'repo>> {
        let spec = format!("{revision}^{{tree}}");
        let tree_id = repo
            .rev_parse_single(spec.as_str())
            .map_err(|e| CheckBreakError::GitError(format!("Failed to resolve {revision}: {e}")))?;

        let tree = repo
            .find_object(tree_id.detach())
            .map_err(|e| CheckBreakError::GitError(format!("Failed to find tree: {e}")))?
            .try_into_tree()
            .map_err(|e| CheckBreakError::GitError(format!("{revision} is not a tree: {e}")))?;

        Ok(tree)
    }

    /// 读取文件在指定修订版本的文本内容
    fn read_blob(&self, repo: &gix::Repository, revision: &str, filename: &str) -> Result<String> {
        let spec = format!("{revision}:{filename}");
        let blob_id = repo.rev_parse_single(spec.as_str()).map_err(|e| {
            CheckBreakError::GitError(format!("Path {filename} does not exist in {revision}: {e}"))
        })?;

        let blob = repo
            .find_object(blob_id.detach())
            .map_err(|e| CheckBreakError::GitError(format!("Failed to find blob: {e}")))?
            .try_into_blob()
            .map_err(|e| CheckBreakError::GitError(format!("{spec} is not a file: {e}")))?;

        Ok(String::from_utf8_lossy(&blob.data).into_owned())
    }
}

impl VcsProvider for GitRepository {
    fn ref_exists(&self, revision: &str) -> bool {
        if revision.is_empty() {
            return false;
        }
        let repo = self.repo.to_thread_local();
        repo.rev_parse_single(revision).is_ok()
    }

    fn changed_files(&self, start: &str, end: &str) -> Result<Vec<ChangedFile>> {
        use gix::object::tree::diff::Change;

        let repo = self.repo.to_thread_local();
        let old_tree = self.resolve_tree(&repo, start)?;
        let new_tree = self.resolve_tree(&repo, end)?;

        let mut files = Vec::new();
        old_tree
            .changes()
            .map_err(|e| {
                CheckBreakError::GitError(format!("Failed to create tree changes iterator: {e}"))
            })?
            .options(|opts| {
                opts.track_path();
            })
            .for_each_to_obtain_tree(&new_tree, |change| {
                let file = match change {
                    Change::Addition {
                        location,
                        entry_mode,
                        ..
                    } => (!entry_mode.is_tree())
                        .then(|| ChangedFile::new(location.to_string(), FileStatus::Added)),
                    Change::Deletion {
                        location,
                        entry_mode,
                        ..
                    } => (!entry_mode.is_tree())
                        .then(|| ChangedFile::new(location.to_string(), FileStatus::Deleted)),
                    Change::Modification {
                        location,
                        entry_mode,
                        ..
                    } => (!entry_mode.is_tree())
                        .then(|| ChangedFile::new(location.to_string(), FileStatus::Modified)),
                    Change::Rewrite {
                        source_location,
                        location,
                        entry_mode,
                        copy,
                        ..
                    } => (!entry_mode.is_tree()).then(|| {
                        if copy {
                            ChangedFile::new(location.to_string(), FileStatus::Added)
                        } else {
                            ChangedFile::new(source_location.to_string(), FileStatus::Renamed)
                        }
                    }),
                };
                files.extend(file);
                Ok::<_, gix::object::tree::diff::for_each::Error>(
                    gix::object::tree::diff::Action::Continue,
                )
            })
            .map_err(|e| {
                CheckBreakError::GitError(format!("Failed to process tree changes: {e}"))
            })?;

        files.sort_by(|a, b| a.name.cmp(&b.name));
        debug!("{} changed files between {start} and {end}", files.len());
        Ok(files)
    }

    fn unified_diff(&self, start: &str, end: &str, filename: &str) -> Result<Vec<String>> {
        let repo = self.repo.to_thread_local();
        // 修订版本本身必须可解析，文件在某一侧缺失时该侧视为空
        self.resolve_tree(&repo, start)?;
        self.resolve_tree(&repo, end)?;

        let old_content = self.read_blob(&repo, start, filename).unwrap_or_else(|e| {
            debug!("{e}, diffing against empty content");
            String::new()
        });
        let new_content = self.read_blob(&repo, end, filename).unwrap_or_else(|e| {
            debug!("{e}, diffing against empty content");
            String::new()
        });

        Ok(unified_diff_lines(filename, &old_content, &new_content))
    }

    fn file_contents_at(&self, revision: &str, filename: &str) -> Result<Vec<String>> {
        let repo = self.repo.to_thread_local();
        let content = self.read_blob(&repo, revision, filename)?;
        Ok(content.lines().map(str::to_string).collect())
    }
}

/// 生成零上下文的统一差异行
pub fn unified_diff_lines(filename: &str, old_content: &str, new_content: &str) -> Vec<String> {
    if old_content == new_content {
        return Vec::new();
    }

    let input = InternedInput::new(old_content, new_content);
    let diff = Diff::compute(Algorithm::Histogram, &input);

    let mut lines = vec![format!("--- a/{filename}"), format!("+++ b/{filename}")];
    for hunk in diff.hunks() {
        lines.push(format!(
            "@@ -{} +{} @@",
            hunk_range(hunk.before.start, hunk.before.len()),
            hunk_range(hunk.after.start, hunk.after.len()),
        ));
        for &token in &input.before[hunk.before.start as usize..hunk.before.end as usize] {
            lines.push(format!("-{}", strip_line_ending(input.interner[token])));
        }
        for &token in &input.after[hunk.after.start as usize..hunk.after.end as usize] {
            lines.push(format!("+{}", strip_line_ending(input.interner[token])));
        }
    }

    lines
}

/// 统一差异头部的行号范围，与 git 的零上下文格式一致
fn hunk_range(start: u32, len: usize) -> String {
    match len {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{len}", start + 1),
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

#[cfg(test)]
pub(crate) mod memory {
    //! 测试用的内存版本控制提供者

    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    pub(crate) struct InMemoryVcs {
        pub refs: Vec<String>,
        pub files: Vec<ChangedFile>,
        pub diffs: HashMap<String, Vec<String>>,
        pub contents: HashMap<(String, String), Vec<String>>,
    }

    impl InMemoryVcs {
        pub fn with_diff(mut self, file: ChangedFile, diff: &[&str]) -> Self {
            self.diffs.insert(
                file.name.clone(),
                diff.iter().map(|line| line.to_string()).collect(),
            );
            self.files.push(file);
            self
        }

        pub fn with_contents(mut self, revision: &str, file: ChangedFile, lines: &[&str]) -> Self {
            self.contents.insert(
                (revision.to_string(), file.name.clone()),
                lines.iter().map(|line| line.to_string()).collect(),
            );
            self.files.push(file);
            self
        }

        pub fn with_file(mut self, file: ChangedFile) -> Self {
            self.files.push(file);
            self
        }
    }

    impl VcsProvider for InMemoryVcs {
        fn ref_exists(&self, revision: &str) -> bool {
            self.refs.iter().any(|r| r == revision)
        }

        fn changed_files(&self, _start: &str, _end: &str) -> Result<Vec<ChangedFile>> {
            Ok(self.files.clone())
        }

        fn unified_diff(&self, _start: &str, _end: &str, filename: &str) -> Result<Vec<String>> {
            self.diffs
                .get(filename)
                .cloned()
                .ok_or_else(|| CheckBreakError::GitError(format!("no diff for {filename}")))
        }

        fn file_contents_at(&self, revision: &str, filename: &str) -> Result<Vec<String>> {
            self.contents
                .get(&(revision.to_string(), filename.to_string()))
                .cloned()
                .ok_or_else(|| {
                    CheckBreakError::GitError(format!(
                        "Path {filename} does not exist in {revision}"
                    ))
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::process::Command;
    use tempfile::TempDir;

    /// 创建一个临时的 Git 仓库用于测试
    fn create_test_repo() -> Result<(TempDir, PathBuf)> {
        let temp_dir = TempDir::new().map_err(CheckBreakError::IoError)?;
        let repo_path = temp_dir.path().to_path_buf();

        // 使用系统 git 命令初始化仓库（仅用于测试）
        git(&repo_path, &["init"])?;
        git(&repo_path, &["config", "user.name", "Test User"])?;
        git(&repo_path, &["config", "user.email", "test@example.com"])?;

        Ok((temp_dir, repo_path))
    }

    fn git(repo_path: &Path, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(repo_path)
            .output()
            .map_err(|e| CheckBreakError::GitError(format!("Failed to run git {args:?}: {e}")))?;

        if !output.status.success() {
            return Err(CheckBreakError::GitError(format!(
                "git {args:?} failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// 写入文件并提交，返回提交哈希
    fn commit_file(repo_path: &Path, file_name: &str, content: &str) -> Result<String> {
        std::fs::write(repo_path.join(file_name), content).map_err(CheckBreakError::IoError)?;
        git(repo_path, &["add", "-A"])?;
        git(repo_path, &["commit", "-m", &format!("Update {file_name}")])?;
        git(repo_path, &["rev-parse", "HEAD"])
    }

    #[test]
    fn test_changed_file_language_and_status() {
        let file = ChangedFile::new("src/api.go", FileStatus::Renamed);
        assert_eq!(file.language, Language::Go);
        assert!(file.is_deleted());
        assert!(file.can_have_break());

        let added = ChangedFile::new("README.md", FileStatus::Added);
        assert!(!added.can_have_break());
        assert_eq!(added.language, Language::Unsupported);
    }

    #[test]
    fn test_unified_diff_lines() {
        let old = "package main\n\nfunc Foo(a int) {\n}\n";
        let new = "package main\n\nfunc Foo(a int, b int) {\n}\n";

        let lines = unified_diff_lines("main.go", old, new);
        assert_eq!(
            lines,
            vec![
                "--- a/main.go".to_string(),
                "+++ b/main.go".to_string(),
                "@@ -3 +3 @@".to_string(),
                "-func Foo(a int) {".to_string(),
                "+func Foo(a int, b int) {".to_string(),
            ]
        );
    }

    #[test]
    fn test_unified_diff_lines_identical_content() {
        assert!(unified_diff_lines("a.go", "x\n", "x\n").is_empty());
    }

    #[test]
    fn test_open_invalid_path() {
        let result = GitRepository::open(PathBuf::from("/nonexistent/path"));
        assert!(result.is_err(), "opening a missing path should fail");
    }

    #[test]
    fn test_ref_exists() {
        let (_temp_dir, repo_path) = create_test_repo().expect("Failed to create test repo");
        let commit = commit_file(&repo_path, "main.go", "package main\n").expect("commit");

        let repo = GitRepository::open(repo_path).expect("Failed to open repo");
        assert!(repo.ref_exists(&commit));
        assert!(repo.ref_exists("HEAD"));
        assert!(!repo.ref_exists("no-such-branch"));
        assert!(!repo.ref_exists(""));
    }

    #[test]
    fn test_changed_files_between_revisions() {
        let (_temp_dir, repo_path) = create_test_repo().expect("Failed to create test repo");
        std::fs::write(repo_path.join("old.php"), "<?php\n").expect("write");
        let start = commit_file(&repo_path, "kept.go", "package main\n").expect("commit");

        std::fs::remove_file(repo_path.join("old.php")).expect("remove");
        std::fs::write(repo_path.join("new.js"), "function A() {}\n").expect("write");
        let end = commit_file(&repo_path, "kept.go", "package main\n\nfunc A() {}\n")
            .expect("commit");

        let repo = GitRepository::open(repo_path).expect("Failed to open repo");
        let files = repo.changed_files(&start, &end).expect("changed files");

        let summary: Vec<(String, FileStatus)> =
            files.into_iter().map(|f| (f.name, f.status)).collect();
        assert_eq!(
            summary,
            vec![
                ("kept.go".to_string(), FileStatus::Modified),
                ("new.js".to_string(), FileStatus::Added),
                ("old.php".to_string(), FileStatus::Deleted),
            ]
        );
    }

    #[test]
    fn test_changed_files_report_full_paths() {
        let (_temp_dir, repo_path) = create_test_repo().expect("Failed to create test repo");
        std::fs::create_dir_all(repo_path.join("src/api")).expect("mkdir");
        let start = commit_file(&repo_path, "src/api/handler.go", "package api\n").expect("commit");
        let end = commit_file(
            &repo_path,
            "src/api/handler.go",
            "package api\n\nfunc Serve() {}\n",
        )
        .expect("commit");

        let repo = GitRepository::open(repo_path).expect("Failed to open repo");
        let files = repo.changed_files(&start, &end).expect("changed files");

        assert_eq!(
            files,
            vec![ChangedFile::new("src/api/handler.go", FileStatus::Modified)]
        );
        assert_eq!(files[0].language, Language::Go);
    }

    #[test]
    fn test_unified_diff_and_contents() {
        let (_temp_dir, repo_path) = create_test_repo().expect("Failed to create test repo");
        let start = commit_file(&repo_path, "api.go", "package api\n\nfunc Get(id int) {}\n")
            .expect("commit");
        let end = commit_file(&repo_path, "api.go", "package api\n\nfunc Get(id string) {}\n")
            .expect("commit");

        let repo = GitRepository::open(repo_path).expect("Failed to open repo");
        let diff = repo.unified_diff(&start, &end, "api.go").expect("diff");
        assert!(diff.contains(&"-func Get(id int) {}".to_string()));
        assert!(diff.contains(&"+func Get(id string) {}".to_string()));

        let contents = repo.file_contents_at(&start, "api.go").expect("contents");
        assert_eq!(contents[2], "func Get(id int) {}");

        assert!(repo.file_contents_at(&start, "missing.go").is_err());
        assert!(repo.unified_diff("no-such-ref", &end, "api.go").is_err());
    }
}
