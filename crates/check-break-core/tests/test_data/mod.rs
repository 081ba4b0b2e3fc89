//! 测试数据集模块
//!
//! 提供基于真实 Git 仓库的测试夹具

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// 临时 Git 仓库
pub struct TestRepo {
    pub temp_dir: TempDir,
}

impl TestRepo {
    /// 初始化仓库并配置提交用户
    pub fn init() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let repo = Self { temp_dir };

        repo.git(&["init"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path_buf(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// 运行 git 命令并返回去掉首尾空白的标准输出
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("Failed to run git");

        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// 写入文件（自动创建父目录）
    pub fn write(&self, name: &str, content: &str) {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directory");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    pub fn remove(&self, name: &str) {
        std::fs::remove_file(self.path().join(name)).expect("Failed to remove file");
    }

    /// 提交工作区所有变更并返回提交哈希
    pub fn commit(&self, message: &str) -> String {
        self.git(&["add", "-A"]);
        self.git(&["commit", "-m", message]);
        self.git(&["rev-parse", "HEAD"])
    }
}

pub const GO_BEFORE: &str = r#"package store

// Open opens a store
func Open(path string) (*Store, error) {
	return nil, nil
}

func (s *Store) Get(key string) ([]byte, error) {
	return nil, nil
}

func (s *Store) Close() error {
	return nil
}

func helper(x int) int {
	return x
}
"#;

pub const GO_AFTER: &str = r#"package store

func (s *Store) Close() error {
	return nil
}

// Open opens a store
func Open(path string, readOnly bool) (*Store, error) {
	return nil, nil
}

func helper(x int, y int) int {
	return x + y
}
"#;

pub const JS_BEFORE: &str = r#"var api = {};
api.render = function (node, opts) {
  return node;
};
function parse(text) {
  return text;
}
"#;

pub const JS_AFTER: &str = r#"var api = {};
api.render = function (node, opts, theme = "light") {
  return node;
};
function parse(text) {
  return text.trim();
}
"#;

pub const JAVA_SOURCE: &str = r#"package demo;

public class Greeter {
    public String greet(String name) {
        return "Hello " + name;
    }

    public static Greeter create() {
        return new Greeter();
    }
}
"#;
