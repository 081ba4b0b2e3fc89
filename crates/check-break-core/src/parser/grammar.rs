//! 签名语法注册表
//!
//! 将文件扩展名映射到语言，再将语言映射到识别公开声明头部的正则表达式

use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;

static GO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\s*func( \(.+\))? [A-Z][A-Za-z]*\("));

static PHP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^\s*public( static)? function [_A-Za-z]+\(|^\s*function [_A-Za-z]+\(")
});

static JAVA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\s*public( static)?( .+)? [A-Za-z]+\("));

static JAVASCRIPT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^\s*function [A-Za-z]+\(|^\s*(var )?[A-Za-z._]+\s*=\s*function \(|^\s*[A-Za-z._]+\s*:\s*function \(",
    )
});

static SHELL_PATTERN: LazyLock<Regex> = LazyLock::new(|| compile(r"^\s*function [A-Za-z_]+\("));

/// 所有模式都是编译期常量，编译失败属于程序缺陷
fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => panic!("invalid built-in signature pattern {pattern}: {e}"),
    }
}

/// 支持的编程语言枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    Php,
    Java,
    JavaScript,
    Shell,
    /// 没有已知声明语法的语言
    Unsupported,
}

impl Language {
    /// 根据扩展名（不含前导点，区分大小写）检测语言
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "go" => Language::Go,
            "php" => Language::Php,
            "java" => Language::Java,
            "js" => Language::JavaScript,
            "sh" => Language::Shell,
            _ => Language::Unsupported,
        }
    }

    /// 根据文件路径检测语言
    ///
    /// 文件名必须包含点且不能以点开头，扩展名取最后一个点之后的部分。
    pub fn from_path(path: &str) -> Self {
        let file_name = Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(path);

        if file_name.starts_with('.') {
            return Language::Unsupported;
        }

        match file_name.rsplit_once('.') {
            Some((_, extension)) => Self::from_extension(extension.trim()),
            None => Language::Unsupported,
        }
    }

    /// 获取识别公开声明头部的模式
    pub fn pattern(self) -> Option<&'static Regex> {
        match self {
            Language::Go => Some(&*GO_PATTERN),
            Language::Php => Some(&*PHP_PATTERN),
            Language::Java => Some(&*JAVA_PATTERN),
            Language::JavaScript => Some(&*JAVASCRIPT_PATTERN),
            Language::Shell => Some(&*SHELL_PATTERN),
            Language::Unsupported => None,
        }
    }
}
