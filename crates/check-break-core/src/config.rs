//! 配置模块
//!
//! 从 JSON 配置文件加载路径排除规则

use crate::error::{CheckBreakError, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// 被分析路径下的默认配置文件名
pub const DEFAULT_CONFIG_FILENAME: &str = "cb-config.json";

/// check-break 配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub excluded: Excluded,
}

/// 排除规则，路径按前缀匹配
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Excluded {
    pub path: Option<String>,
    pub paths: Vec<String>,
}

impl Config {
    /// 从 JSON 文本解析配置
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| CheckBreakError::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CheckBreakError::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    /// 解析要使用的配置
    ///
    /// 显式指定的配置文件必须可读；否则查找工作路径下的默认配置文件，
    /// 不存在时返回 `None`。
    pub fn discover(working_path: &Path, explicit: Option<&Path>) -> Result<Option<Self>> {
        if let Some(path) = explicit {
            return Self::from_file(path).map(Some);
        }

        let default_path = working_path.join(DEFAULT_CONFIG_FILENAME);
        if !default_path.is_file() {
            debug!("No configuration found at {}", default_path.display());
            return Ok(None);
        }

        Self::from_file(&default_path).map(Some)
    }

    /// 所有非空的排除前缀
    pub fn exclusions(&self) -> BTreeSet<String> {
        self.excluded
            .path
            .iter()
            .chain(&self.excluded.paths)
            .filter(|prefix| !prefix.is_empty())
            .cloned()
            .collect()
    }
}
