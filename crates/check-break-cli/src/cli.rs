//! 命令行接口模块
//!
//! 提供命令行参数解析和用户交互功能

use check_break_core::{CheckBreakError, OutputFormat, Result, RevisionPair};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// check-break - 兼容性破坏检测工具
///
/// 比较两个 Git 修订版本，报告被删除或签名被修改的公开声明。
#[derive(Parser, Debug)]
#[command(name = "check-break")]
#[command(author = "check-break contributors")]
#[command(version = "0.1.0")]
#[command(about = "Detects potential API compatibility breaks between two Git revisions")]
#[command(
    long_about = "check-break compares two revisions of a Git repository and reports public declarations (Go, PHP, Java, JavaScript, shell) that were removed or whose signature changed in a way that may break callers."
)]
pub struct Cli {
    /// 要分析的路径
    #[arg(
        short = 'p',
        long = "path",
        default_value = ".",
        help = "Path to analyse",
        value_name = "PATH"
    )]
    pub path: PathBuf,

    /// 起始修订版本
    #[arg(
        short = 's',
        long = "start",
        help = "Git starting point (commit, branch or tag)",
        value_name = "REVISION"
    )]
    pub start: String,

    /// 结束修订版本
    #[arg(
        short = 'e',
        long = "end",
        help = "Git ending point (commit, branch or tag)",
        value_name = "REVISION"
    )]
    pub end: String,

    /// 配置文件路径
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Config file (defaults to cb-config.json in the analysed path, when present)"
    )]
    pub config: Option<PathBuf>,

    /// 输出格式
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value_t = OutputFormatArg::PlainText,
        help = "Output format for the report"
    )]
    pub format: OutputFormatArg,

    /// 禁用颜色
    #[arg(long = "no-color", help = "Disable colored output")]
    pub no_color: bool,

    /// 输出到文件
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write the report to a file instead of stdout"
    )]
    pub output_file: Option<PathBuf>,

    /// 详细输出
    #[arg(short = 'v', long = "verbose", help = "Enable verbose logging output")]
    pub verbose: bool,
}

/// 输出格式命令行参数
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormatArg {
    /// 纯文本格式输出
    #[value(name = "text")]
    PlainText,
    /// Markdown 格式输出
    #[value(name = "markdown")]
    Markdown,
    /// JSON 格式输出
    #[value(name = "json")]
    Json,
}

/// 应用程序配置信息
#[derive(Debug, Clone)]
pub struct Config {
    /// 要分析的路径
    pub path: PathBuf,
    /// 修订版本对
    pub revisions: RevisionPair,
    /// 配置文件路径
    pub config_file: Option<PathBuf>,
    /// 输出格式
    pub output_format: OutputFormat,
    /// 是否启用颜色
    pub enable_colors: bool,
    /// 输出文件路径
    pub output_file: Option<PathBuf>,
    /// 是否启用详细输出
    pub verbose: bool,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::PlainText => OutputFormat::PlainText,
            OutputFormatArg::Markdown => OutputFormat::Markdown,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        // 写入文件时不输出终端颜色
        let enable_colors = !cli.no_color && cli.output_file.is_none();
        Config {
            path: cli.path,
            revisions: RevisionPair::new(cli.start, cli.end),
            config_file: cli.config,
            output_format: cli.format.into(),
            enable_colors,
            output_file: cli.output_file,
            verbose: cli.verbose,
        }
    }
}

impl Cli {
    /// 解析命令行参数
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// 验证参数的有效性
    pub fn validate(&self) -> Result<()> {
        if self.start.trim().is_empty() {
            return Err(CheckBreakError::UnknownRevision(
                "Starting point is missing".to_string(),
            ));
        }

        if self.end.trim().is_empty() {
            return Err(CheckBreakError::UnknownRevision(
                "Ending point is missing".to_string(),
            ));
        }

        if !self.path.is_dir() {
            return Err(CheckBreakError::InvalidPath(
                self.path.display().to_string(),
            ));
        }

        // 验证并创建输出文件路径 (如果指定)
        if let Some(output_file) = &self.output_file {
            if let Some(parent) = output_file.parent() {
                // 只有当父目录不是空路径时才检查和创建
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        CheckBreakError::IoError(std::io::Error::new(
                            e.kind(),
                            format!(
                                "Failed to create output directory {}: {}",
                                parent.display(),
                                e
                            ),
                        ))
                    })?;
                }
            }
        }

        Ok(())
    }
}
