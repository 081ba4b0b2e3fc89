//! 输出格式化模块
//!
//! 将破坏报告渲染为纯文本、Markdown 或 JSON

use crate::error::{CheckBreakError, Result};
use crate::git::RevisionPair;
use crate::report::{BreakReport, FileReport};
use serde::{Deserialize, Serialize};

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    PlainText,
    Markdown,
    Json,
}

/// 输出格式化器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatterConfig {
    /// 输出格式
    pub output_format: OutputFormat,
    /// 是否启用颜色输出（仅对纯文本有效）
    pub enable_colors: bool,
}

/// 输出渲染器
pub struct OutputRenderer {
    config: FormatterConfig,
    theme: ColorTheme,
}

/// 格式化结果
#[derive(Debug, Clone)]
pub struct FormattedOutput {
    /// 格式化后的内容
    pub content: String,
    /// 输出格式
    pub format: OutputFormat,
}

/// 颜色主题
#[derive(Debug, Clone)]
pub struct ColorTheme {
    /// 文件名颜色
    pub file_name: String,
    /// 旧签名颜色
    pub before: String,
    /// 新签名颜色
    pub after: String,
    pub reset: String,
}

/// JSON 输出的顶层结构
#[derive(Serialize)]
struct JsonReport<'a> {
    revisions: &'a RevisionPair,
    #[serde(flatten)]
    report: &'a BreakReport,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::PlainText,
            enable_colors: true,
        }
    }
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            file_name: "\x1b[36m".to_string(), // 青色
            before: "\x1b[31m".to_string(),    // 红色
            after: "\x1b[32m".to_string(),     // 绿色
            reset: "\x1b[0m".to_string(),
        }
    }
}

impl OutputRenderer {
    /// 创建新的输出渲染器
    pub fn new(config: FormatterConfig) -> Self {
        Self {
            config,
            theme: ColorTheme::default(),
        }
    }

    /// 渲染破坏报告
    pub fn render(&self, report: &BreakReport, revisions: &RevisionPair) -> Result<FormattedOutput> {
        let content = match self.config.output_format {
            OutputFormat::PlainText => self.render_plain_text(report, revisions),
            OutputFormat::Markdown => self.render_markdown(report, revisions),
            OutputFormat::Json => self.render_json(report, revisions)?,
        };

        Ok(FormattedOutput {
            content,
            format: self.config.output_format,
        })
    }

    /// 渲染为纯文本格式
    fn render_plain_text(&self, report: &BreakReport, revisions: &RevisionPair) -> String {
        let mut output = String::new();

        let title = format!("Check-break report : {} {}", revisions.start, revisions.end);
        output.push_str(&title);
        output.push('\n');
        output.push_str(&"#".repeat(title.len()));
        output.push_str("\n\n");
        output.push_str(configuration_status(report));
        output.push_str("\n\n");

        if !report.has_breaks() {
            output.push_str("> No compatibility break\n");
        } else {
            output.push_str("> Potentials compatibility breaks\n");
            for file_report in &report.supported {
                output.push_str(&self.format_file_report(file_report));
                output.push('\n');
            }
        }

        if !report.ignored.is_empty() {
            output.push_str("\n> Unsupported files :\n");
            for file in &report.ignored {
                output.push_str(&format!(">> {}\n", self.paint(&file.name, &self.theme.file_name)));
            }
        }

        if !report.exclusions.is_empty() {
            output.push_str("\n> Excluded paths :\n");
            for exclusion in &report.exclusions {
                output.push_str(&format!(">> {exclusion}\n"));
            }
        }

        output
    }

    /// 格式化单个文件的破坏列表
    fn format_file_report(&self, file_report: &FileReport) -> String {
        let mut output = format!(
            ">> {}\n",
            self.paint(&format!("{} :", file_report.filename), &self.theme.file_name)
        );

        for found in &file_report.breaks {
            let before = self.paint(&found.before, &self.theme.before);
            let change = if found.after.is_empty() {
                before
            } else {
                format!("{before} -> {}", self.paint(&found.after, &self.theme.after))
            };
            output.push_str(&format!("{} : {change}\n", found.reason));
        }

        output
    }

    /// 渲染为Markdown格式
    fn render_markdown(&self, report: &BreakReport, revisions: &RevisionPair) -> String {
        let mut output = format!(
            "# Check-break report: `{}`..`{}`\n\n",
            revisions.start, revisions.end
        );
        output.push_str(&format!("_{}_\n\n", configuration_status(report)));

        if !report.has_breaks() {
            output.push_str("No compatibility break.\n");
        } else {
            output.push_str("## Potential compatibility breaks\n");
            for file_report in &report.supported {
                output.push_str(&format!("\n### `{}`\n\n", file_report.filename));
                for found in &file_report.breaks {
                    if found.after.is_empty() {
                        output.push_str(&format!("- **{}**: `{}`\n", found.reason, found.before));
                    } else {
                        output.push_str(&format!(
                            "- **{}**: `{}` → `{}`\n",
                            found.reason, found.before, found.after
                        ));
                    }
                }
            }
        }

        if !report.ignored.is_empty() {
            output.push_str("\n## Unsupported files\n\n");
            for file in &report.ignored {
                output.push_str(&format!("- `{}`\n", file.name));
            }
        }

        if !report.exclusions.is_empty() {
            output.push_str("\n## Excluded paths\n\n");
            for exclusion in &report.exclusions {
                output.push_str(&format!("- `{exclusion}`\n"));
            }
        }

        output
    }

    /// 渲染为JSON格式
    fn render_json(&self, report: &BreakReport, revisions: &RevisionPair) -> Result<String> {
        let json = JsonReport { revisions, report };
        serde_json::to_string_pretty(&json)
            .map(|mut content| {
                content.push('\n');
                content
            })
            .map_err(|e| CheckBreakError::RenderError(format!("Failed to serialize report: {e}")))
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.config.enable_colors {
            format!("{color}{text}{}", self.theme.reset)
        } else {
            text.to_string()
        }
    }
}

impl FormattedOutput {
    /// 保存到文件
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        std::fs::write(path, &self.content).map_err(CheckBreakError::IoError)?;
        Ok(())
    }
}

/// 报告头部说明本次运行是否使用了配置文件
fn configuration_status(report: &BreakReport) -> &'static str {
    if report.configured {
        "Using a config file"
    } else {
        "No config file found, checking without one"
    }
}
