//! check-break - 兼容性破坏检测工具
//!
//! 比较两个 Git 修订版本，报告可能破坏兼容性的公开声明变更。

mod cli;

use check_break_core::{BreakDetector, FormatterConfig, OutputRenderer, Result};
use cli::{Cli, Config};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    // 解析命令行参数
    let cli = Cli::parse_args();

    // 初始化日志记录，日志写到 stderr，stdout 只输出报告
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // 验证参数
    if let Err(e) = cli.validate() {
        error!("Invalid arguments: {}", e);
        eprintln!("Init failed : {e}");
        std::process::exit(1);
    }

    let config: Config = cli.into();

    if config.verbose {
        debug!(
            "Configuration: path={}, start={}, end={}, format={:?}",
            config.path.display(),
            config.revisions.start,
            config.revisions.end,
            config.output_format
        );
    }

    // 运行主要逻辑
    if let Err(e) = run(config) {
        error!("Application error: {}", e);
        eprintln!("{e}");
        std::process::exit(1);
    }

    info!("Analysis completed successfully");
}

/// 主要应用逻辑
fn run(config: Config) -> Result<()> {
    info!("Analyzing repository at {}", config.path.display());

    // 1. 打开仓库并完成启动校验
    let detector = BreakDetector::open(
        &config.path,
        config.revisions.clone(),
        config.config_file.as_deref(),
    )?;

    // 2. 生成破坏报告
    let report = detector.report()?;

    // 3. 格式化输出
    let renderer = OutputRenderer::new(FormatterConfig {
        output_format: config.output_format,
        enable_colors: config.enable_colors,
    });
    let output = renderer.render(&report, detector.revisions())?;
    debug!(
        "Rendered {} potential breaks, config file used: {}",
        report.break_count(),
        report.configured
    );

    match &config.output_file {
        Some(path) => {
            output.save_to_file(path)?;
            info!("Report written to {}", path.display());
        }
        None => print!("{}", output.content),
    }

    Ok(())
}
