// ==========================================
// 建筑碳排放计算引擎 - 命令行入口
// ==========================================
// 报告输出到 stdout,日志输出到 stderr
// ==========================================

use anyhow::Context;
use carbon_construct::api::{CalculationApi, FactorApi};
use carbon_construct::cli::{parse_args, CliArgs, Command, OutputFormat};
use carbon_construct::config::{default_factor_db_path, ConfigManager};
use carbon_construct::domain::input::CalculationInput;
use carbon_construct::i18n::{set_locale, t, t_with_args};
use carbon_construct::logging::{self, LogFormat};
use carbon_construct::{export, AppConfig};
use std::io::Write;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("{}", t("cli.usage"));
            std::process::exit(2);
        }
    };

    logging::init_with_format(if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    let config = load_config(&args)?;
    set_locale(&config.locale);

    tracing::info!(
        version = carbon_construct::VERSION,
        locale = %config.locale,
        transport_basis = %config.transport_basis,
        "{}",
        carbon_construct::APP_NAME
    );

    match &args.command {
        Command::Help => {
            println!("{}", t("cli.usage"));
            Ok(())
        }
        Command::Calculate { input } => run_calculate(&args, &config, input).await,
        Command::Compare {
            baseline,
            candidate,
        } => run_compare(&args, &config, baseline, candidate).await,
        Command::ImportFactors { sheet, db } => {
            let db_path = db.clone().unwrap_or_else(default_factor_db_path);
            if let Some(parent) = db_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("无法创建目录: {}", parent.display()))?;
            }
            let response = FactorApi::new(db_path.to_string_lossy().to_string())
                .import_factor_sheet(sheet)
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}

fn load_config(args: &CliArgs) -> anyhow::Result<AppConfig> {
    let manager = match &args.config {
        Some(path) => ConfigManager::new(path.clone()),
        None => ConfigManager::with_default_path(),
    };
    let config = manager
        .load()
        .with_context(|| format!("加载配置失败: {}", manager.config_path().display()))?;
    Ok(args.apply_to(config))
}

fn read_input(path: &Path) -> anyhow::Result<CalculationInput> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取输入文件: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("输入文件格式错误: {}", path.display()))
}

async fn run_calculate(args: &CliArgs, config: &AppConfig, input: &Path) -> anyhow::Result<()> {
    let api = CalculationApi::from_config(config);
    let input = read_input(input)?;

    let tables = api.factor_tables().await?;
    tracing::info!(
        "{}",
        t_with_args(
            "cli.factors_loaded",
            &[
                ("count", &tables.total_entries().to_string()),
                ("source", &api.catalog().source_name()),
            ]
        )
    );

    let report = api.calculate(input).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => writeln!(out, "{}", export::report_to_json(&report)?)?,
        OutputFormat::Csv => export::write_report_csv(&report, &mut out)?,
        OutputFormat::Text => write!(out, "{}", export::render_text(&report))?,
    }
    Ok(())
}

async fn run_compare(
    args: &CliArgs,
    config: &AppConfig,
    baseline: &Path,
    candidate: &Path,
) -> anyhow::Result<()> {
    let api = CalculationApi::from_config(config);
    let response = api
        .compare_scenarios(read_input(baseline)?, read_input(candidate)?)
        .await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?,
        OutputFormat::Csv => export::write_comparison_csv(&response.comparison, &mut out)?,
        OutputFormat::Text => write!(
            out,
            "{}",
            export::render_comparison_text(&response.comparison)
        )?,
    }
    Ok(())
}
