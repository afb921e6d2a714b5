// ==========================================
// 建筑碳排放计算引擎 - 命令行参数
// ==========================================
// 用法:
//   carbon-construct <input.json> [options]
//     --lenient / --strict              校验模式
//     --skip-unknown / --abort-unknown  未知因子键策略
//   carbon-construct compare <baseline.json> <candidate.json> [options]
//   carbon-construct import-factors <sheet> [--db PATH]
// ==========================================

use crate::config::app_config::{AppConfig, FactorSource, UnknownKeyPolicy};
use crate::domain::types::TransportBasis;
use crate::engine::validation::ValidationMode;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CliError {
    #[error("缺少参数: {0}")]
    MissingArgument(String),

    #[error("未知选项: {0}")]
    UnknownFlag(String),

    #[error("选项 {flag} 的值无效 ({value}): {message}")]
    InvalidValue {
        flag: String,
        value: String,
        message: String,
    },

    #[error("多余的参数: {0}")]
    UnexpectedArgument(String),
}

/// 报告输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("未知输出格式: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Calculate {
        input: PathBuf,
    },
    Compare {
        baseline: PathBuf,
        candidate: PathBuf,
    },
    ImportFactors {
        sheet: PathBuf,
        db: Option<PathBuf>,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub command: Command,
    pub format: OutputFormat,
    pub factors: Option<String>,
    pub basis: Option<TransportBasis>,
    pub validation_mode: Option<ValidationMode>,
    pub unknown_key_policy: Option<UnknownKeyPolicy>,
    pub locale: Option<String>,
    pub config: Option<PathBuf>,
    pub log_json: bool,
}

impl CliArgs {
    /// 命令行选项覆盖配置（优先级最高）
    pub fn apply_to(&self, mut config: AppConfig) -> AppConfig {
        if let Some(factors) = &self.factors {
            config.factor_source = FactorSource::from_path_str(factors);
        }
        if let Some(basis) = self.basis {
            config.transport_basis = basis;
        }
        if let Some(mode) = self.validation_mode {
            config.validation_mode = mode;
        }
        if let Some(policy) = self.unknown_key_policy {
            config.unknown_key_policy = policy;
        }
        if let Some(locale) = &self.locale {
            config.locale = locale.clone();
        }
        config
    }
}

/// 解析命令行参数（不含程序名）
pub fn parse_args<I>(args: I) -> Result<CliArgs, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut positional: Vec<String> = Vec::new();
    let mut format = OutputFormat::default();
    let mut factors = None;
    let mut basis = None;
    let mut validation_mode = None;
    let mut unknown_key_policy = None;
    let mut locale = None;
    let mut config = None;
    let mut db = None;
    let mut log_json = false;
    let mut help = false;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => help = true,
            // 成对的开关,后出现者生效
            "--lenient" => validation_mode = Some(ValidationMode::Clamp),
            "--strict" => validation_mode = Some(ValidationMode::Strict),
            "--skip-unknown" => unknown_key_policy = Some(UnknownKeyPolicy::SkipWithWarning),
            "--abort-unknown" => unknown_key_policy = Some(UnknownKeyPolicy::Abort),
            "--log-json" => log_json = true,
            "--format" => {
                let value = take_value(&mut iter, &arg)?;
                format = parse_flag_value(&arg, &value)?;
            }
            "--basis" => {
                let value = take_value(&mut iter, &arg)?;
                basis = Some(parse_flag_value(&arg, &value)?);
            }
            "--factors" => factors = Some(take_value(&mut iter, &arg)?),
            "--locale" => locale = Some(take_value(&mut iter, &arg)?),
            "--config" => config = Some(PathBuf::from(take_value(&mut iter, &arg)?)),
            "--db" => db = Some(PathBuf::from(take_value(&mut iter, &arg)?)),
            flag if flag.starts_with("--") => return Err(CliError::UnknownFlag(flag.to_string())),
            _ => positional.push(arg),
        }
    }

    let command = if help {
        Command::Help
    } else {
        build_command(positional, db)?
    };

    Ok(CliArgs {
        command,
        format,
        factors,
        basis,
        validation_mode,
        unknown_key_policy,
        locale,
        config,
        log_json,
    })
}

fn build_command(positional: Vec<String>, db: Option<PathBuf>) -> Result<Command, CliError> {
    let mut positional = positional.into_iter();
    let first = positional
        .next()
        .ok_or_else(|| CliError::MissingArgument("<input.json>".to_string()))?;

    let command = match first.as_str() {
        "compare" => {
            let baseline = positional
                .next()
                .ok_or_else(|| CliError::MissingArgument("<baseline.json>".to_string()))?;
            let candidate = positional
                .next()
                .ok_or_else(|| CliError::MissingArgument("<candidate.json>".to_string()))?;
            Command::Compare {
                baseline: PathBuf::from(baseline),
                candidate: PathBuf::from(candidate),
            }
        }
        "import-factors" => {
            let sheet = positional
                .next()
                .ok_or_else(|| CliError::MissingArgument("<sheet>".to_string()))?;
            Command::ImportFactors {
                sheet: PathBuf::from(sheet),
                db,
            }
        }
        _ => Command::Calculate {
            input: PathBuf::from(first),
        },
    };

    if let Some(extra) = positional.next() {
        return Err(CliError::UnexpectedArgument(extra));
    }
    Ok(command)
}

fn take_value<I>(iter: &mut I, flag: &str) -> Result<String, CliError>
where
    I: Iterator<Item = String>,
{
    iter.next()
        .filter(|v| !v.starts_with("--"))
        .ok_or_else(|| CliError::MissingArgument(format!("{} 的值", flag)))
}

fn parse_flag_value<T>(flag: &str, value: &str) -> Result<T, CliError>
where
    T: FromStr<Err = String>,
{
    value.parse::<T>().map_err(|message| CliError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
        message,
    })
}
