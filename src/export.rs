// ==========================================
// 建筑碳排放计算引擎 - 报告导出
// ==========================================
// 格式: JSON（全精度）/ CSV（保留 2 位小数）/ 文本摘要（随语言切换）
// 取整只发生在导出时,计算结果本身保持全精度
// ==========================================

use crate::domain::types::EmissionCategory;
use crate::engine::comparison::ScenarioComparison;
use crate::engine::report::{round_to, CalculationReport};
use crate::i18n::{t, t_with_args};
use std::fmt::Write as _;
use std::io::Write;

/// CSV 表头
pub const CSV_HEADER: [&str; 5] = ["category", "key", "display_name", "unit", "emissions_kg_co2e"];

/// 导出取整位数
pub const EXPORT_DECIMALS: u32 = 2;

/// 文本摘要中列出的主要排放项个数
const TOP_CONTRIBUTORS: usize = 5;

/// 报告 → 格式化 JSON
pub fn report_to_json(report: &CalculationReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// 报告 → CSV
///
/// 行顺序: 行项目（按计算顺序）→ 各类别小计 → 合计
pub fn write_report_csv<W: Write>(report: &CalculationReport, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for item in &report.line_items {
        wtr.write_record([
            item.category.as_str(),
            item.key.as_str(),
            item.display_name.as_str(),
            item.unit.as_str(),
            &format_value(item.emissions),
        ])?;
    }

    for category in EmissionCategory::ALL {
        wtr.write_record([
            category.as_str(),
            "",
            "subtotal",
            "",
            &format_value(report.result.category_total(category)),
        ])?;
    }

    wtr.write_record([
        "total",
        "",
        "total",
        "",
        &format_value(report.result.total_emissions),
    ])?;

    wtr.flush()?;
    Ok(())
}

/// 报告 → 当前语言的文本摘要
pub fn render_text(report: &CalculationReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", t("report.title"));
    let _ = writeln!(
        out,
        "{}",
        t_with_args("report.basis", &[("basis", report.transport_basis.as_str())])
    );
    let _ = writeln!(
        out,
        "{}",
        t_with_args(
            "report.total",
            &[("value", &format_value(report.result.total_emissions))]
        )
    );

    for category in EmissionCategory::ALL {
        let _ = writeln!(
            out,
            "{}",
            t_with_args(
                "report.category_line",
                &[
                    ("category", &t(&format!("category.{}", category.as_str()))),
                    ("value", &format_value(report.result.category_total(category))),
                    ("share", &format_value(report.category_shares.get(category))),
                ]
            )
        );
    }

    let top = report.top_contributors(TOP_CONTRIBUTORS);
    if !top.is_empty() {
        let _ = writeln!(out, "{}", t("report.top_contributors"));
        for (rank, item) in top.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}",
                t_with_args(
                    "report.contributor_line",
                    &[
                        ("rank", &(rank + 1).to_string()),
                        ("name", &item.display_name),
                        ("key", &item.key),
                        ("value", &format_value(item.emissions)),
                    ]
                )
            );
        }
    }

    if report.has_warnings() {
        let _ = writeln!(out, "{}", t("report.warnings"));
        for warning in &report.warnings {
            let _ = writeln!(out, "  - {}", warning.describe());
        }
    }

    out
}

/// 方案对比 → CSV（每个分项键一行,最后为合计行）
pub fn write_comparison_csv<W: Write>(comparison: &ScenarioComparison, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["category", "key", "baseline", "candidate", "delta"])?;

    for delta in &comparison.key_deltas {
        wtr.write_record([
            delta.category.as_str(),
            delta.key.as_str(),
            &format_value(delta.before),
            &format_value(delta.after),
            &format_value(delta.delta),
        ])?;
    }

    wtr.write_record([
        "total",
        "",
        &format_value(comparison.baseline_total),
        &format_value(comparison.candidate_total),
        &format_value(comparison.total_delta),
    ])?;

    wtr.flush()?;
    Ok(())
}

/// 方案对比 → 当前语言的文本摘要
pub fn render_comparison_text(comparison: &ScenarioComparison) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", t("comparison.title"));
    let _ = writeln!(
        out,
        "{}",
        t_with_args(
            "comparison.total",
            &[
                ("baseline", &format_value(comparison.baseline_total)),
                ("candidate", &format_value(comparison.candidate_total)),
                ("delta", &format_signed(comparison.total_delta)),
            ]
        )
    );

    if let Some(pct) = comparison.percent_change {
        let _ = writeln!(
            out,
            "{}",
            t_with_args("comparison.percent", &[("pct", &format_signed(pct))])
        );
    }

    if let Some(largest) = comparison.largest_change() {
        let _ = writeln!(
            out,
            "{}",
            t_with_args(
                "comparison.largest_change",
                &[
                    ("category", &t(&format!("category.{}", largest.category.as_str()))),
                    ("key", &largest.key),
                    ("delta", &format_signed(largest.delta)),
                ]
            )
        );
    }

    out
}

fn format_signed(value: f64) -> String {
    let rounded = round_to(value, EXPORT_DECIMALS);
    if rounded > 0.0 {
        format!("+{:.*}", EXPORT_DECIMALS as usize, rounded)
    } else {
        format!("{:.*}", EXPORT_DECIMALS as usize, rounded)
    }
}

fn format_value(value: f64) -> String {
    format!("{:.*}", EXPORT_DECIMALS as usize, round_to(value, EXPORT_DECIMALS))
}
