// ==========================================
// 建筑碳排放计算引擎 - 计算API
// ==========================================
// 流程: 加载因子表 → 输入校验 → 未知键策略 → 计算 → 生成报告
// 红线: 引擎失败关闭,跳过未知键只在调用方侧发生且必须留下警告
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::app_config::{AppConfig, UnknownKeyPolicy};
use crate::domain::factor::FactorTables;
use crate::domain::input::CalculationInput;
use crate::domain::types::{EmissionCategory, TransportBasis};
use crate::engine::calculator::EmissionCalculator;
use crate::engine::comparison::{compare, ScenarioComparison};
use crate::engine::report::CalculationReport;
use crate::engine::validation::{CalculationWarning, InputValidator};
use crate::perf::PerfGuard;
use crate::provider::catalog::FactorCatalog;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 命名方案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub input: CalculationInput,
}

impl Scenario {
    pub fn new(name: impl Into<String>, input: CalculationInput) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }
}

/// 单个方案的计算报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub name: String,
    pub report: CalculationReport,
}

/// 方案对比响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    pub baseline: CalculationReport,
    pub candidate: CalculationReport,
    pub comparison: ScenarioComparison,
}

// ==========================================
// CalculationApi - 计算API
// ==========================================
pub struct CalculationApi {
    catalog: Arc<FactorCatalog>,
    pipeline: Pipeline,
}

/// 单个输入的处理步骤（可复制到后台任务中执行）
#[derive(Debug, Clone, Copy, Default)]
struct Pipeline {
    calculator: EmissionCalculator,
    validator: InputValidator,
    unknown_key_policy: UnknownKeyPolicy,
}

impl CalculationApi {
    /// 默认口径/严格校验/遇未知键中止
    pub fn new(catalog: Arc<FactorCatalog>) -> Self {
        Self {
            catalog,
            pipeline: Pipeline::default(),
        }
    }

    /// 按应用配置创建（因子来源、口径、校验、未知键策略）
    pub fn from_config(config: &AppConfig) -> Self {
        let catalog = Arc::new(FactorCatalog::from_source(&config.factor_source));
        Self::new(catalog)
            .with_transport_basis(config.transport_basis)
            .with_validator(InputValidator::new(config.limits, config.validation_mode))
            .with_unknown_key_policy(config.unknown_key_policy)
    }

    pub fn with_transport_basis(mut self, basis: TransportBasis) -> Self {
        self.pipeline.calculator = EmissionCalculator::with_transport_basis(basis);
        self
    }

    pub fn with_validator(mut self, validator: InputValidator) -> Self {
        self.pipeline.validator = validator;
        self
    }

    pub fn with_unknown_key_policy(mut self, policy: UnknownKeyPolicy) -> Self {
        self.pipeline.unknown_key_policy = policy;
        self
    }

    pub fn transport_basis(&self) -> TransportBasis {
        self.pipeline.calculator.transport_basis()
    }

    pub fn unknown_key_policy(&self) -> UnknownKeyPolicy {
        self.pipeline.unknown_key_policy
    }

    pub fn catalog(&self) -> &Arc<FactorCatalog> {
        &self.catalog
    }

    /// 当前使用的因子表（首次调用触发加载）
    pub async fn factor_tables(&self) -> ApiResult<Arc<FactorTables>> {
        Ok(self.catalog.tables().await?)
    }

    // ==========================================
    // 计算接口
    // ==========================================

    /// 计算单个输入并生成报告
    ///
    /// # 返回
    /// - Ok(CalculationReport): 汇总、明细、占比与警告
    /// - Err(InputOutOfRange / InvalidInput): 输入校验失败
    /// - Err(UnknownFactorKey): Abort 策略下遇到未知键
    /// - Err(FactorSourceError / ImportError / DatabaseError): 因子表加载失败
    pub async fn calculate(&self, input: CalculationInput) -> ApiResult<CalculationReport> {
        let tables = self.factor_tables().await?;
        self.pipeline.evaluate(&tables, input)
    }

    /// 并发计算多个方案（结果顺序与输入一致）
    ///
    /// 每个方案在阻塞线程池上独立计算,共用同一份因子表;
    /// 任一方案失败则整体返回该错误
    pub async fn calculate_scenarios(
        &self,
        scenarios: Vec<Scenario>,
    ) -> ApiResult<Vec<ScenarioReport>> {
        let tables = self.factor_tables().await?;
        let pipeline = self.pipeline;

        let tasks = scenarios.into_iter().map(|Scenario { name, input }| {
            let tables = Arc::clone(&tables);
            async move {
                let report = tokio::task::spawn_blocking(move || pipeline.evaluate(&tables, input))
                    .await
                    .map_err(|e| ApiError::InternalError(format!("方案计算任务失败: {}", e)))?
                    .map_err(|e| {
                        tracing::warn!(scenario = %name, error = %e, "方案计算失败");
                        e
                    })?;
                Ok::<_, ApiError>(ScenarioReport { name, report })
            }
        });

        futures::future::join_all(tasks).await.into_iter().collect()
    }

    /// 对比基准方案与备选方案
    pub async fn compare_scenarios(
        &self,
        baseline: CalculationInput,
        candidate: CalculationInput,
    ) -> ApiResult<ComparisonResponse> {
        let tables = self.factor_tables().await?;
        let baseline = self.pipeline.evaluate(&tables, baseline)?;
        let candidate = self.pipeline.evaluate(&tables, candidate)?;
        let comparison = compare(&baseline.result, &candidate.result);

        tracing::info!(
            baseline_total = comparison.baseline_total,
            candidate_total = comparison.candidate_total,
            total_delta = comparison.total_delta,
            "方案对比完成"
        );

        Ok(ComparisonResponse {
            baseline,
            candidate,
            comparison,
        })
    }
}

impl Pipeline {
    fn evaluate(
        &self,
        tables: &FactorTables,
        input: CalculationInput,
    ) -> ApiResult<CalculationReport> {
        let mut perf = PerfGuard::new("api.calculate");
        perf.set_items(input.line_count());

        // 1. 范围校验（下标对应原始输入）
        let validated = self.validator.validate(input)?;
        let mut warnings = validated.warnings;

        // 2. 未知键策略
        let input = match self.unknown_key_policy {
            UnknownKeyPolicy::Abort => validated.input,
            UnknownKeyPolicy::SkipWithWarning => {
                let (kept, skipped) = drop_unknown_keys(validated.input, tables);
                if !skipped.is_empty() {
                    tracing::warn!(skipped = skipped.len(), "未知因子键的行已跳过");
                }
                warnings.extend(skipped);
                kept
            }
        };

        // 3. 计算
        let detailed = self.calculator.calculate_detailed(&input, tables)?;

        tracing::info!(
            lines = detailed.line_items.len(),
            total_emissions = detailed.result.total_emissions,
            warnings = warnings.len(),
            "排放计算完成"
        );

        Ok(CalculationReport::build(
            detailed,
            self.calculator.transport_basis(),
            warnings,
        ))
    }
}

/// 移除因子表中不存在的行,返回保留的输入与跳过警告
fn drop_unknown_keys(
    input: CalculationInput,
    tables: &FactorTables,
) -> (CalculationInput, Vec<CalculationWarning>) {
    let mut warnings = Vec::new();

    let mut keep = |category: EmissionCategory, index: usize, key: &str| -> bool {
        if tables.table(category).contains_key(key) {
            return true;
        }
        warnings.push(CalculationWarning::UnknownKeySkipped {
            category,
            index,
            key: key.to_string(),
        });
        false
    };

    let materials = input
        .materials
        .into_iter()
        .enumerate()
        .filter(|(i, m)| keep(EmissionCategory::Material, *i, &m.kind))
        .map(|(_, m)| m)
        .collect();
    let transport = input
        .transport
        .into_iter()
        .enumerate()
        .filter(|(i, t)| keep(EmissionCategory::Transport, *i, &t.kind))
        .map(|(_, t)| t)
        .collect();
    let energy = input
        .energy
        .into_iter()
        .enumerate()
        .filter(|(i, e)| keep(EmissionCategory::Energy, *i, &e.kind))
        .map(|(_, e)| e)
        .collect();

    (
        CalculationInput {
            materials,
            transport,
            energy,
        },
        warnings,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::builtin::builtin_tables;

    fn api() -> CalculationApi {
        CalculationApi::new(Arc::new(FactorCatalog::preloaded(builtin_tables().clone())))
    }

    #[test]
    fn test_drop_unknown_keys_keeps_original_indexes() {
        let input = CalculationInput::new()
            .with_material("unobtainium", 1.0)
            .with_material("concrete", 100.0)
            .with_energy("fusion", 5.0);

        let (kept, warnings) = drop_unknown_keys(input, builtin_tables());

        assert_eq!(kept.materials.len(), 1);
        assert_eq!(kept.materials[0].kind, "concrete");
        assert!(kept.energy.is_empty());
        assert_eq!(
            warnings,
            vec![
                CalculationWarning::UnknownKeySkipped {
                    category: EmissionCategory::Material,
                    index: 0,
                    key: "unobtainium".to_string(),
                },
                CalculationWarning::UnknownKeySkipped {
                    category: EmissionCategory::Energy,
                    index: 0,
                    key: "fusion".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_abort_policy_surfaces_unknown_key() {
        let input = CalculationInput::new().with_transport("teleporter", 10.0, 0.0);
        let err = api().calculate(input).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::UnknownFactorKey { category: EmissionCategory::Transport, ref key } if key == "teleporter"
        ));
    }

    #[tokio::test]
    async fn test_scenarios_keep_order() {
        let scenarios = vec![
            Scenario::new("a", CalculationInput::new().with_material("concrete", 100.0)),
            Scenario::new("b", CalculationInput::new().with_energy("electricity", 50.0)),
        ];

        let reports = api().calculate_scenarios(scenarios).await.unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].name, "a");
        assert_eq!(reports[1].name, "b");
        assert_eq!(reports[1].report.result.energy_emissions, 47.0);
    }
}
