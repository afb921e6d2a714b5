// ==========================================
// 建筑碳排放计算引擎 - 因子来源 Trait
// ==========================================
// 职责: 在引擎首次调用前提供三张不可变因子表
// 红线: 引擎不关心来源,不重复拉取,不做缓存失效
// ==========================================

use crate::domain::factor::FactorTables;
use crate::provider::error::ProviderResult;
use async_trait::async_trait;

// 实现者: BuiltinFactorProvider / FileFactorProvider / SqliteFactorProvider
#[async_trait]
pub trait FactorTableProvider: Send + Sync {
    /// 来源描述（用于日志）
    fn source_name(&self) -> String;

    /// 加载三张因子表
    ///
    /// # 返回
    /// - Ok(FactorTables): 已校验的因子表
    /// - Err(ProviderError): 来源不可用或数据不合法
    async fn load_tables(&self) -> ProviderResult<FactorTables>;
}
