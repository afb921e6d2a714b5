// ==========================================
// 建筑碳排放计算引擎 - 计算输入
// ==========================================
// 来源: 表单层构造,按值传入引擎
// 约定: 数值范围由调用方校验（见 engine::validation）
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// MaterialInput - 材料行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialInput {
    #[serde(rename = "type")]
    pub kind: String, // 材料因子表键
    pub quantity: f64, // 用量
}

// ==========================================
// TransportInput - 运输行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportInput {
    #[serde(rename = "type")]
    pub kind: String, // 运输方式因子表键
    pub distance: f64, // 公里
    #[serde(default)]
    pub weight: f64, // 千克
}

// ==========================================
// EnergyInput - 能源行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyInput {
    #[serde(rename = "type")]
    pub kind: String, // 能源因子表键
    pub amount: f64, // 用量
}

impl MaterialInput {
    pub fn new(kind: impl Into<String>, quantity: f64) -> Self {
        Self {
            kind: kind.into(),
            quantity,
        }
    }
}

impl TransportInput {
    pub fn new(kind: impl Into<String>, distance: f64, weight: f64) -> Self {
        Self {
            kind: kind.into(),
            distance,
            weight,
        }
    }
}

impl EnergyInput {
    pub fn new(kind: impl Into<String>, amount: f64) -> Self {
        Self {
            kind: kind.into(),
            amount,
        }
    }
}

// ==========================================
// CalculationInput - 一次完整计算请求
// ==========================================
// 行项目互相独立,顺序不影响结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    #[serde(default)]
    pub materials: Vec<MaterialInput>,
    #[serde(default)]
    pub transport: Vec<TransportInput>,
    #[serde(default)]
    pub energy: Vec<EnergyInput>,
}

impl CalculationInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_material(mut self, kind: &str, quantity: f64) -> Self {
        self.materials.push(MaterialInput::new(kind, quantity));
        self
    }

    pub fn with_transport(mut self, kind: &str, distance: f64, weight: f64) -> Self {
        self.transport.push(TransportInput::new(kind, distance, weight));
        self
    }

    pub fn with_energy(mut self, kind: &str, amount: f64) -> Self {
        self.energy.push(EnergyInput::new(kind, amount));
        self
    }

    /// 行项目总数
    pub fn line_count(&self) -> usize {
        self.materials.len() + self.transport.len() + self.energy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line_count() == 0
    }
}
