// ==========================================
// 建筑碳排放计算引擎 - 领域类型定义
// ==========================================
// 排放类别 / 运输计算口径
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 排放类别 (Emission Category)
// ==========================================
// 三张因子表互相独立,类别之间没有耦合
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionCategory {
    Material,  // 材料
    Transport, // 运输
    Energy,    // 能源
}

impl EmissionCategory {
    /// 全部类别（固定计算顺序: 材料 → 运输 → 能源）
    pub const ALL: [EmissionCategory; 3] = [
        EmissionCategory::Material,
        EmissionCategory::Transport,
        EmissionCategory::Energy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmissionCategory::Material => "material",
            EmissionCategory::Transport => "transport",
            EmissionCategory::Energy => "energy",
        }
    }
}

impl fmt::Display for EmissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EmissionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "material" | "materials" | "材料" => Ok(EmissionCategory::Material),
            "transport" | "运输" => Ok(EmissionCategory::Transport),
            "energy" | "能源" => Ok(EmissionCategory::Energy),
            other => Err(format!("未知排放类别: {}", other)),
        }
    }
}

// ==========================================
// 运输计算口径 (Transport Basis)
// ==========================================
// Distance:       factor × distance（重量仅作记录）
// TonneKilometre: factor × distance × weight / 1000（因子单位为 吨·公里）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportBasis {
    Distance,
    TonneKilometre,
}

impl TransportBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportBasis::Distance => "distance",
            TransportBasis::TonneKilometre => "tonne_kilometre",
        }
    }
}

impl Default for TransportBasis {
    fn default() -> Self {
        TransportBasis::Distance
    }
}

impl fmt::Display for TransportBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TransportBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "distance" | "km" => Ok(TransportBasis::Distance),
            "tonne_kilometre" | "tonne-kilometre" | "tkm" | "ton_km" => {
                Ok(TransportBasis::TonneKilometre)
            }
            other => Err(format!("未知运输计算口径: {}", other)),
        }
    }
}
