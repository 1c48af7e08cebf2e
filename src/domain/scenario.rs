// ==========================================
// 资本配置决策系统 - 情景分析领域模型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ScenarioParams - 情景筛选参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParams {
    pub max_risk: f64,           // 风险上限
    pub min_return: f64,         // IRR 下限 (%)
    pub max_duration_years: f64, // 周期上限 (年, 比较时 ×12 折算为月)
    pub require_synergy: bool,   // 是否要求存在协同效应
}

impl Default for ScenarioParams {
    /// 全放开参数（不过滤任何项目）
    fn default() -> Self {
        Self {
            max_risk: 100.0,
            min_return: 0.0,
            max_duration_years: 100.0,
            require_synergy: false,
        }
    }
}

/// 命名情景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub params: ScenarioParams,
}

// ==========================================
// 情景比较结果
// ==========================================

/// 项目集合差异（按项目 ID）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub unchanged: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioMetrics {
    pub project_count: usize,
    pub total_capital: f64,
    pub mean_irr: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDelta {
    pub project_count: i64,
    pub total_capital: f64,
    pub mean_irr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComparison {
    pub baseline: ScenarioMetrics,
    pub scenario: ScenarioMetrics,
    pub delta: MetricsDelta,
    pub diff: ScenarioDiff,
}
