use super::*;

use crate::domain::scenario::{Scenario, ScenarioComparison, ScenarioParams};
use crate::engine::scenario::{find_preset, preset_scenarios};

impl PortfolioApi {
    // ==========================================
    // 情景比较（只读,不记审计）
    // ==========================================

    /// 情景 vs 基线（A/B 级项目）
    pub fn compare_scenario(&self, params: &ScenarioParams) -> ScenarioComparison {
        self.scenario.compare(&self.state.projects, params)
    }

    /// 两组参数之间的比较（a 为基准）
    pub fn compare_scenarios(&self, a: &ScenarioParams, b: &ScenarioParams) -> ScenarioComparison {
        self.scenario.compare_params(&self.state.projects, a, b)
    }

    /// 按预设名称比较
    pub fn compare_preset(&self, name: &str) -> ApiResult<ScenarioComparison> {
        let preset = find_preset(name)
            .ok_or_else(|| ApiError::NotFound(format!("情景预设(name={})不存在", name)))?;
        Ok(self.compare_scenario(&preset.params))
    }

    pub fn scenario_presets(&self) -> Vec<Scenario> {
        preset_scenarios()
    }
}
