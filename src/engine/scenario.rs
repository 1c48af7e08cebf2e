// ==========================================
// 资本配置决策系统 - 情景分析引擎
// ==========================================
// 筛选条件（全部满足才保留）:
//   risk_score ≤ max_risk
//   irr ≥ min_return
//   duration_months ≤ max_duration_years × 12
//   require_synergy 时协同清单非空
// 基线: A/B 级项目
// 集合恒等式: added ∪ unchanged = 情景集合; removed ∪ unchanged = 基线集合
// ==========================================

use crate::domain::project::ValidatedProject;
use crate::domain::scenario::{
    MetricsDelta, Scenario, ScenarioComparison, ScenarioDiff, ScenarioMetrics, ScenarioParams,
};
use std::collections::HashSet;
use tracing::{debug, info};

// ===== 预设情景名称 =====
pub const PRESET_CONSERVATIVE: &str = "conservative";
pub const PRESET_BALANCED: &str = "balanced";
pub const PRESET_AGGRESSIVE: &str = "aggressive";

/// 预设情景
pub fn preset_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: PRESET_CONSERVATIVE.to_string(),
            description: "低风险、高回报门槛、短周期,且要求协同效应".to_string(),
            params: ScenarioParams {
                max_risk: 30.0,
                min_return: 20.0,
                max_duration_years: 3.0,
                require_synergy: true,
            },
        },
        Scenario {
            name: PRESET_BALANCED.to_string(),
            description: "中等风险与回报门槛".to_string(),
            params: ScenarioParams {
                max_risk: 50.0,
                min_return: 15.0,
                max_duration_years: 5.0,
                require_synergy: false,
            },
        },
        Scenario {
            name: PRESET_AGGRESSIVE.to_string(),
            description: "接受较高风险与较长周期".to_string(),
            params: ScenarioParams {
                max_risk: 70.0,
                min_return: 10.0,
                max_duration_years: 10.0,
                require_synergy: false,
            },
        },
    ]
}

/// 按名称查找预设（大小写不敏感）
pub fn find_preset(name: &str) -> Option<Scenario> {
    let key = name.trim().to_lowercase();
    preset_scenarios().into_iter().find(|s| s.name == key)
}

pub struct ScenarioFilter {
    // 无状态引擎
}

impl Default for ScenarioFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioFilter {
    pub fn new() -> Self {
        Self {}
    }

    /// 单个项目是否满足情景参数
    pub fn accepts(&self, project: &ValidatedProject, params: &ScenarioParams) -> bool {
        project.risk_score <= params.max_risk
            && project.irr >= params.min_return
            && f64::from(project.duration_months) <= params.max_duration_years * 12.0
            && (!params.require_synergy || project.has_synergies())
    }

    /// 按情景参数筛选全部校验项目
    pub fn filter<'a>(
        &self,
        projects: &'a [ValidatedProject],
        params: &ScenarioParams,
    ) -> Vec<&'a ValidatedProject> {
        let selected: Vec<&ValidatedProject> = projects
            .iter()
            .filter(|p| self.accepts(p, params))
            .collect();
        debug!(
            total = projects.len(),
            selected = selected.len(),
            max_risk = params.max_risk,
            min_return = params.min_return,
            "情景筛选"
        );
        selected
    }

    /// 基线: A/B 级项目
    pub fn baseline<'a>(&self, projects: &'a [ValidatedProject]) -> Vec<&'a ValidatedProject> {
        projects
            .iter()
            .filter(|p| p.investment_grade.is_allocatable())
            .collect()
    }

    /// 集合差异（保持输入顺序）
    pub fn diff(&self, baseline: &[&ValidatedProject], scenario: &[&ValidatedProject]) -> ScenarioDiff {
        let base_ids: HashSet<&str> = baseline.iter().map(|p| p.id.as_str()).collect();
        let scen_ids: HashSet<&str> = scenario.iter().map(|p| p.id.as_str()).collect();

        ScenarioDiff {
            added: scenario
                .iter()
                .filter(|p| !base_ids.contains(p.id.as_str()))
                .map(|p| p.id.clone())
                .collect(),
            removed: baseline
                .iter()
                .filter(|p| !scen_ids.contains(p.id.as_str()))
                .map(|p| p.id.clone())
                .collect(),
            unchanged: baseline
                .iter()
                .filter(|p| scen_ids.contains(p.id.as_str()))
                .map(|p| p.id.clone())
                .collect(),
        }
    }

    /// 汇总指标（空集合的平均 IRR 为 0）
    pub fn metrics(&self, projects: &[&ValidatedProject]) -> ScenarioMetrics {
        let project_count = projects.len();
        let total_capital = projects.iter().map(|p| p.capex).sum();
        let mean_irr = if project_count > 0 {
            projects.iter().map(|p| p.irr).sum::<f64>() / project_count as f64
        } else {
            0.0
        };
        ScenarioMetrics {
            project_count,
            total_capital,
            mean_irr,
        }
    }

    /// 情景 vs 基线
    pub fn compare(
        &self,
        projects: &[ValidatedProject],
        params: &ScenarioParams,
    ) -> ScenarioComparison {
        let baseline = self.baseline(projects);
        let scenario = self.filter(projects, params);
        self.compare_sets(&baseline, &scenario)
    }

    /// 两组情景参数之间的比较（a 作为基准）
    pub fn compare_params(
        &self,
        projects: &[ValidatedProject],
        a: &ScenarioParams,
        b: &ScenarioParams,
    ) -> ScenarioComparison {
        let left = self.filter(projects, a);
        let right = self.filter(projects, b);
        self.compare_sets(&left, &right)
    }

    fn compare_sets(
        &self,
        baseline: &[&ValidatedProject],
        scenario: &[&ValidatedProject],
    ) -> ScenarioComparison {
        let base_metrics = self.metrics(baseline);
        let scen_metrics = self.metrics(scenario);
        let diff = self.diff(baseline, scenario);

        info!(
            baseline_count = base_metrics.project_count,
            scenario_count = scen_metrics.project_count,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "情景比较完成"
        );

        ScenarioComparison {
            baseline: base_metrics,
            scenario: scen_metrics,
            delta: MetricsDelta {
                project_count: scen_metrics.project_count as i64
                    - base_metrics.project_count as i64,
                total_capital: scen_metrics.total_capital - base_metrics.total_capital,
                mean_irr: scen_metrics.mean_irr - base_metrics.mean_irr,
            },
            diff,
        }
    }
}
