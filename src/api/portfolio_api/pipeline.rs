use super::*;

use crate::domain::quality::QualityMetrics;
use crate::domain::scenario::ScenarioComparison;
use crate::domain::sector::SectorConstraintStatus;
use crate::domain::types::SectorStatus;

/// 一次完整流水线的结果摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub converted: Vec<String>,
    pub allocatable_projects: usize,
    pub constraint_statuses: Vec<SectorConstraintStatus>,
    pub quality: QualityMetrics,
    pub scenarios: Vec<(String, ScenarioComparison)>,
}

impl PipelineSummary {
    /// 违反硬约束的板块数
    pub fn critical_sectors(&self) -> usize {
        self.constraint_statuses
            .iter()
            .filter(|s| s.status == SectorStatus::Critical)
            .count()
    }
}

impl PortfolioApi {
    // ==========================================
    // 全流程
    // ==========================================

    /// 依次执行: 转换已批准机会 -> 板块配置 -> 约束评估 -> 质量检查 -> 预设情景比较
    pub fn run_pipeline(&mut self, actor: &str) -> ApiResult<PipelineSummary> {
        require_actor(actor)?;

        let converted = self.convert_all_approved(actor)?;
        self.recalculate_allocations(actor)?;
        let constraint_statuses = self.evaluate_constraints();
        let report = self.run_quality_check(actor)?;

        let scenarios = self
            .scenario_presets()
            .into_iter()
            .map(|preset| {
                let comparison = self.compare_scenario(&preset.params);
                (preset.name, comparison)
            })
            .collect();

        let allocatable_projects = self
            .state
            .projects
            .iter()
            .filter(|p| p.investment_grade.is_allocatable())
            .count();

        let summary = PipelineSummary {
            converted: converted.affected,
            allocatable_projects,
            constraint_statuses,
            quality: report.metrics,
            scenarios,
        };

        info!(
            converted = summary.converted.len(),
            allocatable_projects,
            critical_sectors = summary.critical_sectors(),
            quality_score = summary.quality.overall_score,
            "组合流水线执行完成"
        );

        Ok(summary)
    }
}
