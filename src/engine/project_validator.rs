// ==========================================
// 资本配置决策系统 - 项目校验器
// ==========================================
// 职责: 已批准机会 -> 校验项目（财务派生 + 风险登记 + 协同清单 + 等级）
// 输入: 已批准的 Opportunity + 优先级列表 + 已存在项目的机会 ID
// 输出: ValidatedProject（初始状态 pending）
// ==========================================
// 派生规则（M = investment_range.max, cs = composite_score）:
//   capex = M, opex = 0.1M, revenue_potential = 1.5M, npv = 0.3M
//   irr = 15 + cs/10, mirr = 12 + cs/15, payback_years = 8 - cs/25（不设下限）
// 红线: 每个 opportunity_id 至多一个项目
// 说明: M ≤ 0 时派生值退化但不报错,交由数据质量规则发现
// ==========================================

use crate::domain::opportunity::Opportunity;
use crate::domain::priority::InvestmentPriority;
use crate::domain::project::{
    BusinessPlan, FinancialProjection, ImpactLevel, RiskCategory, RiskItem, SynergyItem,
    SynergyType, ValidatedProject,
};
use crate::domain::types::{InvestmentGrade, ValidationStatus};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::grading::GradeClassifier;
use crate::engine::scoring::{ScoringEngine, SynergySource};
use chrono::Utc;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// 商业计划预测年数
pub const PROJECTION_YEARS: u32 = 5;

/// 投资规模高影响阈值
const HIGH_IMPACT_INVESTMENT: f64 = 500_000_000.0;

pub struct ProjectValidator {
    scoring: ScoringEngine,
    classifier: GradeClassifier,
}

impl Default for ProjectValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectValidator {
    pub fn new() -> Self {
        Self {
            scoring: ScoringEngine::new(),
            classifier: GradeClassifier::new(),
        }
    }

    pub fn with_scoring(scoring: ScoringEngine) -> Self {
        Self {
            scoring,
            classifier: GradeClassifier::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 将已批准机会转换为校验项目
    ///
    /// # 参数
    /// - `opportunity`: 投资机会（必须为 approved）
    /// - `priorities`: 优先级列表
    /// - `existing_opportunity_ids`: 已转换过的机会 ID
    /// - `synergy`: 协同评分源
    ///
    /// # 返回
    /// - Ok(ValidatedProject)
    /// - Err(OpportunityNotApproved / DuplicateProject)
    pub fn convert(
        &self,
        opportunity: &Opportunity,
        priorities: &[InvestmentPriority],
        existing_opportunity_ids: &HashSet<String>,
        synergy: &mut dyn SynergySource,
    ) -> EngineResult<ValidatedProject> {
        if !opportunity.is_approved() {
            return Err(EngineError::OpportunityNotApproved {
                id: opportunity.id.clone(),
                status: opportunity.status.to_string(),
            });
        }

        if existing_opportunity_ids.contains(&opportunity.id) {
            return Err(EngineError::DuplicateProject {
                opportunity_id: opportunity.id.clone(),
            });
        }

        Ok(self.build_project(opportunity, priorities, synergy))
    }

    /// 批量转换: 跳过未批准与已转换的机会,同批次内同样去重
    pub fn convert_all(
        &self,
        opportunities: &[Opportunity],
        priorities: &[InvestmentPriority],
        existing_opportunity_ids: &HashSet<String>,
        synergy: &mut dyn SynergySource,
    ) -> Vec<ValidatedProject> {
        let mut seen = existing_opportunity_ids.clone();
        let mut created = Vec::new();

        for opportunity in opportunities.iter().filter(|o| o.is_approved()) {
            if !seen.insert(opportunity.id.clone()) {
                debug!(opportunity_id = %opportunity.id, "机会已转换,跳过");
                continue;
            }
            created.push(self.build_project(opportunity, priorities, synergy));
        }

        info!(created = created.len(), "批量转换已批准机会");
        created
    }

    /// 按存量评分/风险重新分级
    pub fn regrade(&self, project: &mut ValidatedProject) -> InvestmentGrade {
        let grade = self
            .classifier
            .classify(project.composite_score, project.risk_score);
        if grade != project.investment_grade {
            info!(
                project_id = %project.id,
                from = %project.investment_grade,
                to = %grade,
                "项目等级已重算"
            );
            project.investment_grade = grade;
            project.updated_date = Utc::now();
        }
        grade
    }

    /// 由评分构成重新计算综合评分,并同步等级与派生收益指标
    pub fn recompute_composite(&self, project: &mut ValidatedProject) {
        let composite = self.scoring.weights().recompute(&project.scoring_breakdown);
        project.composite_score = composite;
        project.scoring_breakdown.composite_score = composite;
        project.irr = irr_for(composite);
        project.mirr = mirr_for(composite);
        project.payback_years = payback_for(composite);
        self.regrade(project);
        project.updated_date = Utc::now();
    }

    /// 校验状态流转
    pub fn transition(
        &self,
        project: &mut ValidatedProject,
        target: ValidationStatus,
        actor: &str,
    ) -> EngineResult<()> {
        if !project.validation_status.can_transition_to(target) {
            return Err(EngineError::InvalidStateTransition {
                entity: "ValidatedProject".to_string(),
                id: project.id.clone(),
                from: project.validation_status.to_string(),
                to: target.to_string(),
            });
        }

        project.validation_status = target;
        if target == ValidationStatus::Validated {
            project.validated_by = Some(actor.to_string());
        }
        project.updated_date = Utc::now();
        info!(project_id = %project.id, to = %target, actor, "项目校验状态流转");
        Ok(())
    }

    // ==========================================
    // 派生计算
    // ==========================================

    fn build_project(
        &self,
        opportunity: &Opportunity,
        priorities: &[InvestmentPriority],
        synergy: &mut dyn SynergySource,
    ) -> ValidatedProject {
        let breakdown = self.scoring.score(opportunity, priorities, synergy);
        let composite = breakdown.composite_score;
        let risk_score = opportunity.preliminary_risk_score;
        let grade = self.classifier.classify(composite, risk_score);

        let m = opportunity.investment_range.max;
        if m <= 0.0 {
            warn!(
                opportunity_id = %opportunity.id,
                investment_max = m,
                "投资额上限非正,派生财务字段退化"
            );
        }

        let capex = m;
        let opex = m * 0.1;
        let revenue_potential = m * 1.5;
        let now = Utc::now();

        let project = ValidatedProject {
            id: format!("VP-{}", opportunity.id),
            opportunity_id: opportunity.id.clone(),
            name: opportunity.name.clone(),
            sponsor: opportunity.sponsor.clone(),
            business_unit: opportunity.business_unit.clone(),
            estimated_start: opportunity.estimated_start,
            duration_months: opportunity.duration,
            capex,
            opex,
            revenue_potential,
            npv: m * 0.3,
            irr: irr_for(composite),
            mirr: mirr_for(composite),
            payback_years: payback_for(composite),
            composite_score: composite,
            investment_grade: grade,
            risk_score,
            scoring_breakdown: breakdown,
            business_plan: BusinessPlan {
                executive_summary: opportunity.description.trim().to_string(),
                risks: risk_register(opportunity),
                synergies: synergy_list(m),
                financials: projections(capex, opex, revenue_potential),
            },
            validation_status: ValidationStatus::Pending,
            validated_by: None,
            created_date: now,
            updated_date: now,
        };

        info!(
            project_id = %project.id,
            composite_score = composite,
            grade = %grade,
            "机会已转换为校验项目"
        );

        project
    }
}

pub fn irr_for(composite_score: f64) -> f64 {
    15.0 + composite_score / 10.0
}

pub fn mirr_for(composite_score: f64) -> f64 {
    12.0 + composite_score / 15.0
}

/// 回收期（高分时可为负值,不设下限）
pub fn payback_for(composite_score: f64) -> f64 {
    8.0 - composite_score / 25.0
}

/// 风险登记: 市场风险 + 执行风险
fn risk_register(opportunity: &Opportunity) -> Vec<RiskItem> {
    let market_impact = if opportunity.investment_range.max >= HIGH_IMPACT_INVESTMENT {
        ImpactLevel::High
    } else {
        ImpactLevel::Medium
    };
    let execution_impact = if opportunity.duration > 48 {
        ImpactLevel::High
    } else if opportunity.duration > 24 {
        ImpactLevel::Medium
    } else {
        ImpactLevel::Low
    };

    vec![
        RiskItem {
            category: RiskCategory::Market,
            description: format!("{} 市场需求与价格波动风险", opportunity.name),
            probability: (opportunity.preliminary_risk_score / 100.0).clamp(0.0, 1.0),
            impact: market_impact,
            mitigation: "分阶段投入并设置市场指标触发点".to_string(),
        },
        RiskItem {
            category: RiskCategory::Execution,
            description: format!(
                "{} 执行周期 {} 个月的交付风险",
                opportunity.business_unit, opportunity.duration
            ),
            probability: (opportunity.duration as f64 / 120.0).clamp(0.0, 1.0),
            impact: execution_impact,
            mitigation: format!("由 {} 牵头设立项目管理办公室", opportunity.sponsor),
        },
    ]
}

/// 协同清单: 收入协同 + 成本协同（按投资规模）
fn synergy_list(investment_max: f64) -> Vec<SynergyItem> {
    vec![
        SynergyItem {
            synergy_type: SynergyType::Revenue,
            description: "与现有业务组合的交叉销售收入".to_string(),
            estimated_value: investment_max * 0.05,
            realization_years: 3,
        },
        SynergyItem {
            synergy_type: SynergyType::Cost,
            description: "共享采购与运营平台带来的成本节约".to_string(),
            estimated_value: investment_max * 0.03,
            realization_years: 2,
        },
    ]
}

/// 年度财务预测: 资本支出首年投入,收入三年爬坡
fn projections(capex: f64, opex: f64, revenue_potential: f64) -> Vec<FinancialProjection> {
    let annual_revenue = revenue_potential / PROJECTION_YEARS as f64;
    let annual_opex = opex / PROJECTION_YEARS as f64;

    (1..=PROJECTION_YEARS)
        .map(|year| {
            let ramp = (year as f64 / 3.0).min(1.0);
            let revenue = annual_revenue * ramp;
            let year_capex = if year == 1 { capex } else { 0.0 };
            FinancialProjection {
                year,
                revenue,
                opex: annual_opex,
                capex: year_capex,
                net_cash_flow: revenue - annual_opex - year_capex,
            }
        })
        .collect()
}
