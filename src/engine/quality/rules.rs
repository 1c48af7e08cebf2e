// ==========================================
// 资本配置决策系统 - 数据质量规则目录
// ==========================================
// 规则定义为静态目录,判定逻辑由 RuleId 分派到具体谓词函数
// 谓词返回 true 表示通过
// ==========================================

use crate::domain::priority::{weights_balanced, InvestmentPriority};
use crate::domain::project::ValidatedProject;
use crate::domain::quality::{RuleId, ValidationRule};
use crate::domain::types::{InvestmentGrade, RuleCategory, Severity};
use crate::engine::grading::GradeClassifier;
use crate::engine::scoring::ScoringWeights;

// ===== 阈值常量 =====
pub const IRR_MIN: f64 = 5.0;
pub const IRR_MAX: f64 = 50.0;
pub const PAYBACK_MAX_YEARS: f64 = 10.0;
pub const CAPEX_RANGE_MIN: f64 = 1_000_000.0;
pub const CAPEX_RANGE_MAX: f64 = 10_000_000_000.0;
pub const SYNERGY_REQUIRED_CAPEX: f64 = 500_000_000.0;
pub const COMPLIANCE_MIN_CAPEX: f64 = 10_000_000.0;
pub const COMPOSITE_TOLERANCE: f64 = 1.0;

/// 规则适用的数据对象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTarget {
    Priorities,
    Opportunity,
    Project,
    Allocation,
}

impl RuleId {
    /// 规则是否作用于该对象类型
    pub fn applies_to(&self, target: RuleTarget) -> bool {
        use RuleId::*;
        match target {
            RuleTarget::Priorities => matches!(self, Cons001 | Cons002),
            RuleTarget::Opportunity => matches!(self, Cons004 | Acc002 | Comp004),
            RuleTarget::Project => matches!(
                self,
                Fin001
                    | Fin002
                    | Fin003
                    | Fin004
                    | Comp001
                    | Comp002
                    | Comp003
                    | Comp004
                    | Cons003
                    | Acc001
                    | Compl001
                    | Compl002
            ),
            RuleTarget::Allocation => matches!(self, Compl003 | Compl004),
        }
    }
}

/// 单条规则的静态定义
pub fn rule_definition(id: RuleId) -> ValidationRule {
    use RuleCategory::*;
    use Severity::*;

    let (name, category, severity, description, auto_fixable) = match id {
        RuleId::Fin001 => ("IRR 合理区间", Financial, Critical, "项目 IRR 必须在 5% 到 50% 之间", false),
        RuleId::Fin002 => ("A 级项目 NPV 为正", Financial, Critical, "A 级项目的 NPV 必须大于 0", false),
        RuleId::Fin003 => ("回收期上限", Financial, Warning, "项目回收期不应超过 10 年", false),
        RuleId::Fin004 => ("资本支出量级", Financial, Warning, "资本支出应在 100 万到 100 亿之间", false),
        RuleId::Comp001 => ("执行摘要完整", Completeness, Critical, "商业计划必须包含执行摘要", false),
        RuleId::Comp002 => ("风险登记完整", Completeness, Warning, "商业计划必须登记至少一项风险", false),
        RuleId::Comp003 => ("大额项目协同效应", Completeness, Warning, "资本支出 ≥ 5 亿的项目必须列示协同效应", false),
        RuleId::Comp004 => ("发起人必填", Completeness, Critical, "机会与项目必须指定发起人", false),
        RuleId::Cons001 => ("优先级权重之和为 100", Consistency, Critical, "全部战略优先级权重之和必须为 100（误差 < 0.01）", true),
        RuleId::Cons002 => ("优先级资本配置缺失", Consistency, Warning, "权重大于 0 的优先级必须派生出资本配置金额", true),
        RuleId::Cons003 => ("投资等级一致", Consistency, Warning, "投资等级必须与综合评分/风险评分的分级结果一致", true),
        RuleId::Cons004 => ("投资额区间有序", Consistency, Critical, "机会投资额区间下限不得大于上限", false),
        RuleId::Acc001 => ("综合评分可复算", Accuracy, Warning, "按评分构成复算的综合评分与存量值偏差须小于 1", true),
        RuleId::Acc002 => ("机会评分取值范围", Accuracy, Warning, "战略契合度与初步风险评分必须在 0 到 100 之间", false),
        RuleId::Compl001 => ("最低投资门槛", Compliance, Critical, "项目资本支出不得低于 1000 万", false),
        RuleId::Compl002 => ("风险评分取值范围", Compliance, Warning, "项目风险评分必须在 0 到 100 之间", false),
        RuleId::Compl003 => ("板块配置约束", Compliance, Critical, "板块当前配置必须满足最小/最大约束（硬约束为严重,软约束为警告）", false),
        RuleId::Compl004 => ("板块配置边界", Compliance, Warning, "板块当前配置必须在 0% 到 100% 之间,且下限不大于上限", false),
    };

    ValidationRule {
        id,
        name: name.to_string(),
        category,
        severity,
        description: description.to_string(),
        auto_fixable,
        enabled: true,
    }
}

/// 完整规则目录（全部启用）
pub fn default_rules() -> Vec<ValidationRule> {
    RuleId::all().into_iter().map(rule_definition).collect()
}

// ==========================================
// 谓词
// ==========================================

/// 项目级谓词
pub fn check_project(
    id: RuleId,
    project: &ValidatedProject,
    weights: &ScoringWeights,
    classifier: &GradeClassifier,
) -> bool {
    match id {
        RuleId::Fin001 => (IRR_MIN..=IRR_MAX).contains(&project.irr),
        RuleId::Fin002 => project.investment_grade != InvestmentGrade::A || project.npv > 0.0,
        RuleId::Fin003 => project.payback_years <= PAYBACK_MAX_YEARS,
        RuleId::Fin004 => (CAPEX_RANGE_MIN..=CAPEX_RANGE_MAX).contains(&project.capex),
        RuleId::Comp001 => !project.business_plan.executive_summary.trim().is_empty(),
        RuleId::Comp002 => !project.business_plan.risks.is_empty(),
        RuleId::Comp003 => {
            project.capex < SYNERGY_REQUIRED_CAPEX || !project.business_plan.synergies.is_empty()
        }
        RuleId::Comp004 => !project.sponsor.trim().is_empty(),
        RuleId::Cons003 => {
            project.investment_grade
                == classifier.classify(project.composite_score, project.risk_score)
        }
        RuleId::Acc001 => {
            (weights.recompute(&project.scoring_breakdown) - project.composite_score).abs()
                < COMPOSITE_TOLERANCE
        }
        RuleId::Compl001 => project.capex >= COMPLIANCE_MIN_CAPEX,
        RuleId::Compl002 => (0.0..=100.0).contains(&project.risk_score),
        _ => true,
    }
}

/// CONS-001: 权重之和（没有优先级时合计为 0,同样不通过）
pub fn check_priority_weights(priorities: &[InvestmentPriority]) -> bool {
    weights_balanced(priorities)
}

/// CONS-002: 单个优先级的资本配置
pub fn check_priority_allocation(priority: &InvestmentPriority) -> bool {
    priority.weight <= 0.0 || priority.capital_allocation > 0.0
}
