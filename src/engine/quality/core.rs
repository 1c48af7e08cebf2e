// ==========================================
// 资本配置决策系统 - 数据质量校验器
// ==========================================
// 检查顺序: 优先级 -> 机会 -> 项目 -> 板块配置
// 每轮产出全新问题列表（状态均为 open）
// 被禁用的规则不参与检查
// ==========================================

use crate::domain::opportunity::Opportunity;
use crate::domain::priority::{total_weight, InvestmentPriority};
use crate::domain::project::ValidatedProject;
use crate::domain::quality::{
    DataQualityIssue, QualityMetrics, QualityReport, RuleId, ValidationRule,
};
use crate::domain::sector::{AllocationConstraint, SectorAllocation};
use crate::domain::types::{IssueStatus, Severity};
use crate::engine::grading::GradeClassifier;
use crate::engine::scoring::ScoringWeights;
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::rules::{self, RuleTarget};

/// 校验输入（只读视图）
#[derive(Debug, Clone, Copy)]
pub struct QualityContext<'a> {
    pub priorities: &'a [InvestmentPriority],
    pub opportunities: &'a [Opportunity],
    pub projects: &'a [ValidatedProject],
    pub allocations: &'a [SectorAllocation],
    pub constraints: &'a [AllocationConstraint],
}

// ==========================================
// DataQualityValidator
// ==========================================
pub struct DataQualityValidator {
    weights: ScoringWeights,
    classifier: GradeClassifier,
}

impl Default for DataQualityValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataQualityValidator {
    pub fn new() -> Self {
        Self::with_weights(ScoringWeights::default())
    }

    /// ACC-001 按给定评分权重复算
    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self {
            weights,
            classifier: GradeClassifier::new(),
        }
    }

    /// 执行全量校验
    pub fn validate(&self, ctx: &QualityContext<'_>, rules: &[ValidationRule]) -> QualityReport {
        let enabled: Vec<&ValidationRule> = rules.iter().filter(|r| r.enabled).collect();
        let skipped = rules.len() - enabled.len();

        let mut issues = Vec::new();
        issues.extend(self.check_priorities(ctx.priorities, &enabled));
        issues.extend(self.check_opportunities(ctx.opportunities, &enabled));
        issues.extend(self.check_projects(ctx.projects, &enabled));
        issues.extend(self.check_allocations(ctx.allocations, ctx.constraints, &enabled));

        let metrics = compute_metrics(&issues);

        info!(
            enabled_rules = enabled.len(),
            skipped_rules = skipped,
            issues = issues.len(),
            critical = metrics.critical_count,
            warning = metrics.warning_count,
            overall_score = metrics.overall_score,
            "数据质量检查完成"
        );

        QualityReport {
            issues,
            metrics,
            run_at: Utc::now(),
        }
    }

    // ==========================================
    // 优先级
    // ==========================================

    fn check_priorities(
        &self,
        priorities: &[InvestmentPriority],
        enabled: &[&ValidationRule],
    ) -> Vec<DataQualityIssue> {
        let mut issues = Vec::new();

        for rule in applicable(enabled, RuleTarget::Priorities) {
            match rule.id {
                RuleId::Cons001 => {
                    if !rules::check_priority_weights(priorities) {
                        let sum = total_weight(priorities);
                        issues.push(new_issue(
                            rule,
                            rule.severity,
                            format!("战略优先级权重之和为 {:.2},应为 100", sum),
                            priorities.iter().map(|p| p.id.clone()).collect(),
                        ));
                    }
                }
                RuleId::Cons002 => {
                    for p in priorities
                        .iter()
                        .filter(|p| !rules::check_priority_allocation(p))
                    {
                        issues.push(new_issue(
                            rule,
                            rule.severity,
                            format!("优先级 {} 权重为 {:.2},但资本配置为 0", p.name, p.weight),
                            vec![p.id.clone()],
                        ));
                    }
                }
                _ => {}
            }
        }

        debug!(issues = issues.len(), "优先级检查完成");
        issues
    }

    // ==========================================
    // 机会
    // ==========================================

    fn check_opportunities(
        &self,
        opportunities: &[Opportunity],
        enabled: &[&ValidationRule],
    ) -> Vec<DataQualityIssue> {
        let mut issues = Vec::new();
        let applicable_rules = applicable(enabled, RuleTarget::Opportunity);

        for opp in opportunities {
            for rule in &applicable_rules {
                let failure = match rule.id {
                    RuleId::Cons004 if !opp.investment_range.is_ordered() => Some(format!(
                        "机会 {} 投资额下限 {:.0} 大于上限 {:.0}",
                        opp.name, opp.investment_range.min, opp.investment_range.max
                    )),
                    RuleId::Acc002
                        if !in_score_range(opp.strategic_fit_score)
                            || !in_score_range(opp.preliminary_risk_score) =>
                    {
                        Some(format!(
                            "机会 {} 评分越界: 战略契合度 {:.1}, 初步风险 {:.1}",
                            opp.name, opp.strategic_fit_score, opp.preliminary_risk_score
                        ))
                    }
                    RuleId::Comp004 if opp.sponsor.trim().is_empty() => {
                        Some(format!("机会 {} 未指定发起人", opp.name))
                    }
                    _ => None,
                };

                if let Some(description) = failure {
                    issues.push(new_issue(rule, rule.severity, description, vec![opp.id.clone()]));
                }
            }
        }

        debug!(issues = issues.len(), "机会检查完成");
        issues
    }

    // ==========================================
    // 项目
    // ==========================================

    fn check_projects(
        &self,
        projects: &[ValidatedProject],
        enabled: &[&ValidationRule],
    ) -> Vec<DataQualityIssue> {
        let mut issues = Vec::new();
        let applicable_rules = applicable(enabled, RuleTarget::Project);

        for project in projects {
            for rule in &applicable_rules {
                if rules::check_project(rule.id, project, &self.weights, &self.classifier) {
                    continue;
                }
                issues.push(new_issue(
                    rule,
                    rule.severity,
                    self.project_failure(rule.id, project),
                    vec![project.id.clone()],
                ));
            }
        }

        debug!(issues = issues.len(), "项目检查完成");
        issues
    }

    fn project_failure(&self, id: RuleId, p: &ValidatedProject) -> String {
        match id {
            RuleId::Fin001 => format!("项目 {} IRR 为 {:.2}%,超出 5%-50% 区间", p.name, p.irr),
            RuleId::Fin002 => format!("A 级项目 {} 的 NPV 为 {:.0}", p.name, p.npv),
            RuleId::Fin003 => format!("项目 {} 回收期 {:.1} 年,超过 10 年", p.name, p.payback_years),
            RuleId::Fin004 => format!("项目 {} 资本支出 {:.0} 超出合理量级", p.name, p.capex),
            RuleId::Comp001 => format!("项目 {} 缺少执行摘要", p.name),
            RuleId::Comp002 => format!("项目 {} 未登记任何风险", p.name),
            RuleId::Comp003 => format!("项目 {} 资本支出 {:.0},未列示协同效应", p.name, p.capex),
            RuleId::Comp004 => format!("项目 {} 未指定发起人", p.name),
            RuleId::Cons003 => format!(
                "项目 {} 等级为 {},按评分应为 {}",
                p.name,
                p.investment_grade,
                self.classifier.classify(p.composite_score, p.risk_score)
            ),
            RuleId::Acc001 => format!(
                "项目 {} 综合评分 {:.2} 与复算值 {:.2} 不一致",
                p.name,
                p.composite_score,
                self.weights.recompute(&p.scoring_breakdown)
            ),
            RuleId::Compl001 => format!("项目 {} 资本支出 {:.0} 低于 1000 万门槛", p.name, p.capex),
            RuleId::Compl002 => format!("项目 {} 风险评分 {:.1} 越界", p.name, p.risk_score),
            other => format!("项目 {} 未通过规则 {}", p.name, other),
        }
    }

    // ==========================================
    // 板块配置
    // ==========================================

    fn check_allocations(
        &self,
        allocations: &[SectorAllocation],
        constraints: &[AllocationConstraint],
        enabled: &[&ValidationRule],
    ) -> Vec<DataQualityIssue> {
        let mut issues = Vec::new();

        for rule in applicable(enabled, RuleTarget::Allocation) {
            match rule.id {
                RuleId::Compl003 => {
                    let by_sector: HashMap<&str, &SectorAllocation> = allocations
                        .iter()
                        .map(|a| (a.sector_id.as_str(), a))
                        .collect();
                    for constraint in constraints {
                        let Some(allocation) = by_sector.get(constraint.sector_id.as_str()) else {
                            warn!(sector_id = %constraint.sector_id, "约束引用的板块不存在,跳过");
                            continue;
                        };
                        if !constraint.is_violated_by(allocation.current_allocation) {
                            continue;
                        }
                        let severity = if constraint.is_hard {
                            Severity::Critical
                        } else {
                            Severity::Warning
                        };
                        issues.push(new_issue(
                            rule,
                            severity,
                            format!(
                                "板块 {} 当前配置 {:.2}% 违反 {} 约束 {:.2}%（{}）",
                                allocation.sector.name,
                                allocation.current_allocation,
                                constraint.constraint_type,
                                constraint.value,
                                constraint.reason
                            ),
                            vec![allocation.sector_id.clone()],
                        ));
                    }
                }
                RuleId::Compl004 => {
                    for a in allocations {
                        if in_score_range(a.current_allocation)
                            && a.min_allocation <= a.max_allocation
                        {
                            continue;
                        }
                        issues.push(new_issue(
                            rule,
                            rule.severity,
                            format!(
                                "板块 {} 配置边界异常: 当前 {:.2}%, 下限 {:.2}%, 上限 {:.2}%",
                                a.sector.name,
                                a.current_allocation,
                                a.min_allocation,
                                a.max_allocation
                            ),
                            vec![a.sector_id.clone()],
                        ));
                    }
                }
                _ => {}
            }
        }

        debug!(issues = issues.len(), "板块配置检查完成");
        issues
    }
}

// ==========================================
// 指标与问题延续
// ==========================================

/// 质量指标（仅统计 open 问题）
///
/// overall_score = max(0, 100 − 10×critical − 5×warning − 1×info)
pub fn compute_metrics(issues: &[DataQualityIssue]) -> QualityMetrics {
    let open: Vec<&DataQualityIssue> = issues.iter().filter(|i| i.is_open()).collect();
    let count = |s: Severity| open.iter().filter(|i| i.severity == s).count();

    let critical_count = count(Severity::Critical);
    let warning_count = count(Severity::Warning);
    let info_count = count(Severity::Info);
    let penalty = 10 * critical_count + 5 * warning_count + info_count;

    QualityMetrics {
        overall_score: (100.0 - penalty as f64).max(0.0),
        critical_count,
        warning_count,
        info_count,
        total_issues: open.len(),
        resolved_issues: issues
            .iter()
            .filter(|i| i.status == IssueStatus::Resolved)
            .count(),
    }
}

/// 将上一轮人工处置的状态延续到本轮同一问题
///
/// 同一问题按 (rule_id, affected_items) 识别;返回延续的数量
pub fn carry_over_statuses(previous: &[DataQualityIssue], current: &mut [DataQualityIssue]) -> usize {
    let handled: HashMap<(RuleId, Vec<String>), IssueStatus> = previous
        .iter()
        .filter(|i| !i.is_open())
        .map(|i| (i.identity_key(), i.status))
        .collect();

    let mut carried = 0;
    for issue in current.iter_mut() {
        if let Some(status) = handled.get(&issue.identity_key()) {
            issue.status = *status;
            carried += 1;
        }
    }
    carried
}

// ==========================================
// 内部工具
// ==========================================

fn applicable<'r>(enabled: &[&'r ValidationRule], target: RuleTarget) -> Vec<&'r ValidationRule> {
    enabled
        .iter()
        .copied()
        .filter(|r| r.id.applies_to(target))
        .collect()
}

fn in_score_range(v: f64) -> bool {
    (0.0..=100.0).contains(&v)
}

fn new_issue(
    rule: &ValidationRule,
    severity: Severity,
    description: String,
    affected_items: Vec<String>,
) -> DataQualityIssue {
    DataQualityIssue {
        id: Uuid::new_v4().to_string(),
        rule_id: rule.id,
        severity,
        title: rule.name.clone(),
        description,
        affected_items,
        category: rule.category,
        status: IssueStatus::Open,
        detected_date: Utc::now(),
        auto_fix_suggestion: super::autofix::suggestion_for(rule),
    }
}
