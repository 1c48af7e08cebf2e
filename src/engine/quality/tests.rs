use super::*;
use crate::domain::opportunity::{InvestmentRange, Opportunity};
use crate::domain::portfolio::PortfolioState;
use crate::domain::priority::InvestmentPriority;
use crate::domain::project::{
    BusinessPlan, ImpactLevel, RiskCategory, RiskItem, ScoringBreakdown, ValidatedProject,
};
use crate::domain::quality::{DataQualityIssue, RuleId, ValidationRule};
use crate::domain::sector::{AllocationConstraint, Sector, SectorAllocation, SectorPerformance};
use crate::domain::types::{
    ConstraintType, InvestmentGrade, IssueStatus, OpportunityStatus, RiskAppetite, Severity,
    ValidationStatus,
};
use chrono::{NaiveDate, Utc};

// ==========================================
// 测试辅助函数
// ==========================================

fn priority(id: &str, weight: f64, capital_allocation: f64) -> InvestmentPriority {
    InvestmentPriority {
        id: id.to_string(),
        name: id.to_string(),
        weight,
        capital_allocation,
        time_horizon: "5-10 years".to_string(),
        min_roi: 12.0,
        max_payback: 8.0,
        risk_appetite: RiskAppetite::Moderate,
        strategic_importance: 8,
    }
}

/// 权重合计 100 的优先级
fn balanced() -> Vec<InvestmentPriority> {
    vec![priority("P1", 60.0, 6.0), priority("P2", 40.0, 4.0)]
}

fn opportunity(id: &str) -> Opportunity {
    Opportunity {
        id: id.to_string(),
        name: id.to_string(),
        description: "港口扩建".to_string(),
        source: "内部".to_string(),
        sponsor: "CFO".to_string(),
        business_unit: "Ports".to_string(),
        status: OpportunityStatus::New,
        investment_range: InvestmentRange::new(100_000_000.0, 200_000_000.0),
        estimated_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        duration: 24,
        strategic_fit_score: 80.0,
        preliminary_risk_score: 30.0,
        recommendations: vec![],
        approved_by: None,
        updated_by: "tester".to_string(),
        updated_date: Utc::now(),
    }
}

/// 满足全部项目规则的 A 级项目
fn clean_project(id: &str) -> ValidatedProject {
    ValidatedProject {
        id: id.to_string(),
        opportunity_id: format!("OPP-{}", id),
        name: id.to_string(),
        sponsor: "CFO".to_string(),
        business_unit: "Ports".to_string(),
        estimated_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        duration_months: 24,
        capex: 100_000_000.0,
        opex: 10_000_000.0,
        revenue_potential: 150_000_000.0,
        npv: 30_000_000.0,
        irr: 23.5,
        mirr: 17.7,
        payback_years: 4.6,
        composite_score: 85.0,
        investment_grade: InvestmentGrade::A,
        risk_score: 20.0,
        scoring_breakdown: ScoringBreakdown {
            strategic_alignment: 85.0,
            financial_score: 85.0,
            risk_adjustment: 85.0,
            synergy_score: 85.0,
            composite_score: 85.0,
        },
        business_plan: BusinessPlan {
            executive_summary: "港口扩建".to_string(),
            risks: vec![RiskItem {
                category: RiskCategory::Market,
                description: "需求波动".to_string(),
                probability: 0.2,
                impact: ImpactLevel::Medium,
                mitigation: "长期合同".to_string(),
            }],
            synergies: vec![],
            financials: vec![],
        },
        validation_status: ValidationStatus::Pending,
        validated_by: None,
        created_date: Utc::now(),
        updated_date: Utc::now(),
    }
}

fn allocation(sector_id: &str, current: f64) -> SectorAllocation {
    let sector = Sector {
        id: sector_id.to_string(),
        name: sector_id.to_string(),
        target_allocation: 30.0,
        min_allocation: 20.0,
        max_allocation: 40.0,
    };
    SectorAllocation {
        sector_id: sector_id.to_string(),
        current_allocation: current,
        target_allocation: sector.target_allocation,
        min_allocation: sector.min_allocation,
        max_allocation: sector.max_allocation,
        sector,
        allocated_capital: 0.0,
        project_count: 0,
        projects: vec![],
        performance: SectorPerformance::default(),
    }
}

fn constraint(sector_id: &str, kind: ConstraintType, value: f64, hard: bool) -> AllocationConstraint {
    AllocationConstraint {
        sector_id: sector_id.to_string(),
        constraint_type: kind,
        value,
        is_hard: hard,
        reason: "集中度".to_string(),
    }
}

fn run(
    priorities: &[InvestmentPriority],
    opportunities: &[Opportunity],
    projects: &[ValidatedProject],
    allocations: &[SectorAllocation],
    constraints: &[AllocationConstraint],
    rules: &[ValidationRule],
) -> Vec<DataQualityIssue> {
    let ctx = QualityContext {
        priorities,
        opportunities,
        projects,
        allocations,
        constraints,
    };
    DataQualityValidator::new().validate(&ctx, rules).issues
}

fn rule_ids(issues: &[DataQualityIssue]) -> Vec<RuleId> {
    issues.iter().map(|i| i.rule_id).collect()
}

fn issue_with(severity: Severity, status: IssueStatus) -> DataQualityIssue {
    DataQualityIssue {
        id: "I".to_string(),
        rule_id: RuleId::Fin001,
        severity,
        title: "t".to_string(),
        description: "d".to_string(),
        affected_items: vec!["VP-1".to_string()],
        category: crate::domain::types::RuleCategory::Financial,
        status,
        detected_date: Utc::now(),
        auto_fix_suggestion: None,
    }
}

// ==========================================
// 校验
// ==========================================

#[test]
fn test_clean_portfolio_has_no_issues() {
    let priorities = vec![priority("P1", 60.0, 6.0), priority("P2", 40.0, 4.0)];
    let issues = run(
        &priorities,
        &[opportunity("O1")],
        &[clean_project("VP-1")],
        &[allocation("S1", 30.0)],
        &[constraint("S1", ConstraintType::Max, 40.0, true)],
        &default_rules(),
    );
    assert!(issues.is_empty(), "unexpected: {:?}", rule_ids(&issues));
}

#[test]
fn test_weight_sum_violation_is_critical() {
    let priorities = vec![priority("P1", 60.0, 6.0), priority("P2", 30.0, 3.0)];
    let issues = run(&priorities, &[], &[], &[], &[], &default_rules());

    assert_eq!(rule_ids(&issues), vec![RuleId::Cons001]);
    assert_eq!(issues[0].severity, Severity::Critical);
    assert_eq!(issues[0].affected_items, vec!["P1".to_string(), "P2".to_string()]);
    assert!(issues[0].auto_fix_suggestion.is_some());
}

#[test]
fn test_empty_priorities_fail_weight_sum() {
    let issues = run(&[], &[], &[], &[], &[], &default_rules());

    assert_eq!(rule_ids(&issues), vec![RuleId::Cons001]);
    assert_eq!(issues[0].severity, Severity::Critical);
    assert!(issues[0].description.contains("0.00"));
    assert!(issues[0].affected_items.is_empty());

    // 没有可归一化的对象
    let mut state = PortfolioState::new(1_000.0);
    assert!(QualityAutoFixer::default().apply(&issues[0], &mut state).is_err());
}

#[test]
fn test_priority_without_capital_allocation() {
    let priorities = vec![priority("P1", 100.0, 0.0)];
    let issues = run(&priorities, &[], &[], &[], &[], &default_rules());
    assert_eq!(rule_ids(&issues), vec![RuleId::Cons002]);
}

#[test]
fn test_opportunity_checks() {
    let mut inverted = opportunity("O1");
    inverted.investment_range = InvestmentRange::new(300.0, 100.0);
    let mut out_of_range = opportunity("O2");
    out_of_range.strategic_fit_score = 120.0;
    let mut no_sponsor = opportunity("O3");
    no_sponsor.sponsor = "  ".to_string();

    let issues = run(
        &balanced(),
        &[inverted, out_of_range, no_sponsor],
        &[],
        &[],
        &[],
        &default_rules(),
    );

    assert_eq!(
        rule_ids(&issues),
        vec![RuleId::Cons004, RuleId::Acc002, RuleId::Comp004]
    );
    assert_eq!(issues[0].affected_items, vec!["O1".to_string()]);
    assert_eq!(issues[2].affected_items, vec!["O3".to_string()]);
}

#[test]
fn test_irr_out_of_range() {
    let mut p = clean_project("VP-1");
    p.irr = 55.0;
    let issues = run(&balanced(), &[], &[p], &[], &[], &default_rules());
    assert_eq!(rule_ids(&issues), vec![RuleId::Fin001]);
    assert_eq!(issues[0].severity, Severity::Critical);
}

#[test]
fn test_payback_above_ten_years() {
    let mut p = clean_project("VP-1");
    p.payback_years = 10.0;
    assert!(run(&balanced(), &[], &[p.clone()], &[], &[], &default_rules()).is_empty());

    p.payback_years = 10.5;
    let issues = run(&balanced(), &[], &[p], &[], &[], &default_rules());
    assert_eq!(rule_ids(&issues), vec![RuleId::Fin003]);
    assert_eq!(issues[0].severity, Severity::Warning);
}

#[test]
fn test_missing_executive_summary() {
    let mut p = clean_project("VP-1");
    p.business_plan.executive_summary = "   ".to_string();
    let issues = run(&balanced(), &[], &[p], &[], &[], &default_rules());
    assert_eq!(rule_ids(&issues), vec![RuleId::Comp001]);
    assert_eq!(issues[0].severity, Severity::Critical);
    assert_eq!(issues[0].affected_items, vec!["VP-1".to_string()]);
}

#[test]
fn test_empty_risk_register() {
    let mut p = clean_project("VP-1");
    p.business_plan.risks.clear();
    let issues = run(&balanced(), &[], &[p], &[], &[], &default_rules());
    assert_eq!(rule_ids(&issues), vec![RuleId::Comp002]);
    assert_eq!(issues[0].severity, Severity::Warning);
}

#[test]
fn test_risk_score_out_of_range() {
    let mut p = clean_project("VP-1");
    p.risk_score = -5.0;
    let issues = run(&balanced(), &[], &[p.clone()], &[], &[], &default_rules());
    assert_eq!(rule_ids(&issues), vec![RuleId::Compl002]);

    p.risk_score = 120.0;
    let issues = run(&balanced(), &[], &[p.clone()], &[], &[], &default_rules());
    assert!(rule_ids(&issues).contains(&RuleId::Compl002));

    // 边界值 0 与 100 合法
    for bound in [0.0, 100.0] {
        p.risk_score = bound;
        let issues = run(&balanced(), &[], &[p.clone()], &[], &[], &default_rules());
        assert!(!rule_ids(&issues).contains(&RuleId::Compl002), "risk={}", bound);
    }
}

#[test]
fn test_grade_a_with_negative_npv() {
    let mut p = clean_project("VP-1");
    p.npv = -1.0;
    let issues = run(&balanced(), &[], &[p], &[], &[], &default_rules());
    assert_eq!(rule_ids(&issues), vec![RuleId::Fin002]);
}

#[test]
fn test_large_project_requires_synergies() {
    let mut p = clean_project("VP-1");
    p.capex = 600_000_000.0;
    let issues = run(&balanced(), &[], &[p.clone()], &[], &[], &default_rules());
    assert_eq!(rule_ids(&issues), vec![RuleId::Comp003]);

    p.business_plan.synergies.push(crate::domain::project::SynergyItem {
        synergy_type: crate::domain::project::SynergyType::Cost,
        description: "共享".to_string(),
        estimated_value: 1.0,
        realization_years: 3,
    });
    assert!(run(&balanced(), &[], &[p], &[], &[], &default_rules()).is_empty());
}

#[test]
fn test_small_capex_flags_magnitude_and_compliance() {
    let mut p = clean_project("VP-1");
    p.capex = 500_000.0;
    let issues = run(&balanced(), &[], &[p], &[], &[], &default_rules());
    assert_eq!(rule_ids(&issues), vec![RuleId::Fin004, RuleId::Compl001]);
}

#[test]
fn test_grade_mismatch_and_stale_composite() {
    let mut p = clean_project("VP-1");
    p.investment_grade = InvestmentGrade::C;
    p.composite_score = 90.0;
    let issues = run(&balanced(), &[], &[p], &[], &[], &default_rules());
    // 90/20 应为 A;复算值 85 与 90 偏差 5
    assert!(rule_ids(&issues).contains(&RuleId::Cons003));
    assert!(rule_ids(&issues).contains(&RuleId::Acc001));
}

#[test]
fn test_disabled_rule_skipped() {
    let mut p = clean_project("VP-1");
    p.irr = 2.0;
    let mut rules = default_rules();
    for r in rules.iter_mut().filter(|r| r.id == RuleId::Fin001) {
        r.enabled = false;
    }
    assert!(run(&balanced(), &[], &[p], &[], &[], &rules).is_empty());
}

#[test]
fn test_constraint_severity_follows_hardness() {
    let allocations = vec![allocation("S1", 50.0), allocation("S2", 10.0)];
    let constraints = vec![
        constraint("S1", ConstraintType::Max, 40.0, true),
        constraint("S2", ConstraintType::Min, 20.0, false),
    ];
    let issues = run(&balanced(), &[], &[], &allocations, &constraints, &default_rules());

    assert_eq!(rule_ids(&issues), vec![RuleId::Compl003, RuleId::Compl003]);
    assert_eq!(issues[0].severity, Severity::Critical);
    assert_eq!(issues[1].severity, Severity::Warning);
}

#[test]
fn test_allocation_bounds() {
    let mut a = allocation("S1", 120.0);
    a.min_allocation = 50.0;
    a.max_allocation = 10.0;
    let issues = run(&balanced(), &[], &[], &[a], &[], &default_rules());
    assert_eq!(rule_ids(&issues), vec![RuleId::Compl004]);
}

// ==========================================
// 指标
// ==========================================

#[test]
fn test_metrics_score() {
    let issues = vec![
        issue_with(Severity::Critical, IssueStatus::Open),
        issue_with(Severity::Warning, IssueStatus::Open),
        issue_with(Severity::Info, IssueStatus::Open),
        issue_with(Severity::Critical, IssueStatus::Resolved),
    ];
    let m = compute_metrics(&issues);
    assert_eq!(m.overall_score, 84.0);
    assert_eq!(m.critical_count, 1);
    assert_eq!(m.total_issues, 3);
    assert_eq!(m.resolved_issues, 1);
}

#[test]
fn test_metrics_floor_at_zero() {
    let issues: Vec<_> = (0..11)
        .map(|_| issue_with(Severity::Critical, IssueStatus::Open))
        .collect();
    assert_eq!(compute_metrics(&issues).overall_score, 0.0);
    assert_eq!(compute_metrics(&[]).overall_score, 100.0);
}

#[test]
fn test_carry_over_statuses() {
    let previous = vec![issue_with(Severity::Critical, IssueStatus::Ignored)];
    let mut current = vec![
        issue_with(Severity::Critical, IssueStatus::Open),
        DataQualityIssue {
            affected_items: vec!["VP-2".to_string()],
            ..issue_with(Severity::Critical, IssueStatus::Open)
        },
    ];
    assert_eq!(carry_over_statuses(&previous, &mut current), 1);
    assert_eq!(current[0].status, IssueStatus::Ignored);
    assert_eq!(current[1].status, IssueStatus::Open);
}

// ==========================================
// 自动修复
// ==========================================

#[test]
fn test_autofix_normalizes_weights() {
    let mut state = PortfolioState::new(1_000.0);
    state.priorities = vec![priority("P1", 30.0, 0.0), priority("P2", 10.0, 0.0)];
    let issues = run(&state.priorities, &[], &[], &[], &[], &default_rules());
    let cons1 = issues.iter().find(|i| i.rule_id == RuleId::Cons001).unwrap();

    let outcome = QualityAutoFixer::default().apply(cons1, &mut state).unwrap();

    assert_eq!(outcome.fixed_items.len(), 2);
    assert!((state.priorities[0].weight - 75.0).abs() < 1e-9);
    assert!((state.priorities[1].capital_allocation - 250.0).abs() < 1e-6);
}

#[test]
fn test_autofix_regrades_project() {
    let mut state = PortfolioState::new(0.0);
    let mut p = clean_project("VP-1");
    p.investment_grade = InvestmentGrade::NonInvestment;
    state.projects = vec![p];
    let issues = run(&balanced(), &[], &state.projects, &[], &[], &default_rules());
    let cons3 = issues.iter().find(|i| i.rule_id == RuleId::Cons003).unwrap();

    QualityAutoFixer::default().apply(cons3, &mut state).unwrap();
    assert_eq!(state.projects[0].investment_grade, InvestmentGrade::A);
}

#[test]
fn test_autofix_rejects_unfixable_rule() {
    let mut state = PortfolioState::new(0.0);
    let issue = issue_with(Severity::Critical, IssueStatus::Open);
    assert!(QualityAutoFixer::default().apply(&issue, &mut state).is_err());
}
