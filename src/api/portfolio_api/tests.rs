use super::*;
use crate::app::seed::demo_portfolio;
use crate::domain::quality::RuleId;
use crate::domain::types::{InvestmentGrade, IssueStatus, OpportunityStatus, ValidationStatus};
use crate::engine::scoring::FixedSynergy;
use crate::importer::field_mapper::RawTable;
use crate::repository::error::RepositoryError;
use rusqlite::Connection;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

// ==========================================
// 测试辅助函数
// ==========================================

const TOTAL_CAPITAL: f64 = 1_000_000_000.0;

fn settings() -> PortfolioSettings {
    PortfolioSettings {
        total_capital: TOTAL_CAPITAL,
        ..PortfolioSettings::default()
    }
}

fn demo_api() -> PortfolioApi {
    PortfolioApi::in_memory(
        demo_portfolio(TOTAL_CAPITAL),
        settings(),
        Box::new(FixedSynergy(65.0)),
    )
}

// ==========================================
// 优先级与状态流转
// ==========================================

#[test]
fn test_update_priority_weight_redistributes() {
    let mut api = demo_api();
    api.update_priority_weight("PRI-ENERGY", 60.0, "tester").unwrap();

    let weights: Vec<f64> = api.state().priorities.iter().map(|p| p.weight).collect();
    assert!((weights[0] - 60.0).abs() < 1e-9);
    assert!((weights[1] - 24.0).abs() < 1e-9);
    assert!((weights[2] - 16.0).abs() < 1e-9);
    assert!((api.state().priorities[1].capital_allocation - 240_000_000.0).abs() < 1e-3);
}

#[test]
fn test_blank_actor_rejected() {
    let mut api = demo_api();
    let err = api.update_priority_weight("PRI-ENERGY", 60.0, "  ").unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_opportunity_transition_rules() {
    let mut api = demo_api();
    api.transition_opportunity("OPP-005", OpportunityStatus::Approved, "cio")
        .unwrap();
    assert_eq!(
        api.state().find_opportunity("OPP-005").unwrap().approved_by.as_deref(),
        Some("cio")
    );

    // new -> approved 不允许跳过评审
    let err = api
        .transition_opportunity("OPP-006", OpportunityStatus::Approved, "cio")
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));

    let err = api
        .transition_opportunity("OPP-404", OpportunityStatus::UnderReview, "cio")
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

// ==========================================
// 机会转项目
// ==========================================

#[test]
fn test_convert_opportunity_end_to_end_values() {
    let mut api = demo_api();
    let project = api.convert_opportunity("OPP-001", "tester").unwrap();

    assert!((project.composite_score - 87.5).abs() < 1e-9);
    assert_eq!(project.investment_grade, InvestmentGrade::A);
    assert_eq!(project.capex, 150_000_000.0);
    assert!((project.irr - 23.75).abs() < 1e-9);
    assert_eq!(project.validation_status, ValidationStatus::Pending);

    // 同一机会不能重复转换
    let err = api.convert_opportunity("OPP-001", "tester").unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)));

    // 未批准机会不能转换
    let err = api.convert_opportunity("OPP-006", "tester").unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)));
}

#[test]
fn test_convert_all_approved_skips_existing() {
    let mut api = demo_api();
    api.convert_opportunity("OPP-001", "tester").unwrap();

    let result = api.convert_all_approved("tester").unwrap();
    assert_eq!(result.affected.len(), 3);
    assert_eq!(result.skipped, 1);
    assert_eq!(api.state().projects.len(), 4);

    let again = api.convert_all_approved("tester").unwrap();
    assert!(again.affected.is_empty());
    assert_eq!(again.skipped, 4);
}

#[test]
fn test_project_transition() {
    let mut api = demo_api();
    let project = api.convert_opportunity("OPP-001", "tester").unwrap();

    api.transition_project(&project.id, ValidationStatus::InReview, "analyst")
        .unwrap();
    api.transition_project(&project.id, ValidationStatus::Validated, "analyst")
        .unwrap();
    let stored = api.state().find_project(&project.id).unwrap();
    assert_eq!(stored.validated_by.as_deref(), Some("analyst"));

    let err = api
        .transition_project(&project.id, ValidationStatus::Pending, "analyst")
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));
}

// ==========================================
// 板块配置
// ==========================================

#[test]
fn test_allocation_flow() {
    let mut api = demo_api();
    api.convert_all_approved("tester").unwrap();

    let allocations = api.recalculate_allocations("tester").unwrap();
    assert_eq!(allocations.len(), 4);
    let total: f64 = allocations.iter().map(|a| a.current_allocation).sum();
    assert!(total <= 100.0 + 1e-9);

    let statuses = api.evaluate_constraints();
    assert_eq!(statuses.len(), 4);

    let applied = api.set_manual_allocation("SEC-AIR", 140.0, "tester").unwrap();
    assert_eq!(applied, 100.0);

    api.rebalance("tester").unwrap();
    assert!(api
        .state()
        .allocations
        .iter()
        .all(|a| a.current_allocation == a.target_allocation));

    let err = api.set_manual_allocation("SEC-404", 10.0, "tester").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_rebalance_requires_allocations() {
    let mut api = demo_api();
    let err = api.rebalance("tester").unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)));
}

// ==========================================
// 数据质量
// ==========================================

#[test]
fn test_quality_resolution_carried_over() {
    let mut api = demo_api();
    api.state.priorities[0].weight = 70.0; // 合计 120

    let report = api.run_quality_check("tester").unwrap();
    let issue = report
        .issues
        .iter()
        .find(|i| i.rule_id == RuleId::Cons001)
        .unwrap()
        .clone();

    api.update_issue_status(&issue.id, IssueStatus::Ignored, "tester")
        .unwrap();

    let rerun = api.run_quality_check("tester").unwrap();
    let same = rerun
        .issues
        .iter()
        .find(|i| i.rule_id == RuleId::Cons001)
        .unwrap();
    assert_eq!(same.status, IssueStatus::Ignored);
    assert!(rerun.metrics.overall_score >= report.metrics.overall_score);
}

#[test]
fn test_auto_fix_normalizes_weights() {
    let mut api = demo_api();
    api.state.priorities[0].weight = 70.0;

    let report = api.run_quality_check("tester").unwrap();
    let issue_id = report
        .issues
        .iter()
        .find(|i| i.rule_id == RuleId::Cons001)
        .map(|i| i.id.clone())
        .unwrap();

    let outcome = api.apply_auto_fix(&issue_id, "tester").unwrap();
    assert_eq!(outcome.rule_id, RuleId::Cons001);
    let total: f64 = api.state().priorities.iter().map(|p| p.weight).sum();
    assert!((total - 100.0).abs() < 0.01);

    let fixed = api.state().issues.iter().find(|i| i.id == issue_id).unwrap();
    assert_eq!(fixed.status, IssueStatus::Resolved);
}

#[test]
fn test_toggle_rule_disables_check() {
    let mut api = demo_api();
    api.state.priorities[0].weight = 70.0;
    api.toggle_rule(RuleId::Cons001, false, "tester").unwrap();

    let report = api.run_quality_check("tester").unwrap();
    assert!(report.issues.iter().all(|i| i.rule_id != RuleId::Cons001));
}

// ==========================================
// 情景与导入
// ==========================================

#[test]
fn test_compare_preset() {
    let mut api = demo_api();
    api.convert_all_approved("tester").unwrap();

    let comparison = api.compare_preset("Aggressive").unwrap();
    assert_eq!(
        comparison.diff.added.len() + comparison.diff.unchanged.len(),
        comparison.scenario.project_count
    );
    assert!(matches!(
        api.compare_preset("unknown").unwrap_err(),
        ApiError::NotFound(_)
    ));
}

#[test]
fn test_import_sectors_merges_by_id() {
    let mut api = demo_api();
    let table = RawTable::new(
        &["id", "name", "target_allocation", "min_allocation", "max_allocation"],
        vec![
            vec!["SEC-AIR", "Airports", "15", "5", "25"],
            vec!["SEC-HEALTH", "Healthcare", "10", "0", "20"],
            vec!["", "Broken", "x", "0", "0"],
        ],
    );

    let summary = api.import_sectors(&table, "tester").unwrap();
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(api.state().sectors.len(), 5);
    let airports = api.state().sectors.iter().find(|s| s.id == "SEC-AIR").unwrap();
    assert_eq!(airports.target_allocation, 15.0);
}

#[test]
fn test_import_rejects_bad_header() {
    let mut api = demo_api();
    let table = RawTable::new(&["id", "name"], vec![vec!["P1", "x"]]);
    let err = api.import_priorities(&table, "tester").unwrap_err();
    assert!(matches!(err, ApiError::ImportError(_)));
}

#[test]
fn test_run_pipeline() {
    let mut api = demo_api();
    let summary = api.run_pipeline("tester").unwrap();

    assert_eq!(summary.converted.len(), 4);
    assert_eq!(summary.constraint_statuses.len(), 4);
    assert_eq!(summary.scenarios.len(), 3);
    assert!(summary.quality.overall_score <= 100.0);
    assert!(summary.allocatable_projects >= 1);
}

// ==========================================
// 持久化失败
// ==========================================

/// 可切换为保存失败的内存存储
struct FailingStore {
    inner: InMemoryPortfolioStore,
    fail_saves: AtomicBool,
}

impl PortfolioStore for FailingStore {
    fn load(&self) -> RepositoryResult<Option<PortfolioState>> {
        self.inner.load()
    }

    fn save(&self, state: &PortfolioState) -> RepositoryResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::DatabaseTransactionError(
                "磁盘已满".to_string(),
            ));
        }
        self.inner.save(state)
    }
}

#[test]
fn test_failed_save_rolls_back_state() {
    let store = Arc::new(FailingStore {
        inner: InMemoryPortfolioStore::new(),
        fail_saves: AtomicBool::new(false),
    });
    store.inner.save(&demo_portfolio(TOTAL_CAPITAL)).unwrap();

    let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
    let repo = Arc::new(ActionLogRepository::new(conn).unwrap());
    let mut api = PortfolioApi::new(store.clone(), settings(), Box::new(FixedSynergy(65.0)))
        .unwrap()
        .with_action_log(repo.clone());
    let before = api.state().clone();

    store.fail_saves.store(true, Ordering::SeqCst);
    assert!(api.update_priority_weight("PRI-ENERGY", 60.0, "tester").is_err());
    assert!(api.convert_all_approved("tester").is_err());

    // 内存与存储一致,且不写审计
    assert_eq!(api.state(), &before);
    assert_eq!(repo.count().unwrap(), 0);

    store.fail_saves.store(false, Ordering::SeqCst);
    api.update_priority_weight("PRI-ENERGY", 60.0, "tester").unwrap();
    assert_eq!(store.load().unwrap().as_ref(), Some(api.state()));
    assert_eq!(repo.count().unwrap(), 1);
}
