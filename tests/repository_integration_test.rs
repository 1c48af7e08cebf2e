// ==========================================
// Repository 层集成测试
// ==========================================
// 测试目标: 组合状态整包持久化无损往返;审计日志与状态共用连接
// ==========================================

mod test_helpers;

use capital_allocation::api::{PortfolioApi, PortfolioSettings};
use capital_allocation::app::demo_portfolio;
use capital_allocation::domain::action_log::{ActionLog, ActionType};
use capital_allocation::domain::portfolio::PortfolioState;
use capital_allocation::engine::scoring::FixedSynergy;
use capital_allocation::repository::{
    ActionLogRepository, PortfolioStore, RepositoryError, SqlitePortfolioStore,
};
use test_helpers::{create_test_db, open_test_connection, shared_connection};

const TOTAL_CAPITAL: f64 = 1_000_000_000.0;

/// 跑完流水线的完整状态（含项目/配置/问题/日期字段）
fn populated_state() -> PortfolioState {
    let settings = PortfolioSettings {
        total_capital: TOTAL_CAPITAL,
        ..PortfolioSettings::default()
    };
    let mut api = PortfolioApi::in_memory(
        demo_portfolio(TOTAL_CAPITAL),
        settings,
        Box::new(FixedSynergy(65.0)),
    );
    api.run_pipeline("tester").expect("pipeline should run");
    api.state().clone()
}

#[test]
fn test_state_round_trip_is_lossless() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = populated_state();
    assert!(!state.projects.is_empty());
    assert!(!state.allocations.is_empty());

    {
        let store = SqlitePortfolioStore::new(&db_path).unwrap();
        store.save(&state).unwrap();
    }

    // 新连接重新读取
    let store = SqlitePortfolioStore::new(&db_path).unwrap();
    let loaded = store.load().unwrap().expect("state should be stored");
    assert_eq!(loaded, state);
    assert_eq!(
        loaded.projects[0].created_date,
        state.projects[0].created_date
    );
    assert_eq!(
        loaded.opportunities[0].estimated_start,
        state.opportunities[0].estimated_start
    );
}

#[test]
fn test_save_overwrites_previous_state() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let store = SqlitePortfolioStore::new(&db_path).unwrap();

    let mut state = populated_state();
    store.save(&state).unwrap();

    state.projects.clear();
    state.total_capital = 2.0 * TOTAL_CAPITAL;
    store.save(&state).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert!(loaded.projects.is_empty());
    assert_eq!(loaded.total_capital, 2.0 * TOTAL_CAPITAL);
}

#[test]
fn test_missing_collection_defaults_and_corrupt_collection_fails() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).unwrap();
    conn.execute(
        "INSERT INTO portfolio_state (collection, value_json) VALUES ('total_capital', '5000')",
        [],
    )
    .unwrap();

    let store = SqlitePortfolioStore::new(&db_path).unwrap();
    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.total_capital, 5000.0);
    assert!(loaded.priorities.is_empty());

    conn.execute(
        "INSERT INTO portfolio_state (collection, value_json) VALUES ('sectors', '{not json')",
        [],
    )
    .unwrap();
    let err = store.load().unwrap_err();
    assert!(matches!(err, RepositoryError::FieldValueError { ref field, .. } if field == "sectors"));
}

#[test]
fn test_shared_connection_for_state_and_audit() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = shared_connection(&db_path).unwrap();

    let store = SqlitePortfolioStore::from_connection(conn.clone()).unwrap();
    let repo = ActionLogRepository::new(conn).unwrap();

    let state = populated_state();
    store.save(&state).unwrap();

    let logs: Vec<ActionLog> = state
        .projects
        .iter()
        .map(|p| {
            ActionLog::new(ActionType::ConvertOpportunity, "tester", Some(&p.opportunity_id))
                .with_detail(format!("转换为 {}", p.id))
        })
        .collect();
    assert_eq!(repo.batch_insert(&logs).unwrap(), state.projects.len());

    assert_eq!(repo.count().unwrap(), state.projects.len() as i64);
    let for_first = repo.find_by_entity("OPP-001").unwrap();
    assert_eq!(for_first.len(), 1);
    assert_eq!(for_first[0].detail.as_deref(), Some("转换为 VP-OPP-001"));
    assert_eq!(for_first[0].action_ts, logs[0].action_ts);

    assert!(store.load().unwrap().is_some());
}
