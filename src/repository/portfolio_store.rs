// ==========================================
// 资本配置决策系统 - 组合状态持久化端口
// ==========================================
// 职责: 整体读写 PortfolioState（不包含业务逻辑）
// 存储: portfolio_state 表,每个集合一行 JSON
// 红线: 保存在单个事务内完成,部分失败整体回滚
// ==========================================

use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::domain::portfolio::PortfolioState;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

// ===== 集合键 =====
const KEY_TOTAL_CAPITAL: &str = "total_capital";
const KEY_PRIORITIES: &str = "priorities";
const KEY_OPPORTUNITIES: &str = "opportunities";
const KEY_PROJECTS: &str = "projects";
const KEY_SECTORS: &str = "sectors";
const KEY_CONSTRAINTS: &str = "constraints";
const KEY_ALLOCATIONS: &str = "allocations";
const KEY_ISSUES: &str = "issues";
const KEY_RULES: &str = "rules";

// ==========================================
// PortfolioStore Trait
// ==========================================
// 实现者: SqlitePortfolioStore / InMemoryPortfolioStore
pub trait PortfolioStore: Send + Sync {
    /// 读取完整状态（从未保存过时返回 None）
    fn load(&self) -> RepositoryResult<Option<PortfolioState>>;

    /// 整体覆盖保存
    fn save(&self, state: &PortfolioState) -> RepositoryResult<()>;
}

// ==========================================
// SqlitePortfolioStore
// ==========================================
pub struct SqlitePortfolioStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePortfolioStore {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl PortfolioStore for SqlitePortfolioStore {
    fn load(&self) -> RepositoryResult<Option<PortfolioState>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT collection, value_json FROM portfolio_state")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut values: HashMap<String, String> = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            values.insert(key, value);
        }

        if values.is_empty() {
            debug!("组合状态表为空");
            return Ok(None);
        }

        let state = PortfolioState {
            total_capital: decode_or_default(&values, KEY_TOTAL_CAPITAL)?,
            priorities: decode_or_default(&values, KEY_PRIORITIES)?,
            opportunities: decode_or_default(&values, KEY_OPPORTUNITIES)?,
            projects: decode_or_default(&values, KEY_PROJECTS)?,
            sectors: decode_or_default(&values, KEY_SECTORS)?,
            constraints: decode_or_default(&values, KEY_CONSTRAINTS)?,
            allocations: decode_or_default(&values, KEY_ALLOCATIONS)?,
            issues: decode_or_default(&values, KEY_ISSUES)?,
            rules: decode_or_default(&values, KEY_RULES)?,
        };

        info!(
            priorities = state.priorities.len(),
            opportunities = state.opportunities.len(),
            projects = state.projects.len(),
            "组合状态已加载"
        );
        Ok(Some(state))
    }

    fn save(&self, state: &PortfolioState) -> RepositoryResult<()> {
        let entries: Vec<(&str, String)> = vec![
            (KEY_TOTAL_CAPITAL, encode(&state.total_capital)?),
            (KEY_PRIORITIES, encode(&state.priorities)?),
            (KEY_OPPORTUNITIES, encode(&state.opportunities)?),
            (KEY_PROJECTS, encode(&state.projects)?),
            (KEY_SECTORS, encode(&state.sectors)?),
            (KEY_CONSTRAINTS, encode(&state.constraints)?),
            (KEY_ALLOCATIONS, encode(&state.allocations)?),
            (KEY_ISSUES, encode(&state.issues)?),
            (KEY_RULES, encode(&state.rules)?),
        ];

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        for (key, value) in &entries {
            tx.execute(
                "INSERT INTO portfolio_state (collection, value_json) VALUES (?1, ?2)
                 ON CONFLICT(collection) DO UPDATE SET value_json = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        debug!(collections = entries.len(), "组合状态已保存");
        Ok(())
    }
}

fn encode<T: Serialize>(value: &T) -> RepositoryResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// 缺失的集合按默认值处理;存在但损坏则报错
fn decode_or_default<T: DeserializeOwned + Default>(
    values: &HashMap<String, String>,
    key: &str,
) -> RepositoryResult<T> {
    match values.get(key) {
        Some(raw) => serde_json::from_str(raw).map_err(|e| RepositoryError::FieldValueError {
            field: key.to_string(),
            message: e.to_string(),
        }),
        None => {
            warn!(collection = key, "组合状态缺少集合,使用默认值");
            Ok(T::default())
        }
    }
}

// ==========================================
// InMemoryPortfolioStore
// ==========================================
#[derive(Default)]
pub struct InMemoryPortfolioStore {
    state: Mutex<Option<PortfolioState>>,
}

impl InMemoryPortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: PortfolioState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }
}

impl PortfolioStore for InMemoryPortfolioStore {
    fn load(&self) -> RepositoryResult<Option<PortfolioState>> {
        let guard = self
            .state
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, state: &PortfolioState) -> RepositoryResult<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        *guard = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_store() -> SqlitePortfolioStore {
        let conn = Connection::open_in_memory().unwrap();
        SqlitePortfolioStore::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_empty_store_loads_none() {
        assert!(sqlite_store().load().unwrap().is_none());
        assert!(InMemoryPortfolioStore::new().load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let store = sqlite_store();
        let state = PortfolioState::new(1_000.0);
        store.save(&state).unwrap();
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), Some(state));
    }

    #[test]
    fn test_corrupt_collection_reports_field() {
        let store = sqlite_store();
        store.save(&PortfolioState::new(1.0)).unwrap();
        {
            let conn = store.get_conn().unwrap();
            conn.execute(
                "UPDATE portfolio_state SET value_json = 'oops' WHERE collection = 'projects'",
                [],
            )
            .unwrap();
        }
        let err = store.load().unwrap_err();
        assert!(matches!(err, RepositoryError::FieldValueError { ref field, .. } if field == "projects"));
    }
}
