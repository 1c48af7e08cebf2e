// ==========================================
// 资本配置决策系统 - 应用状态
// ==========================================
// 职责: 打开数据库,装配配置/仓储/API 实例
// ==========================================

use std::sync::Arc;

use anyhow::Context;

use crate::api::portfolio_api::{PortfolioApi, PortfolioSettings};
use crate::app::seed::{demo_portfolio, SEED_ACTOR};
use crate::config::config_manager::ConfigManager;
use crate::db::open_sqlite_connection;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::portfolio_store::{PortfolioStore, SqlitePortfolioStore};

/// 应用状态
///
/// 持有共享连接上的配置管理器、审计仓储与组合 API
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 操作日志仓储（用于审计追踪）
    pub action_log_repo: Arc<ActionLogRepository>,

    /// 组合管理API
    pub portfolio_api: PortfolioApi,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并建表
    /// 2. 读取配置（总资本、评分权重、协同区间、板块关键字）
    /// 3. 从 portfolio_state 表加载组合状态
    pub fn new(db_path: String) -> anyhow::Result<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .with_context(|| format!("无法打开数据库: {}", db_path))?;
        let conn = Arc::new(std::sync::Mutex::new(conn));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone()).context("无法创建ConfigManager")?,
        );
        let action_log_repo = Arc::new(
            ActionLogRepository::new(conn.clone()).context("无法创建ActionLogRepository")?,
        );
        let store: Arc<dyn PortfolioStore> = Arc::new(
            SqlitePortfolioStore::from_connection(conn).context("无法创建SqlitePortfolioStore")?,
        );

        let settings = PortfolioSettings::from_config(&config_manager).context("读取配置失败")?;
        let synergy = config_manager
            .synergy_source()
            .context("构造协同评分源失败")?;

        let portfolio_api = PortfolioApi::new(store, settings, synergy)
            .context("加载组合状态失败")?
            .with_action_log(action_log_repo.clone());

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config_manager,
            action_log_repo,
            portfolio_api,
        })
    }

    /// 组合为空时写入演示数据
    ///
    /// # 返回
    /// - Ok(true): 已写入
    /// - Ok(false): 已有数据,未改动
    pub fn seed_if_empty(&mut self) -> anyhow::Result<bool> {
        if !self.portfolio_api.state().is_empty() {
            return Ok(false);
        }

        let total_capital = self.portfolio_api.settings().total_capital;
        self.portfolio_api
            .replace_state(demo_portfolio(total_capital), SEED_ACTOR)
            .context("写入演示组合失败")?;
        tracing::info!("已写入演示组合");
        Ok(true)
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

// ==========================================
// 默认数据库路径辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 CAPITAL_ALLOCATION_DB_PATH（非空时）
/// - 否则: 用户数据目录/capital-allocation/capital_allocation.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("CAPITAL_ALLOCATION_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./capital_allocation.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("capital-allocation");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("capital_allocation.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_seeds_once() {
        let file = NamedTempFile::new().unwrap();
        let db_path = file.path().to_string_lossy().to_string();

        let mut state = AppState::new(db_path.clone()).unwrap();
        assert!(state.seed_if_empty().unwrap());
        assert!(!state.seed_if_empty().unwrap());

        // 重新打开后从数据库加载同一组合
        let reopened = AppState::new(db_path).unwrap();
        assert_eq!(reopened.portfolio_api.state().priorities.len(), 3);
        assert_eq!(reopened.portfolio_api.state().opportunities.len(), 6);
        assert!(reopened.action_log_repo.count().unwrap() >= 1);
    }
}
