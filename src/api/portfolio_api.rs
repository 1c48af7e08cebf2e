// ==========================================
// 资本配置决策系统 - 组合管理 API
// ==========================================
// 职责: 持有 PortfolioState,编排各引擎,写操作落库并记录 ActionLog
// 红线: 引擎只做计算;持久化与审计只在本层发生
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{ConfigManager, DEFAULT_TOTAL_CAPITAL};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::portfolio::PortfolioState;
use crate::engine::quality::default_rules;
use crate::engine::scoring::{ScoringEngine, ScoringWeights, SynergySource};
use crate::engine::sector_allocator::SectorKeywordTable;
use crate::engine::{
    DataQualityValidator, OpportunityWorkflow, PriorityWeightBalancer, ProjectValidator,
    QualityAutoFixer, ScenarioFilter, SectorAllocator,
};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::portfolio_store::{InMemoryPortfolioStore, PortfolioStore};
use crate::repository::error::RepositoryResult;

mod allocation;
mod imports;
mod pipeline;
mod quality_ops;
mod scenarios;
mod workflow;

#[cfg(test)]
mod tests;

pub use imports::ImportSummary;
pub use pipeline::PipelineSummary;

// ==========================================
// PortfolioSettings - 运行参数
// ==========================================

/// 由配置表解析出的运行参数
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSettings {
    pub total_capital: f64,
    pub weights: ScoringWeights,
    pub keywords: SectorKeywordTable,
    pub preserve_resolutions: bool,
}

impl Default for PortfolioSettings {
    fn default() -> Self {
        Self {
            total_capital: DEFAULT_TOTAL_CAPITAL,
            weights: ScoringWeights::default(),
            keywords: SectorKeywordTable::default(),
            preserve_resolutions: true,
        }
    }
}

impl PortfolioSettings {
    /// 从配置管理器读取（格式错误的配置项已在读取时回退默认值）
    pub fn from_config(config: &ConfigManager) -> RepositoryResult<Self> {
        Ok(Self {
            total_capital: config.get_total_capital()?,
            weights: config.get_scoring_profile()?.weights,
            keywords: config.get_sector_keywords()?,
            preserve_resolutions: config.get_preserve_resolutions()?,
        })
    }
}

// ==========================================
// PortfolioApi - 组合管理 API
// ==========================================

/// 组合管理API
///
/// 职责：
/// 1. 优先级权重、机会/项目状态流转、机会转项目
/// 2. 板块配置重算、约束评估、再平衡与人工调整
/// 3. 数据质量检查、问题处置、规则启停、自动修复
/// 4. 情景比较、表格导入
/// 5. 每次写操作保存状态并记录 ActionLog
pub struct PortfolioApi {
    state: PortfolioState,
    // 最近一次成功落库的状态,保存失败时回滚到此
    committed: PortfolioState,
    store: Arc<dyn PortfolioStore>,
    action_log_repo: Option<Arc<ActionLogRepository>>,
    settings: PortfolioSettings,
    synergy: Box<dyn SynergySource>,
    balancer: PriorityWeightBalancer,
    workflow: OpportunityWorkflow,
    validator: ProjectValidator,
    allocator: SectorAllocator,
    quality: DataQualityValidator,
    autofixer: QualityAutoFixer,
    scenario: ScenarioFilter,
}

impl PortfolioApi {
    /// 创建API实例并从存储加载状态
    ///
    /// # 说明
    /// - 存储中无状态时以配置的总资本创建空组合
    /// - 总资本以配置为准,与存储不一致时重新派生优先级资本
    /// - 规则目录为空时装入默认规则
    pub fn new(
        store: Arc<dyn PortfolioStore>,
        settings: PortfolioSettings,
        synergy: Box<dyn SynergySource>,
    ) -> ApiResult<Self> {
        let loaded = store.load()?;
        let mut api = Self::assemble(
            loaded.unwrap_or_else(|| PortfolioState::new(settings.total_capital)),
            store,
            settings,
            synergy,
        );
        api.reconcile_loaded_state();
        api.committed = api.state.clone();
        Ok(api)
    }

    /// 以给定状态创建仅内存的API实例（不落盘,不记审计）
    pub fn in_memory(
        state: PortfolioState,
        settings: PortfolioSettings,
        synergy: Box<dyn SynergySource>,
    ) -> Self {
        let store: Arc<dyn PortfolioStore> = Arc::new(InMemoryPortfolioStore::new());
        let mut api = Self::assemble(state, store, settings, synergy);
        api.reconcile_loaded_state();
        api.committed = api.state.clone();
        api
    }

    /// 挂接审计日志仓储
    pub fn with_action_log(mut self, repo: Arc<ActionLogRepository>) -> Self {
        self.action_log_repo = Some(repo);
        self
    }

    fn assemble(
        state: PortfolioState,
        store: Arc<dyn PortfolioStore>,
        settings: PortfolioSettings,
        synergy: Box<dyn SynergySource>,
    ) -> Self {
        let weights = settings.weights;
        Self {
            committed: state.clone(),
            state,
            store,
            action_log_repo: None,
            synergy,
            balancer: PriorityWeightBalancer::new(),
            workflow: OpportunityWorkflow::new(),
            validator: ProjectValidator::with_scoring(ScoringEngine::with_weights(weights)),
            allocator: SectorAllocator::new(settings.keywords.clone()),
            quality: DataQualityValidator::with_weights(weights),
            autofixer: QualityAutoFixer::new(weights),
            scenario: ScenarioFilter::new(),
            settings,
        }
    }

    fn reconcile_loaded_state(&mut self) {
        if self.state.rules.is_empty() {
            self.state.rules = default_rules();
            debug!(rules = self.state.rules.len(), "装入默认规则目录");
        }

        let configured = self.settings.total_capital;
        if (self.state.total_capital - configured).abs() > f64::EPSILON {
            warn!(
                stored = self.state.total_capital,
                configured, "存储的总资本与配置不一致,以配置为准"
            );
            self.state.total_capital = configured;
            self.balancer
                .derive_allocations(&mut self.state.priorities, configured);
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 当前组合状态（只读）
    pub fn state(&self) -> &PortfolioState {
        &self.state
    }

    pub fn settings(&self) -> &PortfolioSettings {
        &self.settings
    }

    /// 最近的审计记录（未挂接审计仓储时为空）
    pub fn recent_actions(&self, limit: i64) -> ApiResult<Vec<ActionLog>> {
        match &self.action_log_repo {
            Some(repo) => Ok(repo.find_recent(limit)?),
            None => Ok(Vec::new()),
        }
    }

    // ==========================================
    // 持久化
    // ==========================================

    /// 立即保存当前状态
    pub fn save(&mut self) -> ApiResult<()> {
        self.persist()
    }

    /// 从存储重新加载（存储为空时报 NotFound）
    pub fn reload(&mut self) -> ApiResult<()> {
        let loaded = self
            .store
            .load()?
            .ok_or_else(|| ApiError::NotFound("组合状态尚未保存".to_string()))?;
        self.state = loaded;
        self.reconcile_loaded_state();
        self.committed = self.state.clone();
        info!("组合状态已重新加载");
        Ok(())
    }

    /// 整体替换组合状态（演示数据、外部整包导入）
    pub fn replace_state(&mut self, state: PortfolioState, actor: &str) -> ApiResult<()> {
        require_actor(actor)?;
        self.state = state;
        self.reconcile_loaded_state();
        self.commit(
            ActionLog::new(ActionType::Import, actor, None).with_detail(format!(
                "组合状态整体替换: {} 个优先级, {} 个机会, {} 个项目, {} 个板块",
                self.state.priorities.len(),
                self.state.opportunities.len(),
                self.state.projects.len(),
                self.state.sectors.len()
            )),
        )
    }

    /// 保存当前状态
    ///
    /// # 说明
    /// - 保存失败时内存状态回滚到最近一次成功保存的版本,内存与存储保持一致
    fn persist(&mut self) -> ApiResult<()> {
        if let Err(e) = self.store.save(&self.state) {
            warn!(error = %e, "组合状态保存失败,回滚未提交的修改");
            self.state = self.committed.clone();
            return Err(e.into());
        }
        self.committed = self.state.clone();
        Ok(())
    }

    /// 写操作收尾: 保存状态并记录审计
    ///
    /// 状态保存失败时不写审计;审计写入失败时状态已落库,错误照常返回
    fn commit(&mut self, log: ActionLog) -> ApiResult<()> {
        self.persist()?;
        if let Some(repo) = &self.action_log_repo {
            repo.insert(&log)?;
        }
        debug!(
            action_type = %log.action_type,
            entity_id = ?log.entity_id,
            actor = %log.actor,
            "操作已提交"
        );
        Ok(())
    }
}

/// 操作人不能为空
fn require_actor(actor: &str) -> ApiResult<()> {
    if actor.trim().is_empty() {
        return Err(ApiError::InvalidInput("操作人不能为空".to_string()));
    }
    Ok(())
}

/// 批量操作的计数结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub affected: Vec<String>,
    pub skipped: usize,
}
